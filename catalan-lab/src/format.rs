//! Plain-text rendering of pipeline results

use std::io::{self, Write};

use catalan_pipelines::fill_mask::Prediction;
use catalan_pipelines::token_classification::Entity;

/// Printed before a model is loaded.
pub const LOADING: &str = "Loading model... (this may take a moment)";

/// One line per candidate: the completed sentence and its score.
pub fn write_mask_predictions<W: Write>(out: &mut W, predictions: &[Prediction]) -> io::Result<()> {
    for prediction in predictions {
        writeln!(
            out,
            "  {}  (score={:.4})",
            prediction.sequence, prediction.score
        )?;
    }
    Ok(())
}

pub fn write_pos_tags<W: Write>(out: &mut W, tags: &[Entity]) -> io::Result<()> {
    for tag in tags {
        writeln!(out, "{:15} → {} (score={:.2})", tag.word, tag.label, tag.score)?;
    }
    Ok(())
}

pub fn write_entities<W: Write>(out: &mut W, entities: &[Entity]) -> io::Result<()> {
    if entities.is_empty() {
        return writeln!(out, "No named entities found.");
    }

    for entity in entities {
        writeln!(
            out,
            "{:20} → {:10} (score={:.2}) [{}-{}]",
            entity.word, entity.label, entity.score, entity.start, entity.end
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entity(word: &str, label: &str, score: f32, start: usize, end: usize) -> Entity {
        Entity {
            label: label.to_string(),
            score,
            word: word.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn mask_lines_are_indented_with_four_decimals() {
        let predictions = vec![
            Prediction {
                token: "molt".into(),
                token_id: 42,
                score: 0.61234,
                sequence: "La llengua catalana és molt bonica.".into(),
            },
            Prediction {
                token: "tan".into(),
                token_id: 43,
                score: 0.1,
                sequence: "La llengua catalana és tan bonica.".into(),
            },
        ];

        let text = render(|out| write_mask_predictions(out, &predictions));
        assert_eq!(
            text,
            "  La llengua catalana és molt bonica.  (score=0.6123)\n  \
             La llengua catalana és tan bonica.  (score=0.1000)\n"
        );
    }

    #[test]
    fn pos_words_are_padded_to_fifteen() {
        let tags = vec![entity("gat", "NOUN", 0.987, 3, 6)];
        let text = render(|out| write_pos_tags(out, &tags));
        assert_eq!(text, "gat             → NOUN (score=0.99)\n");
    }

    #[test]
    fn entities_show_padded_label_and_offsets() {
        let entities = vec![entity("Barcelona", "LOC", 0.995, 22, 31)];
        let text = render(|out| write_entities(out, &entities));
        assert_eq!(
            text,
            "Barcelona            → LOC        (score=0.99) [22-31]\n"
        );
    }

    #[test]
    fn no_entities_message() {
        let text = render(|out| write_entities(out, &[]));
        assert_eq!(text, "No named entities found.\n");
    }
}
