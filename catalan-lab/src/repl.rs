//! Read-eval-print loop shared by all commands

use std::io::{self, BufRead, Write};

/// Shown before each line is read.
pub const PROMPT: &str = "> ";

/// Printed when a blank line is entered.
pub const EMPTY_INPUT: &str = "Please enter some text";

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Farewell printed by most commands.
pub const GOODBYE: &str = "Goodbye!";

/// One kind of request the loop can answer.
pub trait Task {
    /// Process one non-empty line and print the result.
    fn respond<W: Write>(&self, text: &str, out: &mut W) -> anyhow::Result<()>;

    /// Printed when the loop ends.
    fn farewell(&self) -> &str {
        GOODBYE
    }
}

/// Whether `input` ends the session.
pub fn is_quit(input: &str) -> bool {
    QUIT_WORDS
        .iter()
        .any(|word| input.eq_ignore_ascii_case(word))
}

/// Answer lines from `input` until a quit word or end of input.
///
/// Failed requests are reported on `out` and the loop keeps going; only I/O
/// errors on `input` or `out` end it early.
pub fn run<R, W, T>(mut input: R, out: &mut W, task: &T) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    T: Task,
{
    let mut line = String::new();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            log::debug!("end of input");
            writeln!(out)?;
            break;
        }

        let text = line.trim();
        if is_quit(text) {
            break;
        }
        if text.is_empty() {
            writeln!(out, "Error: {EMPTY_INPUT}")?;
            continue;
        }

        if let Err(e) = task.respond(text, out) {
            log::debug!("request failed: {e:?}");
            writeln!(out, "Error: {e:#}")?;
            writeln!(out)?;
        }
    }

    writeln!(out, "{}", task.farewell())?;
    out.flush()
}
