//! Interactive prompt.

use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter your command: ";

/// Print the prompt and read one line.
///
/// Returns `None` on EOF or when the line is blank; otherwise the line with
/// surrounding whitespace removed.
pub fn read_command(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Option<String>> {
    out.write_all(PROMPT.as_bytes())?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let command = line.trim();
    if command.is_empty() {
        Ok(None)
    } else {
        Ok(Some(command.to_string()))
    }
}
