//! Interactive console prompts used by the binaries when a value was not
//! given on the command line or in the settings file.

use std::io::{BufRead, Write};

use crate::core::error::{Result, StarError};

/// Print `message`, read one line and return it trimmed.
///
/// End of input yields an empty string.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a positive integer
pub fn prompt_count<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<usize> {
    let answer = prompt_line(input, output, message)?;
    match answer.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StarError::invalid_config(format!(
            "expected a positive whole number, got '{}'",
            answer
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_line_trims() {
        let mut input = Cursor::new("  octocat \n");
        let mut output = Vec::new();

        let answer = prompt_line(&mut input, &mut output, "Enter your GitHub username: ").unwrap();

        assert_eq!(answer, "octocat");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter your GitHub username: ");
    }

    #[test]
    fn test_prompt_line_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(prompt_line(&mut input, &mut output, "? ").unwrap(), "");
    }

    #[test]
    fn test_prompt_count() {
        let mut output = Vec::new();
        assert_eq!(prompt_count(&mut Cursor::new("7\n"), &mut output, "? ").unwrap(), 7);
        assert!(prompt_count(&mut Cursor::new("0\n"), &mut output, "? ").is_err());
        assert!(prompt_count(&mut Cursor::new("five\n"), &mut output, "? ").is_err());
    }
}
