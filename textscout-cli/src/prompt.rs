use std::io::{self, BufRead, Write};

/// Line based questions with defaults.
///
/// An empty answer, or end of input, selects the default.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Asks for free text, showing `default` in brackets when present
    pub fn ask_text(&mut self, question: &str, default: Option<&str>) -> io::Result<String> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{} [{}]: ", question, d)?,
            _ => write!(self.output, "{}: ", question)?,
        }
        self.output.flush()?;

        let answer = self.read_answer()?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }

    /// Asks a yes/no question; any answer starting with `y` means yes
    pub fn ask_yes_no(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let shown = if default { "yes" } else { "no" };
        write!(self.output, "{} (yes/no) [{}]: ", question, shown)?;
        self.output.flush()?;

        let answer = self.read_answer()?.to_lowercase();
        if answer.is_empty() {
            Ok(default)
        } else {
            Ok(answer.starts_with('y'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_text_answer_is_trimmed() {
        let mut p = prompter("  /tmp/data  \n");
        let answer = p.ask_text("Enter the folder to search", Some(".")).unwrap();
        assert_eq!(answer, "/tmp/data");
        assert_eq!(
            String::from_utf8(p.output).unwrap(),
            "Enter the folder to search [.]: "
        );
    }

    #[test]
    fn test_text_default() {
        let mut p = prompter("\n");
        assert_eq!(p.ask_text("Folder", Some("/home")).unwrap(), "/home");

        let mut p = prompter("");
        assert_eq!(p.ask_text("Term", None).unwrap(), "");
    }

    #[test]
    fn test_yes_no() {
        let mut p = prompter("Yes\nnope\n\nmaybe\n");
        assert!(p.ask_yes_no("Count files?", false).unwrap());
        assert!(!p.ask_yes_no("Count files?", true).unwrap());
        assert!(p.ask_yes_no("Count files?", true).unwrap());
        assert!(!p.ask_yes_no("Count files?", true).unwrap());
    }

    #[test]
    fn test_yes_no_shows_default() {
        let mut p = prompter("\n");
        p.ask_yes_no("Case sensitive?", false).unwrap();
        assert_eq!(
            String::from_utf8(p.output).unwrap(),
            "Case sensitive? (yes/no) [no]: "
        );
    }
}
