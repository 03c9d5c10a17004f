//! Character-level input ports.
//!
//! Both REPL lines and loaded script files are read into memory first, so a
//! port is a string with a cursor. The cursor can step back one character,
//! which is the single character of lookahead the tokenizer needs; pushed-back
//! input survives across reads of successive top-level forms.

use std::fs;
use std::io;
use std::path::Path;

/// An input port over in-memory source text.
pub struct Port {
    chars: Vec<char>,
    pos: usize,
}

impl Port {
    /// Create a port over a string of source text.
    pub fn from_string(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            pos: 0,
        }
    }

    /// Create a port over the contents of a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_string(&content))
    }

    /// Read the next character, or None at end of input.
    pub fn read_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Step back over the most recently read character.
    pub fn unread_char(&mut self) {
        if self.pos > 0 {
            self.pos -= 1;
        }
    }

    /// Look at the next character without consuming it.
    pub fn peek_char(&mut self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_characters_in_order() {
        let mut port = Port::from_string("ab");
        assert_eq!(port.read_char(), Some('a'));
        assert_eq!(port.read_char(), Some('b'));
        assert_eq!(port.read_char(), None);
        assert_eq!(port.read_char(), None);
    }

    #[test]
    fn unread_steps_back_once() {
        let mut port = Port::from_string("ab");
        assert_eq!(port.read_char(), Some('a'));
        port.unread_char();
        assert_eq!(port.read_char(), Some('a'));
        assert_eq!(port.peek_char(), Some('b'));
        assert_eq!(port.read_char(), Some('b'));
    }

    #[test]
    fn from_file_reads_contents() {
        let mut tmpfile = NamedTempFile::new().unwrap();
        write!(tmpfile, "(+ 1 2)").unwrap();
        let mut port = Port::from_file(tmpfile.path()).unwrap();
        assert_eq!(port.read_char(), Some('('));
    }

    #[test]
    fn from_file_missing_is_an_error() {
        assert!(Port::from_file("/no/such/file/hopefully.scm").is_err());
    }
}
