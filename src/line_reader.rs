use anyhow::{Context, Result};
use std::io::BufRead;

pub struct LineReader<'a> {
    reader: &'a mut dyn BufRead,
    line_no: usize,
    line: String,
}

impl<'a> LineReader<'a> {
    pub fn new(reader: &'a mut (dyn BufRead + 'a)) -> Self {
        LineReader::<'a> {
            reader: reader,
            line_no: 0,
            line: String::new(),
        }
    }

    pub fn get_last_line_number(&self) -> usize {
        self.line_no
    }

    pub fn get_last_line(&self) -> &str {
        &self.line
    }

    /**
     * Number of tabs the last line starts with.
     */
    pub fn get_indentation(&self) -> usize {
        self.line.chars().take_while(|c| *c == '\t').count()
    }

    /**
     * Reads the next line, without its line terminator. Returns false at the end of the input.
     */
    pub fn next_line_raw(&mut self) -> Result<bool> {
        self.line.clear();

        let read = self
            .reader
            .read_line(&mut self.line)
            .with_context(|| format!("failed to read line {}", self.line_no + 1))?;
        if read == 0 {
            return Ok(false);
        }

        if self.line.ends_with('\n') {
            self.line.pop();
        }
        if self.line.ends_with('\r') {
            self.line.pop();
        }
        self.line_no += 1;
        Ok(true)
    }

    /**
     * Reads the next line that contains anything else than whitespace. Returns false at the end of the input.
     */
    pub fn next_line(&mut self) -> Result<bool> {
        while self.next_line_raw()? {
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::LineReader;

    #[test]
    fn skips_blank_lines() {
        let mut reader = Cursor::new("net\r\n\n\t\n\tnode\n\t\tid=1");
        let mut lreader = LineReader::new(&mut reader);

        assert!(lreader.next_line().unwrap());
        assert_eq!(lreader.get_last_line(), "net");
        assert_eq!(lreader.get_indentation(), 0);

        assert!(lreader.next_line().unwrap());
        assert_eq!(lreader.get_last_line(), "\tnode");
        assert_eq!(lreader.get_last_line_number(), 4);
        assert_eq!(lreader.get_indentation(), 1);

        assert!(lreader.next_line().unwrap());
        assert_eq!(lreader.get_indentation(), 2);

        assert!(!lreader.next_line().unwrap());
    }
}
