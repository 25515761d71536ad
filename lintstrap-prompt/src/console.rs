use std::io::{BufRead, Write};

use tracing::debug;

use crate::tokens::parse_bool_token;
use crate::{Prompt, PromptError, DEFAULT_MAX_RETRIES};

/// Line-oriented prompt over arbitrary reader/writer pairs.
///
/// Production wires this to stdin/stdout; tests hand it byte buffers.
pub struct ConsolePrompt<R, W> {
    reader: R,
    writer: W,
    max_retries: usize,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            // End of input stream.
            return Err(PromptError::InputExhausted { attempts: 0 });
        }
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        let mut attempts = 0;
        loop {
            write!(self.writer, "{question} [y/n] ")?;
            self.writer.flush()?;
            let answer = self.read_line()?;
            if let Some(b) = parse_bool_token(&answer) {
                return Ok(b);
            }
            attempts += 1;
            debug!(answer, "unrecognized confirmation answer");
            writeln!(self.writer, "Please answer yes or no.")?;
            if attempts >= self.max_retries {
                return Err(PromptError::InputExhausted { attempts });
            }
        }
    }

    fn ask_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        self.read_line()
    }

    fn report(&mut self, text: &str) {
        // Reporting is best effort; a broken pipe should not abort a run.
        let _ = writeln!(self.writer, "{text}");
    }

    fn max_retries(&self) -> usize {
        self.max_retries
    }
}
