//! Interactive yes/no prompts.

use std::fmt;
use std::io::{BufRead, Write};

use crate::error::PruneError;
use crate::prune::pattern::Stride;

/// An accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    YesToAll,
}

impl Answer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::YesToAll => "yes-to-all",
        }
    }

    /// Parses trimmed, case-insensitive input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "yes-to-all" => Some(Self::YesToAll),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `yes` / `no`.
pub const YES_NO: &[Answer] = &[Answer::Yes, Answer::No];

/// `yes` / `no` / `yes-to-all`.
pub const YES_NO_ALL: &[Answer] = &[Answer::Yes, Answer::No, Answer::YesToAll];

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The output sink, for progress text between prompts.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consumes the prompter and returns the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Prints `prompt` and reads one line.
    ///
    /// # Errors
    ///
    /// - `PruneError::InputClosed` at end of input
    /// - `PruneError::Terminal` if reading or writing fails
    pub fn read_line(&mut self, prompt: &str) -> Result<String, PruneError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PruneError::InputClosed {
                prompt: prompt.to_string(),
            });
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the reply is one of `valid`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_line`].
    pub fn ask(&mut self, prompt: &str, valid: &[Answer]) -> Result<Answer, PruneError> {
        loop {
            let line = self.read_line(prompt)?;
            if let Some(answer) = Answer::parse(&line).filter(|a| valid.contains(a)) {
                return Ok(answer);
            }
            let options: Vec<&str> = valid.iter().map(|a| a.as_str()).collect();
            writeln!(
                self.output,
                "Invalid input. Please enter one of: {}.",
                options.join(", ")
            )?;
        }
    }

    /// Reads a stride. Returns `Ok(None)` if the reply is not a positive integer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_line`].
    pub fn read_stride(&mut self, prompt: &str) -> Result<Option<Stride>, PruneError> {
        let line = self.read_line(prompt)?;
        Ok(line.parse().ok())
    }
}
