//! Interactive configuration: asks for one test case on a terminal.

use std::io::{BufRead, Write};

use crate::config::TestCaseConfig;
use crate::error::{Error, Result};

/// Asks questions on `output` and reads answers line by line from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input/output pair, usually locked stdin and stdout.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask the full question sequence and assemble a test case.
    ///
    /// `enum_count` is `end - start`; the enums are always named from `A_0`.
    pub fn ask_test_case(&mut self) -> Result<TestCaseConfig> {
        let start = self.ask_integer("Enter start of range (inclusive): ")?;
        let end = self.ask_integer("Enter end of range (exclusive): ")?;
        let value_count = self.ask_integer("Enter number of enum values per enum (e.g., 15): ")?;
        let base_filename = self.ask_line("Enter base file name (e.g., big_enums): ")?;
        let min_range = self.ask_integer("Enter the min range (e.g., -256): ")?;
        let max_range = self.ask_integer("Enter the max range (e.g., 256): ")?;
        let is_scoped = self.ask_yes_no("Generate scoped enums (enum class)? [Y/n]: ", true)?;

        let enum_count = end.checked_sub(start).ok_or_else(|| Error::Prompt {
            prompt: "end".to_string(),
            reason: format!("{end} - {start} overflows"),
        })?;

        Ok(TestCaseConfig::new(enum_count, value_count, base_filename)
            .with_range(min_range, max_range)
            .scoped(is_scoped))
    }

    fn ask_line(&mut self, prompt: &str) -> Result<String> {
        let prompt_error = |reason: String| Error::Prompt {
            prompt: prompt.trim_end_matches([':', ' ']).to_string(),
            reason,
        };

        write!(self.output, "{prompt}")
            .and_then(|()| self.output.flush())
            .map_err(|e| prompt_error(e.to_string()))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| prompt_error(e.to_string()))?;
        if read == 0 {
            return Err(prompt_error("unexpected end of input".to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn ask_integer(&mut self, prompt: &str) -> Result<i64> {
        let answer = self.ask_line(prompt)?;
        answer.parse::<i64>().map_err(|_| Error::Prompt {
            prompt: prompt.trim_end_matches([':', ' ']).to_string(),
            reason: format!("expected an integer, got `{answer}`"),
        })
    }

    fn ask_yes_no(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = self.ask_line(prompt)?;
        match answer.to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Err(Error::Prompt {
                prompt: prompt.trim_end_matches([':', ' ']).to_string(),
                reason: format!("expected y or n, got `{answer}`"),
            }),
        }
    }
}
