//! ui::prompts
//!
//! Interactive prompts.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must take it from flags or stdin, or
//! fail with a clear error message.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(err: io::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Prompt for a line of text.
///
/// Returns [`PromptError::Cancelled`] on end of input or an empty answer.
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    print!("{}: ", message);
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

/// Prompt for masked input (passwords). The input is not echoed.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let value = rpassword::prompt_password(format!("{}: ", message))?;
    if value.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(value)
}

/// Read one line from `reader`, without its line ending.
pub fn read_line(reader: &mut impl BufRead) -> Result<String, PromptError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PromptError::Cancelled);
    }

    let value = line.trim_end_matches(['\r', '\n']);
    if value.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(value.to_string())
}
