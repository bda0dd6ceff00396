use std::fmt;

use serde::{Deserialize, Serialize};

/// A structural syntax error detected by the local validator.
///
/// `line` is the 0-based index of the offending line. The message text
/// carries the 1-based line number for display, matching the convention
/// of the validator's failure messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxError {}
