use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::{Col, Line};
use itertools::Itertools;

/// A static diagnostic: something went wrong while scanning or parsing.
/// Runtime faults are a separate type owned by the interpreter, since they
/// are reported differently and map to a different exit code.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}:{col}] {message}")]
pub struct SiltError {
    pub line: Line,
    pub col: Col,
    pub message: String,
}

impl SiltError {
    pub fn new(line: Line, col: Col, message: impl Into<String>) -> Self {
        Self { line, col, message: message.into() }
    }
}

/// All diagnostics collected over one scan or parse of a source. Scanning
/// and parsing never stop at the first fault, so errors accumulate here.
#[derive(thiserror::Error, Debug, Default, PartialEq)]
pub struct SiltErrors(pub Vec<SiltError>);

impl From<SiltError> for SiltErrors {
    fn from(e: SiltError) -> Self {
        Self(vec![e])
    }
}

impl Deref for SiltErrors {
    type Target = Vec<SiltError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SiltErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for SiltErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|e| e.to_string()).join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, SiltError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_line_and_col() {
        let e = SiltError::new(Line(3), Col(7), "Unexpected character '@'.");
        assert_eq!(e.to_string(), "[line 3:7] Unexpected character '@'.");
    }

    #[test]
    fn joins_multiple_errors() {
        let errors = SiltErrors(vec![
            SiltError::new(Line(1), Col(1), "first"),
            SiltError::new(Line(2), Col(4), "second"),
        ]);
        assert_eq!(errors.to_string(), "[line 1:1] first\n[line 2:4] second");
    }
}
