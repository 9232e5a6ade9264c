// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Raw error cases raised while reading a script.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum RawError {
    // Lexer
    #[error("Invalid UTF8 string {0}")]
    InvalidUtf8String(std::string::FromUtf8Error),
    #[error("Unexpected char or end of input: {0:?} instead of {1:?}")]
    UnexpectedChar(Option<char>, Vec<char>),
    #[error("Failed to read input: {0}")]
    InputError(String),
    // Reader
    #[error("Unexpected end of input inside a command")]
    UnexpectedEndOfInput,
    #[error("Unbalanced closing parenthesis")]
    UnbalancedParen,
    #[error("Expected a command, found {0}")]
    ExpectedCommand(String),
    #[error("Expected a symbol, found {0}")]
    ExpectedSymbol(String),
    #[error("Expected a keyword, found {0}")]
    ExpectedKeyword(String),
    #[error("Expected a list, found {0}")]
    ExpectedList(String),
    #[error("Malformed term {0}")]
    MalformedTerm(String),
    #[error("Malformed '{0}' command")]
    MalformedCommand(String),
    #[error("Command '{0}' is not supported (see --support-non-smtcomp and --support-z3)")]
    UnsupportedCommand(String),
    // Logic
    #[error("Logic is already set to {0}")]
    LogicAlreadySet(String),
}

/// Record a position in the input stream.
#[derive(Clone, Eq, PartialEq, thiserror::Error)]
#[error("{}{}:{}", match &.path_name { Some(p) => format!("{}:", p), None => String::new() }, .line + 1, .column + 1)]
pub struct Position {
    /// Optional path name for the input stream.
    pub path_name: Option<String>,
    /// Line number in the input stream.
    pub line: usize,
    /// Column number in the line.
    pub column: usize,
}

/// An error together with a position where the error occurred.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{position}: {error}")]
pub struct Error {
    pub position: Position,
    pub error: RawError,
}

/// Failures of the transformation passes and of the overall run.
///
/// Apart from I/O, every case denotes an input shape that the scrambler does
/// not support, so callers are expected to stop.
#[derive(Debug, thiserror::Error)]
pub enum ScrambleError {
    #[error(transparent)]
    Input(#[from] Error),
    #[error("Logic has not been set")]
    LogicNotSet,
    #[error("Assertions in multiple chunks")]
    MultipleAssertionRuns,
    #[error("Declarations and definitions in multiple chunks")]
    MultipleDeclarationRuns,
    #[error("Failed to parse core names from {0}")]
    MalformedCore(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type based on `RawError`.
pub type RawResult<T> = std::result::Result<T, RawError>;

/// Result type based on `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type based on `ScrambleError`.
pub type ScrambleResult<T> = std::result::Result<T, ScrambleError>;

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let file = match &self.path_name {
            Some(p) => format!("{}:", p),
            None => String::new(),
        };
        write!(f, "{}{}:{}", file, self.line + 1, self.column + 1)
    }
}

impl From<Error> for RawError {
    fn from(value: Error) -> Self {
        value.error
    }
}

#[test]
fn test_error_display() {
    let error = Error {
        position: Position {
            path_name: Some("foo.smt2".to_string()),
            line: 2,
            column: 0,
        },
        error: RawError::UnbalancedParen,
    };
    assert_eq!(error.to_string(), "foo.smt2:3:1: Unbalanced closing parenthesis");
    let error = Error {
        position: Position {
            path_name: None,
            line: 0,
            column: 4,
        },
        error: RawError::LogicAlreadySet("QF_LIA".to_string()),
    };
    assert_eq!(error.to_string(), "1:5: Logic is already set to QF_LIA");
    assert_eq!(
        ScrambleError::from(error).to_string(),
        "1:5: Logic is already set to QF_LIA"
    );
}
