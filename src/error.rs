use std::io;
use thiserror::Error;

/// Everything that can go wrong while loading a vector table, building an
/// engine or answering a query.
#[derive(Debug, Error)]
pub enum AnalogyError {
    #[error("vector table is empty")]
    EmptyTable,

    #[error("vectors have zero dimensions")]
    ZeroDimension,

    #[error("vector for '{word}' has dimension {found} which differs from initial dimension {expected}")]
    InconsistentDimension {
        word: String,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is out of vocabulary")]
    WordNotFound(String),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("query has no words")]
    EmptyQuery,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("vector for '{word}' contains a non-finite value")]
    NonFiniteValue { word: String },

    #[error("vector for '{word}' has a value outside the f32 range")]
    OutOfRange { word: String },

    #[error("expected exactly 3 words, but got {0}")]
    WordCount(usize),

    #[error("malformed header: {0}")]
    Header(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, AnalogyError>;
