//! Crate-level error types.

use std::fmt;

/// Errors produced by the structviz crate.
///
/// Every variant describes a problem detected *before* a mutation began,
/// so returning one of these never leaves a structure half-modified.
#[derive(Debug)]
pub enum StructvizError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Persisted structure record could not be read or written.
    Record(String),
    /// An index argument fell outside the structure.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of addressable positions at the time of the request.
        len: usize,
    },
    /// The operation needs at least one element.
    EmptyStructure,
    /// Another operation is still animating on this structure.
    Busy,
    /// A malformed or contradictory argument.
    InvalidArgument(String),
    /// The structure does not support the requested operation.
    Unsupported {
        /// Operation name as it appears in scripts.
        operation: &'static str,
        /// Structure name.
        structure: &'static str,
    },
}

impl fmt::Display for StructvizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Record(msg) => write!(f, "record error: {msg}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (size {len})")
            }
            Self::EmptyStructure => write!(f, "structure is empty"),
            Self::Busy => {
                write!(f, "another operation is still animating")
            }
            Self::InvalidArgument(msg) => write!(f, "{msg}"),
            Self::Unsupported {
                operation,
                structure,
            } => write!(f, "{operation} is not supported by {structure}"),
        }
    }
}

impl std::error::Error for StructvizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StructvizError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StructvizError {
    fn from(e: serde_json::Error) -> Self {
        Self::Record(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_mentions_size() {
        let e = StructvizError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(e.to_string(), "index 7 out of range (size 3)");
    }

    #[test]
    fn unsupported_names_both_sides() {
        let e = StructvizError::Unsupported {
            operation: "SEARCH",
            structure: "stack",
        };
        assert_eq!(e.to_string(), "SEARCH is not supported by stack");
    }
}
