//! Error types for MDL file operations.

use thiserror::Error;

/// Errors that can occur while reading or writing MDL files.
#[derive(Error, Debug)]
pub enum MdlError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A node kind token absent from the schema registry.
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    /// A line whose structure desynchronizes the parser, such as a
    /// bounding-box tree with a one-child internal node.
    #[error("Malformed line {line}: {message}")]
    MalformedLine {
        /// Line number (1-indexed).
        line: usize,
        /// Error message.
        message: String,
    },

    /// An enum value matching neither the symbolic nor the file-token side
    /// of its map.
    #[error("Invalid value '{value}' for property '{property}'{}: accepted values are {accepted}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    InvalidValue {
        /// Line number where the value appeared, if it came from a file.
        line: Option<usize>,
        /// Name of the property being assigned.
        property: String,
        /// The offending token.
        value: String,
        /// Comma-joined accepted tokens.
        accepted: String,
    },

    /// A property name outside the node kind's schema passed to
    /// [`Node::set`](crate::Node::set).
    #[error("Node kind {kind} has no property '{property}'")]
    UnknownProperty {
        /// The node kind whose schema was consulted.
        kind: String,
        /// The property name that was requested.
        property: String,
    },
}

impl MdlError {
    /// Create a malformed-line error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-value error.
    pub fn invalid_value(
        line: Option<usize>,
        property: impl Into<String>,
        value: impl Into<String>,
        accepted: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            line,
            property: property.into(),
            value: value.into(),
            accepted: accepted.into(),
        }
    }
}
