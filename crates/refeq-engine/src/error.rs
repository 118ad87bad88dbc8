use std::fmt;

use refeq_types::TypeError;

/// Operational failures that abort a comparison.
///
/// Divergences between the compared values are never errors; they are
/// returned as a difference tree.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The value graph could not be read the way its type descriptor says.
    #[error("introspection error: {0}")]
    Introspection(String),

    /// A registered lazy-reference resolver failed.
    #[error("resolver error in '{resolver}': {message}")]
    Resolver { resolver: String, message: String },

    /// An unordered comparison exceeded the configured best-match pool.
    #[error("best-match pool of {left}x{right} elements exceeds limit {limit}")]
    PoolTooLarge {
        left: usize,
        right: usize,
        limit: usize,
    },

    /// Reading a value failed.
    #[error(transparent)]
    Types(#[from] TypeError),
}

impl EngineError {
    /// Create a resolver error with a resolver name and message.
    pub fn resolver(resolver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolver {
            resolver: resolver.into(),
            message: message.into(),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for EngineError {}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
