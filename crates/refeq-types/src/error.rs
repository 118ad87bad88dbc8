use thiserror::Error;

/// Errors produced while reading or building a value graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("value lock poisoned while accessing {0}")]
    Poisoned(&'static str),

    #[error("type `{type_name}` declares no field `{field}`")]
    UnknownField { type_name: String, field: String },
}
