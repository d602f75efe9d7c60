use std::path::PathBuf;

use esla_core::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Expected {expected} arguments but got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Can only call functions, got {0}")]
    NotCallable(String),
    #[error("Property '{property}' not found on {type_name}")]
    PropertyNotFound { type_name: String, property: String },
    #[error("Method '{method}' not found on {type_name}")]
    MethodNotFound { type_name: String, method: String },
    #[error("{type_name} object is already in use")]
    ObjectInUse { type_name: String },
    #[error("Could not open file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EvaluationError {
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        EvaluationError::TypeMismatch(message.into())
    }
}
