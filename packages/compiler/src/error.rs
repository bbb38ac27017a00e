//! Compiler Errors
//!
//! The pipeline itself reports through `Diagnostics`; these errors only cover the
//! boundaries around it (configuration input and function construction).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("failed to construct function: {message}")]
    FunctionConstruction { message: String, code: String },

    #[error("invalid compiler option `{option}`: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("invalid compiler configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;
