//! Erros do motor de inferência fuzzy

use thiserror::Error;

use crate::types::Variable;

pub type FisResult<T> = Result<T, FisError>;

/// Erros do motor de inferência
///
/// `Configuration` só aparece na construção do catálogo/base de regras;
/// `MissingInput` só aparece em [`crate::InferenceEngine::infer`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FisError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid membership parameters for '{term}': {reason}")]
    InvalidMembership { term: String, reason: String },

    #[error("Rule {rule} references undefined term '{term}' of '{variable}'")]
    UndefinedTerm {
        rule: usize,
        variable: String,
        term: String,
    },

    #[error("Missing input: {0}")]
    MissingInput(Variable),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl FisError {
    /// Erro de carga (catálogo/regras), nunca de chamada
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FisError::Configuration(_)
                | FisError::InvalidMembership { .. }
                | FisError::UndefinedTerm { .. }
                | FisError::Parse(_)
        )
    }
}

impl From<std::io::Error> for FisError {
    fn from(err: std::io::Error) -> Self {
        FisError::Io(err.to_string())
    }
}
