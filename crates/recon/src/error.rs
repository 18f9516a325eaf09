use std::fmt;

use crate::model::DatasetRole;

#[derive(Debug)]
pub enum ReconError {
    /// A required dataset was not supplied.
    InputMissing { role: DatasetRole },
    /// None of the candidate column names exist in the dataset.
    ColumnNotFound { role: DatasetRole, candidates: Vec<String> },
    /// Two catalog rows normalize to the same key under the `reject` policy.
    DuplicateKey { role: DatasetRole, key: String, kept: String, rejected: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty candidate list, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputMissing { role } => write!(f, "{role} dataset was not supplied"),
            Self::ColumnNotFound { role, candidates } => {
                write!(f, "{role}: none of the candidate columns found ➜ [{}]", candidates.join(", "))
            }
            Self::DuplicateKey { role, key, kept, rejected } => {
                write!(
                    f,
                    "{role}: title '{key}' maps to both '{kept}' and '{rejected}'"
                )
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
