use thiserror::Error;

use crate::{OwnerId, TypeDefId};

/// Misuse of the reference model. Ordinary negative answers (non-conformant, not applicable) are
/// never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeRefError {
    #[error("type reference owned by {found} cannot be used in {expected}")]
    OwnershipViolation { expected: OwnerId, found: OwnerId },
    #[error("invalid type reference: {reason}")]
    InvalidConstruction { reason: InvalidConstructionReason },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidConstructionReason {
    #[error("`{0}` is an array type and cannot be parameterized")]
    ArrayType(String),
    #[error("no declared type for {0:?}")]
    MissingTypeDef(TypeDefId),
    #[error("array references need at least one dimension")]
    ZeroDimensions,
}

impl From<InvalidConstructionReason> for TypeRefError {
    fn from(reason: InvalidConstructionReason) -> Self {
        TypeRefError::InvalidConstruction { reason }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse analysis config: {0}")]
    Toml(#[from] toml::de::Error),
}
