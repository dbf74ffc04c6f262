use std::fmt;

use thiserror::Error;

/// Failure class reported by the store, mirroring PostgreSQL SQLSTATE codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StoreErrorCode {
    UniqueViolation,
    ForeignKeyViolation,
    NotNullViolation,
    Unavailable,
    Other,
}

impl StoreErrorCode {
    #[must_use]
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            "23505" => Self::UniqueViolation,
            "23503" => Self::ForeignKeyViolation,
            "23502" => Self::NotNullViolation,
            c if c.starts_with("08") => Self::Unavailable,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn sqlstate(self) -> &'static str {
        match self {
            Self::UniqueViolation => "23505",
            Self::ForeignKeyViolation => "23503",
            Self::NotNullViolation => "23502",
            Self::Unavailable => "08006",
            Self::Other => "XX000",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UniqueViolation => "unique violation",
            Self::ForeignKeyViolation => "foreign key violation",
            Self::NotNullViolation => "not-null violation",
            Self::Unavailable => "store unavailable",
            Self::Other => "store error",
        };
        write!(f, "{name} ({})", self.sqlstate())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.code == StoreErrorCode::UniqueViolation
    }
}
