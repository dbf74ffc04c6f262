use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single field-level problem found while validating a payload.
///
/// `field` is a dotted path into the payload, e.g. `itens.1.nome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotAnObject { field: String },
    Required { field: String },
    Empty { field: String },
    InvalidType { field: String, expected: &'static str },
    Negative { field: String },
    OutOfRange { field: String },
    UnknownSelectionMode { field: String, value: String },
    NoItems { field: String },
}

impl ValidationError {
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NotAnObject { field }
            | Self::Required { field }
            | Self::Empty { field }
            | Self::InvalidType { field, .. }
            | Self::Negative { field }
            | Self::OutOfRange { field }
            | Self::UnknownSelectionMode { field, .. }
            | Self::NoItems { field } => field,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotAnObject { .. } => "must be a JSON object".to_string(),
            Self::Required { .. } => "is required".to_string(),
            Self::Empty { .. } => "must not be empty".to_string(),
            Self::InvalidType { expected, .. } => format!("must be {expected}"),
            Self::Negative { .. } => "must be zero or positive".to_string(),
            Self::OutOfRange { .. } => "is out of range".to_string(),
            Self::UnknownSelectionMode { value, .. } => format!(
                "unknown selection mode '{value}' (expected RADIO_OBRIGATORIO, \
                 CHECKBOX_OPCIONAL or CHECKBOX_OBRIGATORIO)"
            ),
            Self::NoItems { .. } => "must contain at least one item".to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field = self.field();
        if field.is_empty() {
            write!(f, "payload {}", self.message())
        } else {
            write!(f, "'{field}' {}", self.message())
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("path", self.field())?;
        map.serialize_entry("message", &self.message())?;
        map.end()
    }
}

/// Every problem found in one payload (guaranteed non-empty).
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::len_without_is_empty)]
pub struct ValidationErrors {
    first: ValidationError,
    rest: Vec<ValidationError>,
}

impl ValidationErrors {
    /// # Panics
    ///
    /// Panics if `errors` is empty; use [`ValidationErrors::try_from_vec`] otherwise.
    #[must_use]
    pub fn from_vec(errors: Vec<ValidationError>) -> Self {
        Self::try_from_vec(errors).expect("ValidationErrors must contain at least one error")
    }

    #[must_use]
    pub fn try_from_vec(mut errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        let first = errors.remove(0);
        Some(Self {
            first,
            rest: errors,
        })
    }

    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            first: error,
            rest: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.iter().any(|e| e.field() == field)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        let mut errors = vec![self.first];
        errors.extend(self.rest);
        errors
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed with {} error(s)", self.len())?;
        for error in self.iter() {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for error in self.iter() {
            seq.serialize_element(error)?;
        }
        seq.end()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ValidationErrorCollector {
    errors: Vec<ValidationError>,
}

impl ValidationErrorCollector {
    pub(crate) fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub(crate) fn into_errors(self) -> Option<ValidationErrors> {
        ValidationErrors::try_from_vec(self.errors)
    }
}
