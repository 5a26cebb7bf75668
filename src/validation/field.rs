//! Field-scoped validation errors.
//!
//! Errors render the way the Kubernetes API server renders field errors, e.g.
//! `spec.template.terminateNotificationTimeout: Invalid value: 4: minimum timeout 5 is allowed`.

use std::fmt;

use thiserror::Error;

/// Path to a field within a resource, e.g. `spec.template.networkInterfaces[0]`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Start a path at a root field.
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    /// Path of a child field.
    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    /// Path of a list element.
    pub fn index(&self, i: usize) -> Self {
        Self(format!("{}[{}]", self.0, i))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a field error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The field or operation is categorically disallowed.
    Forbidden,
    /// The value is not allowed given the other field values.
    Invalid,
    /// A field that must accompany another is missing.
    Required,
    /// The value failed format parsing.
    Malformed,
    /// An external dependency could not be resolved.
    LookupFailure,
}

impl ErrorKind {
    /// Short machine-readable reason, used as the admission denial reason.
    pub fn reason(&self) -> &'static str {
        match self {
            ErrorKind::Forbidden => "FieldValueForbidden",
            ErrorKind::Invalid => "FieldValueInvalid",
            ErrorKind::Required => "FieldValueRequired",
            ErrorKind::Malformed => "FieldValueMalformed",
            ErrorKind::LookupFailure => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Forbidden => write!(f, "Forbidden"),
            ErrorKind::Invalid => write!(f, "Invalid value"),
            ErrorKind::Required => write!(f, "Required value"),
            ErrorKind::Malformed => write!(f, "Malformed value"),
            ErrorKind::LookupFailure => write!(f, "Lookup failure"),
        }
    }
}

/// A single validation failure tied to a field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub field: FieldPath,
    /// Offending value, rendered; only carried by Invalid and Malformed errors.
    pub value: Option<String>,
    pub detail: String,
}

impl FieldError {
    pub fn forbidden(field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Forbidden,
            field,
            value: None,
            detail: detail.into(),
        }
    }

    pub fn invalid(field: FieldPath, value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            field,
            value: Some(value.to_string()),
            detail: detail.into(),
        }
    }

    pub fn required(field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Required,
            field,
            value: None,
            detail: detail.into(),
        }
    }

    pub fn malformed(field: FieldPath, value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Malformed,
            field,
            value: Some(value.to_string()),
            detail: detail.into(),
        }
    }

    pub fn lookup_failure(field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::LookupFailure,
            field,
            value: None,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}: {}", self.field, self.kind, value)?,
            None => write!(f, "{}: {}", self.field, self.kind)?,
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {}

/// Ordered list of field errors collected from independent checks.
pub type ErrorList = Vec<FieldError>;

/// Every field error produced while validating one object.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{}", render(.0))]
pub struct AggregateError(pub ErrorList);

impl AggregateError {
    /// `Ok(())` for an empty list, otherwise the aggregate.
    pub fn from_list(errors: ErrorList) -> Result<(), AggregateError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AggregateError(errors))
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reason of the first error; the admission response carries a single reason.
    pub fn reason(&self) -> &'static str {
        self.0
            .first()
            .map(|e| e.kind.reason())
            .unwrap_or("FieldValueInvalid")
    }
}

fn render(errors: &[FieldError]) -> String {
    if let [only] = errors {
        return only.to_string();
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}
