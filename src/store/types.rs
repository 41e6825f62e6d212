//! Record types and error definitions for the student store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors emitted by [`crate::store::StudentStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record with the same id is already stored.
    #[error("Student ID already exists")]
    Conflict(i64),
    /// No record matches the requested id.
    #[error("Student not found")]
    NotFound(i64),
    /// Listing was requested while the store holds no records.
    #[error("No student found")]
    Empty,
    /// Supplied email address failed syntax validation.
    #[error("Invalid email")]
    InvalidEmail(String),
}

/// A single student entry keyed by a caller-supplied id.
///
/// `name`, `age` and `email` may be omitted on the wire; they then take their zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Caller-supplied identifier, unique within the store.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Age in years; `0` means unknown.
    #[serde(default)]
    pub age: i64,
    /// Contact email; empty when not provided.
    #[serde(default)]
    pub email: String,
}

/// Partial record applied by `PUT /student/:id`.
///
/// Empty strings and a zero age are treated exactly like omitted fields, so a caller cannot
/// clear a field through an update. Any `id` in the body is ignored in favour of the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentPatch {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement age.
    #[serde(default)]
    pub age: Option<i64>,
    /// Replacement email, validated before anything is written.
    #[serde(default)]
    pub email: Option<String>,
}

impl StudentPatch {
    /// Name to write, if the patch carries a non-empty one.
    pub fn effective_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Age to write, if the patch carries a non-zero one.
    pub fn effective_age(&self) -> Option<i64> {
        self.age.filter(|age| *age != 0)
    }

    /// Email to write, if the patch carries a non-empty one.
    pub fn effective_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    /// Overwrite the fields of `record` that this patch effectively supplies.
    pub(crate) fn apply_to(&self, record: &mut StudentRecord) {
        if let Some(name) = self.effective_name() {
            record.name = name.to_string();
        }
        if let Some(age) = self.effective_age() {
            record.age = age;
        }
        if let Some(email) = self.effective_email() {
            record.email = email.to_string();
        }
    }
}
