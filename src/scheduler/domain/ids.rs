//! Task references and the storage identity derived from them.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Validated, trimmed task name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    /// Creates a validated task name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage primary key for a task: lowercase hex SHA-256 of its kind and
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskIdentity(String);

impl TaskIdentity {
    /// Derives the identity for a task kind and name.
    ///
    /// The kind is length-prefixed so that no two distinct `(kind, name)`
    /// pairs feed the same bytes into the digest.
    #[must_use]
    pub fn derive(kind: &str, name: &TaskName) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(kind.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(kind.as_bytes());
        hasher.update(name.as_str().as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Wraps an identity read back from storage.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the identity as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a schedulable task.
///
/// The `kind` is the concrete task type name and is what ends up in the
/// `executed_object_class` column; together with the name it determines the
/// [`TaskIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    name: TaskName,
    kind: String,
    identity: TaskIdentity,
}

impl TaskRef {
    /// Creates a task reference from a name and a kind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when either value is blank.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Result<Self, TaskDomainError> {
        let task_name = TaskName::new(name)?;
        let raw_kind = kind.into();
        let trimmed_kind = raw_kind.trim();
        if trimmed_kind.is_empty() {
            return Err(TaskDomainError::EmptyTaskKind);
        }
        let identity = TaskIdentity::derive(trimmed_kind, &task_name);
        Ok(Self {
            name: task_name,
            kind: trimmed_kind.to_owned(),
            identity,
        })
    }

    /// Creates a task reference whose kind is the Rust type name of `T`.
    ///
    /// Type names are not guaranteed stable across compiler releases; use
    /// [`TaskRef::new`] with an explicit kind when identities must survive a
    /// toolchain upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the name is blank.
    pub fn of<T: ?Sized>(name: impl Into<String>) -> Result<Self, TaskDomainError> {
        Self::new(name, std::any::type_name::<T>())
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the concrete task kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the storage identity.
    #[must_use]
    pub const fn identity(&self) -> &TaskIdentity {
        &self.identity
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
