//! Name and title rules for notebooks, tags, saved searches and notes.

use crate::constants::{MAX_NAME_LEN, MAX_NOTE_TITLE_LEN};
use crate::models::EntityKind;
use thiserror::Error;

/// Reasons a display name is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind} name must not be empty")]
    Empty { kind: EntityKind },

    #[error("{kind} name is longer than {max} characters")]
    TooLong { kind: EntityKind, max: usize },

    #[error("{kind} name must not start or end with whitespace")]
    SurroundingWhitespace { kind: EntityKind },

    #[error("{kind} name contains a forbidden character {found:?}")]
    ForbiddenCharacter { kind: EntityKind, found: char },

    #[error("{kind} with name '{name}' already exists")]
    Duplicate { kind: EntityKind, name: String },
}

fn is_forbidden_char(ch: char) -> bool {
    ch.is_control() || ch == '\u{2028}' || ch == '\u{2029}'
}

/// Maximum display-name length for `kind`, in characters.
pub fn max_name_len(kind: EntityKind) -> usize {
    match kind {
        EntityKind::Note => MAX_NOTE_TITLE_LEN,
        _ => MAX_NAME_LEN,
    }
}

/// Check `name` against the syntactic rules for `kind`.
///
/// Uniqueness is not checked here; see [`ensure_unique_name`].
///
/// # Errors
/// Returns the first [`ValidationError`] found.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty { kind });
    }
    let max = max_name_len(kind);
    if name.chars().count() > max {
        return Err(ValidationError::TooLong { kind, max });
    }
    if name.trim() != name {
        return Err(ValidationError::SurroundingWhitespace { kind });
    }
    if let Some(found) = name.chars().find(|ch| is_forbidden_char(*ch)) {
        return Err(ValidationError::ForbiddenCharacter { kind, found });
    }
    if kind == EntityKind::Tag && name.contains(',') {
        return Err(ValidationError::ForbiddenCharacter { kind, found: ',' });
    }
    Ok(())
}

/// Case-folded form used for name uniqueness checks.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Whether names of `kind` must be unique (case-insensitively) per account.
pub fn requires_unique_name(kind: EntityKind) -> bool {
    !matches!(kind, EntityKind::Note)
}

/// Reject `name` when `exists(name_key(name))` reports a collision.
///
/// # Errors
/// Returns [`ValidationError::Duplicate`] on collision.
pub fn ensure_unique_name<F>(kind: EntityKind, name: &str, exists: F) -> Result<(), ValidationError>
where
    F: FnOnce(&str) -> bool,
{
    if requires_unique_name(kind) && exists(&name_key(name)) {
        return Err(ValidationError::Duplicate {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}
