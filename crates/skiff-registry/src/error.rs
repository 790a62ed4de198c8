//! Error types for registry operations.

use miette::Diagnostic;
use skiff_utils::error::{FileSystemError, PathError, UtilsError};
use thiserror::Error;

/// Errors raised while validating, mutating or persisting the registry.
///
/// Every variant carries the identifier that caused it. None of them are
/// transient: they describe caller input or on-disk state and are reported
/// as-is.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Remote '{0}' already exists in remotes (use update to modify)")]
    #[diagnostic(
        code(skiff_registry::duplicate_name),
        help("Use `skiff remote update` to change an existing remote")
    )]
    DuplicateName(String),

    #[error("Remote '{holder}' already exists with same URL: {url}")]
    #[diagnostic(
        code(skiff_registry::duplicate_url),
        help("Each remote must point to a distinct URL")
    )]
    DuplicateUrl { holder: String, url: String },

    #[error("Remote '{0}' not found in remotes")]
    #[diagnostic(
        code(skiff_registry::remote_not_found),
        help("Run `skiff remote list` to see the configured remotes")
    )]
    NotFound(String),

    #[error("Reference '{0}' not found in remotes")]
    #[diagnostic(
        code(skiff_registry::reference_not_found),
        help("Run `skiff remote list-ref` to see the bound references")
    )]
    RefNotFound(String),

    #[error("Unrecognized boolean value '{0}'")]
    #[diagnostic(
        code(skiff_registry::invalid_boolean),
        help("Accepted values are true, yes, false and no (case-insensitive)")
    )]
    InvalidBoolean(String),

    #[error("Invalid {field} '{value}': must be non-empty and contain no whitespace")]
    #[diagnostic(code(skiff_registry::invalid_token))]
    InvalidToken { field: &'static str, value: String },

    #[error("Malformed registry entry at line {line}: '{content}'")]
    #[diagnostic(
        code(skiff_registry::malformed),
        help("Each remote line is `<name> <url> <True|False>` and each reference line is `<reference> <remote>`")
    )]
    Malformed { line: usize, content: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Utils(#[from] UtilsError),
}

impl RegistryError {
    /// Whether the error reports a missing remote or reference.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::RefNotFound(_))
    }
}

impl From<FileSystemError> for RegistryError {
    fn from(err: FileSystemError) -> Self {
        Self::Utils(UtilsError::FileSystem(err))
    }
}

impl From<PathError> for RegistryError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_identifier() {
        assert_eq!(
            RegistryError::DuplicateName("remote1".into()).to_string(),
            "Remote 'remote1' already exists in remotes (use update to modify)"
        );
        assert!(RegistryError::DuplicateUrl {
            holder: "remote0".into(),
            url: "http://u0".into(),
        }
        .to_string()
        .starts_with("Remote 'remote0' already exists with same URL"));
        assert_eq!(
            RegistryError::NotFound("origin".into()).to_string(),
            "Remote 'origin' not found in remotes"
        );
        assert_eq!(
            RegistryError::InvalidBoolean("some_invalid_option=foo".into()).to_string(),
            "Unrecognized boolean value 'some_invalid_option=foo'"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(RegistryError::NotFound("a".into()).is_not_found());
        assert!(RegistryError::RefNotFound("Pkg/1.0@u/c".into()).is_not_found());
        assert!(!RegistryError::DuplicateName("a".into()).is_not_found());
    }
}
