use miette::Diagnostic;
use skiff_config::error::ConfigError;
use skiff_registry::RegistryError;
use skiff_utils::error::{PathError, UtilsError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum SkiffError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Utils(#[from] UtilsError),

    #[error("Error while {action}")]
    #[diagnostic(code(skiff::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(skiff::json))]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(skiff::toml), help("Check your configuration syntax"))]
    TomlError(#[from] toml::ser::Error),
}

impl From<PathError> for SkiffError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

pub type SkiffResult<T> = std::result::Result<T, SkiffError>;

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> SkiffResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> SkiffResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            SkiffError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
