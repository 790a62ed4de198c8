use std::{
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use skiff_utils::{
    fs::ensure_dir_exists,
    path::{resolve_path, xdg_config_home, xdg_data_home},
};
use tracing::{debug, info};

use crate::{
    display::DisplaySettings,
    error::{ConfigError, Result},
};

/// File name of the registry inside the root directory.
pub const REGISTRY_FILE_NAME: &str = "registry.txt";

/// Application's configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Root directory for skiff's data.
    /// Default: $XDG_DATA_HOME/skiff
    pub root_path: Option<String>,

    /// Path to the registry file holding remotes and reference bindings.
    /// Default: $SKIFF_ROOT/registry.txt
    pub registry_path: Option<String>,

    /// Output settings.
    pub display: Option<DisplaySettings>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("SKIFF_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("skiff").join("config.toml"),
    })
});

/// Current location of the configuration file.
pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Points subsequent loads at `path` instead of the default location.
pub fn set_config_path(path: PathBuf) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path;
}

impl Config {
    pub fn default_config() -> Self {
        let root = default_root();
        Self {
            root_path: Some(root.clone()),
            registry_path: Some(format!("{root}/{REGISTRY_FILE_NAME}")),
            display: Some(DisplaySettings {
                colors: Some(true),
                mark_default: Some(false),
            }),
        }
    }

    /// Loads the configuration from [`CONFIG_PATH`], falling back to
    /// defaults when the file does not exist.
    pub fn new() -> Result<Self> {
        Self::load_from(config_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("loading configuration from {}", path.display());
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::IoError(err)),
        }
    }

    pub fn display(&self) -> DisplaySettings {
        self.display.clone().unwrap_or_default()
    }

    pub fn get_root_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("SKIFF_ROOT") {
            return Ok(resolve_path(&env_path)?);
        }
        match &self.root_path {
            Some(root) => Ok(resolve_path(root)?),
            None => Ok(resolve_path(&default_root())?),
        }
    }

    /// Location of the registry file.
    ///
    /// `SKIFF_REGISTRY` wins over `registry_path`, which wins over
    /// `<root>/registry.txt`.
    pub fn get_registry_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("SKIFF_REGISTRY") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(registry_path) = &self.registry_path {
            return Ok(resolve_path(registry_path)?);
        }
        Ok(self.get_root_path()?.join(REGISTRY_FILE_NAME))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            ensure_dir_exists(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

fn default_root() -> String {
    std::env::var("SKIFF_ROOT")
        .unwrap_or_else(|_| format!("{}/skiff", xdg_data_home().display()))
}

/// Writes the default configuration to [`CONFIG_PATH`]. Refuses to replace
/// an existing file.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(
            config_path.display().to_string(),
        ));
    }

    Config::default_config().save()?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use tempfile::tempdir;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    #[serial]
    fn test_default_config() {
        with_env(vec![("SKIFF_ROOT", Some("/tmp/skiff-root"))], || {
            let config = Config::default_config();
            assert_eq!(config.root_path.as_deref(), Some("/tmp/skiff-root"));
            assert_eq!(
                config.registry_path.as_deref(),
                Some("/tmp/skiff-root/registry.txt")
            );
            assert!(config.display().colors());
        });
    }

    #[test]
    #[serial]
    fn test_registry_path_precedence() {
        with_env(
            vec![("SKIFF_REGISTRY", None), ("SKIFF_ROOT", None)],
            || {
                let mut config = Config {
                    root_path: Some("/srv/skiff".into()),
                    ..Config::default()
                };
                assert_eq!(
                    config.get_registry_path().unwrap(),
                    PathBuf::from("/srv/skiff/registry.txt")
                );

                config.registry_path = Some("/etc/skiff/remotes.txt".into());
                assert_eq!(
                    config.get_registry_path().unwrap(),
                    PathBuf::from("/etc/skiff/remotes.txt")
                );

                with_env(vec![("SKIFF_REGISTRY", Some("/override.txt"))], || {
                    assert_eq!(
                        config.get_registry_path().unwrap(),
                        PathBuf::from("/override.txt")
                    );
                });
            },
        );
    }

    #[test]
    #[serial]
    fn test_root_env_override() {
        with_env(vec![("SKIFF_ROOT", Some("/custom/root"))], || {
            let config = Config {
                root_path: Some("/configured".into()),
                ..Config::default()
            };
            assert_eq!(config.get_root_path().unwrap(), PathBuf::from("/custom/root"));
        });
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "registry_path = \"/data/registry.txt\"\n\n[display]\ncolors = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.registry_path.as_deref(), Some("/data/registry.txt"));
        assert!(!config.display().colors());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "registry_path = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_generate_default_config_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let previous = config_path();
        set_config_path(path.clone());

        assert_eq!(generate_default_config().unwrap(), path);
        let written = Config::load_from(&path).unwrap();
        assert!(written.registry_path.is_some());

        assert!(matches!(
            generate_default_config(),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));

        set_config_path(previous);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
