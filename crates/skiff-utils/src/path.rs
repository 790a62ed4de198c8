use std::{env, iter::Peekable, path::PathBuf, str::Chars};

use crate::error::{PathError, PathResult};

/// Resolves a path string that may contain environment variables.
///
/// Expands `$VAR` and `${VAR}`, replaces a leading `~` with the home
/// directory and makes relative paths absolute against the current working
/// directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::CurrentDir`] if the current directory cannot be determined
/// * [`PathError::MissingEnvVar`] if a referenced variable is undefined
/// * [`PathError::UnclosedVariable`] if a `${` is never closed
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();

    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let expanded = PathBuf::from(expand_variables(path)?);

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|err| PathError::CurrentDir { source: err })
    }
}

/// Returns the user's home directory.
///
/// Uses `HOME` when set, otherwise `/home/$USER`.
pub fn home_dir() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| {
        let user = env::var("USER").unwrap_or_else(|_| "root".to_string());
        PathBuf::from(format!("/home/{user}"))
    })
}

/// `$XDG_CONFIG_HOME`, defaulting to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// `$XDG_DATA_HOME`, defaulting to `$HOME/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

fn expand_variables(path: &str) -> PathResult<String> {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let var_name = consume_braced(&mut chars)?;
                push_env_var(&var_name, &mut result, path)?;
            }
            '$' => {
                let var_name = consume_var_name(&mut chars);
                if var_name.is_empty() {
                    result.push('$');
                } else {
                    push_env_var(&var_name, &mut result, path)?;
                }
            }
            '~' if result.is_empty() => result.push_str(&home_dir().to_string_lossy()),
            _ => result.push(c),
        }
    }

    Ok(result)
}

fn consume_braced(chars: &mut Peekable<Chars>) -> PathResult<String> {
    let mut var_name = String::new();

    for c in chars.by_ref() {
        if c == '}' {
            return Ok(var_name);
        }
        var_name.push(c);
    }

    Err(PathError::UnclosedVariable {
        input: format!("${{{var_name}"),
    })
}

fn consume_var_name(chars: &mut Peekable<Chars>) -> String {
    let mut var_name = String::new();
    while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
        var_name.push(c);
    }
    var_name
}

fn push_env_var(var_name: &str, result: &mut String, original: &str) -> PathResult<()> {
    let value = match var_name {
        "HOME" => home_dir().to_string_lossy().into_owned(),
        "XDG_CONFIG_HOME" => xdg_config_home().to_string_lossy().into_owned(),
        "XDG_DATA_HOME" => xdg_data_home().to_string_lossy().into_owned(),
        _ => {
            env::var(var_name).map_err(|_| {
                PathError::MissingEnvVar {
                    var: var_name.into(),
                    input: original.into(),
                }
            })?
        }
    };
    result.push_str(&value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_expand_variables() {
        env::set_var("SKIFF_TEST_VAR", "value");

        assert_eq!(expand_variables("$SKIFF_TEST_VAR/path").unwrap(), "value/path");
        assert_eq!(
            expand_variables("${SKIFF_TEST_VAR}_suffix").unwrap(),
            "value_suffix"
        );
        assert_eq!(expand_variables("cost$").unwrap(), "cost$");

        env::remove_var("SKIFF_TEST_VAR");
    }

    #[test]
    #[serial]
    fn test_expand_variables_errors() {
        env::remove_var("SKIFF_TEST_MISSING");

        assert!(matches!(
            expand_variables("${SKIFF_TEST_MISSING"),
            Err(PathError::UnclosedVariable { .. })
        ));
        assert!(matches!(
            expand_variables("$SKIFF_TEST_MISSING/x"),
            Err(PathError::MissingEnvVar { ref var, .. }) if var == "SKIFF_TEST_MISSING"
        ));
    }

    #[test]
    #[serial]
    fn test_resolve_path() {
        let old_home = env::var("HOME").ok();
        env::set_var("HOME", "/tmp/skiff-home");

        assert!(matches!(resolve_path("  "), Err(PathError::Empty)));
        assert_eq!(
            resolve_path("/absolute/path").unwrap(),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path("relative/path").unwrap(),
            env::current_dir().unwrap().join("relative/path")
        );
        assert_eq!(
            resolve_path("~/registry.txt").unwrap(),
            PathBuf::from("/tmp/skiff-home/registry.txt")
        );
        assert_eq!(
            resolve_path("not/at/~/start").unwrap(),
            env::current_dir().unwrap().join("not/at/~/start")
        );

        match old_home {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }
    }

    #[test]
    #[serial]
    fn test_xdg_directories() {
        let old_config = env::var("XDG_CONFIG_HOME").ok();
        let old_data = env::var("XDG_DATA_HOME").ok();

        env::set_var("XDG_CONFIG_HOME", "/tmp/config");
        env::set_var("XDG_DATA_HOME", "/tmp/data");
        assert_eq!(xdg_config_home(), PathBuf::from("/tmp/config"));
        assert_eq!(xdg_data_home(), PathBuf::from("/tmp/data"));

        env::remove_var("XDG_CONFIG_HOME");
        env::remove_var("XDG_DATA_HOME");
        assert_eq!(xdg_config_home(), home_dir().join(".config"));
        assert_eq!(xdg_data_home(), home_dir().join(".local/share"));

        for (key, value) in [("XDG_CONFIG_HOME", old_config), ("XDG_DATA_HOME", old_data)] {
            if let Some(value) = value {
                env::set_var(key, value);
            }
        }
    }
}
