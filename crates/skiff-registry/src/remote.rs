//! Remote endpoints and the ordered list that holds them.
//!
//! A [`RemoteList`] keeps its entries in priority order and enforces that
//! no two remotes share a name or a URL. Lookups by either key go through
//! index tables that are rebuilt after every structural change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// A named package-repository endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Remote {
    /// Unique, case-sensitive name of the remote.
    pub name: String,
    /// Endpoint URL. Compared verbatim, never normalized.
    pub url: String,
    /// Whether TLS certificates are verified when talking to the remote.
    pub verify_ssl: bool,
}

impl Remote {
    pub fn new(name: impl Into<String>, url: impl Into<String>, verify_ssl: bool) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            verify_ssl,
        }
    }
}

/// Parses a user supplied boolean literal.
///
/// Matching is case-insensitive over a fixed set: `true`/`yes` and
/// `false`/`no`. Anything else is rejected with
/// [`RegistryError::InvalidBoolean`].
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(RegistryError::InvalidBoolean(value.to_string())),
    }
}

/// Rejects identifiers that would not survive the line-oriented store.
pub(crate) fn ensure_token(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidToken {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Ordered collection of remotes, unique by name and by URL.
#[derive(Debug, Clone, Default)]
pub struct RemoteList {
    entries: Vec<Remote>,
    by_name: HashMap<String, usize>,
    by_url: HashMap<String, usize>,
}

impl RemoteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remotes in priority order.
    pub fn list(&self) -> &[Remote] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Remote> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Remote> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Position of `name` in priority order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// The highest-priority remote.
    pub fn default_remote(&self) -> Option<&Remote> {
        self.entries.first()
    }

    /// Name of the remote already bound to `url`, skipping `exclude`.
    fn url_holder(&self, url: &str, exclude: Option<&str>) -> Option<&str> {
        self.by_url
            .get(url)
            .map(|&idx| self.entries[idx].name.as_str())
            .filter(|holder| Some(*holder) != exclude)
    }

    /// Adds a remote, appending it or inserting it at `position`.
    ///
    /// Positions past the end are clamped, so `Some(usize::MAX)` appends.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::DuplicateName`] if `name` is already registered.
    /// * [`RegistryError::DuplicateUrl`] if another remote uses `url`.
    /// * [`RegistryError::InvalidToken`] if `name` or `url` is empty or has whitespace.
    pub fn add(
        &mut self,
        name: &str,
        url: &str,
        verify_ssl: bool,
        position: Option<usize>,
    ) -> Result<()> {
        ensure_token("remote name", name)?;
        ensure_token("remote URL", url)?;

        if self.contains(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        if let Some(holder) = self.url_holder(url, None) {
            return Err(RegistryError::DuplicateUrl {
                holder: holder.to_string(),
                url: url.to_string(),
            });
        }

        let remote = Remote::new(name, url, verify_ssl);
        match position {
            Some(idx) => {
                let idx = idx.min(self.entries.len());
                self.entries.insert(idx, remote);
                self.reindex();
            }
            None => {
                let idx = self.entries.len();
                self.by_name.insert(remote.name.clone(), idx);
                self.by_url.insert(remote.url.clone(), idx);
                self.entries.push(remote);
            }
        }

        Ok(())
    }

    /// Changes the URL, and optionally the TLS flag, of an existing remote.
    ///
    /// The remote keeps its position. Setting a remote to its current URL is
    /// accepted.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::NotFound`] if `name` is not registered.
    /// * [`RegistryError::DuplicateUrl`] if a different remote uses `url`.
    pub fn update(&mut self, name: &str, url: &str, verify_ssl: Option<bool>) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        ensure_token("remote URL", url)?;

        if let Some(holder) = self.url_holder(url, Some(name)) {
            return Err(RegistryError::DuplicateUrl {
                holder: holder.to_string(),
                url: url.to_string(),
            });
        }

        let entry = &mut self.entries[idx];
        if entry.url != url {
            self.by_url.remove(&entry.url);
            entry.url = url.to_string();
            self.by_url.insert(entry.url.clone(), idx);
        }
        if let Some(verify_ssl) = verify_ssl {
            entry.verify_ssl = verify_ssl;
        }

        Ok(())
    }

    /// Removes a remote and returns it. Remaining entries keep their order.
    pub fn remove(&mut self, name: &str) -> Result<Remote> {
        let idx = self
            .position(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        let removed = self.entries.remove(idx);
        self.reindex();
        Ok(removed)
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        self.by_url.clear();
        for (idx, remote) in self.entries.iter().enumerate() {
            self.by_name.insert(remote.name.clone(), idx);
            self.by_url.insert(remote.url.clone(), idx);
        }
    }
}

impl<'a> IntoIterator for &'a RemoteList {
    type Item = &'a Remote;
    type IntoIter = std::slice::Iter<'a, Remote>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
