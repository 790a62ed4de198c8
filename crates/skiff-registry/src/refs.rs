//! Bindings from package references to remote names.

use std::collections::HashMap;

use crate::{
    error::{RegistryError, Result},
    remote::ensure_token,
};

/// Maps package references (e.g. `Pkg/1.0@user/channel`) to remote names.
///
/// Iteration follows the order in which references were first bound;
/// rebinding a reference keeps its slot. Remote names are not checked
/// against the remote list, so bindings may outlive the remote they name.
#[derive(Debug, Clone, Default)]
pub struct RefMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RefMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings in first-assignment order.
    pub fn list_refs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(reference, remote)| (reference.as_str(), remote.as_str()))
    }

    pub fn get_ref(&self, reference: &str) -> Option<&str> {
        self.index
            .get(reference)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds `reference` to `remote`, overwriting any previous binding.
    pub fn add_ref(&mut self, reference: &str, remote: &str) -> Result<()> {
        self.assign(reference, remote)
    }

    /// Same as [`RefMap::add_ref`]; kept separate for callers that mean to
    /// rebind an existing reference.
    pub fn update_ref(&mut self, reference: &str, remote: &str) -> Result<()> {
        self.assign(reference, remote)
    }

    fn assign(&mut self, reference: &str, remote: &str) -> Result<()> {
        ensure_token("reference", reference)?;
        ensure_token("remote name", remote)?;

        match self.index.get(reference) {
            Some(&idx) => self.entries[idx].1 = remote.to_string(),
            None => {
                self.index
                    .insert(reference.to_string(), self.entries.len());
                self.entries
                    .push((reference.to_string(), remote.to_string()));
            }
        }
        Ok(())
    }

    /// Removes the binding for `reference` and returns the remote it named.
    pub fn remove_ref(&mut self, reference: &str) -> Result<String> {
        let idx = self
            .index
            .remove(reference)
            .ok_or_else(|| RegistryError::RefNotFound(reference.to_string()))?;
        let (_, remote) = self.entries.remove(idx);

        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Ok(remote)
    }
}
