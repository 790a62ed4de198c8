//! The on-disk registry file.
//!
//! The file is line oriented: one `<name> <url> <True|False>` line per
//! remote in priority order, then a blank separator line followed by one
//! `<reference> <remote>` line per binding. An empty registry is an empty
//! file.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use skiff_utils::fs::{atomic_write, read_optional};
use tracing::debug;

use crate::{
    error::{RegistryError, Result},
    refs::RefMap,
    remote::{parse_bool, Remote, RemoteList},
};

/// In-memory view of the registry file.
///
/// Opened once per process, handed by reference to whatever command runs,
/// and written back with [`Registry::persist`] before exit. Mutations are
/// validated completely before touching state; a failed mutation leaves both
/// the in-memory lists and the dirty flag as they were.
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    remotes: RemoteList,
    refs: RefMap,
    dirty: bool,
}

impl Registry {
    /// Loads the registry stored at `path`. A missing file yields an empty
    /// registry.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (remotes, refs) = match read_optional(&path)? {
            Some(content) => parse(&content)?,
            None => {
                debug!("no registry at {}, starting empty", path.display());
                (RemoteList::new(), RefMap::new())
            }
        };

        debug!(
            "loaded {} remotes and {} references from {}",
            remotes.len(),
            refs.len(),
            path.display()
        );

        Ok(Self {
            path,
            remotes,
            refs,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remotes(&self) -> &RemoteList {
        &self.remotes
    }

    pub fn refs(&self) -> &RefMap {
        &self.refs
    }

    /// Whether a mutation succeeded since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adds a remote. `verify_ssl` is a boolean literal and defaults to true.
    pub fn add_remote(
        &mut self,
        name: &str,
        url: &str,
        verify_ssl: Option<&str>,
        position: Option<usize>,
    ) -> Result<()> {
        let verify_ssl = verify_ssl.map(parse_bool).transpose()?.unwrap_or(true);
        self.remotes.add(name, url, verify_ssl, position)?;
        self.dirty = true;
        Ok(())
    }

    /// Updates a remote in place. `verify_ssl` is left unchanged when `None`.
    pub fn update_remote(
        &mut self,
        name: &str,
        url: &str,
        verify_ssl: Option<&str>,
    ) -> Result<()> {
        let verify_ssl = verify_ssl.map(parse_bool).transpose()?;
        self.remotes.update(name, url, verify_ssl)?;
        self.dirty = true;
        Ok(())
    }

    /// Removes a remote. References bound to it are kept.
    pub fn remove_remote(&mut self, name: &str) -> Result<Remote> {
        let removed = self.remotes.remove(name)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn add_ref(&mut self, reference: &str, remote: &str) -> Result<()> {
        self.refs.add_ref(reference, remote)?;
        self.dirty = true;
        Ok(())
    }

    pub fn update_ref(&mut self, reference: &str, remote: &str) -> Result<()> {
        self.refs.update_ref(reference, remote)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_ref(&mut self, reference: &str) -> Result<String> {
        let remote = self.refs.remove_ref(reference)?;
        self.dirty = true;
        Ok(remote)
    }

    /// The remote a reference should be fetched from: its bound remote if
    /// that remote still exists, otherwise the highest-priority remote.
    pub fn resolve(&self, reference: &str) -> Option<&Remote> {
        self.refs
            .get_ref(reference)
            .and_then(|name| self.remotes.get(name))
            .or_else(|| self.remotes.default_remote())
    }

    /// References whose remote is no longer registered.
    pub fn dangling_refs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.refs
            .list_refs()
            .filter(|(_, remote)| !self.remotes.contains(remote))
    }

    /// Serialized file contents.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for remote in &self.remotes {
            let verify = if remote.verify_ssl { "True" } else { "False" };
            let _ = writeln!(out, "{} {} {verify}", remote.name, remote.url);
        }

        if !self.refs.is_empty() {
            out.push('\n');
            for (reference, remote) in self.refs.list_refs() {
                let _ = writeln!(out, "{reference} {remote}");
            }
        }

        out
    }

    /// Writes the full state to disk, replacing the file atomically.
    pub fn save(&mut self) -> Result<()> {
        atomic_write(&self.path, self.render().as_bytes())?;
        self.dirty = false;
        debug!("registry saved to {}", self.path.display());
        Ok(())
    }

    /// Saves only if a mutation succeeded. Returns whether a write happened.
    pub fn persist(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

#[derive(Clone, Copy)]
enum Section {
    Remotes,
    Refs,
}

fn parse(content: &str) -> Result<(RemoteList, RefMap)> {
    let mut remotes = RemoteList::new();
    let mut refs = RefMap::new();
    let mut section = Section::Remotes;

    for (idx, line) in content.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let malformed = || {
            RegistryError::Malformed {
                line: idx + 1,
                content: line.to_string(),
            }
        };

        match (section, fields.as_slice()) {
            (Section::Remotes, []) => section = Section::Refs,
            (Section::Refs, []) => {}
            (Section::Remotes, [name, url]) => remotes.add(name, url, true, None)?,
            (Section::Remotes, [name, url, verify]) => {
                let verify_ssl = match *verify {
                    "True" => true,
                    "False" => false,
                    _ => return Err(malformed()),
                };
                remotes.add(name, url, verify_ssl, None)?;
            }
            (Section::Refs, [reference, remote]) => refs.add_ref(reference, remote)?,
            _ => return Err(malformed()),
        }
    }

    Ok((remotes, refs))
}
