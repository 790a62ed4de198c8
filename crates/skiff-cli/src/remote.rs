use nu_ansi_term::Color::{Cyan, Green, Yellow};
use serde::Serialize;
use skiff_registry::{Registry, Remote};
use tracing::{debug, info, warn};

use crate::{
    cli::RemoteAction,
    error::SkiffResult,
    utils::{title_bool, Colored},
};

/// Output switches for listings.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListOptions {
    pub json: bool,
    pub mark_default: bool,
}

#[derive(Serialize)]
struct RefEntry<'a> {
    reference: &'a str,
    remote: &'a str,
}

/// One `remote list` line: `<name>: <url> [Verify SSL: <True|False>]`.
pub fn remote_line(remote: &Remote, is_default: bool) -> String {
    let marker = if is_default { " (default)" } else { "" };
    format!(
        "{}: {} [Verify SSL: {}]{marker}",
        Colored(Cyan, &remote.name),
        remote.url,
        title_bool(remote.verify_ssl)
    )
}

pub fn ref_line(reference: &str, remote: &str) -> String {
    format!("{reference}: {}", Colored(Green, remote))
}

pub fn list_remotes(registry: &Registry, options: ListOptions) -> SkiffResult<()> {
    if options.json {
        info!("{}", serde_json::to_string(registry.remotes().list())?);
        return Ok(());
    }

    for (idx, remote) in registry.remotes().iter().enumerate() {
        info!("{}", remote_line(remote, options.mark_default && idx == 0));
    }
    Ok(())
}

pub fn list_refs(registry: &Registry, options: ListOptions) -> SkiffResult<()> {
    if options.json {
        let entries: Vec<RefEntry> = registry
            .refs()
            .list_refs()
            .map(|(reference, remote)| RefEntry { reference, remote })
            .collect();
        info!("{}", serde_json::to_string(&entries)?);
        return Ok(());
    }

    for (reference, remote) in registry.refs().list_refs() {
        info!("{}", ref_line(reference, remote));
    }
    for (reference, remote) in registry.dangling_refs() {
        debug!("{reference} is bound to unknown remote '{remote}'");
    }
    Ok(())
}

fn warn_unknown_remote(registry: &Registry, remote: &str) {
    if !registry.remotes().contains(remote) {
        warn!(
            "Remote '{}' is not registered; the binding is kept anyway",
            Colored(Yellow, remote)
        );
    }
}

/// Runs one `skiff remote` action against `registry`.
///
/// Mutations are applied in memory only; the caller persists the registry.
pub fn handle_remote(
    registry: &mut Registry,
    action: RemoteAction,
    options: ListOptions,
) -> SkiffResult<()> {
    match action {
        RemoteAction::List => list_remotes(registry, options)?,
        RemoteAction::Add {
            name,
            url,
            verify_ssl,
            insert,
        } => {
            registry.add_remote(&name, &url, verify_ssl.as_deref(), insert)?;
            debug!("added remote '{name}' -> {url}");
        }
        RemoteAction::Update {
            name,
            url,
            verify_ssl,
        } => {
            registry.update_remote(&name, &url, verify_ssl.as_deref())?;
            debug!("updated remote '{name}' -> {url}");
        }
        RemoteAction::Remove {
            name,
        } => {
            registry.remove_remote(&name)?;
            debug!("removed remote '{name}'");
        }
        RemoteAction::ListRef => list_refs(registry, options)?,
        RemoteAction::AddRef {
            reference,
            remote,
        } => {
            warn_unknown_remote(registry, &remote);
            registry.add_ref(&reference, &remote)?;
        }
        RemoteAction::UpdateRef {
            reference,
            remote,
        } => {
            warn_unknown_remote(registry, &remote);
            registry.update_ref(&reference, &remote)?;
        }
        RemoteAction::RemoveRef {
            reference,
        } => {
            let remote = registry.remove_ref(&reference)?;
            debug!("unbound {reference} from '{remote}'");
        }
    }
    Ok(())
}
