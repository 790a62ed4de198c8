//! Ordered registry of package-repository remotes.
//!
//! [`RemoteList`] holds the remotes in priority order, [`RefMap`] binds
//! package references to remote names, and [`Registry`] ties both to the
//! file they are stored in.

pub mod error;
pub mod refs;
pub mod remote;
pub mod store;

pub use error::{RegistryError, Result};
pub use refs::RefMap;
pub use remote::{parse_bool, Remote, RemoteList};
pub use store::Registry;
