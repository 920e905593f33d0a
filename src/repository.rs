//! Resource storage.
//!
//! The protocol core never owns resource state; it reads snapshots from a
//! [`Repository`] and writes changes back through it. Synchronization is the
//! repository's job. [`MemoryRepository`] keeps everything in a
//! `RwLock<HashMap>` and remembers deleted URIs so later requests can answer
//! `410 Gone`.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::RequestError;
use crate::resource::{Resource, ResourceKind};

/// Storage for LDP resources keyed by absolute URI.
pub trait Repository: Send + Sync {
    /// Snapshot of the resource at `uri`.
    ///
    /// # Errors
    ///
    /// `Gone` for deleted URIs, `NotFound` for unknown ones.
    fn find(&self, uri: &str) -> Result<Resource, RequestError>;

    /// True if a live resource exists at `uri`.
    fn contains(&self, uri: &str) -> bool;

    /// Store a resource that must not exist yet.
    ///
    /// # Errors
    ///
    /// `Conflict` if the URI is taken.
    fn create(&self, resource: Resource) -> Result<Resource, RequestError>;

    /// Replace an existing resource.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored at the resource's URI.
    fn replace(&self, resource: Resource) -> Result<Resource, RequestError>;

    /// Apply `f` to the stored resource under the write lock and return the
    /// updated snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Gone` as for [`Repository::find`].
    fn update(
        &self,
        uri: &str,
        f: &mut dyn FnMut(&mut Resource),
    ) -> Result<Resource, RequestError>;

    /// Delete the resource at `uri`, leaving a tombstone.
    ///
    /// # Errors
    ///
    /// `NotFound` / `Gone` as for [`Repository::find`].
    fn delete(&self, uri: &str) -> Result<Resource, RequestError>;
}

#[derive(Default)]
struct Store {
    resources: HashMap<String, Resource>,
    tombstones: HashSet<String>,
}

impl Store {
    fn missing(&self, uri: &str) -> RequestError {
        if self.tombstones.contains(uri) {
            RequestError::Gone(format!("{uri} has been deleted"))
        } else {
            RequestError::NotFound(format!("{uri} not found"))
        }
    }
}

/// In-process repository.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository holding a single BasicContainer at `root_uri`.
    #[must_use]
    pub fn with_root(root_uri: &str) -> Self {
        let repo = Self::new();
        let mut root = Resource::new(root_uri, ResourceKind::Container);
        root.mark_stored();
        repo.write().resources.insert(root_uri.to_string(), root);
        repo
    }

    /// Number of live resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Repository for MemoryRepository {
    fn find(&self, uri: &str) -> Result<Resource, RequestError> {
        let store = self.read();
        store
            .resources
            .get(uri)
            .cloned()
            .ok_or_else(|| store.missing(uri))
    }

    fn contains(&self, uri: &str) -> bool {
        self.read().resources.contains_key(uri)
    }

    fn create(&self, mut resource: Resource) -> Result<Resource, RequestError> {
        let mut store = self.write();
        if store.resources.contains_key(resource.uri()) {
            return Err(RequestError::Conflict(format!(
                "{} already exists",
                resource.uri()
            )));
        }
        resource.mark_stored();
        store.tombstones.remove(resource.uri());
        store
            .resources
            .insert(resource.uri().to_string(), resource.clone());
        debug!(uri = %resource.uri(), kind = %resource.kind(), "resource created");
        Ok(resource)
    }

    fn replace(&self, mut resource: Resource) -> Result<Resource, RequestError> {
        let mut store = self.write();
        let Some(slot) = store.resources.get_mut(resource.uri()) else {
            return Err(store.missing(resource.uri()));
        };
        resource.mark_stored();
        *slot = resource.clone();
        Ok(resource)
    }

    fn update(
        &self,
        uri: &str,
        f: &mut dyn FnMut(&mut Resource),
    ) -> Result<Resource, RequestError> {
        let mut store = self.write();
        let Some(resource) = store.resources.get_mut(uri) else {
            return Err(store.missing(uri));
        };
        f(resource);
        Ok(resource.clone())
    }

    fn delete(&self, uri: &str) -> Result<Resource, RequestError> {
        let mut store = self.write();
        let Some(resource) = store.resources.remove(uri) else {
            return Err(store.missing(uri));
        };
        store.tombstones.insert(uri.to_string());
        debug!(uri = %uri, "resource deleted");
        Ok(resource)
    }
}
