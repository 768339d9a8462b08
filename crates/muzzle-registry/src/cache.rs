use muzzle_domain::model::ArtifactCoordinate;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Per-key slots. The map lock is held only to find a slot; the slot lock is held while
/// loading, so concurrent readers of one key wait for a single load.
struct SlotMap<K, V> {
    slots: Mutex<HashMap<K, Arc<Mutex<Option<V>>>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> SlotMap<K, V> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_load(
        &self,
        key: &K,
        load: impl FnOnce() -> Result<V, ResolveError>,
    ) -> Result<V, ResolveError> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = value.as_ref() {
            return Ok(cached.clone());
        }
        // Failures leave the slot empty so a later call tries again.
        let loaded = load()?;
        *value = Some(loaded.clone());
        Ok(loaded)
    }
}

/// Read-through cache over another resolver. Each version listing and each surface is
/// fetched at most once; failures are not cached.
pub struct CachingResolver<R> {
    inner: R,
    listings: SlotMap<(String, String), Vec<ArtifactVersion>>,
    surfaces: SlotMap<ArtifactCoordinate, Arc<ApiSurface>>,
}

impl<R: ArtifactResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            listings: SlotMap::new(),
            surfaces: SlotMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ArtifactResolver> ArtifactResolver for CachingResolver<R> {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        let key = (group.to_string(), module.to_string());
        self.listings
            .get_or_load(&key, || self.inner.list_versions(group, module))
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        self.surfaces.get_or_load(coordinate, || {
            debug!(coordinate = %coordinate, "cache miss");
            self.inner.load_surface(coordinate)
        })
    }
}
