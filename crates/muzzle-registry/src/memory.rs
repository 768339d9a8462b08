use muzzle_domain::model::ArtifactCoordinate;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use std::collections::BTreeMap;
use std::sync::Arc;

type ModuleKey = (String, String);

/// Registry held entirely in memory, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    modules: BTreeMap<ModuleKey, BTreeMap<ArtifactVersion, Arc<ApiSurface>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        group: impl Into<String>,
        module: impl Into<String>,
        version: ArtifactVersion,
        surface: ApiSurface,
    ) {
        self.modules
            .entry((group.into(), module.into()))
            .or_default()
            .insert(version, Arc::new(surface));
    }

    pub fn with(
        mut self,
        group: impl Into<String>,
        module: impl Into<String>,
        version: ArtifactVersion,
        surface: ApiSurface,
    ) -> Self {
        self.insert(group, module, version, surface);
        self
    }
}

impl ArtifactResolver for MemoryRegistry {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        self.modules
            .get(&(group.to_string(), module.to_string()))
            .map(|versions| versions.keys().cloned().collect())
            .ok_or_else(|| ResolveError::NotFound {
                target: format!("{group}:{module}"),
            })
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        self.modules
            .get(&(
                coordinate.group().to_string(),
                coordinate.module().to_string(),
            ))
            .and_then(|versions| versions.get(coordinate.version()))
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                target: coordinate.to_string(),
            })
    }
}
