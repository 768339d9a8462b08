use camino::{Utf8Path, Utf8PathBuf};
use muzzle_domain::model::ArtifactCoordinate;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Directory registry: `<root>/<group>/<module>/<version>.json`.
///
/// Every JSON file under a module directory is a published version; its stem is the version.
#[derive(Clone, Debug)]
pub struct FsRegistry {
    root: Utf8PathBuf,
}

impl FsRegistry {
    pub fn open(root: impl AsRef<Utf8Path>) -> anyhow::Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            anyhow::bail!("{root} is not a directory");
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn module_dir(&self, group: &str, module: &str) -> Utf8PathBuf {
        self.root.join(group).join(module)
    }
}

impl ArtifactResolver for FsRegistry {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        let target = format!("{group}:{module}");
        let dir = self.module_dir(group, module);
        if !dir.is_dir() {
            return Err(ResolveError::NotFound { target });
        }

        let mut versions = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ResolveError::Io {
                target: target.clone(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            if stem == "index" {
                continue;
            }
            // Same policy as an HTTP index: an unreadable version is an error, never a skip.
            let version = ArtifactVersion::parse(stem).map_err(|e| ResolveError::Malformed {
                target: target.clone(),
                message: format!("descriptor {}: {e}", dir.join(name)),
            })?;
            versions.push(version);
        }

        // Stable order.
        versions.sort();
        debug!(artifact = %target, count = versions.len(), "listed versions");
        Ok(versions)
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        let target = coordinate.to_string();
        let path = self
            .module_dir(coordinate.group(), coordinate.module())
            .join(format!("{}.json", coordinate.version().as_str()));

        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ResolveError::NotFound {
                target: target.clone(),
            },
            _ => ResolveError::Io {
                target: target.clone(),
                message: format!("read {path}: {e}"),
            },
        })?;
        Ok(Arc::new(crate::parse_surface(&target, &text)?))
    }
}
