//! The port through which the verifier reads published artifacts.
//!
//! Implementations live in `muzzle-registry`; tests use in-memory fakes. The verifier holds
//! an explicit resolver value, never a process-wide registry.

use crate::model::ArtifactCoordinate;
use crate::surface::ApiSurface;
use crate::version::ArtifactVersion;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{target}: not found")]
    NotFound { target: String },
    #[error("{target}: io error: {message}")]
    Io { target: String, message: String },
    #[error("{target}: network error: {message}")]
    Network { target: String, message: String },
    #[error("{target}: malformed descriptor: {message}")]
    Malformed { target: String, message: String },
}

impl ResolveError {
    /// Transport-level failures are worth another attempt; missing or broken artifacts are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::Io { .. } | ResolveError::Network { .. })
    }

    pub fn target(&self) -> &str {
        match self {
            ResolveError::NotFound { target }
            | ResolveError::Io { target, .. }
            | ResolveError::Network { target, .. }
            | ResolveError::Malformed { target, .. } => target,
        }
    }
}

pub trait ArtifactResolver: Send + Sync {
    /// Every published version of `group:module`, in any order.
    fn list_versions(&self, group: &str, module: &str)
    -> Result<Vec<ArtifactVersion>, ResolveError>;

    /// The API surface of one published artifact.
    fn load_surface(&self, coordinate: &ArtifactCoordinate)
    -> Result<Arc<ApiSurface>, ResolveError>;
}

impl<R: ArtifactResolver + ?Sized> ArtifactResolver for &R {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        (**self).list_versions(group, module)
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        (**self).load_surface(coordinate)
    }
}

impl<R: ArtifactResolver + ?Sized> ArtifactResolver for Arc<R> {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        (**self).list_versions(group, module)
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        (**self).load_surface(coordinate)
    }
}

impl<R: ArtifactResolver + ?Sized> ArtifactResolver for Box<R> {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        (**self).list_versions(group, module)
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        (**self).load_surface(coordinate)
    }
}
