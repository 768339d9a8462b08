//! Registry adapters: list published versions and load API surface descriptors.
//!
//! This crate is allowed to do filesystem and network IO. Everything it exposes implements
//! `muzzle_domain::resolver::ArtifactResolver`, so the verifier never sees where artifacts
//! come from.

#![forbid(unsafe_code)]

mod cache;
mod fs;
mod http;
mod memory;
mod retry;

pub use cache::CachingResolver;
pub use fs::FsRegistry;
pub use http::HttpRegistry;
pub use memory::MemoryRegistry;
pub use retry::{RetryPolicy, RetryingResolver};

use anyhow::Context;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout for HTTP registries.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as an API surface descriptor. **Never panics** on any input.
    pub fn parse_surface(text: &str) -> Result<(), ResolveError> {
        super::parse_surface("fuzz", text).map(|_| ())
    }

    /// Parse arbitrary text as a version index. **Never panics** on any input.
    pub fn parse_index(text: &str) -> Result<(), ResolveError> {
        super::parse_index("fuzz", text).map(|_| ())
    }
}

/// Open the registry at `location`: an `http(s)://` base URL or a directory.
///
/// The result retries transient failures per `retry` and caches every successful load.
pub fn open_registry(
    location: &str,
    retry: RetryPolicy,
) -> anyhow::Result<Arc<dyn ArtifactResolver>> {
    let base: Box<dyn ArtifactResolver> = if is_remote(location) {
        Box::new(
            HttpRegistry::new(location, DEFAULT_HTTP_TIMEOUT)
                .with_context(|| format!("open HTTP registry {location}"))?,
        )
    } else {
        Box::new(
            FsRegistry::open(location)
                .with_context(|| format!("open registry directory {location}"))?,
        )
    };
    Ok(Arc::new(CachingResolver::new(RetryingResolver::new(
        base, retry,
    ))))
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub(crate) fn parse_surface(target: &str, text: &str) -> Result<ApiSurface, ResolveError> {
    serde_json::from_str(text).map_err(|e| ResolveError::Malformed {
        target: target.to_string(),
        message: e.to_string(),
    })
}

#[derive(Deserialize)]
struct VersionIndex {
    versions: Vec<String>,
}

pub(crate) fn parse_index(target: &str, text: &str) -> Result<Vec<ArtifactVersion>, ResolveError> {
    let index: VersionIndex = serde_json::from_str(text).map_err(|e| ResolveError::Malformed {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    index
        .versions
        .iter()
        .map(|v| {
            ArtifactVersion::parse(v).map_err(|e| ResolveError::Malformed {
                target: target.to_string(),
                message: format!("version {v:?}: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn index_parses_versions_in_order() {
        let versions = parse_index("g:m", r#"{"versions": ["3.7.0", "3.6.0"]}"#).expect("index");
        let raw: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        assert_eq!(raw, vec!["3.7.0", "3.6.0"]);
    }

    #[test]
    fn bad_index_and_surface_are_malformed() {
        assert!(matches!(
            parse_index("g:m", r#"{"versions": ["not-a-version"]}"#),
            Err(ResolveError::Malformed { .. })
        ));
        assert!(matches!(
            parse_surface("g:m:1.0", "{"),
            Err(ResolveError::Malformed { .. })
        ));
    }

    #[test]
    fn remote_locations_are_urls() {
        assert!(is_remote("https://registry.example.com/muzzle"));
        assert!(is_remote("http://localhost:8080"));
        assert!(!is_remote("tests/fixtures/registry"));
    }

    #[test]
    fn missing_directory_fails_to_open() {
        let err = match open_registry("/definitely/not/a/registry", RetryPolicy::default()) {
            Ok(_) => panic!("expected error"),
            Err(err) => err,
        };
        assert!(format!("{err:#}").contains("open registry directory"));
    }

    proptest! {
        #[test]
        fn fuzz_parsers_never_panic(input in ".*") {
            let _ = fuzz::parse_surface(&input);
            let _ = fuzz::parse_index(&input);
        }
    }
}
