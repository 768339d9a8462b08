use crate::model::{Advice, ArtifactCoordinate, SymbolicReference, Visibility};
use crate::policy::{CheckPolicy, EffectiveConfig, FailOn};
use crate::resolver::{ArtifactResolver, ResolveError};
use crate::surface::{ApiSurface, ClassDescriptor, MethodDescriptor};
use crate::version::{ArtifactVersion, VersionRange};
use muzzle_types::{Severity, ids};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn v(input: &str) -> ArtifactVersion {
    ArtifactVersion::parse(input).expect("valid version")
}

pub fn range(input: &str) -> VersionRange {
    VersionRange::parse(input).expect("valid range")
}

/// `com.example.Foo`, with or without `bar(String)`.
pub fn foo_surface(with_bar: bool) -> ApiSurface {
    let mut foo = ClassDescriptor::new("com.example.Foo");
    if with_bar {
        foo.methods.push(MethodDescriptor {
            name: "bar".to_string(),
            params: vec!["java.lang.String".to_string()],
            returns: "void".to_string(),
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
        });
    }
    ApiSurface::new([foo])
}

pub fn foo_bar_advice() -> Advice {
    Advice::new([SymbolicReference::method(
        "com.example.Foo",
        "bar",
        ["java.lang.String"],
        "void",
    )])
}

/// In-memory resolver with injectable failures and a load counter.
#[derive(Default)]
pub struct FakeRegistry {
    artifacts: BTreeMap<(String, String), BTreeMap<ArtifactVersion, Arc<ApiSurface>>>,
    failing_listings: BTreeSet<(String, String)>,
    failing_surfaces: BTreeSet<String>,
    loads: AtomicUsize,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, group: &str, module: &str, version: &str, surface: ApiSurface) {
        self.artifacts
            .entry((group.to_string(), module.to_string()))
            .or_default()
            .insert(v(version), Arc::new(surface));
    }

    pub fn fail_listing(&mut self, group: &str, module: &str) {
        self.failing_listings
            .insert((group.to_string(), module.to_string()));
    }

    pub fn fail_surface(&mut self, group: &str, module: &str, version: &str) {
        self.failing_surfaces
            .insert(format!("{group}:{module}:{version}"));
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ArtifactResolver for FakeRegistry {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        let key = (group.to_string(), module.to_string());
        if self.failing_listings.contains(&key) {
            return Err(ResolveError::Network {
                target: format!("{group}:{module}"),
                message: "connection reset".to_string(),
            });
        }
        Ok(self
            .artifacts
            .get(&key)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let target = coordinate.to_string();
        if self.failing_surfaces.contains(&target) {
            return Err(ResolveError::Io {
                target,
                message: "read failed".to_string(),
            });
        }
        self.artifacts
            .get(&(coordinate.group().to_string(), coordinate.module().to_string()))
            .and_then(|versions| versions.get(coordinate.version()))
            .cloned()
            .ok_or(ResolveError::NotFound { target })
    }
}

/// Every check enabled at its default severity.
pub fn default_config() -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    for id in [
        ids::CHECK_MUZZLE_REFERENCES,
        ids::CHECK_MUZZLE_RANGE,
        ids::CHECK_MUZZLE_RESOLUTION,
        ids::CHECK_MUZZLE_INVERSE,
        ids::CHECK_MUZZLE_FAIL_DIRECTIVE,
    ] {
        checks.insert(id.to_string(), CheckPolicy::enabled(Severity::Error));
    }
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}

pub fn config_with_check(check_id: &str, severity: Severity) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(check_id.to_string(), CheckPolicy::enabled(severity));
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}

pub fn config_with_check_allow(
    check_id: &str,
    severity: Severity,
    allow: Vec<&str>,
) -> EffectiveConfig {
    let mut policy = CheckPolicy::enabled(severity);
    policy.allow = allow.into_iter().map(|s| s.to_string()).collect();

    let mut checks = BTreeMap::new();
    checks.insert(check_id.to_string(), policy);

    EffectiveConfig {
        profile: "test".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        checks,
    }
}
