use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `muzzle.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MuzzleConfigV1 {
    /// Optional schema string for tooling (`muzzle.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// When to fail the check: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many findings to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_findings: Option<u32>,

    /// Worker threads for per-version checks; 0 uses one per core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,

    /// `[[pass]]` directives: the advice must apply to every version in range.
    #[serde(default, rename = "pass", skip_serializing_if = "Vec::is_empty")]
    pub pass: Vec<DirectiveConfig>,

    /// `[[fail]]` directives: the advice must not apply to any version in range.
    #[serde(default, rename = "fail", skip_serializing_if = "Vec::is_empty")]
    pub fail: Vec<DirectiveConfig>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,

    #[serde(default)]
    pub advice: AdviceConfig,

    /// Test-environment settings. Carried through untouched; verification ignores them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<TestEnvConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectiveConfig {
    pub group: String,
    pub module: String,
    /// Maven range notation, e.g. `[3.7.0,3.8.0)`.
    pub versions: String,

    #[serde(
        default,
        alias = "assertInverse",
        skip_serializing_if = "Option::is_none"
    )]
    pub assert_inverse: Option<bool>,

    /// Out-of-range versions sampled per side by the inverse check; 0 samples all of them.
    #[serde(
        default,
        alias = "inverseNeighbors",
        skip_serializing_if = "Option::is_none"
    )]
    pub inverse_neighbors: Option<usize>,

    #[serde(default, alias = "skipVersions", skip_serializing_if = "Vec::is_empty")]
    pub skip_versions: Vec<String>,

    #[serde(
        default,
        alias = "includePrereleases",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_prereleases: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_backoff_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Glob patterns; matching subjects (reference owners, coordinates, artifacts) are not reported.
    #[serde(default)]
    pub allow: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdviceConfig {
    /// Advice files (TOML with `[[references]]`), relative to the config file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceConfig>,
}

/// Standalone advice file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AdviceFileV1 {
    #[serde(default)]
    pub references: Vec<ReferenceConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReferenceConfig {
    /// `class`, `method` or `field`.
    pub kind: String,
    /// Fully-qualified owning class.
    pub owner: String,

    /// Member name (methods and fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Method parameter types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,

    /// Method return type; defaults to `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    /// Field type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Minimum visibility: `public` (default), `protected`, `package`, `private`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    /// `true` requires a static member, `false` an instance member.
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,

    /// Extra required flags: `static`, `instance`, `final`, `non_final`, `interface`, `non_interface`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TestEnvConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jvm_args: Vec<String>,

    /// Forced test dependency coordinates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub force: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}
