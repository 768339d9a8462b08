use crate::version::{ArtifactVersion, VersionRange};
use muzzle_types::{DirectiveKind, Location};

/// Default number of out-of-range neighbours sampled on each side by the inverse check.
pub const DEFAULT_INVERSE_NEIGHBORS: usize = 3;

/// One `pass` or `fail` block: which artifact history to scan, and over which range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub group: String,
    pub module: String,
    pub range: VersionRange,
    /// Only meaningful for `pass` directives.
    pub assert_inverse: bool,
    /// Nearest out-of-range versions sampled per side; 0 samples every one.
    pub inverse_neighbors: usize,
    pub skip_versions: Vec<ArtifactVersion>,
    pub include_prereleases: bool,
    /// Where the directive was declared, for findings.
    pub location: Option<Location>,
}

impl Directive {
    pub fn pass(group: impl Into<String>, module: impl Into<String>, range: VersionRange) -> Self {
        Self::new(DirectiveKind::Pass, group, module, range)
    }

    pub fn fail(group: impl Into<String>, module: impl Into<String>, range: VersionRange) -> Self {
        Self::new(DirectiveKind::Fail, group, module, range)
    }

    fn new(
        kind: DirectiveKind,
        group: impl Into<String>,
        module: impl Into<String>,
        range: VersionRange,
    ) -> Self {
        Self {
            kind,
            group: group.into(),
            module: module.into(),
            range,
            assert_inverse: false,
            inverse_neighbors: DEFAULT_INVERSE_NEIGHBORS,
            skip_versions: Vec::new(),
            include_prereleases: false,
            location: None,
        }
    }

    pub fn with_assert_inverse(mut self, assert_inverse: bool) -> Self {
        self.assert_inverse = assert_inverse;
        self
    }

    /// `group:module`
    pub fn artifact(&self) -> String {
        format!("{}:{}", self.group, self.module)
    }

    /// Whether a published version takes part in this directive at all.
    pub fn considers(&self, version: &ArtifactVersion) -> bool {
        if !self.include_prereleases && version.is_prerelease() {
            return false;
        }
        !self.skip_versions.contains(version)
    }
}
