//! Published artifact versions and version ranges.
//!
//! Ordering follows the Maven conventions instrumented libraries are published with:
//! numeric segments compare numerically (missing segments count as zero), and a trailing
//! qualifier orders pre-releases before the release and service packs after it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Bound;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
    #[error("version '{0}' does not start with a numeric segment")]
    NoNumericPart(String),
    #[error("version '{0}' has a numeric segment that does not fit in 64 bits")]
    Overflow(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("version range is empty")]
    Empty,
    #[error("version range '{0}' must start with '[' or '(' and end with ']' or ')'")]
    MissingBrackets(String),
    #[error("version range '{0}' must contain exactly one ','")]
    BadSeparator(String),
    #[error("version range '{0}' has no bounds")]
    Unbounded(String),
    #[error("version range '{range}': lower bound must be below upper bound")]
    Inverted { range: String },
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Qualifier rank. Variant order is the sort order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Qualifier {
    Alpha(u64),
    Beta(u64),
    Milestone(u64),
    Rc(u64),
    Snapshot,
    Release,
    /// Numeric-only qualifier (`3.7.0-1`), a rebuild of the release.
    Build(u64),
    ServicePack(u64),
    Other(String),
}

impl Qualifier {
    fn parse(raw: &str) -> Qualifier {
        let lowered = raw.to_ascii_lowercase();
        let first = lowered
            .split(['-', '.', '_'])
            .find(|t| !t.is_empty())
            .unwrap_or("");
        let word: String = first.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        let digits: String = first[word.len()..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        // "rc-2" carries its number in the next token.
        let number = if digits.is_empty() {
            lowered
                .split(['-', '.', '_'])
                .filter(|t| !t.is_empty())
                .nth(1)
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(0)
        } else {
            digits.parse::<u64>().unwrap_or(0)
        };

        match word.as_str() {
            "" if !digits.is_empty() => Qualifier::Build(number),
            "" | "ga" | "final" | "release" => Qualifier::Release,
            "alpha" => Qualifier::Alpha(number),
            "a" if !digits.is_empty() => Qualifier::Alpha(number),
            "beta" => Qualifier::Beta(number),
            "b" if !digits.is_empty() => Qualifier::Beta(number),
            "milestone" => Qualifier::Milestone(number),
            "m" if !digits.is_empty() => Qualifier::Milestone(number),
            "rc" | "cr" => Qualifier::Rc(number),
            "snapshot" => Qualifier::Snapshot,
            "sp" => Qualifier::ServicePack(number),
            _ => Qualifier::Other(lowered),
        }
    }
}

/// A published version of an artifact.
///
/// Equality and hashing follow the ordering, so `3.7` and `3.7.0` are the same version.
/// `Display` keeps the string the registry published.
#[derive(Clone, Debug)]
pub struct ArtifactVersion {
    raw: String,
    numbers: Vec<u64>,
    qualifier: Qualifier,
}

impl ArtifactVersion {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }

        let numeric_len = raw
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        let numeric = raw[..numeric_len].trim_end_matches('.');
        if numeric.is_empty() {
            return Err(VersionError::NoNumericPart(raw.to_string()));
        }

        let mut numbers = Vec::new();
        for segment in numeric.split('.') {
            if segment.is_empty() {
                return Err(VersionError::NoNumericPart(raw.to_string()));
            }
            let n = segment
                .parse::<u64>()
                .map_err(|_| VersionError::Overflow(raw.to_string()))?;
            numbers.push(n);
        }

        let rest = raw[numeric_len..].trim_start_matches(['-', '.', '_']);
        Ok(Self {
            raw: raw.to_string(),
            numbers,
            qualifier: Qualifier::parse(rest),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Alpha, beta, milestone, release-candidate, snapshot and preview builds.
    pub fn is_prerelease(&self) -> bool {
        match &self.qualifier {
            Qualifier::Alpha(_)
            | Qualifier::Beta(_)
            | Qualifier::Milestone(_)
            | Qualifier::Rc(_)
            | Qualifier::Snapshot => true,
            Qualifier::Other(q) => {
                q.starts_with("preview") || q.starts_with("ea") || q.starts_with("dev")
            }
            Qualifier::Release | Qualifier::Build(_) | Qualifier::ServicePack(_) => false,
        }
    }

    fn significant_numbers(&self) -> &[u64] {
        let end = self
            .numbers
            .iter()
            .rposition(|n| *n != 0)
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.numbers[..end]
    }
}

impl Ord for ArtifactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for i in 0..len {
            let a = self.numbers.get(i).copied().unwrap_or(0);
            let b = other.numbers.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        self.qualifier.cmp(&other.qualifier)
    }
}

impl PartialOrd for ArtifactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ArtifactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ArtifactVersion {}

impl Hash for ArtifactVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_numbers().hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ArtifactVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactVersion::parse(s)
    }
}

/// A version interval in Maven range notation.
///
/// `[3.7.0,3.8.0)` is the canonical form: lower bound inclusive, upper bound exclusive.
/// Exclusive lower (`(`), inclusive upper (`]`), open ends (`[3.7.0,)`) and exact
/// versions (`[3.7.0]`) are accepted as well. Empty intervals are rejected at parse time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionRange {
    lower: Bound<ArtifactVersion>,
    upper: Bound<ArtifactVersion>,
}

impl VersionRange {
    /// `[lower,upper)`. Fails unless `lower < upper`.
    pub fn half_open(lower: ArtifactVersion, upper: ArtifactVersion) -> Result<Self, RangeError> {
        if lower >= upper {
            return Err(RangeError::Inverted {
                range: format!("[{lower},{upper})"),
            });
        }
        Ok(Self {
            lower: Bound::Included(lower),
            upper: Bound::Excluded(upper),
        })
    }

    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if text.is_empty() {
            return Err(RangeError::Empty);
        }

        let (Some(open), Some(close)) = (text.chars().next(), text.chars().last()) else {
            return Err(RangeError::Empty);
        };
        if !matches!(open, '[' | '(') || !matches!(close, ']' | ')') || text.len() < 2 {
            return Err(RangeError::MissingBrackets(text));
        }
        let inner = &text[1..text.len() - 1];

        let parts: Vec<&str> = inner.split(',').collect();
        let (lower, upper) = match parts.as_slice() {
            [exact] if open == '[' && close == ']' && !exact.is_empty() => {
                let v = ArtifactVersion::parse(exact)?;
                (Bound::Included(v.clone()), Bound::Included(v))
            }
            [lo, hi] => {
                let lower = match (*lo, open) {
                    ("", _) => Bound::Unbounded,
                    (v, '[') => Bound::Included(ArtifactVersion::parse(v)?),
                    (v, _) => Bound::Excluded(ArtifactVersion::parse(v)?),
                };
                let upper = match (*hi, close) {
                    ("", _) => Bound::Unbounded,
                    (v, ']') => Bound::Included(ArtifactVersion::parse(v)?),
                    (v, _) => Bound::Excluded(ArtifactVersion::parse(v)?),
                };
                (lower, upper)
            }
            _ => return Err(RangeError::BadSeparator(text)),
        };

        if matches!((&lower, &upper), (Bound::Unbounded, Bound::Unbounded)) {
            return Err(RangeError::Unbounded(text));
        }

        let non_empty = match (&lower, &upper) {
            (Bound::Included(l), Bound::Included(u)) => l <= u,
            (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) => {
                l < u
            }
            _ => true,
        };
        if !non_empty {
            return Err(RangeError::Inverted { range: text });
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Bound<&ArtifactVersion> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Bound<&ArtifactVersion> {
        self.upper.as_ref()
    }

    pub fn contains(&self, version: &ArtifactVersion) -> bool {
        !self.is_above(version) && !self.is_below(version)
    }

    /// True if `version` sorts before every version in the range.
    pub fn is_below(&self, version: &ArtifactVersion) -> bool {
        match &self.lower {
            Bound::Included(l) => version < l,
            Bound::Excluded(l) => version <= l,
            Bound::Unbounded => false,
        }
    }

    /// True if `version` sorts after every version in the range.
    pub fn is_above(&self, version: &ArtifactVersion) -> bool {
        match &self.upper {
            Bound::Included(u) => version > u,
            Bound::Excluded(u) => version >= u,
            Bound::Unbounded => false,
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Bound::Included(l), Bound::Included(u)) = (&self.lower, &self.upper)
            && l == u
        {
            return write!(f, "[{l}]");
        }
        match &self.lower {
            Bound::Included(l) => write!(f, "[{l},")?,
            Bound::Excluded(l) => write!(f, "({l},")?,
            Bound::Unbounded => f.write_str("(,")?,
        }
        match &self.upper {
            Bound::Included(u) => write!(f, "{u}]"),
            Bound::Excluded(u) => write!(f, "{u})"),
            Bound::Unbounded => f.write_str(")"),
        }
    }
}

impl FromStr for VersionRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}
