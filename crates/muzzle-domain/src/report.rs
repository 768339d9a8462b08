use crate::directive::Directive;
use crate::matcher::ReferenceCheck;
use crate::model::{ArtifactCoordinate, SymbolicReference};
use crate::resolver::ResolveError;
use crate::version::VersionRange;
use muzzle_types::{
    CoordinateOutcome, CoordinateRole, DirectiveKind, Finding, MuzzleData, ReferenceStatus,
    Severity, Verdict,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceOutcome {
    pub reference: SymbolicReference,
    pub check: ReferenceCheck,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Vec<ReferenceOutcome>),
    Failed(ResolveError),
}

/// Results for one artifact version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinateReport {
    pub coordinate: ArtifactCoordinate,
    pub role: CoordinateRole,
    pub resolution: Resolution,
}

impl CoordinateReport {
    pub fn outcome(&self) -> CoordinateOutcome {
        match &self.resolution {
            Resolution::Failed(_) => CoordinateOutcome::Unresolved,
            Resolution::Resolved(outcomes) if outcomes.iter().all(|o| o.check.is_present()) => {
                CoordinateOutcome::Compatible
            }
            Resolution::Resolved(_) => CoordinateOutcome::Incompatible,
        }
    }

    pub fn outcomes(&self) -> &[ReferenceOutcome] {
        match &self.resolution {
            Resolution::Resolved(outcomes) => outcomes,
            Resolution::Failed(_) => &[],
        }
    }
}

/// How many out-of-range versions the inverse check sampled on each side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InverseSample {
    pub below: usize,
    pub above: usize,
}

impl InverseSample {
    pub fn total(&self) -> usize {
        self.below + self.above
    }
}

/// Everything one directive run observed. Produced once per run; not persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuzzleReport {
    pub directive: Directive,
    /// Listing the published versions failed; nothing else could be checked.
    pub listing_error: Option<ResolveError>,
    /// The in-range check ran and matched no published version.
    pub empty_range: bool,
    /// Set when the inverse check ran.
    pub inverse: Option<InverseSample>,
    pub coordinates: Vec<CoordinateReport>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Incompatibility {
    MissingSymbol {
        coordinate: ArtifactCoordinate,
        reference: SymbolicReference,
        detail: String,
    },
    ShapeMismatch {
        coordinate: ArtifactCoordinate,
        reference: SymbolicReference,
        detail: String,
    },
    EmptyRange {
        artifact: String,
        range: VersionRange,
    },
    ArtifactResolutionFailure {
        error: ResolveError,
    },
    /// An out-of-range version satisfies every reference.
    OverBroadMatch {
        coordinate: ArtifactCoordinate,
    },
    /// A version inside a `fail` directive satisfies every reference.
    UnexpectedMatch {
        coordinate: ArtifactCoordinate,
    },
}

impl MuzzleReport {
    pub fn new(directive: Directive) -> Self {
        Self {
            directive,
            listing_error: None,
            empty_range: false,
            inverse: None,
            coordinates: Vec::new(),
        }
    }

    pub fn in_range(&self) -> impl Iterator<Item = &CoordinateReport> {
        self.coordinates
            .iter()
            .filter(|c| c.role == CoordinateRole::InRange)
    }

    pub fn inverse_coordinates(&self) -> impl Iterator<Item = &CoordinateReport> {
        self.coordinates
            .iter()
            .filter(|c| c.role == CoordinateRole::Inverse)
    }

    /// Every failure in the run, in coordinate order. Nothing is dropped.
    pub fn incompatibilities(&self) -> Vec<Incompatibility> {
        let mut out = Vec::new();

        if let Some(err) = &self.listing_error {
            out.push(Incompatibility::ArtifactResolutionFailure { error: err.clone() });
        }
        if self.empty_range {
            out.push(Incompatibility::EmptyRange {
                artifact: self.directive.artifact(),
                range: self.directive.range.clone(),
            });
        }

        for c in &self.coordinates {
            if let Resolution::Failed(err) = &c.resolution {
                out.push(Incompatibility::ArtifactResolutionFailure { error: err.clone() });
                continue;
            }
            match (c.role, self.directive.kind) {
                (CoordinateRole::InRange, DirectiveKind::Pass) => {
                    for o in c.outcomes() {
                        let detail = o.check.detail.clone().unwrap_or_default();
                        match o.check.status {
                            ReferenceStatus::Present => {}
                            ReferenceStatus::Missing => out.push(Incompatibility::MissingSymbol {
                                coordinate: c.coordinate.clone(),
                                reference: o.reference.clone(),
                                detail,
                            }),
                            ReferenceStatus::ShapeMismatch => {
                                out.push(Incompatibility::ShapeMismatch {
                                    coordinate: c.coordinate.clone(),
                                    reference: o.reference.clone(),
                                    detail,
                                })
                            }
                        }
                    }
                }
                (CoordinateRole::InRange, DirectiveKind::Fail) => {
                    if c.outcome() == CoordinateOutcome::Compatible {
                        out.push(Incompatibility::UnexpectedMatch {
                            coordinate: c.coordinate.clone(),
                        });
                    }
                }
                (CoordinateRole::Inverse, _) => {
                    if c.outcome() == CoordinateOutcome::Compatible {
                        out.push(Incompatibility::OverBroadMatch {
                            coordinate: c.coordinate.clone(),
                        });
                    }
                }
            }
        }

        out
    }

    pub fn is_success(&self) -> bool {
        self.incompatibilities().is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: MuzzleData,
    pub counts: SeverityCounts,
}
