//! Runs directives against a resolver.
//!
//! Every selected coordinate is checked and every result collected before the report is
//! returned; a failure on one coordinate never stops the others.

use crate::directive::Directive;
use crate::matcher::check_reference;
use crate::model::{Advice, ArtifactCoordinate};
use crate::report::{CoordinateReport, InverseSample, MuzzleReport, ReferenceOutcome, Resolution};
use crate::resolver::{ArtifactResolver, ResolveError};
use crate::surface::ApiSurface;
use crate::version::{ArtifactVersion, VersionRange};
use muzzle_types::{CoordinateRole, DirectiveKind};
use rayon::prelude::*;
use tracing::{debug, info, warn};

pub struct Verifier<R> {
    resolver: R,
    pool: Option<rayon::ThreadPool>,
}

impl<R: ArtifactResolver> Verifier<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            pool: None,
        }
    }

    /// Use a dedicated pool of `threads` workers. 0 keeps the global rayon pool.
    pub fn with_threads(mut self, threads: usize) -> Self {
        if threads == 0 {
            self.pool = None;
            return self;
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => self.pool = Some(pool),
            Err(err) => {
                warn!(threads, error = %err, "could not build thread pool; using the global pool");
                self.pool = None;
            }
        }
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Published versions the directive considers, ascending and deduplicated.
    pub fn published_versions(
        &self,
        directive: &Directive,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        let mut versions = self
            .resolver
            .list_versions(&directive.group, &directive.module)?;
        versions.retain(|v| directive.considers(v));
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// Checks every considered version inside the range.
    pub fn verify(&self, directive: &Directive, advice: &Advice) -> MuzzleReport {
        self.execute(directive, advice, true, false)
    }

    /// Checks the sampled out-of-range neighbours only.
    pub fn verify_inverse(&self, directive: &Directive, advice: &Advice) -> MuzzleReport {
        self.execute(directive, advice, false, true)
    }

    /// `verify`, followed by `verify_inverse` for pass directives that assert it.
    pub fn run(&self, directive: &Directive, advice: &Advice) -> MuzzleReport {
        let inverse = directive.kind == DirectiveKind::Pass && directive.assert_inverse;
        self.execute(directive, advice, true, inverse)
    }

    pub fn run_all(&self, directives: &[Directive], advice: &Advice) -> Vec<MuzzleReport> {
        directives.iter().map(|d| self.run(d, advice)).collect()
    }

    fn execute(
        &self,
        directive: &Directive,
        advice: &Advice,
        in_range: bool,
        inverse: bool,
    ) -> MuzzleReport {
        let mut report = MuzzleReport::new(directive.clone());
        info!(
            artifact = %directive.artifact(),
            range = %directive.range,
            kind = ?directive.kind,
            "verifying directive"
        );

        let versions = match self.published_versions(directive) {
            Ok(versions) => versions,
            Err(err) => {
                warn!(artifact = %directive.artifact(), error = %err, "version listing failed");
                report.listing_error = Some(err);
                return report;
            }
        };

        if in_range {
            let selected: Vec<ArtifactVersion> = versions
                .iter()
                .filter(|v| directive.range.contains(v))
                .cloned()
                .collect();
            report.empty_range = selected.is_empty();
            report.coordinates =
                self.check_versions(directive, selected, CoordinateRole::InRange, advice);
        }

        if inverse {
            let (below, above) =
                inverse_sample(&directive.range, &versions, directive.inverse_neighbors);
            report.inverse = Some(InverseSample {
                below: below.len(),
                above: above.len(),
            });
            let sampled = below.into_iter().chain(above).collect();
            report.coordinates.extend(self.check_versions(
                directive,
                sampled,
                CoordinateRole::Inverse,
                advice,
            ));
        }

        report
    }

    fn check_versions(
        &self,
        directive: &Directive,
        versions: Vec<ArtifactVersion>,
        role: CoordinateRole,
        advice: &Advice,
    ) -> Vec<CoordinateReport> {
        let coordinates: Vec<ArtifactCoordinate> = versions
            .into_iter()
            .map(|v| ArtifactCoordinate::new(&directive.group, &directive.module, v))
            .collect();

        // par_iter keeps input order in the collected output.
        let work = || {
            coordinates
                .into_par_iter()
                .map(|c| self.check_coordinate(c, role, advice))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    fn check_coordinate(
        &self,
        coordinate: ArtifactCoordinate,
        role: CoordinateRole,
        advice: &Advice,
    ) -> CoordinateReport {
        let resolution = match self.resolver.load_surface(&coordinate) {
            Ok(surface) => {
                let outcomes = check_advice(&surface, advice);
                debug!(
                    coordinate = %coordinate,
                    role = ?role,
                    failed = outcomes.iter().filter(|o| !o.check.is_present()).count(),
                    "checked coordinate"
                );
                Resolution::Resolved(outcomes)
            }
            Err(err) => {
                warn!(coordinate = %coordinate, error = %err, "artifact resolution failed");
                Resolution::Failed(err)
            }
        };
        CoordinateReport {
            coordinate,
            role,
            resolution,
        }
    }
}

/// Each advice reference checked against one surface, in advice order.
pub fn check_advice(surface: &ApiSurface, advice: &Advice) -> Vec<ReferenceOutcome> {
    advice
        .references()
        .iter()
        .map(|reference| ReferenceOutcome {
            reference: reference.clone(),
            check: check_reference(surface, reference),
        })
        .collect()
}

/// Nearest out-of-range versions on each side of `range`. `versions` must be ascending.
/// `neighbors == 0` takes every out-of-range version.
pub fn inverse_sample(
    range: &VersionRange,
    versions: &[ArtifactVersion],
    neighbors: usize,
) -> (Vec<ArtifactVersion>, Vec<ArtifactVersion>) {
    let below: Vec<ArtifactVersion> = versions
        .iter()
        .filter(|v| range.is_below(v))
        .cloned()
        .collect();
    let above: Vec<ArtifactVersion> = versions
        .iter()
        .filter(|v| range.is_above(v))
        .cloned()
        .collect();

    if neighbors == 0 {
        return (below, above);
    }
    let skip = below.len().saturating_sub(neighbors);
    let below = below.into_iter().skip(skip).collect();
    let above = above.into_iter().take(neighbors).collect();
    (below, above)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Incompatibility;
    use crate::test_support::{FakeRegistry, foo_bar_advice, foo_surface, range, v};
    use muzzle_types::CoordinateOutcome;

    const GROUP: &str = "org.example";
    const MODULE: &str = "foo";

    fn registry(versions: &[&str], without_bar: &[&str]) -> FakeRegistry {
        let mut registry = FakeRegistry::new();
        for version in versions {
            registry.publish(GROUP, MODULE, version, foo_surface(!without_bar.contains(version)));
        }
        registry
    }

    fn pass(range_text: &str) -> Directive {
        Directive::pass(GROUP, MODULE, range(range_text))
    }

    fn checked_versions(report: &MuzzleReport, role: CoordinateRole) -> Vec<String> {
        report
            .coordinates
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.coordinate.version().to_string())
            .collect()
    }

    #[test]
    fn all_versions_in_range_pass() {
        let versions: Vec<String> = (0..10).map(|p| format!("3.7.{p}")).collect();
        let mut all: Vec<&str> = versions.iter().map(String::as_str).collect();
        all.extend(["3.6.2", "3.8.0"]);
        let verifier = Verifier::new(registry(&all, &[]));

        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());

        assert_eq!(checked_versions(&report, CoordinateRole::InRange), versions);
        assert!(report.is_success());
    }

    #[test]
    fn removed_symbol_fails_only_that_version() {
        let versions: Vec<String> = (0..10).map(|p| format!("3.7.{p}")).collect();
        let all: Vec<&str> = versions.iter().map(String::as_str).collect();
        let verifier = Verifier::new(registry(&all, &["3.7.5"]));

        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());

        let failures = report.incompatibilities();
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            Incompatibility::MissingSymbol { coordinate, .. } => {
                assert_eq!(coordinate.to_string(), "org.example:foo:3.7.5")
            }
            other => panic!("unexpected incompatibility: {other:?}"),
        }
    }

    #[test]
    fn numeric_rebuilds_are_checked_as_their_own_versions() {
        let verifier = Verifier::new(registry(&["3.7.0", "3.7.0-1", "3.8.0"], &["3.7.0-1"]));

        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());

        assert_eq!(
            checked_versions(&report, CoordinateRole::InRange),
            vec!["3.7.0", "3.7.0-1"]
        );
        let failures = report.incompatibilities();
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            Incompatibility::MissingSymbol { coordinate, .. } => {
                assert_eq!(coordinate.to_string(), "org.example:foo:3.7.0-1")
            }
            other => panic!("unexpected incompatibility: {other:?}"),
        }
    }

    #[test]
    fn no_version_in_range_is_an_empty_range_failure() {
        let verifier = Verifier::new(registry(&["1.0.0", "2.0.0"], &[]));
        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());

        assert!(report.empty_range);
        assert!(!report.is_success());
        assert!(matches!(
            report.incompatibilities()[0],
            Incompatibility::EmptyRange { .. }
        ));
    }

    #[test]
    fn skipped_and_prerelease_versions_are_not_considered() {
        let verifier = Verifier::new(registry(
            &["3.7.0", "3.7.1", "3.7.2-RC1", "3.7.3"],
            &["3.7.1"],
        ));
        let mut directive = pass("[3.7.0,3.8.0)");
        directive.skip_versions = vec![v("3.7.1")];

        let report = verifier.verify(&directive, &foo_bar_advice());
        assert_eq!(
            checked_versions(&report, CoordinateRole::InRange),
            vec!["3.7.0", "3.7.3"]
        );
        assert!(report.is_success());

        directive.include_prereleases = true;
        let report = verifier.verify(&directive, &foo_bar_advice());
        assert_eq!(
            checked_versions(&report, CoordinateRole::InRange),
            vec!["3.7.0", "3.7.2-RC1", "3.7.3"]
        );
    }

    #[test]
    fn resolution_failure_is_isolated_to_its_coordinate() {
        let mut registry = registry(&["3.7.0", "3.7.1", "3.7.2"], &[]);
        registry.fail_surface(GROUP, MODULE, "3.7.1");
        let verifier = Verifier::new(registry);

        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());
        let outcomes: Vec<CoordinateOutcome> =
            report.coordinates.iter().map(|c| c.outcome()).collect();
        assert_eq!(
            outcomes,
            vec![
                CoordinateOutcome::Compatible,
                CoordinateOutcome::Unresolved,
                CoordinateOutcome::Compatible
            ]
        );
        assert_eq!(report.incompatibilities().len(), 1);
    }

    #[test]
    fn listing_failure_is_recorded_not_treated_as_empty() {
        let mut registry = registry(&["3.7.0"], &[]);
        registry.fail_listing(GROUP, MODULE);
        let verifier = Verifier::new(registry);

        let report = verifier.verify(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());
        assert!(report.listing_error.is_some());
        assert!(!report.empty_range);
        assert!(matches!(
            report.incompatibilities()[..],
            [Incompatibility::ArtifactResolutionFailure { .. }]
        ));
    }

    #[test]
    fn inverse_flags_out_of_range_versions_that_fully_match() {
        let verifier = Verifier::new(registry(
            &["3.5.0", "3.6.0", "3.7.0", "3.7.1", "3.8.0", "3.9.0"],
            &["3.5.0", "3.6.0", "3.9.0"],
        ));
        let directive = pass("[3.7.0,3.8.0)").with_assert_inverse(true);

        let report = verifier.run(&directive, &foo_bar_advice());
        assert_eq!(
            checked_versions(&report, CoordinateRole::Inverse),
            vec!["3.5.0", "3.6.0", "3.8.0", "3.9.0"]
        );
        let failures = report.incompatibilities();
        assert_eq!(failures.len(), 1);
        match &failures[0] {
            Incompatibility::OverBroadMatch { coordinate } => {
                assert_eq!(coordinate.version().as_str(), "3.8.0")
            }
            other => panic!("unexpected incompatibility: {other:?}"),
        }
    }

    #[test]
    fn inverse_only_runs_for_pass_directives_that_ask_for_it() {
        let verifier = Verifier::new(registry(&["3.6.0", "3.7.0"], &[]));

        let plain = verifier.run(&pass("[3.7.0,3.8.0)"), &foo_bar_advice());
        assert!(plain.inverse.is_none());

        let fail = Directive::fail(GROUP, MODULE, range("[3.7.0,3.8.0)")).with_assert_inverse(true);
        let report = verifier.run(&fail, &foo_bar_advice());
        assert!(report.inverse.is_none());
        assert!(matches!(
            report.incompatibilities()[..],
            [Incompatibility::UnexpectedMatch { .. }]
        ));
    }

    #[test]
    fn inverse_sample_takes_nearest_neighbours() {
        let versions: Vec<ArtifactVersion> = ["1.0", "2.0", "3.0", "4.0", "5.0", "6.0", "7.0"]
            .iter()
            .map(|s| v(s))
            .collect();
        let range = range("[4.0,5.0)");

        let (below, above) = inverse_sample(&range, &versions, 2);
        assert_eq!(below, vec![v("2.0"), v("3.0")]);
        assert_eq!(above, vec![v("5.0"), v("6.0")]);

        let (below, above) = inverse_sample(&range, &versions, 0);
        assert_eq!(below.len(), 3);
        assert_eq!(above.len(), 3);
    }

    #[test]
    fn verification_is_repeatable() {
        let verifier = Verifier::new(registry(&["3.7.0", "3.7.1", "3.8.0"], &["3.7.1"]))
            .with_threads(2);
        let directive = pass("[3.7.0,3.8.0)").with_assert_inverse(true);

        let first = verifier.run(&directive, &foo_bar_advice());
        let second = verifier.run(&directive, &foo_bar_advice());
        assert_eq!(first, second);
    }
}
