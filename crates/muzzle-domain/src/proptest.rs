//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Version ordering and range membership
//! - Which versions a directive run examines
//! - Findings ordering determinism

use crate::directive::Directive;
use crate::engine::evaluate;
use crate::test_support::{FakeRegistry, default_config, foo_bar_advice, foo_surface};
use crate::verifier::Verifier;
use crate::version::{ArtifactVersion, VersionRange};
use muzzle_types::CoordinateRole;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_triple() -> impl Strategy<Value = (u64, u64, u64)> {
    (0u64..6, 0u64..12, 0u64..12)
}

fn version_of((major, minor, patch): (u64, u64, u64)) -> ArtifactVersion {
    ArtifactVersion::parse(&format!("{major}.{minor}.{patch}")).expect("generated version")
}

/// A half-open range with lower < upper.
fn arb_range() -> impl Strategy<Value = VersionRange> {
    (arb_triple(), arb_triple())
        .prop_filter("bounds must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            VersionRange::half_open(version_of(lo), version_of(hi)).expect("lower < upper")
        })
}

fn arb_published() -> impl Strategy<Value = BTreeSet<(u64, u64, u64)>> {
    prop::collection::btree_set(arb_triple(), 0..24)
}

// ============================================================================
// Version ordering
// ============================================================================

proptest! {
    #[test]
    fn numeric_ordering_matches_tuple_ordering(a in arb_triple(), b in arb_triple()) {
        prop_assert_eq!(version_of(a).cmp(&version_of(b)), a.cmp(&b));
    }

    #[test]
    fn trailing_zero_segments_are_equal(major in 0u64..50, minor in 0u64..50) {
        let short = ArtifactVersion::parse(&format!("{major}.{minor}")).expect("short");
        let long = ArtifactVersion::parse(&format!("{major}.{minor}.0")).expect("long");
        prop_assert_eq!(short, long);
    }

    #[test]
    fn prereleases_sort_before_their_release(a in arb_triple(), q in 1u64..5) {
        let release = version_of(a);
        let rc = ArtifactVersion::parse(&format!("{}.{}.{}-RC{q}", a.0, a.1, a.2)).expect("rc");
        prop_assert!(rc < release);
        prop_assert!(rc.is_prerelease());
    }

    #[test]
    fn range_partitions_every_version(range in arb_range(), v in arb_triple()) {
        let v = version_of(v);
        let places = [range.is_below(&v), range.contains(&v), range.is_above(&v)];
        prop_assert_eq!(places.iter().filter(|p| **p).count(), 1);
    }

    #[test]
    fn range_display_round_trips(range in arb_range()) {
        let reparsed = VersionRange::parse(&range.to_string()).expect("canonical form parses");
        prop_assert_eq!(reparsed, range);
    }
}

// ============================================================================
// Directive runs
// ============================================================================

fn registry(published: &BTreeSet<(u64, u64, u64)>) -> FakeRegistry {
    let mut registry = FakeRegistry::new();
    for t in published {
        let version = format!("{}.{}.{}", t.0, t.1, t.2);
        // Odd patches lack the symbol so runs mix passes and failures.
        registry.publish("org.example", "foo", &version, foo_surface(t.2 % 2 == 0));
    }
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn verify_examines_exactly_the_in_range_versions(
        published in arb_published(),
        range in arb_range(),
    ) {
        let expected: Vec<ArtifactVersion> = published
            .iter()
            .map(|t| version_of(*t))
            .filter(|v| range.contains(v))
            .collect();

        let verifier = Verifier::new(registry(&published));
        let directive = Directive::pass("org.example", "foo", range.clone());
        let report = verifier.verify(&directive, &foo_bar_advice());

        let examined: Vec<ArtifactVersion> = report
            .coordinates
            .iter()
            .filter(|c| c.role == CoordinateRole::InRange)
            .map(|c| c.coordinate.version().clone())
            .collect();
        prop_assert_eq!(&examined, &expected);
        prop_assert_eq!(report.empty_range, expected.is_empty());
        prop_assert_eq!(verifier.resolver().loads(), expected.len());
    }

    #[test]
    fn evaluation_is_deterministic(
        published in arb_published(),
        range in arb_range(),
        neighbors in 0usize..4,
    ) {
        let mut directive = Directive::pass("org.example", "foo", range).with_assert_inverse(true);
        directive.inverse_neighbors = neighbors;

        let first = Verifier::new(registry(&published)).run_all(&[directive.clone()], &foo_bar_advice());
        let second = Verifier::new(registry(&published))
            .with_threads(3)
            .run_all(&[directive], &foo_bar_advice());
        prop_assert_eq!(&first, &second);

        let a = evaluate(&first, &default_config());
        let b = evaluate(&second, &default_config());
        prop_assert_eq!(a.verdict, b.verdict);
        prop_assert_eq!(a.findings, b.findings);
    }
}
