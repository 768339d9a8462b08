use muzzle_domain::model::ArtifactCoordinate;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bounded exponential backoff: `initial_backoff * 2^n`, capped at `max_backoff`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_millis(2000),
        }
    }
}

impl RetryPolicy {
    /// No retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Retries retryable resolver errors. `NotFound` and `Malformed` surface immediately.
pub struct RetryingResolver<R> {
    inner: R,
    policy: RetryPolicy,
}

impl<R: ArtifactResolver> RetryingResolver<R> {
    pub fn new(inner: R, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn attempt<T>(&self, mut op: impl FnMut() -> Result<T, ResolveError>) -> Result<T, ResolveError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut retry = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry + 1 < attempts => {
                    let delay = self.policy.backoff(retry);
                    warn!(
                        target_artifact = %err.target(),
                        attempt = retry + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after transient failure"
                    );
                    std::thread::sleep(delay);
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: ArtifactResolver> ArtifactResolver for RetryingResolver<R> {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        self.attempt(|| self.inner.list_versions(group, module))
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        self.attempt(|| self.inner.load_surface(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times with `error`, then succeeds.
    struct Flaky {
        failures: u32,
        error: ResolveError,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(failures: u32, error: ResolveError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl ArtifactResolver for Flaky {
        fn list_versions(&self, _: &str, _: &str) -> Result<Vec<ArtifactVersion>, ResolveError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(self.error.clone())
            } else {
                Ok(vec![ArtifactVersion::parse("1.0").expect("version")])
            }
        }

        fn load_surface(&self, _: &ArtifactCoordinate) -> Result<Arc<ApiSurface>, ResolveError> {
            Err(self.error.clone())
        }
    }

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    fn network() -> ResolveError {
        ResolveError::Network {
            target: "g:m".to_string(),
            message: "connection reset".to_string(),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(200));
        assert_eq!(policy.backoff(1), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(1600));
        assert_eq!(policy.backoff(4), Duration::from_millis(2000));
        assert_eq!(policy.backoff(40), Duration::from_millis(2000));
    }

    #[test]
    fn transient_failures_are_retried_until_success() {
        let resolver = RetryingResolver::new(Flaky::new(2, network()), fast(3));
        assert!(resolver.list_versions("g", "m").is_ok());
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn attempts_are_bounded() {
        let resolver = RetryingResolver::new(Flaky::new(10, network()), fast(3));
        assert_eq!(resolver.list_versions("g", "m"), Err(network()));
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn not_found_is_not_retried() {
        let not_found = ResolveError::NotFound {
            target: "g:m".to_string(),
        };
        let resolver = RetryingResolver::new(Flaky::new(10, not_found.clone()), fast(5));
        assert_eq!(resolver.list_versions("g", "m"), Err(not_found));
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
    }
}
