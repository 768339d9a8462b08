use muzzle_domain::model::ArtifactCoordinate;
use muzzle_domain::resolver::{ArtifactResolver, ResolveError};
use muzzle_domain::surface::ApiSurface;
use muzzle_domain::version::ArtifactVersion;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP registry:
/// - `GET <base>/<group>/<module>/index.json` -> `{"versions": [...]}`
/// - `GET <base>/<group>/<module>/<version>.json` -> API surface descriptor
///
/// 404/410 map to `NotFound`. Transport errors and 5xx are `Network` (retryable).
pub struct HttpRegistry {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpRegistry {
    pub fn new(base: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("muzzle/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, group: &str, module: &str, file: &str) -> String {
        format!("{}/{}/{}/{}", self.base, group, module, file)
    }

    fn fetch_text(&self, url: &str, target: &str) -> Result<String, ResolveError> {
        debug!(%url, "GET");
        let network = |message: String| ResolveError::Network {
            target: target.to_string(),
            message,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| network(e.to_string()))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(ResolveError::NotFound {
                target: target.to_string(),
            });
        }
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(network(format!("{url}: HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ResolveError::Malformed {
                target: target.to_string(),
                message: format!("{url}: unexpected HTTP {status}"),
            });
        }
        resp.text().map_err(|e| network(e.to_string()))
    }
}

impl ArtifactResolver for HttpRegistry {
    fn list_versions(
        &self,
        group: &str,
        module: &str,
    ) -> Result<Vec<ArtifactVersion>, ResolveError> {
        let target = format!("{group}:{module}");
        let text = self.fetch_text(&self.url(group, module, "index.json"), &target)?;
        crate::parse_index(&target, &text)
    }

    fn load_surface(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Arc<ApiSurface>, ResolveError> {
        let target = coordinate.to_string();
        let url = self.url(
            coordinate.group(),
            coordinate.module(),
            &format!("{}.json", coordinate.version().as_str()),
        );
        let text = self.fetch_text(&url, &target)?;
        Ok(Arc::new(crate::parse_surface(&target, &text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let registry =
            HttpRegistry::new("https://registry.example.com/muzzle/", Duration::from_secs(1))
                .expect("client");
        assert_eq!(
            registry.url("org.apache.camel", "camel-core", "index.json"),
            "https://registry.example.com/muzzle/org.apache.camel/camel-core/index.json"
        );
    }
}
