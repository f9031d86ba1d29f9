use std::sync::Arc;

use tracing::debug;

use crate::config::settings::{Architecture, HarnessConfig};
use crate::errors::HarnessError;

/// Concrete base address for one outbound call. Recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub base_url: String,
    /// logical service, None in the single architecture
    pub service: Option<String>,
}

impl ResolvedEndpoint {
    pub fn new(base_url: impl Into<String>, service: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            service,
        }
    }

    /// Absolute URL for `path`. Absolute paths are returned unchanged.
    pub fn join(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_owned();
        }
        let base = self.base_url.trim_end_matches('/');
        match path.trim() {
            "" => base.to_owned(),
            p if p.starts_with('/') => format!("{}{}", base, p),
            p => format!("{}/{}", base, p),
        }
    }
}

pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Maps an optional logical service name to a base endpoint according to the
/// architecture mode of the snapshot.
#[derive(Debug, Clone)]
pub struct RequestRouter {
    config: Arc<HarnessConfig>,
}

impl RequestRouter {
    pub fn new(config: Arc<HarnessConfig>) -> Self {
        Self { config }
    }

    pub fn resolve(&self, service: Option<&str>) -> Result<ResolvedEndpoint, HarnessError> {
        match self.config.architecture {
            Architecture::Single => {
                let base_url = self
                    .config
                    .base_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| {
                        HarnessError::configuration(
                            "base_url not configured for the single architecture",
                        )
                    })?;
                if let Some(service) = service {
                    debug!("single architecture: service '{}' ignored", service);
                }
                Ok(ResolvedEndpoint::new(base_url, None))
            }
            Architecture::Microservices => {
                let name = service.unwrap_or(&self.config.default_service);
                let services = self
                    .config
                    .services
                    .as_ref()
                    .filter(|services| !services.is_empty())
                    .ok_or_else(|| {
                        HarnessError::configuration(
                            "services not configured in environment; the microservices \
                             architecture requires a services map",
                        )
                    })?;
                match services.get(name) {
                    Some(base_url) => Ok(ResolvedEndpoint::new(base_url, Some(name.to_owned()))),
                    None => {
                        let available = services.keys().cloned().collect::<Vec<_>>().join(", ");
                        Err(HarnessError::configuration(format!(
                            "service \"{}\" not configured in environment. Available services: {}. \
                             Add {}_{}_API_URL to your environment",
                            name,
                            available,
                            self.config.environment.prefix(),
                            name.to_uppercase().replace('-', "_"),
                        )))
                    }
                }
            }
        }
    }

    /// Endpoint and path for a configured target such as a token endpoint.
    /// Relative targets hang off the default service.
    pub fn resolve_target(&self, target: &str) -> Result<(ResolvedEndpoint, String), HarnessError> {
        if is_absolute(target) {
            return Ok((ResolvedEndpoint::new(target, None), String::new()));
        }
        Ok((self.resolve(None)?, target.to_owned()))
    }
}
