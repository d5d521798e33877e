use std::sync::Arc;

use rollcall_auth::TokenCodec;
use rollcall_config::{AuthConfig, CorsConfig, RateLimitConfig};
use rollcall_core::SecretHasher;
use rollcall_observability::PrometheusHandle;

use crate::middleware::rate_limit::{AuthRateLimiter, auth_rate_limiter};
use crate::modules::auth::resolver::ClaimResolver;
use crate::modules::auth::service::{AccountProvisioner, Authenticator};
use crate::store::CredentialStore;

/// Shared, read-only application state. Cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub token_codec: Arc<TokenCodec>,
    pub hasher: SecretHasher,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub auth_limiter: Option<Arc<AuthRateLimiter>>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        auth_config: &AuthConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        Self {
            store,
            token_codec: Arc::new(TokenCodec::new(auth_config)),
            hasher: SecretHasher::new(auth_config.hash_cost),
            auth_limiter: auth_rate_limiter(&rate_limit_config),
            cors_config,
            rate_limit_config,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.prometheus = handle;
        self
    }

    pub fn provisioner(&self) -> AccountProvisioner<'_> {
        AccountProvisioner::new(self.store.as_ref(), self.hasher, &self.token_codec)
    }

    pub fn authenticator(&self) -> Authenticator<'_> {
        Authenticator::new(self.store.as_ref(), self.hasher, &self.token_codec)
    }

    pub fn resolver(&self) -> ClaimResolver<'_> {
        ClaimResolver::new(self.store.as_ref(), &self.token_codec)
    }
}
