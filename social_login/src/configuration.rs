use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::configuration::config;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub social_login: SocialLoginConfig,
}

/// Provider endpoints and credentials. Everything provider-specific is
/// carried here rather than read from ambient state.
#[derive(Clone, Debug, Deserialize)]
pub struct SocialLoginConfig {
    pub app_key: String,
    pub app_secret: Secret<String>,
    pub redirect_uri: Url,
    pub authorize_url: Url,
    pub token_url: Url,
    pub profile_url: Url,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>()
    }
}
