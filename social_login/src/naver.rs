use std::collections::HashMap;

use async_trait::async_trait;
use entities::accounts::Provider;
use secrecy::ExposeSecret;
use serde::Deserialize;
use shared_kernel::http_client::HttpClient;
use url::Url;
use use_cases::authentication::{
    AccessToken, AuthenticationError, ExternalProfile, SocialLoginApi, StateToken,
};

use crate::configuration::{Settings, SocialLoginConfig};

#[derive(Clone)]
pub struct NaverSocialLogin {
    config: SocialLoginConfig,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

/// The profile endpoint wraps the user's attributes in a `response`
/// envelope. A missing envelope or attribute is left as `None` so that
/// derivation can name the missing field.
#[derive(Deserialize)]
struct ProfileResponse {
    response: Option<RawProfile>,
}

#[derive(Default, Deserialize)]
struct RawProfile {
    email: Option<String>,
    gender: Option<String>,
    age: Option<String>,
}

impl NaverSocialLogin {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?;

        Ok(NaverSocialLogin {
            config: settings.social_login,
        })
    }

    pub fn from_config(config: SocialLoginConfig) -> Self {
        Self { config }
    }

    fn token_request_url(&self, code: &str, state_token: &StateToken) -> Url {
        let mut url = self.config.token_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.app_key)
            .append_pair("client_secret", self.config.app_secret.expose_secret())
            .append_pair("grant_type", "authorization_code")
            .append_pair("state", state_token.as_ref())
            .append_pair("code", code);
        url
    }
}

#[async_trait]
impl SocialLoginApi for NaverSocialLogin {
    fn provider(&self) -> Provider {
        Provider::Naver
    }

    fn authorization_url(&self, state_token: &StateToken) -> Url {
        let mut url = self.config.authorize_url.clone();
        // Parameter order is part of the contract and must stay stable.
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.app_key)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("state", state_token.as_ref());
        url
    }

    #[tracing::instrument(err, skip(self, state_token), level = "info")]
    async fn exchange_code_for_token(
        &self,
        code: &str,
        state_token: &StateToken,
    ) -> Result<AccessToken, AuthenticationError> {
        let url = self.token_request_url(code, state_token);
        let response = HttpClient::get_json::<TokenResponse>(url)
            .await
            .map_err(|err| AuthenticationError::UpstreamAuth(format!("{err:#}")))?;

        Ok(AccessToken {
            access_token: response.access_token,
            token_type: response.token_type,
        })
    }

    #[tracing::instrument(err, skip(self, token), level = "info")]
    async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<ExternalProfile, AuthenticationError> {
        let headers = HashMap::from([(
            "Authorization",
            format!("{} {}", token.token_type, token.access_token),
        )]);
        let response = HttpClient::post_with_headers(self.config.profile_url.clone(), headers)
            .await
            .map_err(|err| AuthenticationError::UpstreamProfile(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthenticationError::UpstreamProfile(format!(
                "the provider answered with status {}",
                response.status()
            )));
        }

        let body = response
            .json::<ProfileResponse>()
            .await
            .map_err(|err| AuthenticationError::UpstreamProfile(err.to_string()))?;

        let raw = body.response.unwrap_or_default();
        Ok(ExternalProfile {
            email: raw.email,
            gender: raw.gender,
            age_range: raw.age,
        })
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;
    use url::Url;
    use use_cases::authentication::{SocialLoginApi, StateToken};

    use super::NaverSocialLogin;
    use crate::configuration::SocialLoginConfig;

    fn test_client() -> NaverSocialLogin {
        NaverSocialLogin::from_config(SocialLoginConfig {
            app_key: "app-key".to_string(),
            app_secret: Secret::new("app-secret".to_string()),
            redirect_uri: Url::parse("https://shop.example.com/callback").unwrap(),
            authorize_url: Url::parse("https://nid.naver.com/oauth2.0/authorize").unwrap(),
            token_url: Url::parse("https://nid.naver.com/oauth2.0/token").unwrap(),
            profile_url: Url::parse("https://openapi.naver.com/v1/nid/me").unwrap(),
        })
    }

    #[test]
    fn test_authorization_url_has_a_stable_parameter_order() {
        let client = test_client();

        let url = client.authorization_url(&StateToken::from("anti-forgery"));

        assert_eq!(
            url.as_str(),
            "https://nid.naver.com/oauth2.0/authorize\
             ?client_id=app-key\
             &response_type=code\
             &redirect_uri=https%3A%2F%2Fshop.example.com%2Fcallback\
             &state=anti-forgery"
        );
    }

    #[test]
    fn test_token_request_carries_the_credentials_and_the_code() {
        let client = test_client();

        let url = client.token_request_url("auth-code", &StateToken::from("anti-forgery"));

        assert_eq!(
            url.as_str(),
            "https://nid.naver.com/oauth2.0/token\
             ?client_id=app-key\
             &client_secret=app-secret\
             &grant_type=authorization_code\
             &state=anti-forgery\
             &code=auth-code"
        );
    }
}
