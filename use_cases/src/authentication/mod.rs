pub mod derive;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use entities::accounts::{Account, AccountEmail, NewAccount, Provider, Username};
#[cfg(test)]
use mockall::automock;
use shared_kernel::string_key;
use url::Url;
use uuid::Uuid;

string_key!(StateToken);

/// Token pair returned by the provider's code-exchange endpoint.
#[derive(Clone, Debug)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Raw provider profile attributes. Every field is optional on the wire;
/// required fields are enforced during derivation so the caller gets a
/// per-field error instead of a parse failure.
#[derive(Clone, Debug, Default)]
pub struct ExternalProfile {
    pub email: Option<String>,
    pub gender: Option<String>,
    pub age_range: Option<String>,
}

/// Query parameters carried by the provider's inbound callback.
#[derive(Clone, Debug)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state_token: StateToken,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("the callback did not carry an authorization code")]
    MissingCode,
    #[error("failed to exchange the authorization code for an access token: {0}")]
    UpstreamAuth(String),
    #[error("failed to fetch the user's profile from the provider: {0}")]
    UpstreamProfile(String),
    #[error("no account exists for this email and provider")]
    AccountNotFound,
    #[error("an account with this email already exists{}", .provider.map(|provider| format!("; log in with {provider} instead")).unwrap_or_default())]
    DuplicateAccount { provider: Option<Provider> },
    #[error("the provider response is missing the `{field}` field; check the account's consent settings")]
    ProfileFieldMissing { field: &'static str },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateAccountError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("the generated username is already taken")]
    UsernameTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Provider-specific OAuth surface: authorization URL construction plus
/// the two upstream calls (code exchange, profile fetch).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SocialLoginApi: Send + Sync {
    fn provider(&self) -> Provider;

    fn authorization_url(&self, state_token: &StateToken) -> Url;

    async fn exchange_code_for_token(
        &self,
        code: &str,
        state_token: &StateToken,
    ) -> Result<AccessToken, AuthenticationError>;

    async fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> Result<ExternalProfile, AuthenticationError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_account(
        &self,
        email: &AccountEmail,
        provider: Provider,
    ) -> anyhow::Result<Option<Account>>;

    async fn find_account_by_email(
        &self,
        email: &AccountEmail,
    ) -> anyhow::Result<Option<Account>>;

    async fn exists_by_username(&self, username: &Username) -> anyhow::Result<bool>;

    async fn create_account(&self, account: NewAccount) -> Result<Account, CreateAccountError>;
}

#[async_trait]
pub trait AuthenticationInteractor: Send + Sync {
    fn authorization_url(&self, state_token: &StateToken) -> Url;

    async fn login(&self, params: CallbackParams) -> Result<Account, AuthenticationError>;

    async fn sign_up(&self, params: CallbackParams) -> Result<Account, AuthenticationError>;
}

pub struct AuthenticationInteractorImpl {
    api: Arc<dyn SocialLoginApi>,
    repo: Arc<dyn AccountRepo>,
}

/// Username collisions on 8 hex chars are vanishingly rare; a bounded
/// retry keeps a stuck generator from looping forever.
const MAX_USERNAME_ATTEMPTS: usize = 8;

impl AuthenticationInteractorImpl {
    pub fn new(api: Arc<dyn SocialLoginApi>, repo: Arc<dyn AccountRepo>) -> Self {
        Self { api, repo }
    }

    /// Runs the upstream half of the flow: code exchange, profile fetch,
    /// field derivation. Rejects before any upstream call when the
    /// callback carried no code.
    async fn reconcile(
        &self,
        params: &CallbackParams,
    ) -> Result<entities::accounts::NewAccountFields, AuthenticationError> {
        let code = params
            .code
            .as_deref()
            .ok_or(AuthenticationError::MissingCode)?;
        let token = self
            .api
            .exchange_code_for_token(code, &params.state_token)
            .await?;
        let profile = self.api.fetch_profile(&token).await?;
        derive::derive_account_fields(&profile, self.api.provider(), Utc::now().year())
    }

    fn generate_username() -> Result<Username, AuthenticationError> {
        let token = Uuid::new_v4().simple().to_string();
        Username::try_from(token[..8].to_string())
            .map_err(|err| AuthenticationError::Internal(anyhow!(err)))
    }
}

#[async_trait]
impl AuthenticationInteractor for AuthenticationInteractorImpl {
    fn authorization_url(&self, state_token: &StateToken) -> Url {
        self.api.authorization_url(state_token)
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn login(&self, params: CallbackParams) -> Result<Account, AuthenticationError> {
        let fields = self.reconcile(&params).await?;
        self.repo
            .find_account(&fields.email, fields.provider)
            .await?
            .ok_or(AuthenticationError::AccountNotFound)
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn sign_up(&self, params: CallbackParams) -> Result<Account, AuthenticationError> {
        let fields = self.reconcile(&params).await?;

        // The duplicate check is by email alone, regardless of provider,
        // so the error can tell the user which provider they signed up with.
        if let Some(existing) = self.repo.find_account_by_email(&fields.email).await? {
            return Err(AuthenticationError::DuplicateAccount {
                provider: Some(existing.provider),
            });
        }

        // The existence check alone races with concurrent sign-ups; the
        // unique index on username is the actual guarantee, so an insert
        // that loses the race retries with a fresh username.
        for _ in 0..MAX_USERNAME_ATTEMPTS {
            let username = Self::generate_username()?;
            if self.repo.exists_by_username(&username).await? {
                continue;
            }
            match self
                .repo
                .create_account(NewAccount::new(fields.clone(), username))
                .await
            {
                Ok(account) => return Ok(account),
                Err(CreateAccountError::UsernameTaken) => continue,
                Err(CreateAccountError::DuplicateEmail) => {
                    return Err(AuthenticationError::DuplicateAccount { provider: None })
                }
                Err(CreateAccountError::Other(err)) => {
                    return Err(AuthenticationError::Internal(err))
                }
            }
        }

        Err(AuthenticationError::Internal(anyhow!(
            "failed to generate an unused username after {MAX_USERNAME_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Datelike, Utc};
    use entities::accounts::{
        Account, AccountEmail, AccountId, GenderCategory, Provider, Username,
    };

    use super::{
        AccessToken, AuthenticationError, AuthenticationInteractor,
        AuthenticationInteractorImpl, CallbackParams, CreateAccountError, ExternalProfile,
        MockAccountRepo, MockSocialLoginApi, StateToken,
    };

    fn callback_params(code: Option<&str>) -> CallbackParams {
        CallbackParams {
            code: code.map(|code| code.to_string()),
            state_token: StateToken::from("state-token"),
        }
    }

    fn existing_account() -> Account {
        Account {
            id: AccountId::new(),
            email: AccountEmail::try_from("buyer@example.com".to_string()).unwrap(),
            username: Username::try_from("ab12cd34".to_string()).unwrap(),
            gender: GenderCategory::Man,
            birth_year: Utc::now().year() - 24 + 1,
            provider: Provider::Naver,
        }
    }

    fn mock_api() -> MockSocialLoginApi {
        let mut api = MockSocialLoginApi::new();
        api.expect_provider().return_const(Provider::Naver);
        api.expect_exchange_code_for_token().returning(|_, _| {
            Ok(AccessToken {
                access_token: "access".to_string(),
                token_type: "bearer".to_string(),
            })
        });
        api.expect_fetch_profile().returning(|_| {
            Ok(ExternalProfile {
                email: Some("buyer@example.com".to_string()),
                gender: Some("M".to_string()),
                age_range: Some("20-29".to_string()),
            })
        });
        api
    }

    #[tokio::test]
    async fn test_missing_code_fails_before_any_upstream_call() {
        let mut api = MockSocialLoginApi::new();
        api.expect_exchange_code_for_token().never();
        api.expect_fetch_profile().never();
        let repo = MockAccountRepo::new();

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.login(callback_params(None)).await;
        assert!(matches!(result, Err(AuthenticationError::MissingCode)));
    }

    #[tokio::test]
    async fn test_login_without_matching_account_fails() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account().returning(|_, _| Ok(None));

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.login(callback_params(Some("auth-code"))).await;
        assert!(matches!(result, Err(AuthenticationError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_login_returns_the_matching_account() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account()
            .withf(|email, provider| {
                email.as_ref() == "buyer@example.com" && *provider == Provider::Naver
            })
            .returning(|_, _| Ok(Some(existing_account())));

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let account = interactor
            .login(callback_params(Some("auth-code")))
            .await
            .unwrap();
        assert_eq!(account.email.as_ref(), "buyer@example.com");
    }

    #[tokio::test]
    async fn test_sign_up_with_existing_email_fails_regardless_of_provider() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email()
            .returning(|_| Ok(Some(existing_account())));
        repo.expect_create_account().never();

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.sign_up(callback_params(Some("auth-code"))).await;
        assert!(matches!(
            result,
            Err(AuthenticationError::DuplicateAccount {
                provider: Some(Provider::Naver)
            })
        ));
    }

    #[tokio::test]
    async fn test_sign_up_creates_account_with_derived_fields() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_exists_by_username().returning(|_| Ok(false));
        repo.expect_create_account().returning(|new_account| {
            assert_eq!(new_account.email.as_ref(), "buyer@example.com");
            assert_eq!(new_account.gender, GenderCategory::Man);
            assert_eq!(new_account.birth_year, Utc::now().year() - 24 + 1);
            assert_eq!(new_account.username.as_ref().len(), 8);
            Ok(existing_account())
        });

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.sign_up(callback_params(Some("auth-code"))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_retries_when_the_generated_username_is_taken() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        // First candidate is taken, the second is free.
        repo.expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_create_account()
            .times(1)
            .returning(|_| Ok(existing_account()));

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.sign_up(callback_params(Some("auth-code"))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_retries_when_the_insert_loses_the_username_race() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_exists_by_username().returning(|_| Ok(false));
        repo.expect_create_account()
            .times(1)
            .returning(|_| Err(CreateAccountError::UsernameTaken));
        repo.expect_create_account()
            .times(1)
            .returning(|_| Ok(existing_account()));

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.sign_up(callback_params(Some("auth-code"))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_surfaces_an_email_conflict_from_the_unique_index() {
        let api = mock_api();
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_exists_by_username().returning(|_| Ok(false));
        repo.expect_create_account()
            .returning(|_| Err(CreateAccountError::DuplicateEmail));

        let interactor = AuthenticationInteractorImpl::new(Arc::new(api), Arc::new(repo));

        let result = interactor.sign_up(callback_params(Some("auth-code"))).await;
        assert!(matches!(
            result,
            Err(AuthenticationError::DuplicateAccount { provider: None })
        ));
    }
}
