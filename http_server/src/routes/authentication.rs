use actix_web::web;
use entities::accounts::Account;
use serde::{Deserialize, Serialize};
use use_cases::authentication::{CallbackParams, StateToken};

use crate::errors::ApiError;
use crate::use_case_app_container::UseCaseAppContainer;

#[derive(Deserialize, Debug)]
struct AuthorizationUrlRequest {
    state: String,
}

#[derive(Serialize)]
struct AuthorizationUrlResponse {
    url: String,
}

/// The callback's `code` stays optional here; rejecting its absence is
/// the interactor's job, before any upstream call is made.
#[derive(Deserialize, Debug)]
struct CallbackRequest {
    code: Option<String>,
    state: String,
}

impl From<CallbackRequest> for CallbackParams {
    fn from(value: CallbackRequest) -> Self {
        CallbackParams {
            code: value.code,
            state_token: StateToken::from(value.state),
        }
    }
}

#[derive(Serialize)]
struct AccountResponse {
    id: String,
    email: String,
    username: String,
    gender: Option<&'static str>,
    birth_year: i32,
    provider: &'static str,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_ref().to_string(),
            username: account.username.as_ref().to_string(),
            gender: account.gender.as_str(),
            birth_year: account.birth_year,
            provider: account.provider.as_str(),
        }
    }
}

#[tracing::instrument(skip(app), level = "info")]
async fn authorization_url(
    data: web::Query<AuthorizationUrlRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<AuthorizationUrlResponse>, ApiError> {
    let interactor = app.get_client().authentication();
    let url = interactor.authorization_url(&StateToken::from(data.into_inner().state));

    Ok(web::Json(AuthorizationUrlResponse {
        url: url.to_string(),
    }))
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn login(
    data: web::Query<CallbackRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<AccountResponse>, ApiError> {
    let interactor = app.get_client().authentication();
    let account = interactor.login(data.into_inner().into()).await?;

    Ok(web::Json(account.into()))
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn sign_up(
    data: web::Query<CallbackRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<AccountResponse>, ApiError> {
    let interactor = app.get_client().authentication();
    let account = interactor.sign_up(data.into_inner().into()).await?;

    Ok(web::Json(account.into()))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/url").route(web::get().to(authorization_url)))
            .service(web::resource("/login/callback").route(web::get().to(login)))
            .service(web::resource("/signup/callback").route(web::get().to(sign_up))),
    );
}
