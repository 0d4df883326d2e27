use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;
use use_cases::authentication::AuthenticationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication(err) => match err {
                AuthenticationError::MissingCode
                | AuthenticationError::ProfileFieldMissing { .. } => StatusCode::BAD_REQUEST,
                AuthenticationError::UpstreamAuth(_)
                | AuthenticationError::UpstreamProfile(_) => StatusCode::BAD_GATEWAY,
                AuthenticationError::AccountNotFound => StatusCode::NOT_FOUND,
                AuthenticationError::DuplicateAccount { .. } => StatusCode::CONFLICT,
                AuthenticationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let err_json = json!({ "error": self.to_string() });
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(err_json)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::error::ResponseError;
    use actix_web::http::StatusCode;
    use use_cases::authentication::AuthenticationError;

    use super::ApiError;

    #[test]
    fn test_authentication_errors_map_to_their_statuses() {
        let cases = [
            (AuthenticationError::MissingCode, StatusCode::BAD_REQUEST),
            (
                AuthenticationError::UpstreamAuth("boom".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (AuthenticationError::AccountNotFound, StatusCode::NOT_FOUND),
            (
                AuthenticationError::DuplicateAccount { provider: None },
                StatusCode::CONFLICT,
            ),
            (
                AuthenticationError::ProfileFieldMissing { field: "email" },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::Authentication(err).status_code(), status);
        }
    }
}
