use actix_web::{web, HttpResponse};
use entities::likes::{Like, LikeTarget, LikeTargetKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::use_case_app_container::UseCaseAppContainer;

#[derive(Deserialize, Debug)]
struct LikeRequest {
    account_id: Uuid,
    target_kind: LikeTargetKind,
    target_id: Uuid,
}

impl From<LikeRequest> for Like {
    fn from(value: LikeRequest) -> Self {
        Like {
            account_id: value.account_id.into(),
            target: LikeTarget {
                kind: value.target_kind,
                id: value.target_id,
            },
        }
    }
}

#[derive(Deserialize, Debug)]
struct CountRequest {
    target_kind: LikeTargetKind,
    target_id: Uuid,
}

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn like(
    data: web::Json<LikeRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<HttpResponse, ApiError> {
    let interactor = app.get_client().likes();
    interactor
        .like(data.into_inner().into())
        .await
        .map_err(ApiError::InternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn unlike(
    data: web::Json<LikeRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<HttpResponse, ApiError> {
    let interactor = app.get_client().likes();
    interactor
        .unlike(data.into_inner().into())
        .await
        .map_err(ApiError::InternalServerError)?;

    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn count(
    data: web::Query<CountRequest>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<CountResponse>, ApiError> {
    let data = data.into_inner();
    let interactor = app.get_client().likes();
    let count = interactor
        .count(LikeTarget {
            kind: data.target_kind,
            id: data.target_id,
        })
        .await
        .map_err(ApiError::InternalServerError)?;

    Ok(web::Json(CountResponse { count }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/likes")
            .service(
                web::resource("")
                    .route(web::post().to(like))
                    .route(web::delete().to(unlike)),
            )
            .service(web::resource("/count").route(web::get().to(count))),
    );
}
