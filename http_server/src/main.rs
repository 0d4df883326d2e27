use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use actix_web_opentelemetry::RequestTracing;
use anyhow::Context;
use shared_kernel::tracing::{config_telemetry, shutdown_global_tracer_provider};
use social_login::NaverSocialLogin;
use sqlx_postgres::repository::Repository;
use tracing_actix_web::TracingLogger;
use use_cases::AppImpl;

use crate::use_case_app_container::UseCaseAppContainer;

mod errors;
mod routes;
mod use_case_app_container;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config_telemetry("http_server");

    let repository = Repository::new().await?;
    let social_login = Arc::new(NaverSocialLogin::new()?);

    HttpServer::new(move || {
        let app = AppImpl::new(repository.clone(), social_login.clone());
        let app_container = UseCaseAppContainer::new(app);
        App::new()
            .wrap(Cors::permissive())
            .wrap(RequestTracing::new())
            .wrap(TracingLogger::default())
            .configure(routes::config)
            .app_data(web::Data::new(app_container))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
    .context("Server failed to run")?;

    shutdown_global_tracer_provider();

    Ok(())
}
