use actix_web::web;
use entities::products::{Product, ProductExtension};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::use_case_app_container::UseCaseAppContainer;

#[derive(Serialize)]
struct ProductResponse {
    id: String,
    name: String,
    description: Option<String>,
    manufacturer: Option<String>,
    ingredients: Option<String>,
    thumbnail: Option<String>,
    image: Option<String>,
    score: f64,
    num_of_reviews: i32,
    num_of_views: i64,
    extension: ProductExtension,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            description: product.description,
            manufacturer: product.manufacturer,
            ingredients: product.ingredients,
            thumbnail: product.thumbnail,
            image: product.image,
            score: product.score,
            num_of_reviews: product.num_of_reviews,
            num_of_views: product.num_of_views,
            extension: product.extension,
        }
    }
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn list_products(
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<Vec<ProductResponse>>, ApiError> {
    let interactor = app.get_client().catalog();
    let products = interactor
        .list_products()
        .await
        .map_err(ApiError::InternalServerError)?;

    Ok(web::Json(products.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(err, skip(app), level = "info")]
async fn get_product(
    id: web::Path<Uuid>,
    app: web::Data<UseCaseAppContainer>,
) -> Result<web::Json<ProductResponse>, ApiError> {
    let id = id.into_inner();
    let interactor = app.get_client().catalog();
    let product = interactor
        .get_product(id.into())
        .await
        .map_err(ApiError::InternalServerError)?
        .ok_or_else(|| ApiError::NotFound(format!("no product with id {id}")))?;

    Ok(web::Json(product.into()))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(web::resource("").route(web::get().to(list_products)))
            .service(web::resource("/{id}").route(web::get().to(get_product))),
    );
}
