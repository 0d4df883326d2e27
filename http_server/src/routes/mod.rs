mod authentication;
mod likes;
mod products;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(authentication::init_routes)
            .configure(products::init_routes)
            .configure(likes::init_routes),
    );
}
