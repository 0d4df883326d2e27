use std::sync::Arc;

use crate::authentication::{
    AuthenticationInteractor, AuthenticationInteractorImpl, SocialLoginApi,
};
use crate::catalog::{CatalogInteractor, CatalogInteractorImpl};
use crate::likes::{LikesInteractor, LikesInteractorImpl};

pub mod authentication;
pub mod catalog;
pub mod likes;
mod repositories;

pub use repositories::Repository;

pub trait App {
    fn authentication(&self) -> &dyn AuthenticationInteractor;
    fn catalog(&self) -> &dyn CatalogInteractor;
    fn likes(&self) -> &dyn LikesInteractor;
}

pub struct AppImpl {
    authentication: Arc<dyn AuthenticationInteractor>,
    catalog: Arc<dyn CatalogInteractor>,
    likes: Arc<dyn LikesInteractor>,
}

impl App for AppImpl {
    fn authentication(&self) -> &dyn AuthenticationInteractor {
        self.authentication.as_ref()
    }

    fn catalog(&self) -> &dyn CatalogInteractor {
        self.catalog.as_ref()
    }

    fn likes(&self) -> &dyn LikesInteractor {
        self.likes.as_ref()
    }
}

impl AppImpl {
    pub fn new<R: Repository + 'static>(repo: R, social_login: Arc<dyn SocialLoginApi>) -> Self {
        let repository = Arc::new(repo);
        let authentication =
            AuthenticationInteractorImpl::new(social_login, repository.clone());
        let catalog = CatalogInteractorImpl::new(repository.clone());
        let likes = LikesInteractorImpl::new(repository);

        Self {
            authentication: Arc::new(authentication),
            catalog: Arc::new(catalog),
            likes: Arc::new(likes),
        }
    }
}
