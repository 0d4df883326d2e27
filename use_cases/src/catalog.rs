use std::sync::Arc;

use async_trait::async_trait;
use entities::products::{Product, ProductId};
#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn list_products(&self) -> anyhow::Result<Vec<Product>>;

    async fn find_product(&self, id: ProductId) -> anyhow::Result<Option<Product>>;
}

#[async_trait]
pub trait CatalogInteractor: Send + Sync {
    async fn list_products(&self) -> anyhow::Result<Vec<Product>>;

    /// `None` when no product carries the id; the transport layer decides
    /// how absence is presented.
    async fn get_product(&self, id: ProductId) -> anyhow::Result<Option<Product>>;
}

pub struct CatalogInteractorImpl {
    repo: Arc<dyn ProductsRepo>,
}

impl CatalogInteractorImpl {
    pub fn new(repo: Arc<dyn ProductsRepo>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CatalogInteractor for CatalogInteractorImpl {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        self.repo.list_products().await
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn get_product(&self, id: ProductId) -> anyhow::Result<Option<Product>> {
        self.repo.find_product(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use entities::products::ProductId;

    use super::{CatalogInteractor, CatalogInteractorImpl, MockProductsRepo};

    #[tokio::test]
    async fn test_get_product_passes_absence_through() {
        let mut repo = MockProductsRepo::new();
        repo.expect_find_product().returning(|_| Ok(None));

        let interactor = CatalogInteractorImpl::new(Arc::new(repo));

        let result = interactor.get_product(ProductId::new()).await.unwrap();
        assert!(result.is_none())
    }
}
