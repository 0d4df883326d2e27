use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::products::{Product, ProductExtension, ProductId, ProductKind};
use use_cases::catalog::ProductsRepo;

use crate::repository::Repository;

const PRODUCT_SELECT: &str = "
    SELECT p.id, p.name, p.description, p.manufacturer, p.ingredients,
           p.thumbnail, p.image, p.score, p.num_of_reviews, p.num_of_views,
           p.kind, p.created_at, p.updated_at,
           c.oily, c.thickness, c.durability,
           g.viscosity
    FROM public.product p
    LEFT JOIN public.condom c ON c.product_id = p.id
    LEFT JOIN public.gel g ON g.product_id = p.id
";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: uuid::Uuid,
    name: String,
    description: Option<String>,
    manufacturer: Option<String>,
    ingredients: Option<String>,
    thumbnail: Option<String>,
    image: Option<String>,
    score: f64,
    num_of_reviews: i32,
    num_of_views: i64,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    oily: Option<f64>,
    thickness: Option<f64>,
    durability: Option<f64>,
    viscosity: Option<f64>,
}

impl TryFrom<ProductRow> for Product {
    type Error = anyhow::Error;

    fn try_from(row: ProductRow) -> anyhow::Result<Product> {
        let kind = ProductKind::try_from(row.kind).map_err(|err| anyhow!(err))?;
        let extension = match kind {
            ProductKind::Condom => ProductExtension::Condom {
                oily: row
                    .oily
                    .ok_or_else(|| anyhow!("condom product {} has no extension row", row.id))?,
                thickness: row.thickness.unwrap_or_default(),
                durability: row.durability.unwrap_or_default(),
            },
            ProductKind::Gel => ProductExtension::Gel {
                viscosity: row
                    .viscosity
                    .ok_or_else(|| anyhow!("gel product {} has no extension row", row.id))?,
            },
        };

        Ok(Product {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            manufacturer: row.manufacturer,
            ingredients: row.ingredients,
            thumbnail: row.thumbnail,
            image: row.image,
            score: row.score,
            num_of_reviews: row.num_of_reviews,
            num_of_views: row.num_of_views,
            extension,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ProductsRepo for Repository {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} ORDER BY p.name"))
            .fetch_all(self.pool())
            .await
            .context("Failed to list products")?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn find_product(&self, id: ProductId) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id.inner())
            .fetch_optional(self.pool())
            .await
            .context("Failed to fetch product")?;

        row.map(Product::try_from).transpose()
    }
}
