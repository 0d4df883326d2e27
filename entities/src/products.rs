use chrono::{DateTime, Utc};
use shared_kernel::uuid_key;

uuid_key!(ProductId);

/// Type-specific attribute extension. Each product carries exactly one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductExtension {
    Condom {
        oily: f64,
        thickness: f64,
        durability: f64,
    },
    Gel {
        viscosity: f64,
    },
}

impl ProductExtension {
    pub fn kind(&self) -> ProductKind {
        match self {
            ProductExtension::Condom { .. } => ProductKind::Condom,
            ProductExtension::Gel { .. } => ProductKind::Gel,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Condom,
    Gel,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Condom => "condom",
            ProductKind::Gel => "gel",
        }
    }
}

impl TryFrom<String> for ProductKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "condom" => Ok(ProductKind::Condom),
            "gel" => Ok(ProductKind::Gel),
            other => Err(format!("{other} is not a known product kind")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub ingredients: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub score: f64,
    pub num_of_reviews: i32,
    pub num_of_views: i64,
    pub extension: ProductExtension,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_reports_its_kind() {
        let extension = ProductExtension::Gel { viscosity: 0.7 };
        assert_eq!(extension.kind(), ProductKind::Gel);
        assert_eq!(extension.kind().as_str(), "gel");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(ProductKind::try_from("lotion".to_string()).is_err())
    }
}
