use crate::accounts::AccountId;
use uuid::Uuid;

/// What a like points at. Only products and reviews are likeable, so
/// the target set is closed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeTargetKind {
    Product,
    Review,
}

impl LikeTargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeTargetKind::Product => "product",
            LikeTargetKind::Review => "review",
        }
    }
}

impl TryFrom<String> for LikeTargetKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "product" => Ok(LikeTargetKind::Product),
            "review" => Ok(LikeTargetKind::Review),
            other => Err(format!("{other} is not a likeable target")),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LikeTarget {
    pub kind: LikeTargetKind,
    pub id: Uuid,
}

/// A like is unique per (target kind, target id, account).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Like {
    pub account_id: AccountId,
    pub target: LikeTarget,
}
