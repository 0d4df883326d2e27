use std::sync::Arc;

use async_trait::async_trait;
use entities::likes::{Like, LikeTarget};
#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LikesRepo: Send + Sync {
    /// Inserting an already-present like is a no-op; the unique index on
    /// (target kind, target id, account) makes the operation idempotent.
    async fn insert_like(&self, like: Like) -> anyhow::Result<()>;

    async fn delete_like(&self, like: Like) -> anyhow::Result<()>;

    async fn count_likes(&self, target: LikeTarget) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait LikesInteractor: Send + Sync {
    async fn like(&self, like: Like) -> anyhow::Result<()>;

    async fn unlike(&self, like: Like) -> anyhow::Result<()>;

    async fn count(&self, target: LikeTarget) -> anyhow::Result<i64>;
}

pub struct LikesInteractorImpl {
    repo: Arc<dyn LikesRepo>,
}

impl LikesInteractorImpl {
    pub fn new(repo: Arc<dyn LikesRepo>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl LikesInteractor for LikesInteractorImpl {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn like(&self, like: Like) -> anyhow::Result<()> {
        self.repo.insert_like(like).await
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn unlike(&self, like: Like) -> anyhow::Result<()> {
        self.repo.delete_like(like).await
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn count(&self, target: LikeTarget) -> anyhow::Result<i64> {
        self.repo.count_likes(target).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use entities::accounts::AccountId;
    use entities::likes::{Like, LikeTarget, LikeTargetKind};
    use uuid::Uuid;

    use super::{LikesInteractor, LikesInteractorImpl, MockLikesRepo};

    #[tokio::test]
    async fn test_like_is_forwarded_to_the_repo() {
        let like = Like {
            account_id: AccountId::new(),
            target: LikeTarget {
                kind: LikeTargetKind::Product,
                id: Uuid::new_v4(),
            },
        };

        let mut repo = MockLikesRepo::new();
        repo.expect_insert_like()
            .times(1)
            .returning(|_| Ok(()));

        let interactor = LikesInteractorImpl::new(Arc::new(repo));

        assert!(interactor.like(like).await.is_ok())
    }
}
