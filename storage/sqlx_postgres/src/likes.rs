use anyhow::Context;
use async_trait::async_trait;
use entities::likes::{Like, LikeTarget};
use use_cases::likes::LikesRepo;

use crate::repository::Repository;

#[async_trait]
impl LikesRepo for Repository {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn insert_like(&self, like: Like) -> anyhow::Result<()> {
        sqlx::query(
            "
            INSERT INTO public.likes (target_kind, target_id, account_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (target_kind, target_id, account_id) DO NOTHING
            ",
        )
        .bind(like.target.kind.as_str())
        .bind(like.target.id)
        .bind(like.account_id.inner())
        .execute(self.pool())
        .await
        .context("Failed to insert like")
        .map(|_| ())
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn delete_like(&self, like: Like) -> anyhow::Result<()> {
        sqlx::query(
            "
            DELETE FROM public.likes
            WHERE target_kind = $1 AND target_id = $2 AND account_id = $3
            ",
        )
        .bind(like.target.kind.as_str())
        .bind(like.target.id)
        .bind(like.account_id.inner())
        .execute(self.pool())
        .await
        .context("Failed to delete like")
        .map(|_| ())
    }

    async fn count_likes(&self, target: LikeTarget) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM public.likes WHERE target_kind = $1 AND target_id = $2",
        )
        .bind(target.kind.as_str())
        .bind(target.id)
        .fetch_one(self.pool())
        .await
        .context("Failed to count likes")?;

        Ok(count)
    }
}
