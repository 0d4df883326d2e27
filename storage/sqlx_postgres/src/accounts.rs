use anyhow::{anyhow, Context};
use async_trait::async_trait;
use entities::accounts::{Account, AccountEmail, AccountId, NewAccount, Provider, Username};
use use_cases::authentication::{AccountRepo, CreateAccountError};

use crate::repository::Repository;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    email: String,
    username: String,
    gender: Option<String>,
    birth_year: i32,
    provider: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> anyhow::Result<Account> {
        let email = AccountEmail::try_from(row.email).map_err(|err| anyhow!(err))?;
        let username = Username::try_from(row.username).map_err(|err| anyhow!(err))?;
        let provider = Provider::try_from(row.provider).map_err(|err| anyhow!(err))?;

        Ok(Account {
            id: row.id.into(),
            email,
            username,
            gender: row.gender.into(),
            birth_year: row.birth_year,
            provider,
        })
    }
}

/// Translates Postgres unique-violations into the typed conflicts the
/// sign-up retry loop acts on. The constraint names come from the
/// `account` table's unique columns.
fn map_insert_error(err: sqlx::Error) -> CreateAccountError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("account_email_key") => return CreateAccountError::DuplicateEmail,
            Some("account_username_key") => return CreateAccountError::UsernameTaken,
            _ => {}
        }
    }
    CreateAccountError::Other(anyhow::Error::from(err).context("Failed to insert account"))
}

#[async_trait]
impl AccountRepo for Repository {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn find_account(
        &self,
        email: &AccountEmail,
        provider: Provider,
    ) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "
            SELECT id, email, username, gender, birth_year, provider
            FROM public.account WHERE email = $1 AND provider = $2
            ",
        )
        .bind(email.as_ref())
        .bind(provider.as_str())
        .fetch_optional(self.pool())
        .await
        .context("Failed to fetch account by email and provider")?;

        row.map(Account::try_from).transpose()
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn find_account_by_email(
        &self,
        email: &AccountEmail,
    ) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "
            SELECT id, email, username, gender, birth_year, provider
            FROM public.account WHERE email = $1
            ",
        )
        .bind(email.as_ref())
        .fetch_optional(self.pool())
        .await
        .context("Failed to fetch account by email")?;

        row.map(Account::try_from).transpose()
    }

    async fn exists_by_username(&self, username: &Username) -> anyhow::Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM public.account WHERE username = $1)")
                .bind(username.as_ref())
                .fetch_one(self.pool())
                .await
                .context("Failed to check username existence")?;

        Ok(exists)
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn create_account(&self, account: NewAccount) -> Result<Account, CreateAccountError> {
        let id = AccountId::new();
        let row = sqlx::query_as::<_, AccountRow>(
            "
            INSERT INTO public.account (id, email, username, gender, birth_year, provider)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, username, gender, birth_year, provider
            ",
        )
        .bind(id.inner())
        .bind(account.email.as_ref())
        .bind(account.username.as_ref())
        .bind(account.gender.as_str())
        .bind(account.birth_year)
        .bind(account.provider.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(map_insert_error)?;

        Account::try_from(row).map_err(CreateAccountError::Other)
    }
}

#[cfg(test)]
mod tests {
    use entities::accounts::{
        AccountEmail, GenderCategory, NewAccount, Provider, Username,
    };
    use use_cases::authentication::{AccountRepo, CreateAccountError};

    use crate::repository::Repository;

    fn new_account(email: &str, username: &str) -> NewAccount {
        NewAccount {
            email: AccountEmail::try_from(email.to_string()).unwrap(),
            username: Username::try_from(username.to_string()).unwrap(),
            gender: GenderCategory::Woman,
            birth_year: 1997,
            provider: Provider::Naver,
        }
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres"]
    async fn test_created_account_can_be_found_by_email_and_provider() {
        let repo = Repository::new_test_repo().await;

        let created = repo
            .create_account(new_account("buyer@example.com", "ab12cd34"))
            .await
            .unwrap();

        let found = repo
            .find_account(&created.email, Provider::Naver)
            .await
            .unwrap()
            .expect("account should exist");
        assert_eq!(found.username.as_ref(), "ab12cd34");
        assert_eq!(found.gender, GenderCategory::Woman);
        assert_eq!(found.birth_year, 1997);
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres"]
    async fn test_duplicate_email_is_reported_as_a_typed_conflict() {
        let repo = Repository::new_test_repo().await;

        repo.create_account(new_account("buyer@example.com", "ab12cd34"))
            .await
            .unwrap();
        let result = repo
            .create_account(new_account("buyer@example.com", "ef56gh78"))
            .await;

        assert!(matches!(result, Err(CreateAccountError::DuplicateEmail)))
    }

    #[tokio::test]
    #[ignore = "needs a running Postgres"]
    async fn test_duplicate_username_is_reported_as_a_typed_conflict() {
        let repo = Repository::new_test_repo().await;

        repo.create_account(new_account("first@example.com", "ab12cd34"))
            .await
            .unwrap();
        let result = repo
            .create_account(new_account("second@example.com", "ab12cd34"))
            .await;

        assert!(matches!(result, Err(CreateAccountError::UsernameTaken)))
    }
}
