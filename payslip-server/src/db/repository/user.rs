//! User Repository

use super::{BaseRepository, RepoError, RepoResult, map_create_err};
use crate::db::models::{User, UserUpsert};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find a user by the identity provider's user id
    pub async fn find_by_userid(&self, userid: &str) -> RepoResult<Option<User>> {
        let userid_owned = userid.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE userid = $userid LIMIT 1")
            .bind(("userid", userid_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create or refresh a user record.
    ///
    /// Get-then-branch: update when the userid exists, insert otherwise.
    /// The branches are not atomic; when two first-time sign-ins race, the
    /// unique index rejects the losing insert and the error is returned to
    /// the caller as [`RepoError::Duplicate`].
    pub async fn upsert(&self, data: UserUpsert) -> RepoResult<User> {
        if self.find_by_userid(&data.userid).await?.is_some() {
            self.refresh(data).await
        } else {
            self.insert(data).await
        }
    }

    async fn refresh(&self, data: UserUpsert) -> RepoResult<User> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE user SET
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    access_token = $access_token,
                    avatar = $avatar
                WHERE userid = $userid
                RETURN AFTER"#,
            )
            .bind(("userid", data.userid))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("email", data.email))
            .bind(("access_token", data.access_token))
            .bind(("avatar", data.avatar))
            .await?;

        let updated: Vec<User> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to update user".to_string()))
    }

    async fn insert(&self, data: UserUpsert) -> RepoResult<User> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    userid = $userid,
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    access_token = $access_token,
                    avatar = $avatar
                RETURN AFTER"#,
            )
            .bind(("userid", data.userid))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("email", data.email))
            .bind(("access_token", data.access_token))
            .bind(("avatar", data.avatar))
            .await
            .map_err(map_create_err)?;

        let created: Option<User> = result.take(0).map_err(map_create_err)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn sample(userid: &str, email: &str) -> UserUpsert {
        UserUpsert {
            userid: userid.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            access_token: "opaque-token".to_string(),
            avatar: "aGVsbG8=".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let service = DbService::memory().await.unwrap();
        let repo = UserRepository::new(service.db.clone());

        repo.upsert(sample("user-1", "ada@example.com")).await.unwrap();
        let user = repo.find_by_userid("user-1").await.unwrap().unwrap();

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.access_token, "opaque-token");
        assert_eq!(user.avatar, "aGVsbG8=");
    }

    #[tokio::test]
    async fn second_upsert_refreshes_in_place() {
        let service = DbService::memory().await.unwrap();
        let repo = UserRepository::new(service.db.clone());

        repo.upsert(sample("user-1", "old@example.com")).await.unwrap();
        repo.upsert(sample("user-1", "new@example.com")).await.unwrap();

        let user = repo.find_by_userid("user-1").await.unwrap().unwrap();
        assert_eq!(user.email, "new@example.com");

        let mut result = service.db.query("SELECT * FROM user").await.unwrap();
        let all: Vec<User> = result.take(0).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let service = DbService::memory().await.unwrap();
        let repo = UserRepository::new(service.db.clone());

        assert!(repo.find_by_userid("nobody").await.unwrap().is_none());
    }
}
