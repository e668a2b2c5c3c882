use contracts::system::users::User;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("{0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl UserError {
    /// Нарушение UNIQUE при вставке: параллельная регистрация заняла email или имя
    pub fn from_write(err: DbErr, user: &User) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => {
                if message.contains("email") {
                    UserError::EmailTaken(user.email.clone())
                } else {
                    UserError::UsernameTaken(user.username.clone())
                }
            }
            _ => UserError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use crate::system::users::repository;

    fn user(id: &str, username: &str, email: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            created_at: "2026-03-10T08:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn unique_violations_map_to_conflicts() {
        let db = test_connection().await;
        repository::save(&db, &user("u-1", "alice", "alice@example.com"), "h")
            .await
            .unwrap();

        let same_email = user("u-2", "bob", "alice@example.com");
        let err = repository::save(&db, &same_email, "h").await.unwrap_err();
        assert!(matches!(
            UserError::from_write(err, &same_email),
            UserError::EmailTaken(ref email) if email == "alice@example.com"
        ));

        let same_name = user("u-3", "alice", "other@example.com");
        let err = repository::save(&db, &same_name, "h").await.unwrap_err();
        assert!(matches!(
            UserError::from_write(err, &same_name),
            UserError::UsernameTaken(ref name) if name == "alice"
        ));
    }

    #[test]
    fn other_errors_stay_database_errors() {
        let err = UserError::from_write(
            DbErr::Custom("disk full".into()),
            &user("u-1", "alice", "alice@example.com"),
        );
        assert!(matches!(err, UserError::Database(_)));
    }
}
