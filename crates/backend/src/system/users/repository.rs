use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, QueryResult, Statement};

const SELECT_USER: &str = "SELECT id, username, email, created_at FROM sys_users";

fn user_from_row(row: &QueryResult) -> Result<User, DbErr> {
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        email: row.try_get("", "email")?,
        created_at: row.try_get("", "created_at")?,
    })
}

/// Сохранить пользователя вместе с хешем пароля
pub async fn save<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    password_hash: &str,
) -> Result<(), DbErr> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, username, email, password_hash, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.username.clone().into(),
            user.email.clone().into(),
            password_hash.to_string().into(),
            user.created_at.clone().into(),
        ],
    ))
    .await?;
    Ok(())
}

/// Get user by ID
pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: &str) -> Result<Option<User>, DbErr> {
    conn.query_one(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &format!("{} WHERE id = ?", SELECT_USER),
        [id.into()],
    ))
    .await?
    .as_ref()
    .map(user_from_row)
    .transpose()
}

/// Get user by username
pub async fn find_by_username<C: ConnectionTrait>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DbErr> {
    conn.query_one(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        &format!("{} WHERE username = ?", SELECT_USER),
        [username.into()],
    ))
    .await?
    .as_ref()
    .map(user_from_row)
    .transpose()
}

pub async fn exists_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) AS cnt FROM sys_users WHERE email = ?",
            [email.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get::<i64>("", "cnt")? > 0),
        None => Ok(false),
    }
}

/// Get password hash for user
pub async fn find_password_hash<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<Option<String>, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    row.map(|r| r.try_get::<String>("", "password_hash"))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    fn user(id: &str, username: &str, email: &str) -> User {
        User {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            created_at: "2026-03-10T08:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn save_and_lookup() {
        let db = test_connection().await;
        let alice = user("u-1", "alice", "alice@example.com");
        save(&db, &alice, "$argon2id$fake").await.unwrap();

        assert_eq!(find_by_id(&db, "u-1").await.unwrap(), Some(alice.clone()));
        assert_eq!(find_by_username(&db, "alice").await.unwrap(), Some(alice));
        assert!(find_by_username(&db, "bob").await.unwrap().is_none());
        assert!(exists_by_email(&db, "alice@example.com").await.unwrap());
        assert!(!exists_by_email(&db, "bob@example.com").await.unwrap());
        assert_eq!(
            find_password_hash(&db, "u-1").await.unwrap().as_deref(),
            Some("$argon2id$fake")
        );
    }

    #[tokio::test]
    async fn email_is_unique() {
        let db = test_connection().await;
        save(&db, &user("u-1", "alice", "shared@example.com"), "h")
            .await
            .unwrap();
        assert!(save(&db, &user("u-2", "bob", "shared@example.com"), "h")
            .await
            .is_err());
    }
}
