use chrono::Utc;
use contracts::system::users::{CreateUserDto, User};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::error::UserError;
use super::repository;
use crate::system::auth::password;

/// Регистрация пользователя.
///
/// Пароль хранится только в виде argon2-хеша и наружу не возвращается.
pub async fn register(db: &DatabaseConnection, dto: CreateUserDto) -> Result<User, UserError> {
    dto.validate().map_err(UserError::Validation)?;

    let username = dto.username.trim().to_string();
    let email = dto.email.trim().to_string();

    let txn = db.begin().await?;

    if repository::exists_by_email(&txn, &email).await? {
        tracing::warn!("Registration rejected: email {} already registered", email);
        return Err(UserError::EmailTaken(email));
    }
    if repository::find_by_username(&txn, &username).await?.is_some() {
        tracing::warn!("Registration rejected: username {} already taken", username);
        return Err(UserError::UsernameTaken(username));
    }

    let password_hash = password::hash_password(&dto.password).map_err(UserError::PasswordHash)?;

    let user = User {
        id: uuid::Uuid::now_v7().to_string(),
        username,
        email,
        created_at: Utc::now().to_rfc3339(),
    };

    repository::save(&txn, &user, &password_hash)
        .await
        .map_err(|e| UserError::from_write(e, &user))?;
    txn.commit().await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<User>, UserError> {
    Ok(repository::find_by_id(db, id).await?)
}

/// Проверка учётных данных. `None`, если пользователь не найден или пароль не подошёл.
///
/// HTTP-маршрута нет: вход и токены в систему не входят.
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password_plain: &str,
) -> Result<Option<User>, UserError> {
    let Some(user) = repository::find_by_username(db, username).await? else {
        return Ok(None);
    };
    let Some(hash) = repository::find_password_hash(db, &user.id).await? else {
        return Ok(None);
    };

    if password::verify_password(password_plain, &hash).map_err(UserError::PasswordHash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
