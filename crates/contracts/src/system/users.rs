use serde::{Deserialize, Serialize};

/// Минимальная длина пароля
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username cannot be empty".into());
        }
        if !self.email.contains('@') {
            return Err("Invalid email format".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> CreateUserDto {
        CreateUserDto {
            username: "warehouse".into(),
            email: "warehouse@example.com".into(),
            password: "s3cret-pass".into(),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let mut d = dto();
        d.username = " ".into();
        assert_eq!(d.validate().unwrap_err(), "Username cannot be empty");

        let mut d = dto();
        d.email = "warehouse.example.com".into();
        assert_eq!(d.validate().unwrap_err(), "Invalid email format");

        let mut d = dto();
        d.password = "short".into();
        assert!(d.validate().unwrap_err().contains("at least 8"));
    }
}
