use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

const MIN_PASSWORD_LENGTH: usize = 8;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        hash(password, DEFAULT_COST).map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    }

    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
        verify(password, password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))
    }

    pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) || !password.chars().any(char::is_alphabetic)
        {
            return Err(AppError::BadRequest(
                "Password must contain letters and digits".to_string(),
            ));
        }
        Ok(())
    }
}
