use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Usernames are ASCII letters, digits, `.`, `_` and `-`.
pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid = !username.is_empty()
        && username.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid username format".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("jane.doe-2").is_ok());
        assert!(validate_username("jane doe").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_password_len("12345678").is_ok());
        assert!(validate_password_len("ąčęėįšųū").is_ok());
        assert!(validate_password_len("short").is_err());
    }
}
