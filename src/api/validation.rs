use validator::ValidateEmail;

use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Formato de email inválido".to_string()))
    }
}

/// Rules are checked in a fixed order so the first failure wins: length,
/// then uppercase, then digit.
pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres"
        )));
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(ApiError::BadRequest(
            "La contraseña debe contener al menos una mayúscula".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::BadRequest(
            "La contraseña debe contener al menos un número".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), ApiError>) -> String {
        match result.unwrap_err() {
            ApiError::BadRequest(message) => message,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn password_rules_fire_in_order() {
        assert_eq!(
            message(validate_password("Ab1")),
            "La contraseña debe tener al menos 8 caracteres"
        );
        assert_eq!(
            message(validate_password("minusculas1")),
            "La contraseña debe contener al menos una mayúscula"
        );
        assert_eq!(
            message(validate_password("SinNumeros")),
            "La contraseña debe contener al menos un número"
        );
        assert!(validate_password("Aprobada1").is_ok());
    }

    #[test]
    fn email_format_is_checked() {
        assert!(validate_email("estudiante@colegio.edu.co").is_ok());
        assert!(validate_email("sin-arroba").is_err());
        assert!(validate_email("").is_err());
    }
}
