use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::schemas::user::UserResponse;

// Required fields stay Option here so the handlers can answer with the
// API's own Spanish messages instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    pub(crate) first_name: Option<String>,
    #[serde(default)]
    pub(crate) last_name: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    pub(crate) document_type: Option<String>,
    #[serde(default)]
    pub(crate) document_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub(crate) birth_date: Option<Date>,
    #[serde(default)]
    pub(crate) institution: Option<String>,
    #[serde(default)]
    pub(crate) grade: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangePasswordRequest {
    #[serde(default)]
    pub(crate) current_password: Option<String>,
    #[serde(default)]
    pub(crate) new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponse {
    pub(crate) message: String,
    pub(crate) user: UserResponse,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

fn deserialize_option_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.is_empty() => {
            Date::parse(&value, &format_description!("[year]-[month]-[day]"))
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid date: {value}")))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_plain_date() {
        let body: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "ana@example.com",
            "password": "Password1",
            "first_name": "Ana",
            "last_name": "Diaz",
            "role": "estudiante",
            "birth_date": "2007-04-12"
        }))
        .unwrap();
        assert_eq!(
            body.birth_date,
            Some(Date::from_calendar_date(2007, time::Month::April, 12).unwrap())
        );
    }

    #[test]
    fn register_rejects_malformed_date() {
        let result = serde_json::from_value::<RegisterRequest>(serde_json::json!({
            "birth_date": "12/04/2007"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn empty_birth_date_is_none() {
        let body: RegisterRequest =
            serde_json::from_value(serde_json::json!({ "birth_date": "" })).unwrap();
        assert!(body.birth_date.is_none());
    }
}
