pub mod api_key;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Email and password, used by both login and registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// At most 254 characters, `local@domain.tld` shaped.
    #[validate(
        length(max = 254),
        regex(path = "EMAIL_REGEX", message = "Email address is not valid")
    )]
    pub email: String,
    /// At least 7 characters.
    #[validate(length(min = 7))]
    pub password: String,
}

/// Response body for a successful login or registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_credentials_validation() {
        assert!(credentials("test@example.com", "password123").validate().is_ok());
        assert!(credentials("first.last+tag@mail.example.org", "1234567").validate().is_ok());

        assert!(credentials("testexample.com", "password123").validate().is_err());
        assert!(credentials("test@example", "password123").validate().is_err());
        assert!(credentials("test@example.c", "password123").validate().is_err());
        assert!(credentials("test@example.com", "123456").validate().is_err());

        let long_email = format!("{}@example.com", "a".repeat(250));
        assert!(credentials(&long_email, "password123").validate().is_err());
    }

    #[test]
    fn test_credentials_reject_unknown_fields() {
        let parsed = serde_json::from_str::<Credentials>(
            r#"{"email": "a@example.com", "password": "secret12", "admin": true}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_auth_response_shape() {
        let json = serde_json::to_value(AuthResponse::bearer("abc".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "access_token": "abc", "token_type": "bearer" })
        );
    }
}
