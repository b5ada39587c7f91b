//! phpIPAM session token.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Datetime format of `expires` in the login response.
const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Token returned by `POST /user/`.
#[derive(Deserialize, Debug, Clone)]
pub struct Token {
    pub token: String,
    /// Server local time, `TIME_LAYOUT`.
    #[serde(default)]
    pub expires: String,
}

impl Token {
    /// An unparsable expiry counts as expired.
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        match NaiveDateTime::parse_from_str(&self.expires, TIME_LAYOUT) {
            Ok(then) => now >= then,
            Err(_) => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Local::now().naive_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_LAYOUT).unwrap()
    }

    #[test]
    fn test_token_expiry() {
        let token = Token {
            token: "abc".to_string(),
            expires: "2026-10-19 12:00:00".to_string(),
        };
        assert!(!token.is_expired_at(at("2026-10-19 11:59:59")));
        assert!(token.is_expired_at(at("2026-10-19 12:00:00")));
        assert!(token.is_expired_at(at("2027-01-01 00:00:00")));
    }

    #[test]
    fn test_token_without_expiry_is_expired() {
        let token: Token = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert!(token.is_expired());
    }
}
