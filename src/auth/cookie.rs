use axum::http::HeaderValue;
use chrono::{DateTime, Duration, Utc};

use super::IssuedToken;

pub const TOKEN_COOKIE: &str = "token";

/// How long the logout placeholder cookie lives
const LOGOUT_COOKIE_SECONDS: i64 = 10;

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn build(value: &str, expires: DateTime<Utc>, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Expires={}; HttpOnly",
        TOKEN_COOKIE,
        value,
        http_date(expires)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// `Set-Cookie` value carrying the session token, expiring with it
pub fn session_cookie(issued: &IssuedToken, secure: bool) -> Option<HeaderValue> {
    build(&issued.token, issued.expires_at, secure)
}

/// `Set-Cookie` value that overwrites the session token on logout
pub fn logout_cookie(now: DateTime<Utc>) -> Option<HeaderValue> {
    build("none", now + Duration::seconds(LOGOUT_COOKIE_SECONDS), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn session_cookie_is_http_only_and_expires_with_token() {
        let issued = IssuedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 11, 14, 8, 30, 0).unwrap(),
        };

        let cookie = session_cookie(&issued, false).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "token=abc.def.ghi; Path=/; Expires=Sat, 14 Nov 2026 08:30:00 GMT; HttpOnly"
        );

        let secure = session_cookie(&issued, true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; HttpOnly; Secure"));
    }

    #[test]
    fn logout_cookie_replaces_token_briefly() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let cookie = logout_cookie(now).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "token=none; Path=/; Expires=Thu, 01 Jan 2026 00:00:10 GMT; HttpOnly"
        );
    }
}
