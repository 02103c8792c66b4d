//! 会话 Cookie 约定
//!
//! 会话令牌通过 HttpOnly Cookie 下发：`SameSite=Lax`，作用域 `/`。
//! 登出时下发同名空值、Max-Age 0 的 Cookie 由客户端清除。

use axum_extra::extract::cookie::{Cookie, SameSite};

/// 会话 Cookie 名称
pub const SESSION_COOKIE: &str = "sarv-session";

/// Build the session cookie carrying a freshly issued token.
pub fn session_cookie(token: String, max_age_minutes: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::minutes(max_age_minutes))
        .build()
}

/// Build the already-expired cookie that clears the session client-side.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let cookie = session_cookie("token-value".to_string(), 1440);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(1440)));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
