//! Minimal cookie handling for the session and profile cookies.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// Attributes for a `Set-Cookie` header.
#[derive(Debug, Clone, Copy)]
pub struct CookieAttrs {
    /// `Max-Age` in seconds; `0` expires the cookie immediately.
    pub max_age_secs: i64,
    /// Adds the `Secure` attribute.
    pub secure: bool,
}

/// Returns the value of the first cookie called `name`.
#[must_use]
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// Formats a `Set-Cookie` value scoped to the whole site.
#[must_use]
pub fn format_set_cookie(name: &str, value: &str, attrs: CookieAttrs) -> String {
    let mut cookie = format!(
        "{name}={value}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        attrs.max_age_secs
    );
    if attrs.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Appends a `Set-Cookie` header. Values that are not valid header text are
/// dropped with a warning.
pub fn append(headers: &mut HeaderMap, name: &str, value: &str, attrs: CookieAttrs) {
    match HeaderValue::try_from(format_set_cookie(name, value, attrs)) {
        Ok(header) => {
            headers.append(SET_COOKIE, header);
        }
        Err(e) => tracing::warn!(cookie = name, error = %e, "refusing to set malformed cookie"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(lines: &[&'static str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for line in lines {
            map.append(COOKIE, HeaderValue::from_static(line));
        }
        map
    }

    #[test]
    fn reads_named_cookie_among_many() {
        let map = headers(&["a=1; rota_session=abc ; b=2"]);
        assert_eq!(read(&map, "rota_session").as_deref(), Some("abc"));
        assert_eq!(read(&map, "missing"), None);
    }

    #[test]
    fn reads_across_multiple_headers() {
        let map = headers(&["a=1", "rota_profile=\"p-1\""]);
        assert_eq!(read(&map, "rota_profile").as_deref(), Some("p-1"));
    }

    #[test]
    fn prefix_names_do_not_match() {
        let map = headers(&["rota_session_old=x"]);
        assert_eq!(read(&map, "rota_session"), None);
    }

    #[test]
    fn set_cookie_attributes() {
        let value = format_set_cookie(
            "rota_session",
            "v",
            CookieAttrs {
                max_age_secs: 60,
                secure: true,
            },
        );
        assert_eq!(
            value,
            "rota_session=v; Path=/; Max-Age=60; HttpOnly; SameSite=Lax; Secure"
        );
    }
}
