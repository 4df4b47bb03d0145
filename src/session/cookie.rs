//! Cookie plumbing: the session token cookie and the one-shot flash cookie
//! that carries an advisory across a redirect.

use axum::http::{header, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "movielog_session";
pub const FLASH_COOKIE: &str = "movielog_flash";

const EPOCH: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Pull one cookie's value out of the request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        if let Some((key, value)) = part.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/"
    ))
    .unwrap()
}

pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}=deleted; Expires={EPOCH}; HttpOnly; SameSite=Lax; Path=/"
    ))
    .unwrap()
}

/// A flash cookie survives exactly one redirect: the next rendered page
/// reads it and sends the clearing header back.
pub fn flash_cookie(message: &str) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{FLASH_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/",
        urlencoding::encode(message)
    ))
    .unwrap()
}

pub fn clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{FLASH_COOKIE}=deleted; Expires={EPOCH}; HttpOnly; SameSite=Lax; Path=/"
    ))
    .unwrap()
}

pub fn flash_value(headers: &HeaderMap) -> Option<String> {
    let raw = cookie_value(headers, FLASH_COOKIE)?;
    if raw == "deleted" {
        return None;
    }
    Some(urlencoding::decode(&raw).ok()?.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn cookie_value_finds_the_named_cookie_among_several() {
        let headers = headers_with_cookie("theme=dark; movielog_session=abc123; lang=en");
        assert_eq!(
            cookie_value(&headers, SESSION_COOKIE),
            Some("abc123".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn flash_roundtrips_spaces_and_punctuation() {
        let cookie = flash_cookie("Welcome back!");
        let pair = cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        let headers = headers_with_cookie(&pair);
        assert_eq!(flash_value(&headers), Some("Welcome back!".to_string()));
    }

    #[test]
    fn a_cleared_flash_reads_as_absent() {
        let cookie = clear_flash_cookie();
        let pair = cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        let headers = headers_with_cookie(&pair);
        assert_eq!(flash_value(&headers), None);
    }
}
