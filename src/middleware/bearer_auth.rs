/*
 * Responsibility
 * - Authorization ヘッダから bearer credential を取り出すだけ (検証はしない)
 * - ヘッダ無し / 空 は None。未認証として扱うかどうかは gateway が決める
 */
use axum::http::{HeaderMap, header};

const BEARER: &str = "bearer ";

/// `Authorization: Bearer <credential>` -> `Some(credential)`.
///
/// The `Bearer ` prefix is optional and matched case-insensitively; a bare
/// value is returned as-is. Non-ASCII header values count as absent.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    let credential = match value.get(..BEARER.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER) => value[BEARER.len()..].trim(),
        _ if value.eq_ignore_ascii_case(BEARER.trim_end()) => "",
        _ => value,
    };

    if credential.is_empty() {
        None
    } else {
        Some(credential)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(bearer_credential(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_credential(&headers("bearer   tok")), Some("tok"));
    }

    #[test]
    fn bare_value_is_used_as_is() {
        assert_eq!(bearer_credential(&headers("raw-token")), Some("raw-token"));
    }

    #[test]
    fn absent_or_empty_is_none() {
        assert_eq!(bearer_credential(&HeaderMap::new()), None);
        assert_eq!(bearer_credential(&headers("")), None);
        assert_eq!(bearer_credential(&headers("Bearer ")), None);
        assert_eq!(bearer_credential(&headers("Bearer")), None);
        assert_eq!(bearer_credential(&headers("   ")), None);
    }

    #[test]
    fn non_ascii_header_is_none() {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(bearer_credential(&map), None);
    }
}
