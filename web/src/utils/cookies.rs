use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

pub const SESSION_COOKIE_NAME: &str = "breezy_session";
pub const SESSION_COOKIE_PATH: &str = "/";

pub fn build_http_only_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    path: &str,
    options: CookieOptions,
) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite={}",
        name,
        value,
        path,
        max_age.as_secs(),
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn build_clear_cookie(name: &str, path: &str, options: CookieOptions) -> String {
    build_http_only_cookie(name, "", Duration::ZERO, path, options)
}

/// Finds `name` in a raw `Cookie` header. Empty values are treated as absent.
pub fn extract_cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() == name {
            Some(value.trim()).filter(|value| !value.is_empty())
        } else {
            None
        }
    })
}

fn same_site_value(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Lax => "Lax",
        SameSite::Strict => "Strict",
        SameSite::None => "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_only_cookie_includes_security_attributes() {
        let opts = CookieOptions {
            secure: true,
            same_site: SameSite::Lax,
        };
        let cookie = build_http_only_cookie(
            SESSION_COOKIE_NAME,
            "abc",
            Duration::from_secs(604_800),
            SESSION_COOKIE_PATH,
            opts,
        );
        assert!(cookie.starts_with("breezy_session=abc;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_sets_max_age_zero() {
        let opts = CookieOptions {
            secure: false,
            same_site: SameSite::Strict,
        };
        let cookie = build_clear_cookie(SESSION_COOKIE_NAME, SESSION_COOKIE_PATH, opts);
        assert!(cookie.starts_with("breezy_session=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn extract_cookie_value_finds_matching_name() {
        let header = "theme=dark; breezy_session=token-value; b=2";
        assert_eq!(
            extract_cookie_value(header, SESSION_COOKIE_NAME),
            Some("token-value")
        );
        assert!(extract_cookie_value(header, "missing").is_none());
    }

    #[test]
    fn extract_cookie_value_ignores_empty_values() {
        assert!(extract_cookie_value("breezy_session=", SESSION_COOKIE_NAME).is_none());
    }

    #[test]
    fn extract_cookie_value_keeps_equals_inside_value() {
        assert_eq!(extract_cookie_value("k=a=b", "k"), Some("a=b"));
    }
}
