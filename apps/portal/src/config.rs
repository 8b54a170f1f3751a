use anyhow::{Context, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client configuration loaded from environment variables.
/// Fails at startup if the backend origin is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend origin, without a trailing slash.
    pub backend_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Raw `Cookie` header value attached to every request, if set.
    pub session_cookie: Option<String>,
    pub rust_log: String,
}

impl Config {
    /// Loads from the environment, letting command-line values win.
    /// The backend origin is required from one source or the other.
    pub fn from_env_and_args(backend_url: Option<String>, page_size: Option<u32>) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend_url = match backend_url {
            Some(url) => url,
            None => require_env("PORTAL_BACKEND_URL")?,
        };
        let page_size = match page_size {
            Some(size) => size,
            None => parse_env("PORTAL_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
        };

        Ok(Config {
            backend_url: normalize_base_url(&backend_url),
            page_size: page_size.max(1),
            request_timeout_secs: parse_env("PORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            session_cookie: std::env::var("PORTAL_SESSION_COOKIE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {key} value `{value}`")),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {key}")),
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            normalize_base_url(" https://api.example.com/ "),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_args_override_env() {
        let cfg = Config::from_env_and_args(Some("https://portal.test/".to_string()), Some(25))
            .unwrap();
        assert_eq!(cfg.backend_url, "https://portal.test");
        assert_eq!(cfg.page_size, 25);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let cfg = Config::from_env_and_args(Some("http://localhost:4000".to_string()), Some(0))
            .unwrap();
        assert_eq!(cfg.page_size, 1);
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let value: u32 = parse_env("PORTAL_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
