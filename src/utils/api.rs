use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.strem.io/api/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the collection API lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        ApiConfig {
            base_url: normalize_base_url(&base_url.into()),
            timeout,
        }
    }

    pub fn from_env() -> Self {
        ApiConfig::new(get_stremio_api_base_url(), get_request_timeout())
    }

    pub fn endpoint(&self, method: &str) -> String {
        format!("{}{}", self.base_url, method)
    }
}

pub fn get_stremio_api_base_url() -> String {
    std::env::var("STREMIO_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

pub fn get_request_timeout() -> Duration {
    let secs = std::env::var("ADDON_MANAGER_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_under_base_path() {
        let cfg = ApiConfig::new("https://api.strem.io/api", Duration::from_secs(5));
        assert_eq!(cfg.base_url, "https://api.strem.io/api/");
        assert_eq!(
            cfg.endpoint("addonCollectionGet"),
            "https://api.strem.io/api/addonCollectionGet"
        );
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let cfg = ApiConfig::new(" http://127.0.0.1:1234/ ", Duration::from_secs(5));
        assert_eq!(cfg.endpoint("x"), "http://127.0.0.1:1234/x");
    }
}
