use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SITE_DIR: &str = "site";
pub const DEFAULT_CHAMPIONS_SOURCE: &str = "site/data/champions.json";
pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Where the champions document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChampionsSource {
    Url(String),
    File(String),
}

impl ChampionsSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.to_owned())
        } else {
            Self::File(raw.to_owned())
        }
    }

    pub fn describe(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::File(path) => path,
        }
    }
}

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn site_dir() -> String {
    std::env::var("SITE_DIR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_SITE_DIR.to_owned())
}

pub fn champions_source() -> ChampionsSource {
    let raw = std::env::var("CHAMPIONS_SOURCE")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CHAMPIONS_SOURCE.to_owned());
    ChampionsSource::parse(&raw)
}

/// `None` means load once at startup.
pub fn champions_refresh_interval() -> Option<Duration> {
    std::env::var("CHAMPIONS_REFRESH_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn source_detects_urls_case_insensitively() {
        assert_eq!(
            ChampionsSource::parse("HTTPS://example.com/champions.json"),
            ChampionsSource::Url("HTTPS://example.com/champions.json".to_owned())
        );
        assert_eq!(
            ChampionsSource::parse(" data/champions.json "),
            ChampionsSource::File("data/champions.json".to_owned())
        );
    }

    #[test]
    fn defaults_apply_when_env_is_unset() {
        temp_env::with_vars_unset(
            [
                "SERVER_PORT",
                "SITE_DIR",
                "CHAMPIONS_SOURCE",
                "CHAMPIONS_REFRESH_SECS",
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(site_dir(), DEFAULT_SITE_DIR);
                assert_eq!(
                    champions_source(),
                    ChampionsSource::File(DEFAULT_CHAMPIONS_SOURCE.to_owned())
                );
                assert_eq!(champions_refresh_interval(), None);
            },
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("not-a-port")),
                ("CHAMPIONS_REFRESH_SECS", Some("0")),
                ("UPSTREAM_HTTP_TIMEOUT_SECS", Some("-4")),
                ("SITE_DIR", Some("   ")),
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(champions_refresh_interval(), None);
                assert_eq!(
                    upstream_http_timeout(),
                    Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS)
                );
                assert_eq!(site_dir(), DEFAULT_SITE_DIR);
            },
        );
    }

    #[test]
    fn configured_values_are_used() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("8088")),
                ("CHAMPIONS_REFRESH_SECS", Some("900")),
                ("CHAMPIONS_SOURCE", Some("https://league.example/champions.json")),
            ],
            || {
                assert_eq!(server_port(), 8088);
                assert_eq!(
                    champions_refresh_interval(),
                    Some(Duration::from_secs(900))
                );
                assert!(matches!(champions_source(), ChampionsSource::Url(_)));
            },
        );
    }
}
