/// Client-side configuration.
pub struct Config {
    pub websocket_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            websocket_url: std::env::var("WEBSOCKET_URL")
                .unwrap_or_else(|_| "ws://127.0.0.1:3001/game".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Relay configuration. Defaults follow the original deployment: port 3001,
/// browser origin `http://localhost:5173`.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("MARSLINK_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3001);

        let allowed_origins = match std::env::var("MARSLINK_ALLOWED_ORIGINS") {
            Ok(value) => parse_origins(&value),
            Err(_) => vec!["http://localhost:5173".to_string()],
        };

        Self {
            port,
            allowed_origins,
        }
    }

    /// Browser requests carry an `Origin` header and must match the
    /// allow-list (an empty list allows any). Requests without an `Origin`
    /// header are not browser cross-origin requests and pass through.
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => {
                self.allowed_origins.is_empty()
                    || self.allowed_origins.iter().any(|allowed| allowed == origin)
            }
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_origins() {
        let origins = parse_origins("http://localhost:5173, https://game.example.org ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://game.example.org".to_string()
            ]
        );
    }

    #[test]
    fn origin_check_honors_the_allow_list() {
        let config = RelayConfig {
            port: 3001,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        };

        assert!(config.origin_allowed(Some("http://localhost:5173")));
        assert!(!config.origin_allowed(Some("http://evil.example.org")));
        assert!(config.origin_allowed(None));
    }

    #[test]
    fn empty_allow_list_allows_any_origin() {
        let config = RelayConfig {
            port: 3001,
            allowed_origins: Vec::new(),
        };
        assert!(config.origin_allowed(Some("http://anywhere.example.org")));
    }
}
