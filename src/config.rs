use std::net::SocketAddr;

use url::Url;

/// 25 MiB, enough for a typical annual report.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Raw `BACKEND_API_URL`. Absence is reported per request, not at startup.
    pub backend_api_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub cors_allow_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_api_url: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_allow_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_api_url: std::env::var("BACKEND_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.backend_url()?;
        self.bind_addr()?;
        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Parsed backend base URL, `None` when unset.
    pub fn backend_url(&self) -> Result<Option<Url>, String> {
        self.backend_api_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|e| format!("BACKEND_API_URL '{}' is invalid: {}", raw, e))
            })
            .transpose()
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid HOST/PORT {}:{}: {}", self.host, self.port, e))
    }
}
