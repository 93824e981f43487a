use thiserror::Error;
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("LOKI_ENABLED is true but LOKI_URL is not set")]
    LokiUrlMissing,

    #[error("LOKI_URL '{url}' is invalid: {source}")]
    InvalidLokiUrl { url: String, source: url::ParseError },

    #[error("Loki layer could not be built: {0}")]
    Loki(String),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Where log events go besides stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum LogSink {
    Console,
    Loki(Url),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    /// One line per event, without span context. `LOG_FORMAT=compact`.
    Compact,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub sink: LogSink,
    pub format: LogFormat,
    pub filter: String,
    pub service_name: String,
    pub environment: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let loki_enabled = lookup("LOKI_ENABLED")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let sink = if loki_enabled {
            let raw = lookup("LOKI_URL").ok_or(LoggingError::LokiUrlMissing)?;
            let url = Url::parse(&raw)
                .map_err(|source| LoggingError::InvalidLokiUrl { url: raw.clone(), source })?;
            LogSink::Loki(url)
        } else {
            LogSink::Console
        };

        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Full,
        };

        Ok(Self {
            sink,
            format,
            filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "doc-visualizer".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let (full, compact) = match config.format {
        LogFormat::Full => (Some(fmt::layer()), None),
        LogFormat::Compact => (None, Some(fmt::layer().compact())),
    };

    #[cfg(feature = "loki")]
    let loki = match &config.sink {
        LogSink::Loki(url) => Some(loki_layer(&config, url.clone())?),
        LogSink::Console => None,
    };
    #[cfg(not(feature = "loki"))]
    let loki: Option<tracing_subscriber::layer::Identity> = None;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(full)
        .with(compact)
        .with(loki)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    match &config.sink {
        LogSink::Loki(url) if cfg!(feature = "loki") => {
            tracing::info!("✅ Loki logging initialized at {} for {}", url, config.service_name)
        }
        LogSink::Loki(_) => {
            tracing::warn!("LOKI_ENABLED is set but the binary was built without the loki feature")
        }
        LogSink::Console => {
            tracing::info!("📊 Console logging initialized for {}", config.service_name)
        }
    }
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(config: &LoggingConfig, url: Url) -> Result<tracing_loki::Layer, LoggingError> {
    let loki_err = |e: tracing_loki::Error| LoggingError::Loki(e.to_string());

    let (layer, task) = tracing_loki::builder()
        .label("service", config.service_name.as_str())
        .map_err(loki_err)?
        .label("environment", config.environment.as_str())
        .map_err(loki_err)?
        .build_url(url)
        .map_err(loki_err)?;

    // Ships buffered log lines to Loki for the life of the process
    tokio::spawn(task);
    Ok(layer)
}
