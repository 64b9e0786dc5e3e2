/// Order desk configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SUPABASE_URL | http://localhost:54321 | Backend base URL (REST, storage, auth) |
/// | SUPABASE_ANON_KEY | (empty) | Public API key sent with every request |
/// | IMAGE_BUCKET | food-images | Storage bucket for food and side images |
/// | LOG_LEVEL | info | Default log level |
/// | LOG_DIR | (unset) | Write logs to a daily rolling file in this directory |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (milliseconds) |
/// | ENVIRONMENT | development | Runtime environment |
///
/// Values are read after `.env` is loaded, see [`crate::setup_environment`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub backend_url: String,
    /// Public API key
    pub api_key: String,
    /// Bucket uploaded images land in
    pub image_bucket: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            backend_url: std::env::var("SUPABASE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into())
                .trim_end_matches('/')
                .to_string(),
            api_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            image_bucket: std::env::var("IMAGE_BUCKET").unwrap_or_else(|_| "food-images".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Configuration pointing at a specific backend
    ///
    /// Common in tests
    pub fn with_backend(backend_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.backend_url = backend_url.into().trim_end_matches('/').to_string();
        config.api_key = api_key.into();
        config
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
