use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Upstream providers
    pub google_api_key: String,
    pub claimbuster_api_key: String,
    pub gnews_api_key: String,

    // Excluded collaborators (auth / document store). The service does not
    // use these itself, but deployment requires them present at startup.
    pub jwt_secret: String,
    pub mongo_uri: String,

    // Web server
    pub host: String,
    pub port: u16,

    // Rate limiting
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,

    // Origin serving the static publisher logos and placeholder
    pub asset_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            google_api_key: required_env("GOOGLE_API_KEY"),
            claimbuster_api_key: required_env("CLAIMBUSTER_API_KEY"),
            gnews_api_key: required_env("GNEWS_API_KEY"),
            jwt_secret: required_env("JWT_SECRET"),
            mongo_uri: required_env("MONGO_URI"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            rate_limit_max: env::var("RATE_LIMIT_MAX")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .expect("RATE_LIMIT_MAX must be a number"),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("RATE_LIMIT_WINDOW_SECS must be a number"),
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| "https://factlens.app".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
