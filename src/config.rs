use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Without it, user lists live in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL for caching catalog responses
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Comma-separated list of origins allowed by CORS. Empty allows any.
    #[serde(default)]
    pub allowed_origin: Option<String>,

    /// Users to create in the in-memory store, as comma-separated
    /// `username[:Display Name]` entries. Ignored when a database is configured.
    #[serde(default)]
    pub seed_users: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Origins parsed from `allowed_origin`, trimmed and without blanks
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origin
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    /// `(username, name)` pairs from `seed_users`; the name defaults to the username
    pub fn seed_users(&self) -> Vec<(String, String)> {
        self.seed_users
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|entry| {
                let (username, name) = match entry.split_once(':') {
                    Some((username, name)) => (username.trim(), name.trim()),
                    None => (entry.trim(), entry.trim()),
                };
                if username.is_empty() {
                    return None;
                }
                let name = if name.is_empty() { username } else { name };
                Some((username.to_string(), name.to_string()))
            })
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
