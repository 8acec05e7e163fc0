use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

impl AppEnvironment {
    /// Reads `APP_ENV`, defaulting to development.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))
    }
}

/// Which implementation backs the document and blob stores.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firebase,
    Memory,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub admin_email: String,

    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default)]
    pub firebase_project_id: Option<String>,

    #[serde(default)]
    pub storage_bucket: String,

    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Site".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_backend() -> StoreBackend {
    StoreBackend::Firebase
}
fn default_credentials_path() -> PathBuf {
    PathBuf::from("firebase-config.json")
}
fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_max_upload_mb() -> usize {
    10
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let env_name = AppEnvironment::from_env()?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Accept the unprefixed names used by existing deployments
        config.admin_email = fill_or_env(config.admin_email, "ADMIN_EMAIL");
        config.storage_bucket = fill_or_env(config.storage_bucket, "FIREBASE_STORAGE_BUCKET");
        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.admin_email.trim().is_empty() {
            errors.push("ADMIN_EMAIL cannot be empty");
        }
        if self.backend == StoreBackend::Firebase && self.storage_bucket.trim().is_empty() {
            errors.push("STORAGE_BUCKET must be set for the firebase backend");
        }
        if self.backend == StoreBackend::Memory && self.firebase_project_id.is_none() {
            errors.push("FIREBASE_PROJECT_ID must be set for the memory backend");
        }
        if self.max_upload_mb == 0 {
            errors.push("MAX_UPLOAD_MB must be greater than zero");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_key: &str) -> String {
    if current.trim().is_empty() {
        env::var(env_key).unwrap_or_default()
    } else {
        current
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("admin_email", &self.admin_email)
            .field("backend", &self.backend)
            .field("credentials_path", &self.credentials_path)
            .field("firebase_project_id", &self.firebase_project_id)
            .field("storage_bucket", &self.storage_bucket)
            .field("public_dir", &self.public_dir)
            .field("max_upload_mb", &self.max_upload_mb)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}
