use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_DATABASE: &str = "bike-shop";
const DEFAULT_HOST: &str = "cluster0.r3nl2.mongodb.net";

#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// `None` when neither `MONGODB_URI` nor both credentials are set.
    pub uri: Option<Secret<String>>,
    pub database: String,
    /// Exit at startup when the database cannot be reached instead of
    /// serving requests that will fail.
    pub fail_fast: bool,
}

/// Where the connection string comes from.
#[derive(Debug)]
pub enum MongoSource {
    Uri(String),
    Credentials {
        user: Secret<String>,
        password: Secret<String>,
        host: String,
    },
}

impl MongoSource {
    pub fn into_uri(self) -> Secret<String> {
        match self {
            MongoSource::Uri(uri) => Secret::new(uri),
            MongoSource::Credentials {
                user,
                password,
                host,
            } => Secret::new(format!(
                "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                urlencoding::encode(user.expose_secret()),
                urlencoding::encode(password.expose_secret()),
                host
            )),
        }
    }
}

impl MongoConfig {
    /// Resolve the database settings from `lookup`. Missing credentials are
    /// only an error under `fail_fast`; otherwise `uri` stays empty and the
    /// service starts without a database.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fail_fast = parse_flag(lookup("DATABASE_FAIL_FAST").as_deref())?;

        let source = match lookup("MONGODB_URI").filter(|uri| !uri.is_empty()) {
            Some(uri) => Some(MongoSource::Uri(uri)),
            None => match (lookup("DB_USER"), lookup("DB_PASS")) {
                (Some(user), Some(password)) => Some(MongoSource::Credentials {
                    user: Secret::new(user),
                    password: Secret::new(password),
                    host: lookup("MONGODB_HOST")
                        .filter(|host| !host.is_empty())
                        .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                }),
                _ if fail_fast => {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "DB_USER and DB_PASS are required when MONGODB_URI is not set"
                    )))
                }
                _ => None,
            },
        };

        Ok(MongoConfig {
            uri: source.map(MongoSource::into_uri),
            database: lookup("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            fail_fast,
        })
    }
}

impl ShopConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let mut common = core_config::Config::load()?;

        if let Ok(port) = env::var("PORT") {
            common.port = port.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("PORT must be a port number: {}", e))
            })?;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            common.log_level = level;
        }

        Ok(ShopConfig {
            common,
            mongodb: MongoConfig::from_lookup(|key| env::var(key).ok())?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn parse_flag(value: Option<&str>) -> Result<bool, AppError> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_FAIL_FAST must be true or false, got '{}'",
                other
            ))),
        },
    }
}
