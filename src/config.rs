use std::{env as stdenv, fmt, str::FromStr, time::Duration};

use dotenvy::dotenv;
use log::debug;

use crate::error::{Error, Result};

pub const SANDBOX_URL: &str = "https://api.sandbox.mangopay.com";
pub const PRODUCTION_URL: &str = "https://api.mangopay.com";
pub const DEFAULT_API_VERSION: &str = "v2.01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
    /// Any other base URL, e.g. a local mock server.
    Custom(String),
}

impl Environment {
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
            Environment::Custom(url) => url.trim_end_matches('/'),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "sandbox" => Ok(Environment::Sandbox),
            "production" | "prod" => Ok(Environment::Production),
            lower if lower.starts_with("http://") || lower.starts_with("https://") => {
                url::Url::parse(trimmed)?;
                Ok(Environment::Custom(trimmed.to_string()))
            }
            other => Err(Error::Config(format!("unknown MangoPay environment {:?}", other))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub client_id: String,
    pub passphrase: String,
    pub environment: Environment,
    pub api_version: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(
        client_id: impl Into<String>,
        passphrase: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Config {
            client_id: client_id.into(),
            passphrase: passphrase.into(),
            environment,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `MANGOPAY_*` variables, after loading `.env` when present.
    pub fn from_env() -> Result<Self> {
        if dotenv().is_ok() {
            debug!(".env loaded");
        }
        let client_id = required_var("MANGOPAY_CLIENT_ID")?;
        let passphrase = required_var("MANGOPAY_PASSPHRASE")?;
        let environment = match stdenv::var("MANGOPAY_ENV") {
            Ok(val) => val.parse()?,
            Err(_) => Environment::default(),
        };
        let mut config = Config::new(client_id, passphrase, environment);
        if let Ok(version) = stdenv::var("MANGOPAY_API_VERSION") {
            config.api_version = version;
        }
        if let Ok(secs) = stdenv::var("MANGOPAY_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("MANGOPAY_TIMEOUT_SECS is not a number: {:?}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.environment = Environment::Custom(url.into());
        self
    }

    /// Prefix of every endpoint: `{base}/{version}/{client_id}`.
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}/{}",
            self.environment.base_url(),
            self.api_version,
            self.client_id
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("passphrase", &"***")
            .field("environment", &self.environment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required_var(key: &str) -> Result<String> {
    match stdenv::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(Error::Config(format!("{} not set in environment or .env", key))),
    }
}
