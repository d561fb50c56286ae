use anyhow::{Context, Result, anyhow};
use std::time::Duration;

pub const DEFAULT_ACCOUNT_CREATE_PATH: &str = "/api/public/users";
pub const DEFAULT_POSTAL_LOOKUP_URL: &str = "https://viacep.com.br/ws";
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;
pub const DEFAULT_HOME_ROUTE: &str = "/";

#[derive(Debug, Clone)]
pub struct Config {
    pub account_api_url: String,
    pub account_create_path: String,
    pub postal_lookup_url: String,
    pub redirect_delay: Duration,
    pub home_route: String,
    pub lookup_timeout: Option<Duration>,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests do not have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_api_url = lookup("ACCOUNT_API_URL")
            .context("Missing environment variable: ACCOUNT_API_URL")?;
        let account_api_url = account_api_url.trim_end_matches('/').to_string();
        if account_api_url.is_empty() {
            return Err(anyhow!("ACCOUNT_API_URL must not be empty"));
        }

        let account_create_path = lookup("ACCOUNT_CREATE_PATH")
            .unwrap_or_else(|| DEFAULT_ACCOUNT_CREATE_PATH.to_string());
        if !account_create_path.starts_with('/') {
            return Err(anyhow!(
                "ACCOUNT_CREATE_PATH must start with '/', got '{}'",
                account_create_path
            ));
        }

        let postal_lookup_url = lookup("POSTAL_LOOKUP_URL")
            .unwrap_or_else(|| DEFAULT_POSTAL_LOOKUP_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let redirect_delay_ms = match lookup("REDIRECT_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("REDIRECT_DELAY_MS must be a valid u64 integer")?,
            None => DEFAULT_REDIRECT_DELAY_MS,
        };

        let home_route = lookup("HOME_ROUTE").unwrap_or_else(|| DEFAULT_HOME_ROUTE.to_string());

        let lookup_timeout = lookup("HTTP_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a valid u64 integer")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            account_api_url,
            account_create_path,
            postal_lookup_url,
            redirect_delay: Duration::from_millis(redirect_delay_ms),
            home_route,
            lookup_timeout,
        })
    }

    pub fn account_create_url(&self) -> String {
        format!("{}{}", self.account_api_url, self.account_create_path)
    }
}
