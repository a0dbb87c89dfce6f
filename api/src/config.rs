use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// `development` or `production`
    pub app_env: String,
    /// Include internal error detail in error bodies
    pub expose_error_details: bool,
    /// Create tables and indexes at startup
    pub auto_migrate: bool,
    /// Sustained requests per second per client IP on write routes. 0 disables the limiter.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub default_page_size: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let is_development = app_env.eq_ignore_ascii_case("development");

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            expose_error_details: flag_var("EXPOSE_ERROR_DETAILS", is_development)?,
            auto_migrate: flag_var("AUTO_MIGRATE", true)?,
            rate_limit_per_second: parse_var("RATE_LIMIT_PER_SECOND", 5)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", 10)?,
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", 50)?,
            app_env,
        })
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.rate_limit_per_second > 0
    }

    /// Settings for router tests: no database, no limiter, details hidden
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            port: 0,
            app_env: "test".to_string(),
            expose_error_details: false,
            auto_migrate: false,
            rate_limit_per_second: 0,
            rate_limit_burst: 1,
            default_page_size: 50,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, value)),
        _ => Ok(default),
    }
}

fn flag_var(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => anyhow::bail!("{} must be a boolean, got {}", name, other),
            }
        }
        _ => Ok(default),
    }
}
