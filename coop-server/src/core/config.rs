use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/coop/server | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | DISCOVERY_CACHE_TTL_SECS | 300 | Outlet discovery cache lifetime |
/// | DISCOVERY_SAMPLE_LIMIT | 50 | Docs scanned per source during discovery |
/// | REPORT_SAMPLE_LIMIT | 100 | Docs fetched per source per report |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Outlet discovery cache lifetime (seconds)
    pub discovery_cache_ttl_secs: u64,
    /// Recent documents scanned per source during outlet discovery
    pub discovery_sample_limit: usize,
    /// Recent documents fetched per source when building a report
    pub report_sample_limit: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/coop/server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            discovery_cache_ttl_secs: std::env::var("DISCOVERY_CACHE_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            discovery_sample_limit: std::env::var("DISCOVERY_SAMPLE_LIMIT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(50),
            report_sample_limit: std::env::var("REPORT_SAMPLE_LIMIT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(100),
        }
    }

    /// Override the work dir and port, commonly for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Directory holding the embedded database files.
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Ensure the work directory layout exists.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
