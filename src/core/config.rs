use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb: DynamoDbConfig,
    pub seed: SeedConfig,
}

/// Connection settings for the DynamoDB-compatible table service
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// Endpoint URL (e.g. DynamoDB Local on http://localhost:8000)
    pub endpoint: String,
    /// Region used for AWS Signature v4 signing
    pub region: String,
    /// Access key for AWS Signature v4 signing
    pub access_key: String,
    /// Secret key for AWS Signature v4 signing
    pub secret_key: String,
    /// Delay between DescribeTable polls while waiting for a table
    pub table_wait_interval: Duration,
    /// Number of DescribeTable polls before giving up on a table
    pub table_wait_max_attempts: u32,
    pub request_timeout: Duration,
}

/// Which table layout gets seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// `Report` plus one table per stage, status derived by reconciliation
    Staged,
    /// Single `Report` table with embedded stage comments
    Unified,
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staged" => Ok(SeedMode::Staged),
            "unified" => Ok(SeedMode::Unified),
            other => Err(format!(
                "Invalid SEED_MODE '{}': expected 'staged' or 'unified'",
                other
            )),
        }
    }
}

impl std::fmt::Display for SeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedMode::Staged => write!(f, "staged"),
            SeedMode::Unified => write!(f, "unified"),
        }
    }
}

/// Number of records to generate per stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub report: usize,
    pub ack: usize,
    pub processing: usize,
    pub done: usize,
}

impl SeedCounts {
    /// Defaults for each layout. In the staged layout every count is a subset
    /// of the previous stage; in the unified layout counts are disjoint.
    pub fn defaults_for(mode: SeedMode) -> Self {
        match mode {
            SeedMode::Staged => Self {
                report: 50,
                ack: 40,
                processing: 20,
                done: 10,
            },
            SeedMode::Unified => Self {
                report: 30,
                ack: 20,
                processing: 20,
                done: 20,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub mode: SeedMode,
    pub counts: SeedCounts,
    /// Run the status reconciler after staged seeding
    pub reconcile: bool,
    /// Log the department x status matrix once seeding finishes
    pub summary: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            dynamodb: DynamoDbConfig::from_env()?,
            seed: SeedConfig::from_env()?,
        })
    }
}

impl DynamoDbConfig {
    const DEFAULT_TABLE_WAIT_INTERVAL_MS: u64 = 500;
    const DEFAULT_TABLE_WAIT_MAX_ATTEMPTS: u32 = 25;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let endpoint = normalize_endpoint(
            &env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string()),
        )?;

        // DynamoDB Local rejects unsigned requests but accepts any credentials
        let region = env::var("DYNAMODB_REGION").unwrap_or_else(|_| "ap-southeast-1".to_string());
        let access_key = env::var("DYNAMODB_ACCESS_KEY").unwrap_or_else(|_| "local".to_string());
        let secret_key = env::var("DYNAMODB_SECRET_KEY").unwrap_or_else(|_| "local".to_string());

        let table_wait_interval_ms = env::var("DYNAMODB_TABLE_WAIT_INTERVAL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_TABLE_WAIT_INTERVAL_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "DYNAMODB_TABLE_WAIT_INTERVAL_MS must be a valid number".to_string())?;

        let table_wait_max_attempts = env::var("DYNAMODB_TABLE_WAIT_MAX_ATTEMPTS")
            .unwrap_or_else(|_| Self::DEFAULT_TABLE_WAIT_MAX_ATTEMPTS.to_string())
            .parse::<u32>()
            .map_err(|_| "DYNAMODB_TABLE_WAIT_MAX_ATTEMPTS must be a valid number".to_string())?;

        let request_timeout_secs = env::var("DYNAMODB_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DYNAMODB_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            endpoint,
            region,
            access_key,
            secret_key,
            table_wait_interval: Duration::from_millis(table_wait_interval_ms),
            table_wait_max_attempts,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, String> {
        let mode = env::var("SEED_MODE")
            .map(|s| s.parse::<SeedMode>())
            .unwrap_or(Ok(SeedMode::Staged))?;

        let defaults = SeedCounts::defaults_for(mode);
        let counts = SeedCounts {
            report: count_from_env("SEED_REPORT_COUNT", defaults.report)?,
            ack: count_from_env("SEED_ACK_COUNT", defaults.ack)?,
            processing: count_from_env("SEED_PROCESSING_COUNT", defaults.processing)?,
            done: count_from_env("SEED_DONE_COUNT", defaults.done)?,
        };

        Ok(Self {
            mode,
            counts,
            reconcile: flag_from_env("SEED_RECONCILE", true)?,
            summary: flag_from_env("SEED_SUMMARY", true)?,
        })
    }
}

/// Endpoints must be absolute http(s) URLs; a trailing `/` is dropped
fn normalize_endpoint(value: &str) -> Result<String, String> {
    let endpoint = value.trim().trim_end_matches('/');
    let host = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .ok_or_else(|| format!("DYNAMODB_ENDPOINT '{}' must start with http:// or https://", value))?;
    if host.is_empty() {
        return Err(format!("DYNAMODB_ENDPOINT '{}' has no host", value));
    }
    Ok(endpoint.to_string())
}

fn count_from_env(name: &str, default: usize) -> Result<usize, String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .map_err(|_| format!("{} must be a valid number", name))
}

fn flag_from_env(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).ok_or_else(|| format!("{} must be true or false", name)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
