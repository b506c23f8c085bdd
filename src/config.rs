use clap::Parser;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DIR_TO_MONITOR_ENV: &str = "DIR_TO_MONITOR";
pub const PATTERNS_TO_MONITOR_ENV: &str = "PATTERNS_TO_MONITOR";
pub const S3_BUCKET_ENV: &str = "S3_BUCKET";
pub const S3_ENDPOINT_URL_ENV: &str = "S3_ENDPOINT_URL";
pub const S3_FORCE_PATH_STYLE_ENV: &str = "S3_FORCE_PATH_STYLE";

#[derive(Parser, Debug)]
#[command(name = "camsync")]
#[command(about = "Watches a directory for camera recordings and uploads them to S3")]
pub struct Args {
    #[arg(short, long, help = "Directory to watch (overrides DIR_TO_MONITOR)")]
    pub directory: Option<PathBuf>,

    #[arg(short, long, help = "Comma-separated glob patterns (overrides PATTERNS_TO_MONITOR)")]
    pub patterns: Option<String>,

    #[arg(short, long, help = "Destination S3 bucket (overrides S3_BUCKET)")]
    pub bucket: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable \"{0}\" is not set")]
    MissingVar(&'static str),

    #[error("path \"{}\" defined by environment variable \"{var}\" does not exist", .path.display())]
    PathNotFound { var: &'static str, path: PathBuf },

    #[error("path \"{}\" defined by environment variable \"{var}\" is not a directory", .path.display())]
    NotADirectory { var: &'static str, path: PathBuf },

    #[error("environment variable \"{0}\" must contain at least one non-empty glob pattern")]
    EmptyPattern(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub watch_dir: PathBuf,
    pub patterns: Vec<String>,
    pub bucket: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl Config {
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        let directory = args
            .directory
            .map(|p| p.to_string_lossy().into_owned())
            .or_else(|| env::var(DIR_TO_MONITOR_ENV).ok());
        let patterns = args
            .patterns
            .or_else(|| env::var(PATTERNS_TO_MONITOR_ENV).ok());
        let bucket = args.bucket.or_else(|| env::var(S3_BUCKET_ENV).ok());

        let mut config = Self::from_values(directory, patterns, bucket)?;

        config.endpoint_url = env::var(S3_ENDPOINT_URL_ENV).ok();
        config.force_path_style = env::var(S3_FORCE_PATH_STYLE_ENV)
            .map(|v| matches!(v.as_str(), "true" | "1"))
            .unwrap_or(false);

        Ok(config)
    }

    /// Checks run in a fixed order: directory, then patterns, then
    /// bucket. The first failing check is the one reported.
    pub fn from_values(
        directory: Option<String>,
        patterns: Option<String>,
        bucket: Option<String>,
    ) -> Result<Self, ConfigError> {
        let directory = directory.ok_or(ConfigError::MissingVar(DIR_TO_MONITOR_ENV))?;
        let watch_dir = PathBuf::from(directory);

        if !watch_dir.exists() {
            return Err(ConfigError::PathNotFound {
                var: DIR_TO_MONITOR_ENV,
                path: watch_dir,
            });
        }

        if !watch_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                var: DIR_TO_MONITOR_ENV,
                path: watch_dir,
            });
        }

        let patterns = patterns.ok_or(ConfigError::MissingVar(PATTERNS_TO_MONITOR_ENV))?;
        let patterns: Vec<String> = patterns.split(',').map(|p| p.trim().to_string()).collect();

        if patterns.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::EmptyPattern(PATTERNS_TO_MONITOR_ENV));
        }

        let bucket = bucket.ok_or(ConfigError::MissingVar(S3_BUCKET_ENV))?;

        Ok(Self {
            watch_dir,
            patterns,
            bucket,
            endpoint_url: None,
            force_path_style: false,
        })
    }
}
