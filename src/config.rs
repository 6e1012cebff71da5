//! Configuration for lattice
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Lattice - mental models reference API
#[derive(Parser, Debug, Clone)]
#[command(name = "lattice")]
#[command(about = "Mental models catalog, journal and 30-day challenge API")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8001")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "lattice")]
    pub mongodb_db: String,

    /// Comma-separated list of allowed CORS origins ("*" allows any origin)
    #[arg(long, env = "CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// JSON file replacing the embedded seed content
    #[arg(long, env = "SEED_PATH")]
    pub seed_path: Option<PathBuf>,

    /// Enable development mode (falls back to the in-memory store when MongoDB is unreachable)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (text or json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Args {
    /// Allowed origins, trimmed, empty entries dropped
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cors_origin_list().is_empty() {
            return Err("CORS_ORIGINS must list at least one origin (or \"*\")".to_string());
        }

        if !matches!(self.log_format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(format!(
                "LOG_FORMAT must be \"text\" or \"json\", got \"{}\"",
                self.log_format
            ));
        }

        if self.mongodb_db.trim().is_empty() {
            return Err("MONGODB_DB must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["lattice"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = parse(&[]);
        assert_eq!(args.listen.port(), 8001);
        assert_eq!(args.mongodb_db, "lattice");
        assert_eq!(args.cors_origin_list(), vec!["*".to_string()]);
        assert!(!args.dev_mode);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_cors_origin_list_trims_entries() {
        let args = parse(&["--cors-origins", "https://a.example, https://b.example,,"]);
        assert_eq!(
            args.cors_origin_list(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_validate_rejects_empty_origins() {
        let args = parse(&["--cors-origins", " , "]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let args = parse(&["--log-format", "xml"]);
        assert!(args.validate().is_err());

        let args = parse(&["--log-format", "JSON"]);
        assert!(args.validate().is_ok());
        assert!(args.json_logs());
    }
}
