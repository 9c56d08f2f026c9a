use std::path::PathBuf;

use url::Url;

use crate::cli::Cli;
use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub page_size: u32,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ApiError> {
        Ok(Self {
            api_base: normalize_base_url(&cli.api_url)?,
            page_size: cli.page_size.max(1),
            log_file: cli
                .log_file
                .clone()
                .unwrap_or_else(default_log_file),
        })
    }
}

/// The API lives under `/api`; append it when the configured URL omits it.
/// The result always ends with a slash so relative joins stay under it.
pub fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut s = raw.trim().trim_end_matches('/').to_string();
    if !s.ends_with("/api") {
        s.push_str("/api");
    }
    s.push('/');
    Ok(Url::parse(&s)?)
}

pub fn default_log_file() -> PathBuf {
    directories::ProjectDirs::from("", "", "termbank")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
        .join("termbank.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_api_segment() {
        let url = normalize_base_url("http://example.com:9000").unwrap();
        assert_eq!(url.as_str(), "http://example.com:9000/api/");
    }

    #[test]
    fn test_keeps_existing_api_segment() {
        let url = normalize_base_url("http://localhost:8080/api/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(normalize_base_url("not a url").is_err());
    }
}
