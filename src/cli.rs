use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "termbank", version, about = "Terminal client for a remote question bank")]
pub struct Cli {
    /// Base URL of the question-bank API
    #[arg(long, env = "TERMBANK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Questions per page in the browser
    #[arg(long, default_value_t = crate::config::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Log in as this user on startup
    #[arg(long, env = "TERMBANK_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, env = "TERMBANK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print the saved progress of --user without entering the TUI
    #[arg(long, requires = "user")]
    pub status: bool,

    /// Bulk-import a JSON array of questions (admin --user required)
    #[arg(long, value_name = "path", requires = "user")]
    pub import: Option<PathBuf>,

    /// Log file [default: <cache dir>/termbank.log]
    #[arg(long, value_name = "path")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
