// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
//
// Two subcommands:
//   codeunbox serve                    run the HTTP API
//   codeunbox analyze <repo-url>       analyze one repository and print it
//
// Every option can also be set through a CODEUNBOX_* environment variable,
// which is how the server is usually configured when deployed.
// =============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::github::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "codeunbox",
    version,
    about = "Inspect a public GitHub repository and suggest how to preview it",
    long_about = "codeunbox reads a public GitHub repository through the GitHub REST API, \
                  detects its framework and language, lists the environment variables it \
                  expects and suggests an external service to preview it."
)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "CODEUNBOX_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    ///
    /// Example: codeunbox serve --port 8787
    Serve {
        /// Address to bind
        #[arg(long, env = "CODEUNBOX_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,

        /// Port to listen on
        #[arg(long, env = "CODEUNBOX_PORT", default_value_t = 8787)]
        port: u16,

        #[command(flatten)]
        github: GitHubArgs,
    },

    /// Analyze a single repository and print the result
    ///
    /// Example: codeunbox analyze https://github.com/vercel/next.js
    Analyze {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        /// Output the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        github: GitHubArgs,
    },
}

/// Options shared by every command that talks to GitHub
#[derive(Args, Debug, Clone)]
pub struct GitHubArgs {
    /// Base URL of the GitHub REST API
    #[arg(long, env = "CODEUNBOX_GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: Url,

    /// Timeout for each GitHub request, in seconds
    #[arg(long, env = "CODEUNBOX_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl GitHubArgs {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.github_api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

pub fn listen_addr(host: IpAddr, port: u16) -> SocketAddr {
    SocketAddr::new(host, port)
}
