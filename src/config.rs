//! Command line configuration
//!
//! Every option can also be given through a `MEDIUMCHAT_*` environment variable.

use clap::Parser;

/// Default listen address (all interfaces, port 4242)
pub const DEFAULT_ADDR: &str = "0.0.0.0:4242";

/// Line-oriented TCP chat relay
#[derive(Debug, Clone, Parser)]
#[command(name = "mediumchat")]
#[command(version)]
#[command(about = "Line-oriented TCP chat relay")]
pub struct Config {
    /// Address to listen on (host:port)
    #[arg(short, long, env = "MEDIUMCHAT_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Refuse connections beyond this many clients
    #[arg(long, env = "MEDIUMCHAT_MAX_CLIENTS")]
    pub max_clients: Option<usize>,

    /// Do not relay stdin lines as system messages
    #[arg(long)]
    pub no_console: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["mediumchat"]).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.max_clients, None);
        assert!(!config.no_console);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "mediumchat",
            "--addr",
            "127.0.0.1:9000",
            "--max-clients",
            "10",
            "--no-console",
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.max_clients, Some(10));
        assert!(config.no_console);
    }

    #[test]
    fn test_rejects_bad_limit() {
        assert!(Config::try_parse_from(["mediumchat", "--max-clients", "many"]).is_err());
    }
}
