//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::rate_input::DEFAULT_RATE;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "rate-clock")]
#[command(about = "A stopwatch daemon that turns tracked time and an hourly rate into live earnings")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial hourly rate
    #[arg(short, long, default_value = DEFAULT_RATE)]
    pub rate: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Tracing filter directive for the subscriber
    pub fn log_filter(&self) -> String {
        format!("rate_clock={},tower_http=info", self.log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["rate-clock"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.rate, "25.00");
        assert_eq!(config.log_filter(), "rate_clock=info,tower_http=info");
    }

    #[test]
    fn overrides() {
        let config = Config::try_parse_from(["rate-clock", "-p", "8080", "--rate", "40", "-v"]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate, "40");
        assert_eq!(config.log_level(), "debug");
    }
}
