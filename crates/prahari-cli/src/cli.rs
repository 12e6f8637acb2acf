use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser)]
#[command(
    name = "prahari",
    about = "Prahari: tamper-evident grievance ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the intake and audit HTTP server
    Serve(ServeArgs),
    /// Fetch and print a server's chain verification report
    Verify(VerifyArgs),
    /// Resolve a grievance id through a running server
    Lookup(LookupArgs),
    /// Check remote registry configuration, reachability, and balance
    Diagnose(DiagnoseArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML server config
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides the configured bind address
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub url: String,
}

#[derive(Args)]
pub struct LookupArgs {
    pub id: String,
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub url: String,
}

#[derive(Args)]
pub struct DiagnoseArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["prahari", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.bind.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_with_config_and_bind() {
        let cli = Cli::try_parse_from([
            "prahari",
            "serve",
            "--config",
            "prahari.toml",
            "--bind",
            "0.0.0.0:8080",
        ])
        .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("prahari.toml")));
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_verify_default_url() {
        let cli = Cli::try_parse_from(["prahari", "verify"]).unwrap();
        if let Command::Verify(args) = cli.command {
            assert_eq!(args.url, DEFAULT_SERVER_URL);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_lookup() {
        let cli =
            Cli::try_parse_from(["prahari", "lookup", "123456", "--url", "http://h:1"]).unwrap();
        if let Command::Lookup(args) = cli.command {
            assert_eq!(args.id, "123456");
            assert_eq!(args.url, "http://h:1");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn lookup_requires_id() {
        assert!(Cli::try_parse_from(["prahari", "lookup"]).is_err());
    }

    #[test]
    fn parse_diagnose() {
        let cli = Cli::try_parse_from(["prahari", "diagnose"]).unwrap();
        assert!(matches!(cli.command, Command::Diagnose(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["prahari", "--verbose", "diagnose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["prahari", "verify", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
