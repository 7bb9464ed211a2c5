//! CLI entry point for kommo-bridge.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::BridgeConfig;
use crate::error::Result;

/// Kommo OAuth bridge
#[derive(Parser, Debug)]
#[command(name = "kommo-bridge", version, about = "Kommo CRM OAuth bridge")]
pub struct Cli {
    /// TOML config file (defaults to KOMMO_* environment variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the products table of a deal
    Products(ProductsArgs),
    /// Create the service user in an account
    AddUser(AddUserArgs),
    /// List stored account tokens
    Tokens,
}

/// Arguments for `kommo-bridge serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for `kommo-bridge products`.
#[derive(Parser, Debug)]
pub struct ProductsArgs {
    /// Account name the token is stored under
    #[arg(short, long)]
    pub name: String,

    /// Deal (lead) id
    #[arg(short, long)]
    pub lead: u64,
}

/// Arguments for `kommo-bridge add-user`.
#[derive(Parser, Debug)]
pub struct AddUserArgs {
    /// Account name the token is stored under
    #[arg(short, long)]
    pub name: String,
}

impl Cli {
    /// Resolve the configuration from `--config` or the environment.
    pub fn load_config(&self) -> Result<BridgeConfig> {
        match &self.config {
            Some(path) => BridgeConfig::from_file(path),
            None => BridgeConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["kommo-bridge", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("expected Serve, got {other:?}"),
        }
    }

    #[test]
    fn parse_products() {
        let cli = Cli::try_parse_from([
            "kommo-bridge",
            "products",
            "--name",
            "acme",
            "--lead",
            "42",
        ])
        .unwrap();
        match cli.command {
            Commands::Products(args) => {
                assert_eq!(args.name, "acme");
                assert_eq!(args.lead, 42);
            }
            other => panic!("expected Products, got {other:?}"),
        }
    }

    #[test]
    fn parse_add_user_with_global_config() {
        let cli = Cli::try_parse_from([
            "kommo-bridge",
            "add-user",
            "-n",
            "acme",
            "--config",
            "bridge.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("bridge.toml")));
        assert!(matches!(cli.command, Commands::AddUser(ref args) if args.name == "acme"));
    }

    #[test]
    fn parse_tokens() {
        let cli = Cli::try_parse_from(["kommo-bridge", "tokens"]).unwrap();
        assert!(matches!(cli.command, Commands::Tokens));
    }

    #[test]
    fn non_numeric_lead_is_error() {
        assert!(Cli::try_parse_from(["kommo-bridge", "products", "-n", "acme", "-l", "abc"]).is_err());
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["kommo-bridge"]).is_err());
    }
}
