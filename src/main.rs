//! kommo-bridge binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kommo_bridge::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kommo_bridge=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Serve(args) => commands::handle_serve(&config, args.bind).await,
        Commands::Products(args) => commands::handle_products(&config, &args.name, args.lead).await,
        Commands::AddUser(args) => commands::handle_add_user(&config, &args.name).await,
        Commands::Tokens => commands::handle_tokens(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
