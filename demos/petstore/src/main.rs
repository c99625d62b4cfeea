use clap::{Parser, Subcommand};
use colored::Colorize;
use petstore::Store;
use shapedoc::prelude::*;
use tower_http::trace::TraceLayer;

#[derive(Parser)]
#[command(name = "petstore", version, about = "Pet store demo for shapedoc")]
struct Cli {
    /// Configuration profile (overridden by SHAPEDOC_PROFILE)
    #[arg(long, default_value = "dev")]
    profile: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print or export the OpenAPI document
    Schema(SchemaCommand),
    /// List the registered routes
    Routes(RoutesCommand),
}

async fn serve(config: &AppConfig, extension: OpenApiExtension) -> Result<(), Box<dyn std::error::Error>> {
    let port: i64 = config.get_or("server.port", 3000);
    let addr = format!("0.0.0.0:{port}");

    let router = extension
        .init_app(petstore::app())
        .with_state(Store::default())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, profile = %config.profile(), "petstore listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(&cli.profile)?;
    let extension = OpenApiExtension::from_config(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config, extension).await,
        Commands::Schema(command) => Ok(command.run(&extension, &petstore::app())?),
        Commands::Routes(command) => {
            command.run(&petstore::app());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}
