use anyhow::{Context, Result};
use atty::Stream;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rmcp::{transport::stdio, ServiceExt};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use utgen_core::{list_components, PromptPipeline, UtgenConfig};
use utgen_mcp_server::TestPromptServer;

#[derive(Parser)]
#[command(
    name = "utgen",
    version,
    about = "Unit Test Generator - MCP server that builds component unit-test prompts"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(
        long,
        global = true,
        help = "Project root containing src/components (overrides PROJECT_PATH)"
    )]
    project_path: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the MCP server on stdio (default)")]
    Serve,

    #[command(about = "Generate the test prompt for one component and print it")]
    Prompt {
        #[arg(help = "Component directory name, e.g. Button")]
        name: String,

        #[arg(long, help = "Explicit component directory")]
        path: Option<PathBuf>,
    },

    #[command(about = "List component directories")]
    List {
        #[arg(help = "Directory to list (default: <project>/src/components)")]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut config =
        UtgenConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = cli.project_path.clone() {
        config.project_root = Some(root);
    }
    config.validate().context("Invalid configuration")?;

    let _guard = init_tracing(&config, cli.verbose)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await?,
        Commands::Prompt { name, path } => {
            let pipeline = PromptPipeline::with_tracing(config.resolver());
            println!("{}", pipeline.generate_text(&name, path.as_deref()).await);
        }
        Commands::List { dir } => {
            let dir = dir.unwrap_or_else(|| config.resolver().resolve());
            let components = list_components(&dir)
                .await
                .with_context(|| format!("Error listing components in {}", dir.display()))?;
            for component in components {
                println!("{}", component);
            }
        }
    }

    Ok(())
}

async fn serve(config: &UtgenConfig) -> Result<()> {
    if atty::is(Stream::Stderr) {
        eprintln!(
            "{}",
            "Starting Unit Test Generator MCP Server...".green().bold()
        );
    }

    info!(
        "Components root: {}",
        config.resolver().resolve().display()
    );

    let server = TestPromptServer::new(config);

    let service = server.serve(stdio()).await.map_err(|e| {
        error!("Error starting server: {}", e);
        anyhow::anyhow!("MCP server startup failed: {}", e)
    })?;

    info!("MCP server running on stdio");
    if atty::is(Stream::Stderr) {
        eprintln!("{}", "MCP Server running on stdio".green());
    }

    match service.waiting().await {
        Ok(_) => info!("Server shut down gracefully"),
        Err(e) => error!("Server error: {}", e),
    }

    Ok(())
}

/// stdout carries the MCP protocol, so logs go to stderr or to `<log_dir>/utgen.log`
fn init_tracing(config: &UtgenConfig, verbose: bool) -> Result<Option<WorkerGuard>> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &config.logging.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
            let file_appender = tracing_appender::rolling::never(log_dir, "utgen.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_line_number(true)
                .init();

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(Stream::Stderr))
                .with_target(false)
                .init();

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use utgen_core::PROJECT_PATH_ENV;

    #[test]
    #[serial]
    fn empty_project_path_env_does_not_block_startup() {
        std::env::set_var(PROJECT_PATH_ENV, "");

        let cli = Cli::try_parse_from(["utgen", "list"]).expect("cli parses");
        assert!(cli.project_path.is_none());
        assert!(matches!(cli.command, Some(Commands::List { dir: None })));

        let config = UtgenConfig::load(None).expect("config");
        std::env::remove_var(PROJECT_PATH_ENV);

        assert!(config.validate().is_ok());
        assert_eq!(
            config.resolver().resolve(),
            std::path::PathBuf::from("src/components")
        );
    }

    #[test]
    fn project_path_flag_is_global() {
        let cli = Cli::try_parse_from(["utgen", "prompt", "Button", "--project-path", "/app"])
            .expect("cli parses");
        assert_eq!(cli.project_path, Some(PathBuf::from("/app")));
        assert!(matches!(cli.command, Some(Commands::Prompt { ref name, .. }) if name == "Button"));
    }
}
