use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use api_ingress::ApiIngressConfig;
use users_admin::domain::service::{Service, ServiceConfig};
use users_admin::infra::storage::InMemoryUsersRepository;
use users_admin::UsersAdminConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USERS_ADMIN_MODULE: &str = "users_admin";
const API_INGRESS_MODULE: &str = "api_ingress";

/// Users Admin Server - user directory management API
#[derive(Parser)]
#[command(name = "users-admin-server")]
#[command(about = "Users Admin Server - user directory management API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Users Admin Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Typed module sections, with the server-wide timeout applied to the ingress.
fn module_configs(config: &AppConfig) -> Result<(UsersAdminConfig, ApiIngressConfig)> {
    let users: UsersAdminConfig = config.module_config(USERS_ADMIN_MODULE)?;
    let mut ingress: ApiIngressConfig = config.module_config(API_INGRESS_MODULE)?;
    if config.server.timeout_sec > 0 {
        ingress.timeout_sec = config.server.timeout_sec;
    }
    if users.default_page_size == 0 || users.default_page_size > users.max_page_size {
        anyhow::bail!(
            "Invalid configuration for module '{USERS_ADMIN_MODULE}': \
             default_page_size must be within 1..={}",
            users.max_page_size
        );
    }
    Ok((users, ingress))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let (users_cfg, ingress_cfg) = module_configs(&config)?;

    tracing::info!(
        seed_users = users_cfg.seed_users,
        simulate_latency = users_cfg.simulate_latency,
        "Initializing users_admin module"
    );
    let repo = Arc::new(InMemoryUsersRepository::seeded(users_cfg.seed_users));
    let service = Arc::new(Service::new(repo, ServiceConfig::from(&users_cfg)));

    let routes = users_admin::api::rest::register_routes(Router::new(), service);
    let router = api_ingress::build_router(routes, &ingress_cfg);

    let bind_addr = ingress_cfg
        .bind_addr
        .clone()
        .unwrap_or_else(|| config.bind_addr());
    let listener = api_ingress::bind(&bind_addr).await?;

    api_ingress::serve(listener, router, api_ingress::shutdown_token()).await?;
    tracing::info!("Users Admin Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    let (users_cfg, ingress_cfg) = module_configs(&config)?;
    tracing::debug!(
        default_page_size = users_cfg.default_page_size,
        timeout = ?ingress_cfg.timeout(),
        "module configuration resolved"
    );

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
