use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use household::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION_FILE: &str = ".household-session.json";

#[derive(Parser)]
#[command(name = "household-cli")]
#[command(about = "Command-line client for the household-services marketplace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides HOUSEHOLD_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides HOUSEHOLD_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds (overrides HOUSEHOLD_TIMEOUT_SECS)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        /// Account e-mail
        username: String,
        #[arg(long, env = "HOUSEHOLD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Show who the session belongs to
    Whoami,
    /// Check whether a page is reachable with the current session
    Navigate { path: String },
    /// List the navigation bar for the current role
    Links,
    /// List services visible to the current role
    Services,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HouseholdClient::builder()
        .config(config(&cli).map_err(explain)?)
        .build()
        .map_err(explain)?;

    match cli.command {
        Commands::Login { username, password } => login(&client, &username, &password).await?,
        Commands::Logout => {
            client.sign_out().map_err(explain)?;
            println!("Signed out.");
        }
        Commands::Whoami => whoami(&client),
        Commands::Navigate { path } => navigate(&client, &path)?,
        Commands::Links => {
            let links = client.nav_links();
            if links.is_empty() {
                println!("Not signed in.");
            }
            for link in links {
                println!("{:<8} {}", link.label, link.path);
            }
        }
        Commands::Services => services(&client).await?,
    }

    Ok(())
}

fn config(cli: &Cli) -> Result<ClientConfig, HouseholdError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    config.session_file = cli
        .session_file
        .clone()
        .or(config.session_file.take())
        .or_else(|| Some(PathBuf::from(DEFAULT_SESSION_FILE)));
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    tracing::debug!(
        api_url = %config.api_url,
        session_file = ?config.session_file,
        "configuration resolved"
    );
    Ok(config)
}

/// Puts the user-facing message on top of the full error chain.
fn explain(err: HouseholdError) -> anyhow::Error {
    let shown = err.user_message().message.unwrap_or_default();
    anyhow::Error::new(err).context(shown)
}

async fn login(
    client: &HouseholdClient<ReqwestTransport>,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let signed_in = client
        .sign_in(username, password)
        .await
        .map_err(explain)?;
    if let Some(message) = signed_in.message.and_then(|m| m.message) {
        println!("{message}");
    }
    println!("Signed in as {}. Start at {}", signed_in.role, signed_in.landing);
    Ok(())
}

fn whoami(client: &HouseholdClient<ReqwestTransport>) {
    let session = client.session().snapshot();
    match (session.is_authenticated(), session.role) {
        (false, _) => println!("Not signed in."),
        (true, Some(role)) => println!("Signed in as {role}."),
        (true, None) => println!("Signed in, but the stored role is unknown. Sign in again."),
    }
}

fn navigate(client: &HouseholdClient<ReqwestTransport>, path: &str) -> anyhow::Result<()> {
    match client.navigate(path).map_err(explain)? {
        Navigation::Allow(route) => {
            let name = route.name.as_deref().unwrap_or("-");
            println!("allow    {} ({name})", route.path);
            for (key, value) in &route.params {
                println!("         {key} = {value}");
            }
        }
        Navigation::Redirect { to, from, reason } => {
            println!("redirect {from} -> {to}: {reason}");
        }
    }
    Ok(())
}

async fn services(client: &HouseholdClient<ReqwestTransport>) -> anyhow::Result<()> {
    let services = match client.session().role() {
        Some(Role::Admin) => client.api().admin_services().await,
        Some(Role::Customer) => client.api().customer_services().await,
        _ => anyhow::bail!("sign in as an admin or a customer to list services"),
    }
    .map_err(|e| explain(e.into()))?;

    if services.is_empty() {
        println!("No services.");
    }
    for service in services {
        let kind = service.service_type.as_deref().unwrap_or("-");
        println!(
            "{:>4}  {:<24} {:<12} {:>10.2}",
            service.id, service.name, kind, service.base_price
        );
    }
    Ok(())
}
