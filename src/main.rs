use anyhow::Context;
use clap::{Parser, Subcommand};
use newsletter_admin::{
    authentication::compute_password_hash,
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use secrecy::{ExposeSecret, Secret};
use std::io::BufRead;

#[derive(Parser, Debug)]
#[command(name = "newsletter-admin")]
#[command(about = "Newsletter subscriber admin console")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Read the admin password from stdin and print its PHC hash
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let subscriber = get_subscriber("newsletter-admin".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    if let Some(Command::HashPassword) = cli.command {
        return hash_password();
    }

    let config = get_configuration().context("Failed to read configuration")?;
    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    Ok(())
}

/// Prints the hash to put into `application.admin_password_hash`.
fn hash_password() -> Result<(), anyhow::Error> {
    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;

    let password = password.trim_end_matches(['\r', '\n']).to_string();
    anyhow::ensure!(!password.is_empty(), "Password must not be empty");

    let hash = compute_password_hash(Secret::new(password))?;
    println!("{}", hash.expose_secret());

    Ok(())
}
