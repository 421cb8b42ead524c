mod config;
mod main_lib;

use clap::Parser;

use config::{AppConfig, Cli, Secrets};
use main_lib::{init_tracing, render, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so env-backed flags see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let app = AppConfig::from_cli(cli, Secrets::from_env());
    tracing::debug!("Resolved settings: {:?}", app);

    let run_date = chrono::Local::now().date_naive();
    let summary = run(&app, run_date).await.inspect_err(|err| {
        tracing::error!("{:#}", err);
    })?;

    println!("{}", render(&summary, app.format)?);
    Ok(())
}
