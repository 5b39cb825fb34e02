//! `bettercope` command-line binary.

use anyhow::{Context as _, Error};
use bettercope::SubtitleService;
use bettercope::cli::{Command, run};
use env_logger::{Builder, Env};
use log::{error, info};
use sources::{ScrapeConfig, Scraper};
use std::env;
use std::io;
use std::process::exit;
use tokio::signal;
use tokio_util::sync::CancellationToken;

async fn start() -> Result<(), Error> {
    let command = Command::parse(env::args().skip(1))?;
    let scraper = Scraper::from_config(ScrapeConfig::from_env()).context("setting up HTTP client")?;
    let service = SubtitleService::new(scraper);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    run(command, &service, cancel, &mut io::stdout()).await
}

#[tokio::main]
async fn main() {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"))
        .is_test(false)
        .try_init();
    if let Err(err) = start().await {
        error!("error: {err:#}");
        exit(1);
    }
}
