mod cli;

use androidtv_protocol::{
    AndroidTvConfig, CallbackDelegate, CertificateInfo, PairingSession, RemoteSession,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// How long the TV gets to start the input session before key presses give up
const READY_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(&cli)?;

    let config = load_config(&cli)?;

    match cli.command {
        Command::Pair => pair(&config).await,
        Command::Key { keys } => send_keys(&config, &keys).await,
        Command::Hold { mute, pause } => hold(&config, mute, pause).await,
    }
}

fn load_config(cli: &Cli) -> Result<AndroidTvConfig> {
    let path = cli.config.clone().unwrap_or_else(AndroidTvConfig::default_path);

    let mut config = if path.exists() {
        AndroidTvConfig::load(&path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?
    } else if let Some(host) = &cli.host {
        debug!("No configuration at {:?}, using defaults", path);
        AndroidTvConfig::new(host.clone())
    } else {
        bail!("No configuration at {:?}; create one or pass --host", path);
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if cli.events {
        config.dump_events = true;
    }

    config.validate()?;
    Ok(config)
}

fn prompt_pin() -> androidtv_protocol::Result<String> {
    eprint!("Enter the code shown on the TV: ");
    std::io::stderr().flush()?;

    let mut pin = String::new();
    std::io::stdin().read_line(&mut pin)?;
    Ok(pin.trim().to_uppercase())
}

async fn pair(config: &AndroidTvConfig) -> Result<()> {
    let path = config.certificate_path()?;
    let certificate = CertificateInfo::open_or_create(&path)
        .with_context(|| format!("Failed to load client certificate {:?}", path))?;
    info!("Client certificate fingerprint: {}", certificate.fingerprint);

    let delegate = CallbackDelegate::new(prompt_pin).on_complete(|| eprintln!("Paired"));

    let pairing = PairingSession::connect(config, Arc::new(certificate), delegate)
        .await
        .context("Failed to connect to the pairing service")?;
    pairing.request().await?;

    let result = pairing.listen().await;
    if let Err(e) = pairing.close().await {
        debug!("Closing pairing connection: {}", e);
    }
    result.context("Pairing failed")
}

async fn connect_remote(config: &AndroidTvConfig) -> Result<RemoteSession> {
    if !config.certificate_exists() {
        bail!("Not paired yet; run `androidtv-remote pair` first");
    }

    let path = config.certificate_path()?;
    let certificate = CertificateInfo::open(&path)
        .with_context(|| format!("Failed to load client certificate {:?}", path))?;

    RemoteSession::connect(config, Arc::new(certificate))
        .await
        .context("Failed to connect to the remote service")
}

async fn send_keys(config: &AndroidTvConfig, keys: &[String]) -> Result<()> {
    let remote = connect_remote(config).await?;

    for key in keys {
        timeout(READY_TIMEOUT, remote.send_key_code(key))
            .await
            .context("TV did not start the remote session")?
            .with_context(|| format!("Failed to send {}", key))?;
    }

    remote.close().await?;
    remote.listen().await?;
    Ok(())
}

async fn hold(config: &AndroidTvConfig, mute: bool, pause: bool) -> Result<()> {
    let remote = connect_remote(config).await?;

    if mute {
        timeout(READY_TIMEOUT, remote.mute())
            .await
            .context("TV did not start the remote session")??;
    }
    if pause {
        timeout(READY_TIMEOUT, remote.pause())
            .await
            .context("TV did not start the remote session")??;
    }

    info!("Holding, press Ctrl-C to restore the TV and exit");
    tokio::select! {
        result = remote.listen() => {
            return result.context("Remote session ended");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to wait for Ctrl-C")?;
        }
    }

    remote.close().await?;
    Ok(())
}
