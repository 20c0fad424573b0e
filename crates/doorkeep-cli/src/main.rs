//! doorkeep binary: wires configuration, hardware, directory client, the
//! mode loop and the HTTP surface together, then runs until interrupted.
//!
//! This build drives the emulated bench hardware; real GPIO and reader
//! drivers slot in behind the same `GpioBank`/`ProximityPort` traits.

use anyhow::Context;
use doorkeep_access::{AccessLoop, Enroller};
use doorkeep_core::constants::DEFAULT_INIT_ATTEMPTS;
use doorkeep_core::{Config, DeviceMode, Error};
use doorkeep_directory::DirectoryClient;
use doorkeep_hardware::mock::{MockGpio, MockPort};
use doorkeep_hardware::{Actuator, CardReader, Timing};
use doorkeep_http::AppState;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    info!(
        mode = %config.device_mode,
        directory = %config.directory_url,
        version = doorkeep_core::VERSION,
        "doorkeep starting"
    );

    // Emulated bench hardware. The handles stay alive for the lifetime of
    // the process; an emulated unit sees no cards unless something drives
    // the port handle.
    let (gpio, _gpio_handle) = MockGpio::new();
    let actuator = Arc::new(Actuator::new(
        gpio,
        Timing::with_drive(config.motor_duration),
    ));
    let (port, _port_handle) = MockPort::new();

    let mut reader = CardReader::new(port);
    reader
        .initialize(DEFAULT_INIT_ATTEMPTS)
        .await
        .map_err(Error::from)
        .context("reader bring-up")?;

    let directory = DirectoryClient::new(config.directory_url.clone(), config.request_timeout)?;
    let cancel = CancellationToken::new();

    // Interrupt stops loop re-entry between iterations; an in-flight door
    // cycle always completes first.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received; shutting down");
                cancel.cancel();
            }
        });
    }

    match config.device_mode {
        DeviceMode::Reader => {
            let state = AppState::<MockPort, MockGpio> {
                actuator: Arc::clone(&actuator),
                enroller: None,
            };
            let server = tokio::spawn(doorkeep_http::serve(
                config.listen_addr,
                state,
                cancel.clone(),
            ));

            AccessLoop::new(
                reader,
                directory,
                Arc::clone(&actuator),
                config.card_read_timeout,
                cancel.clone(),
            )
            .run()
            .await;

            server.await.context("http surface task")??;
        }
        DeviceMode::Enroller => {
            let enroller = Enroller::new(reader, directory, Arc::clone(&actuator));
            let state = AppState {
                actuator: Arc::clone(&actuator),
                enroller: Some(Arc::new(enroller)),
            };
            doorkeep_http::serve(config.listen_addr, state, cancel.clone()).await?;
        }
    }

    actuator.release().await.map_err(Error::from)?;
    info!("doorkeep stopped");
    Ok(())
}
