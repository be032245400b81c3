use color_eyre::Result;
use padbridge::config::ShapingConfig;
use padbridge::engine::RemapEngineManager;
use padbridge::profile::ProfileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    // Globale Achsen-Konfiguration laden
    let shaping = ShapingConfig::load_or_default(&shaping_config_path());
    info!("Shaping configuration: {:?}", shaping);

    // Profile laden (legt beim ersten Start das Default-Profil an)
    let profile_store = Arc::new(ProfileStore::load_or_default(&ProfileStore::default_path()).await?);

    // Kanäle für Reports und die beiden Output-Seiten erstellen
    let (report_tx, report_rx) = mpsc::channel(1000);
    let (frame_tx, mut frame_rx) = mpsc::channel(100);
    let (key_tx, mut key_rx) = mpsc::channel(100);

    let mut manager =
        RemapEngineManager::new(report_rx, frame_tx, key_tx, shaping, profile_store);

    let manager_handle = tokio::spawn(async move {
        if let Err(e) = manager.run_routing().await {
            warn!("Routing loop ended with error: {}", e);
        }
    });

    // Frame-Konsument: hier dockt der virtuelle Bus-Treiber an
    let frame_consumer = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            info!(
                "Frame pad={} buttons={:#06x} lx={} ly={} rx={} ry={}",
                frame.pad_slot,
                frame.buttons,
                frame.thumb_lx,
                frame.thumb_ly,
                frame.thumb_rx,
                frame.thumb_ry
            );
        }
    });

    // Key-Konsument: hier dockt das Injection-Backend an
    let key_consumer = tokio::spawn(async move {
        while let Some(event) = key_rx.recv().await {
            info!(
                "Key {:#06x} {}",
                event.code,
                if event.pressed { "down" } else { "up" }
            );
        }
    });

    // TODO: report_tx an den HID-Transport übergeben, sobald der portiert ist
    let _transport_tx = report_tx;

    info!("padbridge running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    // Transport-Sender schließen, damit die Routing-Schleife sauber endet
    drop(_transport_tx);
    let _ = manager_handle.await;
    frame_consumer.abort();
    key_consumer.abort();

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

fn shaping_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("padbridge")
        .join("shaping.toml")
}
