use color_eyre::{eyre::eyre, Result};
use padstate::config::Settings;
use padstate::controller::ControllerHandle;
use padstate::source::GilrsSource;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = match Settings::config_path() {
        Ok(path) => Settings::load_or_default(&path).await,
        Err(e) => {
            warn!("{}, using default settings", e);
            Settings::default()
        }
    };
    info!("Starting PS3 controller poller with {:?}", settings);

    let source_settings = settings.source_settings();
    let handle = ControllerHandle::spawn(Some(settings.controller_settings()), move || {
        GilrsSource::create(Some(source_settings))?.initialize()
    });

    let mut state = handle.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping controller");
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    debug!("Controller task stopped publishing");
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                if settings.log_snapshots {
                    info!("\n{}", snapshot);
                }
            }
        }
    }

    handle
        .shutdown()
        .await
        .map_err(|e| eyre!("Controller stopped with error: {}", e))
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
