#[cfg(feature = "native")]
use clap::Parser;
#[cfg(feature = "native")]
use propcalc::{App, AppConfig, init_logging};
#[cfg(feature = "native")]
use propcalc_core::CalculatorType;
#[cfg(feature = "native")]
use std::path::PathBuf;

#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "propcalc")]
#[command(about = "Compare real-estate calculator scenarios side by side")]
struct Args {
    /// Path to the data directory (default: ~/.propcalc/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Calculator shown at startup (mortgage, rental, generic)
    #[arg(short, long, default_value = "mortgage")]
    calculator: CalculatorType,
}

#[cfg(feature = "native")]
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".propcalc")
}

#[cfg(feature = "native")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let config = AppConfig::load_or_default(&data_dir);
    tracing::debug!(?config, "Loaded configuration");

    let mut app = App::new(data_dir, &config, args.calculator);

    let result = ratatui::run(|terminal| app.run(terminal));

    tracing::info!("Application shutting down");
    app.shutdown();

    if let Err(err) = ratatui::try_restore() {
        tracing::error!("Failed to restore terminal: {err}");
    }

    result
}

#[cfg(not(feature = "native"))]
fn main() {
    // Web entry point is handled via wasm_bindgen in lib.rs
    // This main() exists only to satisfy the binary target requirement
    panic!(
        "This binary requires the 'native' feature. For web, build the library for wasm32 with the 'web' feature."
    );
}
