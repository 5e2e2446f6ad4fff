use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use triage::LogLevel;
use triage::core::config;

#[derive(Parser)]
#[command(name = "triage", about = "Terminal client for a symptom-analysis service")]
struct Args {
    /// Analysis service base URL (overrides config file and TRIAGE_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Log verbosity for triage.log
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The terminal belongs to the TUI, so logs go to triage.log in the current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("triage.log") {
        let _ = WriteLogger::init(LevelFilter::from(args.log_level), log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to default config: {}", e);
            eprintln!("Warning: {e}; using defaults");
            config::TriageConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.api_base.as_deref());

    log::info!(
        "Triage starting up (api_base={}, history={})",
        resolved.api_base,
        if resolved.store.is_some() { "on" } else { "off" }
    );

    triage::tui::run(resolved)
}
