mod app;

use app::StudyCardsApp;
use clap::Parser;
use std::path::PathBuf;
use study_cards::config::Config;
use study_cards::logging::init_tracing;
use study_cards::store::SystemClock;
use study_cards::{AppState, CollectionStore};

#[derive(Parser, Debug)]
#[command(name = "study-cards", version, about = "Decks of question/answer study cards")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "STUDY_CARDS_CONFIG")]
    config: Option<PathBuf>,

    /// Start with an empty store instead of the demo decks
    #[arg(long)]
    no_demo: bool,

    /// Log level or filter directive, overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match Config::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    if let Some(e) = config_error {
        tracing::error!(error = %e, "using default configuration");
    }

    let store = if config.store.seed_demo_data && !cli.no_demo {
        CollectionStore::with_demo_data(SystemClock)
    } else {
        CollectionStore::new(SystemClock)
    };
    let stats = store.stats();
    tracing::info!(decks = stats.decks, cards = stats.cards, "store ready");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };
    eframe::run_native(
        "Study Cards",
        options,
        Box::new(|_cc| Ok(Box::new(StudyCardsApp::new(AppState::new(store))))),
    )
}
