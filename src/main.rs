use clap::Parser;
use es_hoy::presentation::terminal::{SharedOutput, TerminalPresenter};
use es_hoy::utils::{logger, validation::Validate};
use es_hoy::{
    parse_override, CliConfig, Clock, DecisionEngine, FixedClock, Presenter, Result, Screen,
    SystemClock, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("❌ es-hoy failed: {} (exit code {})", e, e.exit_code());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    config.apply_overrides(cli.seed, cli.confetti_seconds, cli.no_audio);

    let level = config.logging.level.as_deref();
    if config.logging.json {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }

    tracing::debug!("CLI config: {:?}", cli);
    config.validate()?;

    let engine = DecisionEngine::default();
    let mode_override = parse_override(&cli.query);
    let clock: Box<dyn Clock> = match cli.at {
        Some(at) => Box::new(FixedClock::new(at)),
        None => Box::new(SystemClock),
    };

    let verdict = engine.evaluate_now(clock.as_ref(), mode_override);
    tracing::info!(
        "📅 {} in {} -> {} ({:?})",
        verdict.calendar_date,
        verdict.timezone,
        if verdict.celebrate { "SÍ" } else { "NO" },
        verdict.source
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    let settings = config.presentation_settings();
    let mut rng = settings.rng();
    let screen = Screen::from_verdict(&verdict, &mut rng);
    let mut presenter = TerminalPresenter::new(settings, rng, SharedOutput::stdout());
    presenter.present(&screen).await
}
