use clap::Parser;
use prospect_search::adapters::render::render;
use prospect_search::adapters::render::render_page;
use prospect_search::app::interactive;
use prospect_search::domain::catalogue::{INDUSTRIES, STATES};
use prospect_search::utils::error::ErrorSeverity;
use prospect_search::utils::{logger, validation::Validate};
use prospect_search::{
    CliConfig, GeminiClient, Paginator, SearchCriteria, SearchError, SearchService, TomlConfig,
};

fn exit_with(e: &SearchError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_format);
    tracing::info!("Starting prospect-search");

    if config.list {
        println!("Industries:\n  {}", INDUSTRIES.join("\n  "));
        println!("States:\n  {}", STATES.join("\n  "));
        return Ok(());
    }

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = TomlConfig::from_file(&path)
            .and_then(|file| file.validate().map(|_| file))
            .unwrap_or_else(|e| exit_with(&e));
        config.merge_file(file);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let client = GeminiClient::from_config(&config).unwrap_or_else(|e| exit_with(&e));
    tracing::debug!("Using endpoint: {}", client.generate_url());

    let service = SearchService::with_components(client, config.query_builder(), config.extractor());

    if config.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        if let Err(e) =
            interactive::run_session(&service, config.format, stdin, tokio::io::stdout()).await
        {
            exit_with(&e);
        }
        return Ok(());
    }

    let criteria = SearchCriteria::new(
        config.industry.clone().unwrap_or_default(),
        config.state.clone().unwrap_or_default(),
    );

    let results = service
        .search(&criteria)
        .await
        .unwrap_or_else(|e| exit_with(&e));

    let rendered = if config.all {
        render(&results, config.format, None)
    } else {
        render_page(&results, &Paginator::default(), config.page, config.format)
    }
    .unwrap_or_else(|e| exit_with(&e));

    match &config.output {
        Some(path) => {
            if let Err(e) = tokio::fs::write(path, rendered.as_bytes()).await {
                exit_with(&SearchError::IoError(e));
            }
            tracing::info!("📁 Results saved to: {}", path);
            println!("✅ {} results saved to {}", results.len(), path);
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
