use anyhow::{Context, Result, bail};
use api_client::{ApiClient, ConfigProvider};
use clap::{Parser, Subcommand};
use colored::Colorize;
use orchestrator::{ActionOutcome, PageModel, RecommendationOrchestrator};
use survey_model::{FormState, DEFAULT_PICKS_LIMIT};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// charity-recs - Survey-driven charity recommendations
#[derive(Parser)]
#[command(name = "charity-recs")]
#[command(about = "Turn survey answers into charity recommendations", long_about = None)]
struct Cli {
    /// Base URL of the recommendation service (wins over --config-url)
    #[arg(long, env = "CHARITY_API_BASE")]
    api_base: Option<String>,

    /// URL of a JSON document providing { "apiBase": "..." }
    #[arg(long, env = "CHARITY_CONFIG_URL")]
    config_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit survey answers and page through the recommendations
    Recommend {
        /// Survey answer as NAME=VALUE; repeat q_topics for several topics
        #[arg(long = "answer", value_name = "NAME=VALUE", required = true)]
        answers: Vec<String>,

        /// Number of pages to fetch (stops early when results run out)
        #[arg(long, default_value = "1")]
        pages: usize,
    },

    /// Show today's picks
    Picks {
        /// Number of picks to request (1-12)
        #[arg(long, default_value_t = DEFAULT_PICKS_LIMIT)]
        limit: u32,
    },

    /// Show the recommendation service status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let http = reqwest::Client::new();
    let config = match (cli.api_base, cli.config_url) {
        (Some(api_base), _) => ConfigProvider::fixed(api_base),
        (None, Some(config_url)) => ConfigProvider::from_url(http.clone(), config_url),
        (None, None) => bail!("Set --api-base or --config-url (or CHARITY_API_BASE / CHARITY_CONFIG_URL)"),
    };
    let client = ApiClient::with_http(http, config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { answers, pages } => handle_recommend(client, answers, pages).await?,
        Commands::Picks { limit } => handle_picks(client, limit).await?,
        Commands::Status => handle_status(client).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(client: ApiClient, answers: Vec<String>, pages: usize) -> Result<()> {
    let form = FormState::parse_entries(&answers).context("Failed to read survey answers")?;

    let orchestrator = RecommendationOrchestrator::new(Arc::new(client));
    orchestrator.form_changed(&form);
    let page = orchestrator.page();
    println!(
        "{} Answered {}/{} required questions",
        "•".cyan(),
        page.answered_required,
        page.required_total
    );
    form.validate().context("Survey is incomplete")?;

    let start = Instant::now();
    let outcome = orchestrator.submit_form(&form).await;
    print_page(&orchestrator.page());
    if !succeeded(&outcome) {
        bail!("Submit did not complete: {:?}", outcome);
    }

    for _ in 1..pages {
        if !orchestrator.page().load_more_control.is_visible() {
            info!("No more results to load");
            break;
        }
        let outcome = orchestrator.load_more().await;
        print_page(&orchestrator.page());
        if !succeeded(&outcome) {
            bail!("Load more did not complete: {:?}", outcome);
        }
    }

    info!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

/// Handle the 'picks' command
async fn handle_picks(client: ApiClient, limit: u32) -> Result<()> {
    let orchestrator = RecommendationOrchestrator::new(Arc::new(client));
    orchestrator.load_daily_picks(limit).await;

    let picks = orchestrator.page().picks;
    println!("{}", "Today's picks:".bold().blue());
    for (i, card) in picks.cards.iter().enumerate() {
        print!("{}. {}", (i + 1).to_string().green(), card);
    }
    if let Some(message) = picks.message {
        println!("{}", message.yellow());
    }
    Ok(())
}

/// Handle the 'status' command
async fn handle_status(client: ApiClient) -> Result<()> {
    let status = client
        .status()
        .await
        .context("Failed to fetch service status")?;

    let ok = if status.ok { "ok".green() } else { "degraded".red() };
    println!("Service: {}", ok);
    println!("{}Version: {}", "• ".cyan(), status.version);
    println!("{}Environment: {}", "• ".cyan(), status.env);
    Ok(())
}

fn succeeded(outcome: &ActionOutcome) -> bool {
    matches!(outcome, ActionOutcome::Rendered { .. } | ActionOutcome::Empty)
}

/// Helper function to print the results part of the page
fn print_page(page: &PageModel) {
    if let Some(heading) = &page.heading {
        println!("{}", heading.bold().blue());
    }
    for line in &page.rationale {
        println!("  {} {}", "›".dimmed(), line);
    }
    for (i, card) in page.cards.iter().enumerate() {
        print!("{}. {}", (i + 1).to_string().green(), card);
    }
    if page.live_region.is_visible() {
        println!("{}", page.live_region.message().yellow());
    }
    if page.load_more_control.is_visible() {
        println!("[{}]", page.load_more_control.label().dimmed());
    }
}
