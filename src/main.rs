use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use cutoff_predictor::classifier::classify;
use cutoff_predictor::config::{PredictorConfig, DEFAULT_CONFIG_PATH};
use cutoff_predictor::dataset::{load_dataset, source_for, Dataset};
use cutoff_predictor::export::{criteria_summary, render_table, write_export, ExportFormat, ExportRow};
use cutoff_predictor::logging;
use cutoff_predictor::model::{Criteria, Limit, ThresholdMode};
use cutoff_predictor::paginate::Page;
use cutoff_predictor::session::Session;

#[derive(Parser)]
#[command(name = "cutoff_predictor")]
#[command(about = "Predicts eligible colleges from admission cutoff data")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Dataset file path or URL, overriding the configuration
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, rank and page colleges for the given criteria
    Predict(PredictArgs),
    /// List the selectable seat types, branches, college types and regions
    Options,
    /// Print the college type derived from an institute name
    Classify {
        /// Institute name
        institute: String,
    },
}

#[derive(Args)]
struct PredictArgs {
    /// Seat types to include (comma-separated or repeated)
    #[arg(long = "seat-type", value_delimiter = ',')]
    seat_types: Vec<String>,
    /// Branches to include
    #[arg(long = "branch", value_delimiter = ',')]
    branches: Vec<String>,
    /// College types to include. Available: Government-Autonomous, Government, Autonomous, Aided, Unaided, Other
    #[arg(long = "college-type", value_delimiter = ',')]
    college_types: Vec<String>,
    /// Regions to include. Available: Amravati, Aurangabad, Mumbai, Nagpur, Nashik, Pune
    #[arg(long = "region", value_delimiter = ',')]
    regions: Vec<String>,
    /// Compare against closing rank or cutoff percentile
    #[arg(long = "by", default_value = "percentile")]
    mode: String,
    /// Your rank or percentile
    #[arg(long)]
    value: String,
    /// Number of colleges to keep, or "all"
    #[arg(long)]
    limit: Option<String>,
    /// Narrow the results to rows containing this text
    #[arg(long)]
    search: Option<String>,
    /// Page to show
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Also write the full result set to the export directory (json or text)
    #[arg(long)]
    export: Option<String>,
}

async fn load_session(config: &PredictorConfig) -> anyhow::Result<Session> {
    let source = source_for(&config.dataset.source, config.dataset.timeout())?;
    let dataset = match load_dataset(source.as_ref(), &config.dataset.collection).await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Error loading data: {}", e);
            println!("❌ Failed to load college data. Please try again later.");
            return Err(e.into());
        }
    };
    Ok(Session::new(Arc::new(dataset), config.results.page_size))
}

fn build_criteria(args: &PredictArgs, config: &PredictorConfig) -> cutoff_predictor::Result<Criteria> {
    let mode: ThresholdMode = args.mode.parse()?;
    let threshold = Criteria::parse_threshold(&args.value)?;
    let limit = match &args.limit {
        Some(text) => text.parse::<Limit>()?,
        None => config.results.default_limit,
    };
    Ok(Criteria::new(mode, threshold)
        .with_seat_types(args.seat_types.iter().cloned())
        .with_branches(args.branches.iter().cloned())
        .with_college_types(args.college_types.iter().cloned())
        .with_regions(args.regions.iter().cloned())
        .with_limit(limit))
}

fn print_page(page: &Page) {
    let rows: Vec<ExportRow> = page.records.iter().map(ExportRow::from_record).collect();
    print!("{}", render_table(&rows));
    println!();
    println!(
        "Showing {}-{} of {} results (page {} of {})",
        if page.is_empty() { 0 } else { page.start + 1 },
        page.end,
        page.total_results,
        page.current_page,
        page.total_pages
    );
    let window: Vec<String> = page
        .window
        .iter()
        .map(|n| if *n == page.current_page { format!("[{}]", n) } else { n.to_string() })
        .collect();
    println!(
        "{} {} {}",
        if page.has_previous { "‹ prev" } else { "      " },
        window.join(" "),
        if page.has_next { "next ›" } else { "" }
    );
}

async fn run_predict(args: PredictArgs, config: &PredictorConfig) -> anyhow::Result<()> {
    let criteria = match build_criteria(&args, config) {
        Ok(criteria) => criteria,
        Err(e) => {
            println!("❌ {}", e);
            return Ok(());
        }
    };

    let session = load_session(config).await?;
    let session = match session.predict(criteria) {
        Ok(session) => session,
        Err(e) => {
            println!("❌ {}", e);
            return Ok(());
        }
    };

    if session.results().is_empty() {
        println!("ℹ️  No colleges found matching your criteria");
        return Ok(());
    }

    if let Some(criteria) = session.criteria() {
        println!("📋 Search parameters:");
        for item in criteria_summary(criteria) {
            println!("   {}: {}", item.label, item.value);
        }
        println!();
    }

    let session = match &args.search {
        Some(term) => session.search(term),
        None => session,
    };
    let session = session.goto_page(args.page);
    let page = session.page();

    if page.total_results == 0 {
        println!("ℹ️  No colleges found matching \"{}\"", session.search_term());
    } else {
        print_page(&page);
    }

    if let Some(format) = &args.export {
        let format: ExportFormat = format.parse()?;
        if let Some(snapshot) = session.export_snapshot(&config.export.title) {
            let path = write_export(&snapshot, format, &config.export.output_dir)?;
            println!("📄 Exported {} rows to {}", snapshot.rows.len(), path.display());
        }
    }

    Ok(())
}

fn print_options(dataset: &Dataset) {
    println!("Seat types:    {}", dataset.seat_types().join(", "));
    println!("Branches:      {}", dataset.branches().join(", "));
    println!("College types: {}", Dataset::college_type_options().join(", "));
    println!("Regions:       {}", Dataset::region_options().join(", "));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    let mut config = PredictorConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(dataset) = cli.dataset {
        config.dataset.source = dataset;
    }
    info!(source = %config.dataset.source, "Using dataset");

    match cli.command {
        Commands::Predict(args) => run_predict(args, &config).await?,
        Commands::Options => {
            let session = load_session(&config).await?;
            print_options(session.dataset());
        }
        Commands::Classify { institute } => {
            println!("{}", classify(Some(institute.as_str())));
        }
    }

    Ok(())
}
