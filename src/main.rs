use anyhow::{bail, Context, Result};
use api_client::{
    CachedMarketApi, HttpMarketClient, MarketApi, MarketSummaryResponse, QuartileAnalysis,
};
use app_state::{AppStore, UrlSync};
use calculator::export::{costs_csv, summary_csv, verification_csv};
use calculator::format::{
    fmt_max_fraction, format_currency, format_eur_to, format_percentage, format_price_per_sqm,
};
use calculator::verification::{conversion_explainer, cost_rows, verification_rows, warnings};
use calculator::{CalculationResult, MarketBenchmark, Quartiles, SaleCalculator};
use clap::{Args, Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use configuration::settings::AppSettings;
use configuration::{init_tracing, snapshot, Preset};
use core_types::{Currency, Lang, ScenarioConfig};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

mod labels;

use labels::{labels, Labels};

/// The main entry point for the homeswap calculator.
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Settings first: they decide where logs go.
    let settings = match &cli.settings {
        Some(path) => configuration::load_settings_from(&path.to_string_lossy()),
        None => configuration::load_settings(),
    }
    .context("Failed to load settings")?;
    let _log_guard = init_tracing(&settings.logging);

    // Execute the appropriate command
    match cli.command {
        Commands::Calc(args) => handle_calc(args, &settings).await,
        Commands::ExportCsv(args) => handle_export_csv(args, &settings),
        Commands::Share(args) => handle_share(args, &settings),
        Commands::Rates(args) => handle_rates(args, &settings).await,
        Commands::Market(args) => handle_market(args, &settings).await,
        Commands::Pdf(args) => handle_pdf(args, &settings).await,
        Commands::State(command) => handle_state(command, &settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Minimum sale price calculator for swapping an old apartment for a new one.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ./homeswap.toml when present).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the minimum sale price and print the summary tables.
    Calc(CalcArgs),
    /// Write one of the result tables as CSV.
    ExportCsv(ExportCsvArgs),
    /// Print a shareable URL fragment for the scenario.
    Share(ScenarioArgs),
    /// Fetch today's official exchange rates.
    Rates(RatesArgs),
    /// Show listing statistics per source, the quartile analysis and where
    /// the scenario sits in it.
    Market(ScenarioArgs),
    /// Render the report (or a sale summary) as PDF through the service.
    Pdf(PdfArgs),
    /// Inspect or change the persisted application state.
    #[command(subcommand)]
    State(StateCommand),
}

/// Where the scenario comes from. Later sources win: persisted state, then
/// `--config`, then `--fragment`, then `--preset` on top.
#[derive(Args)]
struct ScenarioArgs {
    /// Scenario JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shared URL fragment (`#cfg=...`).
    #[arg(long)]
    fragment: Option<String>,

    /// Preset applied on top of the scenario.
    #[arg(long, value_enum)]
    preset: Option<Preset>,
}

#[derive(Args)]
struct CalcArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Print the raw result as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Refresh exchange rates from the service before computing.
    #[arg(long)]
    live_rates: bool,

    /// Benchmark the result against current market quartiles.
    #[arg(long)]
    market: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CsvKind {
    Verification,
    Costs,
    Summary,
}

#[derive(Args)]
struct ExportCsvArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[arg(long, value_enum, default_value = "verification")]
    kind: CsvKind,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct RatesArgs {
    /// Store the rates in the persisted scenario.
    #[arg(long)]
    apply: bool,
}

#[derive(Args)]
struct PdfArgs {
    #[command(flatten)]
    scenario: ScenarioArgs,

    #[arg(long)]
    out: PathBuf,

    /// Render a sale summary for this actual sale price instead of the report.
    #[arg(long)]
    sale_amount: Option<f64>,

    /// Currency of `--sale-amount` (EUR or MDL).
    #[arg(long, default_value = "EUR")]
    currency: Currency,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Print the persisted state as JSON.
    Show,
    /// Restore the stock scenario.
    Reset,
    /// Apply a preset to the persisted scenario.
    Preset {
        #[arg(value_enum)]
        preset: Preset,
    },
    /// Set the interface language.
    Lang { lang: Lang },
    /// Toggle the dark theme.
    Dark,
    /// Replace the persisted scenario with a JSON file.
    Import { path: PathBuf },
    /// Export the persisted scenario to a JSON file.
    Export { path: PathBuf },
}

// ==============================================================================
// Scenario resolution
// ==============================================================================

fn open_store(settings: &AppSettings) -> Result<AppStore> {
    match &settings.state.path {
        Some(path) => AppStore::load_from(path)
            .with_context(|| format!("Failed to load state from {}", path.display())),
        None => Ok(AppStore::default()),
    }
}

fn persist(store: &AppStore, settings: &AppSettings) -> Result<()> {
    match &settings.state.path {
        Some(path) => store
            .save_to(path)
            .with_context(|| format!("Failed to save state to {}", path.display())),
        None => {
            tracing::warn!("No [state] path configured; change not persisted.");
            Ok(())
        }
    }
}

fn resolve_scenario(args: &ScenarioArgs, settings: &AppSettings) -> Result<AppStore> {
    let store = open_store(settings)?;
    if let Some(path) = &args.config {
        let config = snapshot::from_file(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        store.replace_config(config);
    }
    if let Some(fragment) = &args.fragment {
        store.replace_config(snapshot::decode_fragment(fragment).context("Invalid --fragment")?);
    }
    if let Some(preset) = args.preset {
        store.apply_preset(preset);
    }
    store.config().validate().context("Invalid scenario")?;
    Ok(store)
}

fn quartiles_of(q: &QuartileAnalysis) -> Quartiles {
    Quartiles {
        q1: q.q1,
        q2: q.q2,
        q3: q.q3,
    }
}

fn market_api(settings: &AppSettings) -> Result<CachedMarketApi<HttpMarketClient>> {
    let client = HttpMarketClient::new(&settings.api).context("Failed to build HTTP client")?;
    Ok(CachedMarketApi::new(client, &settings.cache))
}

// ==============================================================================
// Command handlers
// ==============================================================================

async fn handle_calc(args: CalcArgs, settings: &AppSettings) -> Result<()> {
    let store = resolve_scenario(&args.scenario, settings)?;

    let mut summary: Option<MarketSummaryResponse> = None;
    if args.live_rates || args.market {
        let api = market_api(settings)?;
        let (rates, market) = futures::future::join(
            async {
                if args.live_rates {
                    Some(api.fetch_rates().await)
                } else {
                    None
                }
            },
            async {
                if args.market {
                    Some(api.fetch_market_summary().await)
                } else {
                    None
                }
            },
        )
        .await;

        if let Some(rates) = rates {
            let rates = rates.context("Failed to fetch exchange rates")?;
            store.patch_config(|c| rates.apply_to(c));
        }
        if let Some(market) = market {
            summary = Some(market.context("Failed to fetch market summary")?);
        }
    }

    let config = store.config();
    let result = SaleCalculator::new().calculate(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let labels = labels(store.snapshot().lang);
    print_summary(labels, &config, &result);
    print_verification(labels, &config, &result);
    print_costs(labels, &config, &result);
    if let Some(q) = summary.as_ref().and_then(|s| s.quartile_analysis.as_ref()) {
        print_benchmark(&MarketBenchmark::new(&config, &result, quartiles_of(q)));
    }

    for warning in warnings(&config, &result) {
        println!("⚠ {}", warning.message());
    }
    Ok(())
}

fn handle_export_csv(args: ExportCsvArgs, settings: &AppSettings) -> Result<()> {
    let store = resolve_scenario(&args.scenario, settings)?;
    let config = store.config();
    let result = SaleCalculator::new().calculate(&config)?;

    let writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match args.kind {
        CsvKind::Verification => verification_csv(writer, &config, &result)?,
        CsvKind::Costs => costs_csv(writer, &config, &result)?,
        CsvKind::Summary => summary_csv(writer, &result)?,
    }
    if let Some(path) = &args.out {
        tracing::info!(path = %path.display(), "CSV written.");
    }
    Ok(())
}

fn handle_share(args: ScenarioArgs, settings: &AppSettings) -> Result<()> {
    let store = resolve_scenario(&args, settings)?;
    let mut sync = UrlSync::init(&store, None);
    match sync.poll() {
        Some(fragment) => println!("#{fragment}"),
        None => bail!("Failed to encode the scenario"),
    }
    Ok(())
}

async fn handle_rates(args: RatesArgs, settings: &AppSettings) -> Result<()> {
    let api = market_api(settings)?;
    let rates = api.fetch_rates().await.context("Failed to fetch exchange rates")?;

    let mut table = new_table(vec!["Pair", "Rate", "Source"]);
    table.add_row(vec![
        "EUR → MDL".to_string(),
        rates.eur_to_mdl.to_string(),
        rates.eur_to_mdl_label.clone(),
    ]);
    table.add_row(vec![
        "EUR → RON".to_string(),
        rates.eur_to_ron.to_string(),
        rates.eur_to_ron_label.clone(),
    ]);
    table.add_row(vec![
        "RON → MDL".to_string(),
        rates.ron_to_mdl.to_string(),
        rates.ron_to_mdl_label.clone(),
    ]);
    println!("Rates for {}", rates.date);
    println!("{table}");

    if args.apply {
        let store = open_store(settings)?;
        store.patch_config(|c| rates.apply_to(c));
        persist(&store, settings)?;
    }
    Ok(())
}

async fn handle_market(args: ScenarioArgs, settings: &AppSettings) -> Result<()> {
    let store = resolve_scenario(&args, settings)?;
    let api = market_api(settings)?;
    let summary = api.fetch_market_summary().await.context("Failed to fetch market summary")?;

    let labels = labels(store.snapshot().lang);
    println!("{}", labels.section_market);
    let mut table = new_table(vec![
        labels.source,
        labels.listings,
        labels.min_per_sqm,
        labels.avg_per_sqm,
        labels.median_per_sqm,
        labels.max_per_sqm,
        labels.dominant_range,
    ]);
    for s in &summary.sources {
        let source = if s.is_aggregate() {
            labels.all_platforms.to_string()
        } else {
            s.source.clone()
        };
        table.add_row(vec![
            source,
            s.total_ads.to_string(),
            format_price_per_sqm(Some(s.min_price_per_sqm), Currency::Eur),
            format_price_per_sqm(Some(s.avg_price_per_sqm), Currency::Eur),
            format_price_per_sqm(Some(s.median_price_per_sqm), Currency::Eur),
            format_price_per_sqm(Some(s.max_price_per_sqm), Currency::Eur),
            s.dominant_range().unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");

    if let Some(q) = &summary.quartile_analysis {
        println!(
            "{}: Q1 {} / Q2 {} / Q3 {} (IQR {}; {}: {})",
            labels.quartile_title,
            format_price_per_sqm(Some(q.q1), Currency::Eur),
            format_price_per_sqm(Some(q.q2), Currency::Eur),
            format_price_per_sqm(Some(q.q3), Currency::Eur),
            format_price_per_sqm(Some(q.iqr), Currency::Eur),
            labels.outliers_removed,
            q.outliers_removed,
        );
        if !q.interpretation.price_range_description.is_empty() {
            println!("{}", q.interpretation.price_range_description);
        }

        let config = store.config();
        let result = store.calculate();
        if result.is_error() {
            tracing::warn!("Scenario has no solution; benchmark skipped.");
        } else {
            print_benchmark(&MarketBenchmark::new(&config, &result, quartiles_of(q)));
        }
    }
    Ok(())
}

async fn handle_pdf(args: PdfArgs, settings: &AppSettings) -> Result<()> {
    let store = resolve_scenario(&args.scenario, settings)?;
    let config = store.config();
    let api = market_api(settings)?;

    let bytes = match args.sale_amount {
        Some(amount) => api.export_sale_summary_pdf(&config, amount, args.currency).await,
        None => api.export_report_pdf(&config).await,
    }
    .context("PDF export failed")?;

    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!("Wrote {} ({} bytes)", args.out.display(), bytes.len());
    Ok(())
}

fn handle_state(command: StateCommand, settings: &AppSettings) -> Result<()> {
    let store = open_store(settings)?;
    match command {
        StateCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            return Ok(());
        }
        StateCommand::Export { path } => {
            snapshot::to_file(&store.config(), &path)?;
            return Ok(());
        }
        StateCommand::Reset => store.reset(),
        StateCommand::Preset { preset } => store.apply_preset(preset),
        StateCommand::Lang { lang } => store.set_lang(lang),
        StateCommand::Dark => {
            let dark = store.toggle_dark();
            println!("Dark theme {}", if dark { "on" } else { "off" });
        }
        StateCommand::Import { path } => store.replace_config(snapshot::from_file(&path)?),
    }
    persist(&store, settings)
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_summary(labels: &Labels, config: &ScenarioConfig, result: &CalculationResult) {
    let eur = |v: f64| format_currency(Some(v), Currency::Eur, 2);
    let mut table = new_table(vec![labels.figure, "EUR", "MDL", "RON"]);
    let rows = [
        (labels.min_required, result.sale_price),
        (labels.net_after_conversion, result.net),
        (labels.target_with_notary, result.target_with_notary),
        (labels.profit, result.profit),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            label.to_string(),
            eur(value),
            format_eur_to(value, result.eur_to_mdl, Currency::Mdl),
            format_eur_to(value, result.eur_to_ron, Currency::Ron),
        ]);
    }
    println!("{table}");
    println!(
        "{}: {}   {}: {}",
        labels.cover_pct,
        format_percentage(Some(result.cover_pct), 2),
        labels.profit_pct,
        format_percentage(Some(result.inv_return_pct), 2)
    );
    if config.currency_conversion.enabled {
        let explainer = conversion_explainer(config);
        println!(
            "Conversion EUR → RON → MDL: {} MDL per EUR vs {} direct ({})",
            fmt_max_fraction(explainer.mdl_via_ron, 4),
            fmt_max_fraction(config.exchange_rates.eur_to_mdl, 4),
            format_percentage(Some(explainer.pct), 4)
        );
    }
    if result.market_avg > 0.0 {
        println!(
            "Market for {} m²: {} / {} / {}",
            result.surface,
            eur(result.market_min),
            eur(result.market_avg),
            eur(result.market_max)
        );
    }
}

fn print_verification(labels: &Labels, config: &ScenarioConfig, result: &CalculationResult) {
    println!("{}", labels.section_verify);
    let mut table = new_table(vec!["Item", "EUR", "MDL/RON"]);
    for row in verification_rows(config, result) {
        table.add_row(vec![
            row.label.to_string(),
            format_currency(Some(row.eur), Currency::Eur, 2),
            row.local
                .map(|(amount, currency)| format_currency(Some(amount), currency, 2))
                .unwrap_or_default(),
        ]);
    }
    println!("{table}");
}

fn print_costs(labels: &Labels, config: &ScenarioConfig, result: &CalculationResult) {
    println!("{}", labels.section_costs);
    let mut table = new_table(vec!["Description", "Details", "EUR"]);
    for row in cost_rows(config, result) {
        table.add_row(vec![
            row.description.to_string(),
            row.details,
            format_currency(Some(row.eur), Currency::Eur, 2),
        ]);
    }
    println!("{table}");
}

fn print_benchmark(benchmark: &MarketBenchmark) {
    let eur = |v: f64| format_currency(Some(v), Currency::Eur, 2);
    println!(
        "Recommended listing: {} (range {} to {})",
        eur(benchmark.recommended_total),
        eur(benchmark.listing_range_low),
        eur(benchmark.listing_range_high)
    );
    if let Some(pct) = benchmark.percentile {
        println!(
            "Purchase price {} sits at about the {} percentile",
            format_price_per_sqm(Some(benchmark.purchase_price_per_sqm), Currency::Eur),
            format_percentage(Some(pct), 0)
        );
    }
    println!("Required sale price vs market: {:?}", benchmark.sale_position);
}
