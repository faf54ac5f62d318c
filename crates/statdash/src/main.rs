//! CLI entry point: fetch one dashboard view and print its chart model.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use serde::Serialize;
use statdash::upstream::{DistributionFamily, ViewRequest};
use statdash::{
    AnalyticsService, ChartModel, DashboardConfig, DataSource, HttpAnalyticsClient,
    OfflineService, ResultFetchController, ViewKind, ViewState,
};
use std::env;
use tracing::{debug, info};

/// Environment variable holding the analytics service base URL.
const API_URL_ENV: &str = "STATDASH_API_URL";

/// CLI-compatible distribution family enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFamily {
    /// Normal distribution
    Norm,
    /// Log-normal distribution
    Lognorm,
    /// Gamma distribution
    Gamma,
}

impl From<CliFamily> for DistributionFamily {
    fn from(cli: CliFamily) -> Self {
        match cli {
            CliFamily::Norm => DistributionFamily::Norm,
            CliFamily::Lognorm => DistributionFamily::Lognorm,
            CliFamily::Gamma => DistributionFamily::Gamma,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ViewCommand {
    /// Dataset headline numbers
    Summary,
    /// Histogram of one column with a fitted density
    Distribution {
        column: String,
        #[arg(long, value_enum, default_value = "norm")]
        family: CliFamily,
    },
    /// Pearson correlation matrix of the numeric columns
    Correlation,
    /// Cramér's V association matrix of the categorical columns
    Association,
    /// Five-number summaries of a value column per group
    BoxPlot {
        group_column: String,
        value_column: String,
    },
    /// Principal component analysis
    Pca {
        /// Columns to include (service default when empty)
        columns: Vec<String>,
    },
    /// Two-sample t-test
    Ttest {
        group_column: String,
        value_column: String,
    },
    /// Gini coefficients
    Gini,
    /// Bootstrap distribution of the mean addiction score
    MonteCarlo {
        /// Number of simulations (defaults to the configured count)
        #[arg(long)]
        simulations: Option<u32>,
    },
    /// Fit a regression model
    Regression {
        target: String,
        #[arg(required = true)]
        predictors: Vec<String>,
        #[arg(long, default_value = "OLS")]
        model_type: String,
    },
}

impl From<ViewCommand> for ViewRequest {
    fn from(command: ViewCommand) -> Self {
        match command {
            ViewCommand::Summary => ViewRequest::Summary,
            ViewCommand::Distribution { column, family } => ViewRequest::Distribution {
                column,
                family: family.into(),
            },
            ViewCommand::Correlation => ViewRequest::Correlation,
            ViewCommand::Association => ViewRequest::Association,
            ViewCommand::BoxPlot {
                group_column,
                value_column,
            } => ViewRequest::BoxPlot {
                group_column,
                value_column,
            },
            ViewCommand::Pca { columns } => ViewRequest::Pca { columns },
            ViewCommand::Ttest {
                group_column,
                value_column,
            } => ViewRequest::TTest {
                group_column,
                value_column,
            },
            ViewCommand::Gini => ViewRequest::Gini,
            ViewCommand::MonteCarlo { simulations } => ViewRequest::MonteCarlo { simulations },
            ViewCommand::Regression {
                target,
                predictors,
                model_type,
            } => ViewRequest::Regression {
                target,
                predictors,
                model_type,
            },
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Statistical dashboard data pipeline",
    long_about = "Fetches one dashboard view from the analytics service and prints \
                  its chart-ready model.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  STATDASH_API_URL    Base URL of the analytics service\n\n\
                  EXAMPLES:\n  \
                  statdash distribution Avg_Daily_Usage_Hours --family gamma\n  \
                  statdash box-plot Gender Addicted_Score --json\n  \
                  statdash gini --offline"
)]
struct Args {
    #[command(subcommand)]
    view: ViewCommand,

    /// Base URL of the analytics service (overrides STATDASH_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Do not contact the service; show the fallback dataset
    #[arg(long, global = true)]
    offline: bool,

    /// Report upstream failures instead of showing fallback data
    #[arg(long, global = true)]
    no_fallback: bool,

    /// Output JSON to stdout instead of a human-readable table
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct ViewOutput<'a> {
    view: ViewKind,
    state: &'a ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartModel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let mut builder = DashboardConfig::builder()
        .timeout_secs(args.timeout)
        .use_fallback(!args.no_fallback);
    if let Some(url) = args.base_url.clone().or_else(|| env::var(API_URL_ENV).ok()) {
        builder = builder.base_url(url);
    }
    let config = builder.build()?;
    debug!("Configuration: {:?}", config);

    let request = ViewRequest::from(args.view);
    let kind = request.kind();

    let state = if args.offline {
        info!("Offline mode: the analytics service will not be contacted");
        fetch_view(OfflineService, config, request).await?
    } else {
        let client = HttpAnalyticsClient::new(config.clone())?;
        fetch_view(client, config, request).await?
    };

    let chart = state.data().map(ChartModel::build).transpose()?;

    if args.json {
        let output = ViewOutput {
            view: kind,
            state: &state,
            chart,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_view(kind, &state, chart.as_ref());
    }

    match state.error() {
        Some(report) => Err(anyhow!("{} view failed [{}]: {}", kind, report.code, report.message)),
        None => Ok(()),
    }
}

async fn fetch_view<S: AnalyticsService>(
    service: S,
    config: DashboardConfig,
    request: ViewRequest,
) -> Result<ViewState> {
    let kind = request.kind();
    let controller = ResultFetchController::builder(service).config(config).build()?;
    let resolution = controller.load(request).await;
    debug!(view = %kind, ?resolution, "Request resolved");
    Ok(controller.state(kind))
}

// ============================================================================
// Human-readable output
// ============================================================================
//
// `println!` is intentional: this is the command's result, not a log line.

fn print_view(kind: ViewKind, state: &ViewState, chart: Option<&ChartModel>) {
    println!("\n{}", "=".repeat(60));
    match state.snapshot() {
        Some(snapshot) => {
            let source = match snapshot.source {
                DataSource::Live => "live",
                DataSource::Fallback => "FALLBACK DATA (service unavailable)",
            };
            println!("{} [{}]", kind.as_str().to_uppercase(), source);
            println!("Received at {}", snapshot.received_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        None => println!("{}", kind.as_str().to_uppercase()),
    }
    println!("{}\n", "=".repeat(60));

    if let Some(report) = state.error() {
        println!("  Error [{}]: {}", report.code, report.message);
        return;
    }

    if let Some(chart) = chart {
        print_chart(chart);
    }
}

fn print_chart(chart: &ChartModel) {
    match chart {
        ChartModel::Summary(summary) => {
            println!("  Students:            {}", summary.total_students);
            println!("  Avg daily usage:     {:.2} h", summary.avg_usage);
            println!("  Avg addiction score: {:.2}", summary.avg_addiction);
            println!("  Avg mental health:   {:.2}", summary.avg_mental_health);
            println!("  Columns:             {}", summary.columns.join(", "));
        }
        ChartModel::Distribution(dist) => {
            println!("{:<10} {:>12} {:>12}", "Bin", "Frequency", "Fitted");
            println!("{}", "-".repeat(36));
            for point in &dist.points {
                println!("{:<10} {:>12.4} {:>12.4}", point.label, point.frequency, point.fitted);
            }
            println!();
            println!(
                "  mean {:.3}  std {:.3}  skewness {:.3}  kurtosis {:.3}",
                dist.stats.mean, dist.stats.std, dist.stats.skewness, dist.stats.kurtosis
            );
        }
        ChartModel::Heatmap { heatmap, .. } => {
            print!("{:<18}", "");
            for column in &heatmap.columns {
                print!(" {:>8}", truncate_str(column, 8));
            }
            println!();
            for row in &heatmap.rows {
                print!("{:<18}", truncate_str(&row.label, 17));
                for cell in &row.cells {
                    print!(" {:>8}", cell.display);
                }
                println!();
            }
        }
        ChartModel::BoxPlot(chart) => {
            println!("  Domain: [{:.2}, {:.2}]\n", chart.domain.min, chart.domain.max);
            println!(
                "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>9} {:>7}",
                "Category", "Min", "Q1", "Median", "Q3", "Max", "Outliers", "Count"
            );
            println!("{}", "-".repeat(80));
            for group in &chart.groups {
                println!(
                    "{:<16} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>9} {:>7}",
                    truncate_str(&group.category, 15),
                    group.min,
                    group.q1,
                    group.median,
                    group.q3,
                    group.max,
                    group.outliers.len(),
                    group.count
                );
            }
        }
        ChartModel::Pca(pca) => {
            println!("{:<10} {:>10} {:>12}", "Component", "Variance", "Cumulative");
            println!("{}", "-".repeat(34));
            for record in &pca.scree {
                println!("{:<10} {:>10.3} {:>12.3}", record.component, record.variance, record.cumulative);
            }
            println!("\n  Loadings");
            for row in &pca.loadings {
                let values: Vec<String> = row.loadings.iter().map(|v| format!("{v:>7.3}")).collect();
                println!("  {:<18} {}", truncate_str(&row.feature, 17), values.join(" "));
            }
        }
        ChartModel::TTest(table) => {
            for (group, mean) in table.result.groups.iter().zip(&table.result.means) {
                println!("  Mean ({group}): {mean:.3}");
            }
            println!("  t statistic: {:.3}", table.result.t_statistic);
            println!("  p-value:     {:.4}", table.result.p_value);
            println!(
                "  {}",
                if table.significant {
                    "Significant at the 5% level"
                } else {
                    "Not significant at the 5% level"
                }
            );
        }
        ChartModel::Gini(rows) => {
            println!("{:<30} {:>12}", "Metric", "Gini");
            println!("{}", "-".repeat(43));
            for row in rows {
                println!("{:<30} {:>12.3}", row.label, row.coefficient);
            }
        }
        ChartModel::MonteCarlo(chart) => {
            println!("{:<10} {:>12}", "Mean", "Frequency");
            println!("{}", "-".repeat(23));
            for bin in &chart.bins {
                println!("{:<10} {:>12.2}", bin.label, bin.frequency);
            }
            println!("\n  95% CI: [{:.2}, {:.2}]", chart.ci_95[0], chart.ci_95[1]);
        }
        ChartModel::Regression(summary) => {
            println!("  R²:  {:.4}", summary.diagnostics.r_squared);
            println!("  AIC: {:.2}", summary.diagnostics.aic);
            for (name, coef) in &summary.diagnostics.params {
                let p = summary.diagnostics.pvalues.get(name).copied().unwrap_or(f64::NAN);
                println!("  {:<24} {:>10.4}  (p = {:.4})", truncate_str(name, 23), coef, p);
            }
            println!("\n  Summary table: {} bytes of HTML (use --json to view)", summary.summary_html.len());
        }
    }
}

/// Truncate a string to fit a column, marking the cut with `~`.
fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}
