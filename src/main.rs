use anyhow::Result;
use banshelf_core::{BookOrder, SortMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod errors;
mod handlers;
mod state;
mod ui;

use errors::map_load_error;
use handlers::BrowseOptions;
use state::{resolve_config, AppState, Config};
use ui::{show_error, OutputFormat};

/// Banned books browser - filter, count, and report on book ban records
///
/// Examples:
///   # First page of every book, most-banned first
///   banshelf browse
///
///   # Books carrying BOTH subjects (AND within a facet group)
///   banshelf browse --facet subject=Fiction --facet "subject=LGBTQ+ people"
///
///   # Books banned on military bases, searched by author
///   banshelf browse --facet state=DoDEA --query morrison
///
///   # Choropleth figures per state, as JSON
///   banshelf map --format json
///
///   # Top three subjects in every state
///   banshelf report --top 3
#[derive(Parser, Debug)]
#[command(name = "banshelf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Filtering Logic:\n  \
    - Multiple --facet values in the SAME group are combined with AND\n  \
    - Different facet groups are combined with AND\n  \
    - --query matches title or author, case-insensitively\n  \
    - state=DoDEA also matches bans recorded under \"Nation\"\n\n\
Configuration:\n  \
    - Flags override environment variables, which override banshelf.toml")]
struct Cli {
    /// Path to the JSON array of book records
    #[arg(short, long, global = true, env = "BANSHELF_DATA", value_name = "FILE")]
    data: Option<PathBuf>,

    /// Path to a TOML config file (default: ./banshelf.toml if present)
    #[arg(short, long, global = true, env = "BANSHELF_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and page through books, with facet counts
    Browse(BrowseArgs),
    /// Per-state book and ban tallies
    Map,
    /// Books listed under each school district
    Districts(DistrictsArgs),
    /// Most common subjects in each state
    Report(ReportArgs),
    /// List records with missing or duplicated data
    Audit,
}

#[derive(Args, Debug)]
struct BrowseArgs {
    /// Facet filter (format: group=value, group is subject, state or district; repeatable)
    #[arg(short, long = "facet", value_name = "GROUP=VALUE")]
    facets: Vec<String>,

    /// Free-text search on title or author
    #[arg(short, long, value_name = "TEXT")]
    query: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Books per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Result order
    #[arg(long, value_enum, default_value_t = OrderArg::Bans)]
    order: OrderArg,

    /// Subject facet order (count or alpha)
    #[arg(long, value_name = "MODE")]
    subject_sort: Option<SortMode>,

    /// State facet order (count or alpha)
    #[arg(long, value_name = "MODE")]
    state_sort: Option<SortMode>,

    /// District facet order (count or alpha)
    #[arg(long, value_name = "MODE")]
    district_sort: Option<SortMode>,

    /// Facet values shown per group
    #[arg(long, value_name = "N")]
    facet_limit: Option<usize>,
}

#[derive(Args, Debug)]
struct DistrictsArgs {
    /// Only show districts in this state
    #[arg(short, long, value_name = "STATE")]
    state: Option<String>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Subjects listed per state
    #[arg(short, long, value_name = "N")]
    top: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    /// Most bans first
    Bans,
    /// Alphabetical by title
    Title,
}

impl From<OrderArg> for BookOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Bans => BookOrder::BanCount,
            OrderArg::Title => BookOrder::Title,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("banshelf=info,banshelf_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        show_error("Command failed", err.to_string(), error_details(&err));
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = resolve_config(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }

    let state = load_state(config);

    match cli.command {
        Command::Browse(args) => {
            let options = browse_options(&args, &state.config);
            handlers::handle_browse(&state, &options, cli.format)
        }
        Command::Map => handlers::handle_map(&state, cli.format),
        Command::Districts(args) => {
            handlers::handle_districts(&state, args.state.as_deref(), cli.format)
        }
        Command::Report(args) => {
            let top = args.top.unwrap_or(state.config.report_top);
            handlers::handle_report(&state, top, cli.format)
        }
        Command::Audit => handlers::handle_audit(&state, cli.format),
    }
}

/// Underlying causes of an error, one per line, without the top-level message
fn error_details(err: &anyhow::Error) -> String {
    err.chain()
        .skip(1)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Load the dataset once; a failure is reported and ends the process
fn load_state(config: Config) -> AppState {
    let path = config.data_path.clone();
    AppState::load(config).unwrap_or_else(|err| {
        let (title, message, details) = map_load_error(&err, &path);
        show_error(title, message, details);
        process::exit(1);
    })
}

fn browse_options(args: &BrowseArgs, config: &Config) -> BrowseOptions {
    BrowseOptions {
        facets: args.facets.clone(),
        query: args.query.clone(),
        page: args.page,
        page_size: args.page_size.unwrap_or(config.page_size),
        order: args.order.into(),
        subject_sort: args.subject_sort.unwrap_or(config.subject_sort),
        state_sort: args.state_sort.unwrap_or(config.state_sort),
        district_sort: args.district_sort.unwrap_or(config.district_sort),
        facet_limit: args.facet_limit.unwrap_or(config.facet_limit),
    }
}
