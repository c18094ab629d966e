use clap::{Parser, Subcommand};
use dwcdp_explorer::catalog::Dataset;
use dwcdp_explorer::datapackage::{Descriptor, ImportMode};
use dwcdp_explorer::measure::TextTable;
use dwcdp_explorer::session::{Session, read_file_as_text};
use dwcdp_explorer::summary;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "dwcdp-explorer", about = "Explore DwC-DP table schemas and their relationships")]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print graph elements and the focal table as JSON
    Graph {
        /// datapackage.json to load instead of the bundled catalog
        #[arg(long, short = 'p')]
        datapackage: Option<PathBuf>,
        /// Import mode: filter, resynthesize
        #[arg(long, short = 'm', default_value = "filter")]
        mode: String,
        /// Table to center the graph on
        #[arg(long, short = 'f')]
        focal: Option<String>,
    },
    /// Show which table links and categories are enabled
    Ui {
        #[arg(long, short = 'p')]
        datapackage: Option<PathBuf>,
        #[arg(long, short = 'm', default_value = "filter")]
        mode: String,
    },
    /// List the foreign keys of a datapackage.json
    Summary {
        file: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Command::Graph {
            datapackage,
            mode,
            focal,
        } => run_graph(datapackage.as_deref(), &mode, focal.as_deref()),
        Command::Ui { datapackage, mode } => run_ui(datapackage.as_deref(), &mode),
        Command::Summary { file, json } => run_summary(&file, json),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_session(datapackage: Option<&Path>, mode: &str) -> Result<Session, Box<dyn std::error::Error>> {
    let mode = ImportMode::from_str(mode).ok_or_else(|| format!("Invalid import mode: {mode}"))?;
    let mut session = Session::new(Dataset::bundled()?, mode);
    if let Some(path) = datapackage {
        session.upload_file(path)?;
    }
    Ok(session)
}

fn run_graph(datapackage: Option<&Path>, mode: &str, focal: Option<&str>) -> CliResult {
    let mut session = load_session(datapackage, mode)?;
    if let Some(name) = focal {
        if !session.set_focal(name) {
            return Err(format!("Unknown table: {name}").into());
        }
    }

    let output = serde_json::json!({
        "focal": session.focal(),
        "elements": session.graph(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_ui(datapackage: Option<&Path>, mode: &str) -> CliResult {
    let session = load_session(datapackage, mode)?;
    let links = session.bundled_links();
    let state = session.ui_state(&links);

    let mut categories = TextTable::new(vec!["category", "enabled"]);
    for c in &state.categories {
        categories.push_row(vec![c.category.to_string(), c.enabled.to_string()]);
    }
    print!("{}", categories.render());
    println!();

    let mut tables = TextTable::new(vec!["table", "enabled"]);
    for link in &state.links {
        tables.push_row(vec![link.table.clone(), link.enabled.to_string()]);
    }
    print!("{}", tables.render());
    Ok(())
}

fn run_summary(file: &Path, json: bool) -> CliResult {
    let raw = read_file_as_text(file)?;
    let descriptor = Descriptor::parse(&raw)?;
    let rows = summary::summarize(&descriptor);

    if json {
        println!("{}", summary::to_json(&rows)?);
    } else {
        print!("{}", summary::to_text(&rows));
    }
    Ok(())
}
