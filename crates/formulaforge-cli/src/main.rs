//! FormulaForge CLI - evaluate, render and manage calculators

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use formulaforge::prelude::*;
use formulaforge::{display_formula, validate_calculator, CalculatorMetadata};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "formulaforge")]
#[command(author, version, about = "Formula evaluation engine for parameterized calculators")]
struct Cli {
    /// Calculator store file (default: $FORMULAFORGE_STORE or ~/.config/formulaforge/calculators.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a calculation pass over a calculator document
    Eval {
        /// Calculator JSON file
        file: PathBuf,

        /// Bind an input, e.g. `--set v=12`
        #[arg(short, long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the display notation of every output
    Notation {
        /// Calculator JSON file
        file: PathBuf,
    },

    /// Check a calculator document for problems
    Validate {
        /// Calculator JSON file
        file: PathBuf,
    },

    /// Render a calculator document as JSON, CSV or Markdown
    Export {
        /// Calculator JSON file
        file: PathBuf,

        /// Output format (json, csv, markdown)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the calculator store
    #[command(subcommand)]
    Store(StoreCommands),
}

#[derive(Subcommand)]
enum StoreCommands {
    /// List stored calculators
    List {
        /// Only show calculators in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Search titles, descriptions and categories
    Search { query: String },

    /// Import a calculator document (or an array of them)
    Import { file: PathBuf },

    /// Remove a calculator by id
    Remove { id: String },

    /// List the categories in use
    Categories,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Eval { file, set, json } => eval(&file, &set, json),
        Commands::Notation { file } => show_notation(&file),
        Commands::Validate { file } => validate(&file),
        Commands::Export {
            file,
            format,
            output,
        } => export(&file, format, output.as_deref()),
        Commands::Store(command) => run_store(cli.store, command),
    }
}

/// Parse `id=value`
fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
    if id.trim().is_empty() {
        return Err(format!("missing input id in '{}'", s));
    }
    Ok((id.trim().to_string(), value.trim().to_string()))
}

fn load(file: &Path, options: &ReadOptions) -> Result<Calculator> {
    CalculatorReader::read_file(file, options)
        .with_context(|| format!("Failed to load '{}'", file.display()))
}

fn eval(file: &Path, assignments: &[(String, String)], json: bool) -> Result<()> {
    let calc = load(file, &ReadOptions::default())?;

    let mut values = Vec::with_capacity(assignments.len());
    for (id, raw) in assignments {
        let input = calc
            .input(id)
            .with_context(|| format!("'{}' has no input '{}'", calc.title, id))?;
        values.push((id.as_str(), input.coerce(raw)));
    }

    let mut session = CalculationSession::new(&calc);
    let outcome = session
        .set_inputs(values)
        .context("Failed to bind inputs")?;

    if !outcome.is_valid() {
        for (id, message) in &outcome.errors {
            eprintln!("{}: {}", id, message);
        }
        bail!("{} input(s) failed validation", outcome.errors.len());
    }
    for failure in &outcome.failures {
        eprintln!("Warning: {} defaulted to 0 ({})", failure.output_id, failure.reason);
    }

    if json {
        let text = serde_json::to_string_pretty(&outcome.results)
            .context("Failed to serialize results")?;
        println!("{}", text);
        return Ok(());
    }

    for output in &calc.outputs {
        let value = outcome.results.get(&output.id).copied().unwrap_or(0.0);
        if output.unit.is_empty() {
            println!("{} = {}", output.label, value);
        } else {
            println!("{} = {} {}", output.label, value, output.unit);
        }
    }
    Ok(())
}

fn show_notation(file: &Path) -> Result<()> {
    let calc = load(file, &ReadOptions::default())?;
    for output in &calc.outputs {
        println!("{}\t{}", output.id, display_formula(output, &calc.inputs));
    }
    Ok(())
}

fn validate(file: &Path) -> Result<()> {
    let calc = load(file, &ReadOptions { validate: false })?;
    let report = validate_calculator(&calc);

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("Error: {}", error);
        }
        bail!("'{}' has {} problem(s)", file.display(), report.errors.len());
    }

    let meta = CalculatorMetadata::from_calculator(&calc);
    println!(
        "{}: {} inputs, {} outputs, complexity {}",
        meta.title, meta.input_count, meta.output_count, meta.complexity
    );
    Ok(())
}

fn export(file: &Path, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let calc = load(file, &ReadOptions::default())?;
    let text = CalculatorWriter::render(&calc, format, &WriteOptions::default())
        .context("Failed to export calculator")?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &text)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        eprintln!("Wrote '{}'", output_path.display());
    } else {
        io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}

fn run_store(path: Option<PathBuf>, command: StoreCommands) -> Result<()> {
    let config = StoreConfig::resolve(path).context("Failed to locate the calculator store")?;
    let mut store = CalculatorStore::open(config.clone())
        .with_context(|| format!("Failed to open store '{}'", config.path.display()))?;

    match command {
        StoreCommands::List { category } => {
            let calculators: Vec<&Calculator> = match category {
                Some(category) => store.filter_by_category(&category),
                None => store.list().iter().collect(),
            };
            print_listing(&calculators);
        }
        StoreCommands::Search { query } => print_listing(&store.search(&query)),
        StoreCommands::Categories => {
            for category in store.categories() {
                println!("{}", category);
            }
        }
        StoreCommands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read '{}'", file.display()))?;
            let ids = store
                .import_many_json(&json)
                .with_context(|| format!("Failed to import '{}'", file.display()))?;
            store.save().context("Failed to save store")?;
            eprintln!("Imported {} calculator(s): {}", ids.len(), ids.join(", "));
        }
        StoreCommands::Remove { id } => {
            let removed = store.remove(&id)?;
            store.save().context("Failed to save store")?;
            eprintln!("Removed '{}'", removed.title);
        }
    }
    Ok(())
}

fn print_listing(calculators: &[&Calculator]) {
    for calc in calculators {
        println!(
            "{}\t{}\t{}",
            calc.id,
            calc.title,
            calc.category.as_deref().unwrap_or("-")
        );
    }
}
