use crate::{
    commands::{Commands, PageArgs, SqlArgs},
    env::{EnvManager, PagerConfig},
    error::CliError,
};
use clap::Parser;
use connectors::{
    error::ConnectorError,
    file::{csv::load_csv, json::load_json, types::column_type},
    memory::MemoryTable,
    sql::{executor::SqlExecutor, table::SqlTable},
};
use model::{core::value::Value, records::row::RowData};
use planner::{
    pagination::{paginate, pages},
    query::{ast::common::TableRef, dialect::DialectKind},
};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "pager",
    version = "0.1.0",
    about = "Offset and cursor pagination over tabular data"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Env file with PAGER_* defaults (./.env is read when present)"
    )]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut env = EnvManager::new();
    match &cli.env_file {
        Some(path) => env.load_from_file(path)?,
        None if Path::new(".env").is_file() => env.load_from_file(".env")?,
        None => {}
    }
    let config = PagerConfig::from_env(&env)?;

    init_tracing(&config.log);

    match cli.command {
        Commands::Page(args) => run_page(args, &config),
        Commands::Sql(args) => run_sql(args, &config),
    }
}

/// `RUST_LOG` wins over `PAGER_LOG`; logs go to stderr so stdout stays parseable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_dataset(path: &Path) -> Result<Vec<RowData>, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(load_csv(path)?),
        "json" => Ok(load_json(path)?),
        other => Err(CliError::UnsupportedFormat(format!(
            "'{other}' ({}); expected .csv or .json",
            path.display()
        ))),
    }
}

fn run_page(args: PageArgs, config: &PagerConfig) -> Result<(), CliError> {
    let rows = load_dataset(&args.file)?;
    let name = args
        .file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();
    let table = MemoryTable::new(name, rows);

    let column = args
        .page
        .order_by
        .as_deref()
        .and_then(|field| column_type(table.rows(), field));
    let first = args.page.to_page(config.limit, column)?;

    info!(
        dataset = %args.file.display(),
        rows = table.rows().len(),
        mode = %first.mode,
        limit = first.limit,
        "Paging dataset"
    );

    if !args.all {
        let mut records = Vec::new();
        let next = paginate(&table, &first, &mut records)?;
        return output::print_page(&records, &next, args.json);
    }

    let mut walked = 0usize;
    for result in pages(&table, first) {
        let page = result?;
        walked += 1;
        output::print_page(&page.records, &page.next, args.json)?;
    }
    info!(pages = walked, "Walk complete");

    Ok(())
}

/// Captures statements instead of running them; every query is empty.
#[derive(Default)]
struct DryRunExecutor {
    statements: RefCell<Vec<(String, Vec<Value>)>>,
}

impl SqlExecutor for DryRunExecutor {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<RowData>, ConnectorError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(Vec::new())
    }

    fn query_count(&self, sql: &str, params: &[Value]) -> Result<u64, ConnectorError> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(0)
    }
}

fn run_sql(args: SqlArgs, config: &PagerConfig) -> Result<(), CliError> {
    let page = args.page.to_page(config.limit, None)?;
    let dialect = match &args.dialect {
        Some(raw) => raw.parse::<DialectKind>().map_err(CliError::Config)?,
        None => config.dialect,
    };
    let table_ref = TableRef {
        schema: args.schema.clone(),
        name: args.table.clone(),
    };

    let executor = DryRunExecutor::default();
    let table = SqlTable::new(&executor, table_ref, dialect);

    let mut records = Vec::new();
    paginate(&table, &page, &mut records)?;

    for (sql, params) in executor.statements.borrow().iter() {
        output::print_statement(sql, params);
    }

    Ok(())
}
