use crate::error::CliError;
use clap::{Args, Subcommand};
use connectors::file::types::ColumnType;
use model::{
    core::value::Value,
    pagination::{mode::Mode, page::Page},
};
use std::{path::PathBuf, str::FromStr};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page, or every page, of a CSV or JSON dataset
    Page(PageArgs),

    /// Print the SQL a page descriptor issues against a table
    Sql(SqlArgs),
}

#[derive(Args, Debug)]
pub struct PageArgs {
    #[arg(long, help = "Dataset path (.csv or .json)")]
    pub file: PathBuf,

    #[command(flatten)]
    pub page: PageOpts,

    #[arg(long, help = "Walk every page from the given descriptor to the end")]
    pub all: bool,

    #[arg(
        long,
        help = "If set, prints records and the next descriptor as JSON instead of a table"
    )]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SqlArgs {
    #[arg(long, help = "Table name")]
    pub table: String,

    #[arg(long, help = "Schema qualifying the table")]
    pub schema: Option<String>,

    /// SQL dialect: "pg" or "mysql" (defaults to PAGER_DIALECT, then pg)
    #[arg(long)]
    pub dialect: Option<String>,

    #[command(flatten)]
    pub page: PageOpts,
}

/// Flags describing the page to fetch.
#[derive(Args, Debug)]
pub struct PageOpts {
    #[arg(
        long,
        help = "Descriptor JSON returned by a previous call; replaces the flags below"
    )]
    pub resume: Option<String>,

    /// Pagination mode: "offset" or "cursor"
    #[arg(long, default_value = "offset")]
    pub mode: String,

    #[arg(long, required_unless_present = "resume", help = "Column to order by")]
    pub order_by: Option<String>,

    #[arg(
        long,
        help = "Record field read for the next cursor (defaults to --order-by)"
    )]
    pub cursor_field: Option<String>,

    #[arg(long, help = "Walk in descending order")]
    pub reverse: bool,

    #[arg(long, help = "Page size (defaults to PAGER_LIMIT, then 50)")]
    pub limit: Option<u64>,

    #[arg(long, default_value_t = 0, help = "Records to skip in offset mode")]
    pub offset: u64,

    #[arg(long, help = "Cursor value to continue after in cursor mode")]
    pub after: Option<String>,
}

impl PageOpts {
    /// Builds the first descriptor, or decodes the one passed with `--resume`.
    ///
    /// `column` is the type of the ordering column when a dataset is at hand;
    /// `--after` is parsed as that type, or detected from its text otherwise.
    pub fn to_page(
        &self,
        default_limit: u64,
        column: Option<ColumnType>,
    ) -> Result<Page, CliError> {
        if let Some(json) = &self.resume {
            return Ok(serde_json::from_str(json)?);
        }

        let order_by = self.order_by.clone().unwrap_or_default();
        let limit = self.limit.unwrap_or(default_limit);

        let page = match Mode::from_str(&self.mode)? {
            Mode::Offset => Page::offset(order_by, limit).starting_at(self.offset),
            Mode::Cursor => {
                let field = self.cursor_field.clone().unwrap_or_else(|| order_by.clone());
                let page = Page::cursor(order_by, field, limit);
                match &self.after {
                    Some(raw) => page.after(after_value(raw, column)?),
                    None => page,
                }
            }
        };

        Ok(page.reversed(self.reverse))
    }
}

fn after_value(raw: &str, column: Option<ColumnType>) -> Result<Value, CliError> {
    if raw.is_empty() {
        return Err(CliError::Config("--after needs a non-empty value".into()));
    }
    let column = column.unwrap_or_else(|| ColumnType::detect(raw));
    column.parse(raw).ok_or_else(|| {
        CliError::Config(format!("--after '{raw}' is not a valid {column:?} value"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use model::pagination::mode::ModeError;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    fn page_opts(args: &[&str]) -> PageOpts {
        let mut argv = vec!["pager", "page", "--file", "data.csv"];
        argv.extend_from_slice(args);
        match TestCli::try_parse_from(argv).unwrap().command {
            Commands::Page(args) => args.page,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_offset_page_from_flags() {
        let page = page_opts(&["--order-by", "id", "--offset", "4", "--reverse"])
            .to_page(50, None)
            .unwrap();

        assert_eq!(page, Page::offset("id", 50).starting_at(4).reversed(true));
    }

    #[test]
    fn test_cursor_page_from_flags() {
        let page = page_opts(&[
            "--mode",
            "cursor",
            "--order-by",
            "date_creation",
            "--limit",
            "2",
            "--after",
            "2024-01-01T12:00:01Z",
        ])
        .to_page(50, None)
        .unwrap();

        assert_eq!(page.cursor.field, "date_creation");
        assert_eq!(page.limit, 2);
        assert!(matches!(page.cursor.value, Some(Value::Timestamp(_))));
    }

    #[test]
    fn test_after_takes_the_column_type() {
        let opts = page_opts(&["--mode", "cursor", "--order-by", "code", "--after", "10"]);

        let page = opts.to_page(50, Some(ColumnType::String)).unwrap();
        assert_eq!(page.cursor.value, Some(Value::from("10")));

        let page = opts.to_page(50, None).unwrap();
        assert_eq!(page.cursor.value, Some(Value::Int(10)));

        let err = page_opts(&["--mode", "cursor", "--order-by", "id", "--after", "ten"])
            .to_page(50, Some(ColumnType::Int))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_empty_after_is_rejected() {
        let err = page_opts(&["--mode", "cursor", "--order-by", "id", "--after", ""])
            .to_page(50, None)
            .unwrap_err();
        assert!(matches!(err, CliError::Config(ref m) if m.contains("--after")));
    }

    #[test]
    fn test_unknown_mode() {
        let err = page_opts(&["--mode", "keyset", "--order-by", "id"])
            .to_page(50, None)
            .unwrap_err();

        assert!(matches!(err, CliError::Mode(ModeError::UnknownMode(ref m)) if m == "keyset"));
    }

    #[test]
    fn test_resume_replays_descriptor() {
        let previous = Page::cursor("id", "ID", 2).after(2_i64);
        let json = serde_json::to_string(&previous).unwrap();

        let page = page_opts(&["--resume", json.as_str()]).to_page(50, None).unwrap();
        assert_eq!(page, previous);
    }

    #[test]
    fn test_order_by_required_without_resume() {
        assert!(TestCli::try_parse_from(["pager", "page", "--file", "data.csv"]).is_err());
    }
}
