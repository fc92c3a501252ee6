use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use spendscope_core::{Direction, EnrichedDataset, YearMonth, parse_weekday};
use spendscope_finance::insights::{self, GroupKey, Metric};
use spendscope_finance::{Enricher, Filter, write_csv};
use spendscope_ingest::{Extractor, StatementDocument, load_pdf_path, parse_raw_csv_path};
use std::path::{Path, PathBuf};
use tracing::info;

mod config;
mod logging;
mod report;
mod state;

#[derive(Parser, Debug)]
#[command(name = "spendscope", version, about = "Spending insights from payment-app statements")]
struct Cli {
    /// Config file (default: ~/.spendscope/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summary, monthly/category breakdowns and top merchants for a statement
    Analyze {
        /// Statement PDF (or pdftotext .txt output)
        input: PathBuf,

        /// Also write the enriched CSV here
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Number of merchants to list (default: 10)
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Replace an existing --csv file
        #[arg(long)]
        overwrite: bool,
    },

    /// Quick answers for one month (all months when --month is omitted)
    Insights {
        input: PathBuf,

        /// Month as YYYY-MM
        #[arg(long)]
        month: Option<YearMonth>,

        #[arg(long)]
        json: bool,
    },

    /// Filtered totals, optionally grouped
    Query {
        input: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// month, week, weekday, category, merchant, spend_bucket, day_type
        #[arg(long)]
        group_by: Option<GroupKey>,

        /// total, count or average (default: total)
        #[arg(long, default_value = "total")]
        metric: Metric,

        #[arg(long)]
        json: bool,
    },

    /// Write the enriched dataset as CSV
    Export {
        input: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        overwrite: bool,
    },

    /// Enrich a raw Date,Merchant,Type,Amount CSV
    Enrich {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        overwrite: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Month number (3) or YYYY-MM; repeatable
    #[arg(long = "month", value_parser = parse_month_arg)]
    months: Vec<MonthArg>,

    /// Category label; repeatable
    #[arg(long = "category")]
    categories: Vec<String>,

    #[arg(long)]
    min: Option<f64>,

    #[arg(long)]
    max: Option<f64>,

    /// Weekday name (mon, saturday, ...); repeatable
    #[arg(long = "weekday", value_parser = parse_weekday_arg)]
    weekdays: Vec<Weekday>,

    /// debit or credit
    #[arg(long)]
    direction: Option<Direction>,

    /// Substring of the description
    #[arg(long)]
    merchant: Option<String>,
}

/// `--month` value: a month number for any year, or one `YYYY-MM` period
#[derive(Debug, Clone, Copy, PartialEq)]
enum MonthArg {
    Number(u32),
    Period(YearMonth),
}

fn parse_month_arg(s: &str) -> std::result::Result<MonthArg, String> {
    match s.trim().parse::<u32>() {
        Ok(n) => Ok(MonthArg::Number(n)),
        Err(_) => s.parse::<YearMonth>().map(MonthArg::Period),
    }
}

fn parse_weekday_arg(s: &str) -> std::result::Result<Weekday, String> {
    parse_weekday(s).ok_or_else(|| format!("unknown weekday: {s}"))
}

impl FilterArgs {
    /// Out-of-range values (month 13, min > max) are left for [`Filter`] to
    /// report; they select nothing.
    fn to_filter(&self) -> Filter {
        let mut filter = Filter {
            date_from: self.from,
            date_to: self.to,
            categories: self.categories.clone(),
            amount_min: self.min,
            amount_max: self.max,
            weekdays: self.weekdays.clone(),
            direction: self.direction,
            merchant: self.merchant.clone(),
            ..Filter::default()
        };
        for m in &self.months {
            match *m {
                MonthArg::Number(n) => filter.months.push(n),
                MonthArg::Period(p) => filter.periods.push(p),
            }
        }
        filter
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(cli.config.as_deref())?;
    logging::init_logging(cli.log_level.as_deref().unwrap_or(&cfg.log_level));

    match cli.command {
        Command::Analyze {
            input,
            csv,
            json,
            top,
            overwrite,
        } => {
            let dataset = build_dataset(&input, &cfg.enricher()?)?;
            if let Some(out) = csv {
                export(&dataset, &out, overwrite)?;
            }
            if json {
                let all = Filter::new();
                let value = serde_json::json!({
                    "summary": insights::summary(&dataset),
                    "monthly": insights::group(&dataset, &all, GroupKey::Month, Metric::Total),
                    "categories": insights::group(&dataset, &all, GroupKey::Category, Metric::Total),
                    "top_merchants": insights::top_merchants(&dataset, &all, top),
                    "invalid": dataset.invalid().collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if has_records(&dataset, &input) {
                report::print_overview(&dataset, top);
            }
        }

        Command::Insights { input, month, json } => {
            let dataset = build_dataset(&input, &cfg.enricher()?)?;
            let months = match month {
                Some(m) => vec![m],
                None => insights::available_months(&dataset),
            };
            let results: Vec<_> = months
                .into_iter()
                .map(|m| insights::month_insights(&dataset, m))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if has_records(&dataset, &input) {
                results.iter().for_each(report::print_month);
            }
        }

        Command::Query {
            input,
            filter,
            group_by,
            metric,
            json,
        } => {
            let dataset = build_dataset(&input, &cfg.enricher()?)?;
            let filter = filter.to_filter();
            let total = insights::total_spend(&dataset, &filter);
            let count = insights::count(&dataset, &filter);
            let groups = group_by.map(|key| insights::group(&dataset, &filter, key, metric));

            if json {
                let value = serde_json::json!({
                    "total": total,
                    "count": count,
                    "groups": groups,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if has_records(&dataset, &input) {
                println!("Matching transactions: {count}");
                println!("Total: {total:.2}\n");
                if let (Some(key), Some(rows)) = (group_by, groups) {
                    report::print_group(&format!("{metric} by {key:?}"), &rows, metric);
                }
            }
        }

        Command::Export {
            input,
            out,
            overwrite,
        } => {
            let dataset = build_dataset(&input, &cfg.enricher()?)?;
            export(&dataset, &out, overwrite)?;
        }

        Command::Enrich {
            csv,
            out,
            overwrite,
        } => {
            if !csv.exists() {
                bail!("CSV not found: {} (pass --csv <path>)", csv.display());
            }
            let raws = parse_raw_csv_path(&csv).with_context(|| format!("parsing {}", csv.display()))?;
            let dataset = cfg.enricher()?.enrich_all(&raws);
            export(&dataset, &out, overwrite)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg)?),
        },
    }

    Ok(())
}

/// Load → extract → enrich, run to completion before any query.
fn build_dataset(input: &Path, enricher: &Enricher) -> Result<EnrichedDataset> {
    if !input.exists() {
        bail!("file not found: {}", input.display());
    }

    let document = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => {
            let text = std::fs::read_to_string(input)
                .with_context(|| format!("read {}", input.display()))?;
            StatementDocument::from_text(&text)
        }
        _ => load_pdf_path(input).with_context(|| format!("loading {}", input.display()))?,
    };

    let raws = Extractor::new()?.extract(&document);
    let dataset = enricher.enrich_all(&raws);
    info!(
        input = %input.display(),
        records = dataset.len(),
        invalid = dataset.invalid_count(),
        "statement ready"
    );
    Ok(dataset)
}

/// Print the "no transactions found" notice; returns whether there is anything to report.
fn has_records(dataset: &EnrichedDataset, input: &Path) -> bool {
    if dataset.is_empty() {
        println!("No transactions found in {}", input.display());
        return false;
    }
    true
}

fn export(dataset: &EnrichedDataset, out: &Path, overwrite: bool) -> Result<()> {
    state::prepare_output(out, overwrite)?;
    let file = std::fs::File::create(out).with_context(|| format!("create {}", out.display()))?;
    write_csv(dataset, file).with_context(|| format!("write {}", out.display()))?;
    println!("Wrote {} rows to {}", dataset.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_filter(args: &[&str]) -> Filter {
        let argv = ["spendscope", "query", "statement.pdf"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Query { filter, .. } => filter.to_filter(),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_filter_args_to_filter() {
        let f = query_filter(&[
            "--month", "3", "--month", "2024-04", "--weekday", "sat", "--category", "Food",
        ]);
        assert_eq!(f.months, vec![3]);
        assert_eq!(f.periods, vec![YearMonth::new(2024, 4).unwrap()]);
        assert_eq!(f.weekdays, vec![Weekday::Sat]);
        assert_eq!(f.categories, vec!["Food".to_string()]);
    }

    #[test]
    fn test_unparseable_filter_values_rejected_by_cli() {
        for args in [["--weekday", "someday"], ["--month", "march"], ["--month", "2024-13"]] {
            let argv = ["spendscope", "query", "statement.pdf"].iter().chain(args.iter());
            assert!(Cli::try_parse_from(argv).is_err(), "{args:?} should be rejected");
        }
    }

    #[test]
    fn test_out_of_range_month_selects_nothing() {
        let f = query_filter(&["--month", "13"]);
        assert!(!f.is_satisfiable());
    }

    #[test]
    fn test_analyze_overwrite_flag() {
        let cli = Cli::try_parse_from(["spendscope", "analyze", "s.pdf", "--csv", "out.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Analyze { overwrite: false, .. }));
        let cli = Cli::try_parse_from([
            "spendscope", "analyze", "s.pdf", "--csv", "out.csv", "--overwrite",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Analyze { overwrite: true, .. }));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "spendscope",
            "query",
            "statement.pdf",
            "--category",
            "Food",
            "--month",
            "3",
            "--group-by",
            "merchant",
            "--metric",
            "count",
        ])
        .unwrap();
        match cli.command {
            Command::Query {
                filter,
                group_by,
                metric,
                ..
            } => {
                assert_eq!(filter.categories, vec!["Food".to_string()]);
                assert_eq!(group_by, Some(GroupKey::Merchant));
                assert_eq!(metric, Metric::Count);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
