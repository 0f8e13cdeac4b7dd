use std::{env, process};

use colored::Colorize;
use fintrack_core::{
    config::{Config, ConfigManager},
    core::services::{ServiceError, SummaryService, TransactionForm, TransactionService},
    currency::{format_percentage, Currency},
    domain::TimeRange,
    init,
    storage::JsonFileStorage,
    utils::build_info,
    LedgerError, LedgerStore, SystemClock,
};

const USAGE: &str = "usage: fintrack_cli [report [week|month|quarter|year|all] | add <income|expense> <amount> <description> [category] | clear | version]";

fn main() {
    init();

    if let Err(err) = run(env::args().skip(1).collect()) {
        eprintln!("{} {err}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run(args: Vec<String>) -> Result<(), ServiceError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let storage = JsonFileStorage::new(config.resolve_data_dir(manager.base_dir()))?;
    let mut store = LedgerStore::open(storage, SystemClock)?;

    let command = args.first().map(String::as_str).unwrap_or("report");
    match command {
        "report" => {
            let selector = args
                .get(1)
                .map(|value| TimeRange::parse(value))
                .unwrap_or(config.default_time_range);
            store.select_time_range(selector);
            print_report(&store, &config, selector);
        }
        "add" => {
            if args.len() < 4 {
                return Err(usage_error());
            }
            let form = TransactionForm {
                kind: args[1].clone(),
                amount: args[2].clone(),
                description: args[3].clone(),
                category: args.get(4).cloned(),
                date: None,
            };
            let outcome = TransactionService::record_form(&mut store, &form)?;
            if let Some(warning) = &outcome.persistence {
                eprintln!("{} {warning}", "Warning:".yellow().bold());
            }
            println!("Recorded {}", outcome.value.id);
        }
        "clear" => {
            let outcome = store.clear();
            if let Some(warning) = &outcome.persistence {
                eprintln!("{} {warning}", "Warning:".yellow().bold());
            }
            println!("Removed {} transactions", outcome.value);
        }
        "version" => println!("fintrack_cli {}", build_info::current().describe()),
        _ => return Err(usage_error()),
    }
    Ok(())
}

fn usage_error() -> ServiceError {
    LedgerError::InvalidInput(USAGE.to_string()).into()
}

fn print_report(store: &LedgerStore, config: &Config, selector: TimeRange) {
    let currency: &Currency = config.currency();
    let summary = store.summary();

    println!("{}", format!("Summary · {}", selector.label()).bold());
    println!("  Balance  {}", currency.format(summary.balance).bold());
    println!(
        "  Income   {}",
        currency.format(summary.total_income).green()
    );
    println!(
        "  Expenses {}",
        currency.format(summary.total_expense).red()
    );

    if summary.categories.is_empty() {
        println!("\nNo expenses in this period.");
    } else {
        println!("\n{}", "Spending by Category".bold());
        for total in &summary.categories {
            let category = store.registry().lookup(Some(total.category.as_str()));
            println!(
                "  {:<16} {:>12} {:>8}",
                category.name,
                currency.format(total.amount),
                format_percentage(total.percentage)
            );
        }
    }

    let recent = store.recent_transactions(Some(config.recent_limit));
    if recent.is_empty() {
        return;
    }
    println!("\n{}", "Recent Transactions".bold());
    for group in SummaryService::group_by_day(recent) {
        println!("  {}", group.title().dimmed());
        for txn in &group.transactions {
            let amount = currency.format_signed(txn.amount, &txn.kind);
            let amount = if txn.is_income() {
                amount.green()
            } else {
                amount.red()
            };
            println!("    {:<28} {:>14}", txn.description, amount);
        }
    }
}
