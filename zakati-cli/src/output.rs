//! Terminal rendering of a finished calculation.

use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use zakati_core::prelude::*;
use zakati_report::summary_lines;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// The four summary lines as a table.
pub fn summary_table(result: &ZakatResult) -> String {
    let rows = summary_lines(result).into_iter().map(|line| SummaryRow {
        item: line.label.to_string(),
        amount: format!("{:.2} {}", line.amount, line.currency),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line verdict under the table.
pub fn status_line(result: &ZakatResult) -> String {
    if result.is_payable {
        format!("Zakat is due: {}", result.format_money(result.zakat_due)).green().bold().to_string()
    } else {
        "Net assets are below the nisab; no Zakat is due.".yellow().to_string()
    }
}
