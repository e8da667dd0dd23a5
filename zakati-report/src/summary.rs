use rust_decimal::Decimal;
use serde::Serialize;
use zakati_core::{Currency, ZakatResult};

/// Title shown at the top of every report.
pub const REPORT_TITLE: &str = "Zakat Calculation Report";

/// One labelled monetary line of the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub amount: Decimal,
    pub currency: Currency,
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.2} {}", self.label, self.amount, self.currency)
    }
}

/// The four reported figures, in display order.
pub fn summary_lines(result: &ZakatResult) -> [SummaryLine; 4] {
    let line = |label, amount| SummaryLine {
        label,
        amount,
        currency: result.currency,
    };
    [
        line("Total Assets", result.total_assets),
        line("Total Liabilities", result.total_liabilities),
        line("Nisab Threshold", result.nisab_threshold),
        line("Zakat Due", result.zakat_due),
    ]
}
