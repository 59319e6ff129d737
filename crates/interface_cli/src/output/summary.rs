//! Plain-text run summary
//!
//! One right-aligned row per invoice: contract name, description and the
//! invoice total before discounts. Every cell is padded on the left to the
//! column width, or to one past its own width when longer.

use domain_billing::InvoiceRun;

const COLUMN_WIDTH: usize = 40;
const PADDING: usize = 1;

/// Renders one summary row per invoice in `run`
pub fn render_summary(run: &InvoiceRun) -> String {
    run.invoices
        .iter()
        .map(|invoice| {
            let total = format!("{:.2}", invoice.total());
            let mut row: String = [invoice.name(), invoice.description.as_str(), total.as_str()]
                .into_iter()
                .map(cell)
                .collect();
            row.push('\n');
            row
        })
        .collect()
}

fn cell(text: &str) -> String {
    let width = COLUMN_WIDTH.max(text.chars().count() + PADDING);
    format!("{:>width$}", text, width = width)
}
