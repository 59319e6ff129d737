//! Invoice export in the `winstrom` import format
//!
//! Each billed contract becomes one `faktura-vydana` element with its lines
//! under `polozkyFaktury`. References are written in `code:` form and dates
//! in ISO form. Last-invoiced dates are never exported.

use std::fmt::{self, Write};

use core_kernel::temporal::ISO_DATE_FORMAT;
use domain_billing::{BilledContract, BilledItem, InvoiceRun};

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const FORMAT_VERSION: &str = "1.0";

/// Renders the billed snapshot of `run` as an import document
pub fn render_invoices(run: &InvoiceRun, source: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", XML_HEADER)?;
    writeln!(
        out,
        r#"<winstrom version="{}" source="{}">"#,
        FORMAT_VERSION,
        escape(source)
    )?;
    for invoice in &run.invoices {
        write_invoice(&mut out, invoice)?;
    }
    writeln!(out, "</winstrom>")?;
    Ok(out)
}

fn write_invoice(out: &mut String, invoice: &BilledContract) -> fmt::Result {
    writeln!(out, "  <faktura-vydana>")?;
    element(out, 4, "cisSml", invoice.name())?;
    element(out, 4, "zakazka", &invoice.order_code())?;
    element(out, 4, "datVyst", &invoice.issue_date.format(ISO_DATE_FORMAT).to_string())?;
    element(out, 4, "duzpPuv", &invoice.tax_point_date.format(ISO_DATE_FORMAT).to_string())?;
    element(out, 4, "popis", &invoice.description)?;
    element(out, 4, "typDokl", &invoice.document_type_code())?;
    if let Some(discount) = invoice.discount {
        element(out, 4, "slevaDokl", &discount.to_string())?;
    }
    writeln!(out, "    <polozkyFaktury>")?;
    for item in &invoice.items {
        write_item(out, item)?;
    }
    writeln!(out, "    </polozkyFaktury>")?;
    writeln!(out, "  </faktura-vydana>")
}

fn write_item(out: &mut String, item: &BilledItem) -> fmt::Result {
    writeln!(out, "      <faktura-vydana-polozka>")?;
    element(out, 8, "cisRad", &item.line_number.to_string())?;
    element(out, 8, "nazev", &item.description)?;
    element(out, 8, "cenik", &item.price_list_code())?;
    element(out, 8, "mnozMj", &item.quantity.to_string())?;
    element(out, 8, "cenaMj", &item.unit_price.to_string())?;
    element(out, 8, "slevaPol", &item.discount.to_string())?;
    writeln!(out, "      </faktura-vydana-polozka>")
}

fn element(out: &mut String, indent: usize, name: &str, text: &str) -> fmt::Result {
    writeln!(
        out,
        "{:indent$}<{name}>{}</{name}>",
        "",
        escape(text),
        indent = indent,
        name = name
    )
}

/// Escapes text for use in element content and attribute values
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("A & B <C> \"d\" 'e'"), "A &amp; B &lt;C&gt; &quot;d&quot; &apos;e&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_element_indentation() {
        let mut out = String::new();
        element(&mut out, 4, "cisRad", "1").unwrap();
        assert_eq!(out, "    <cisRad>1</cisRad>\n");
    }
}
