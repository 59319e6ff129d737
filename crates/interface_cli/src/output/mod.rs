//! Presentation of an invoice run

pub mod summary;
pub mod xml;

pub use summary::render_summary;
pub use xml::render_invoices;
