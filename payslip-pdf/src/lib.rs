//! # payslip-pdf
//!
//! Fixed-page PDF layout library - low-level drawing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to draw:
//! - Single A4 page assembly
//! - Text placement (regular/bold Helvetica, fill color)
//! - Hairline rules and bordered regions
//! - Top-down millimetre coordinates
//!
//! Business logic (WHAT to draw) should stay in application code:
//! - Payslip layout and pay computation → payslip-server
//!
//! ## Example
//!
//! ```ignore
//! use payslip_pdf::PageBuilder;
//!
//! let mut page = PageBuilder::new("Pay Slip")?;
//! page.hline(10.0, 200.0, 20.0);
//! page.bold(20.0, 40.0, 10.0, "Pay Period: ");
//! page.text(60.0, 40.0, 10.0, "Apr 2023");
//! let bytes = page.finish()?;
//! ```

mod error;
mod page;

// Re-exports
pub use error::{RenderError, RenderResult};
pub use page::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PageBuilder};
