//! Payslip renderer
//!
//! Renders a payslip record into the fixed one-page document: a grid of
//! bordered regions with the brand block on top, employee details, the
//! two-column earnings-vs-deductions table, bank details and pay summary,
//! and the footer disclaimer. Drawing primitives come from `payslip-pdf`;
//! this module owns WHAT goes where.

use std::fs;
use std::path::PathBuf;

use payslip_pdf::{PageBuilder, RenderResult};

use super::compute::{PaySummary, money};
use crate::db::models::Payslip;

/// Brand accent color
const ACCENT: (u8, u8, u8) = (26, 162, 251);

/// Pay period month format, e.g. "Apr 2023"
const MONTH_FORMAT: &str = "%b %Y";
/// Pay date format, e.g. "01 Apr 2023"
const DATE_FORMAT: &str = "%d %b %Y";

/// Payslip document renderer
///
/// One document per payslip identifier: rendering again under the same
/// identifier overwrites the previous file, there is no versioning.
#[derive(Debug, Clone)]
pub struct PayslipRenderer {
    media_dir: PathBuf,
    company_name: String,
}

impl PayslipRenderer {
    pub fn new(media_dir: impl Into<PathBuf>, company_name: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            company_name: company_name.into(),
        }
    }

    /// Target path for a payslip's document
    pub fn document_path(&self, payslip_id: &str) -> PathBuf {
        self.media_dir.join(format!("{}.pdf", payslip_id))
    }

    /// Render the document and return its bytes
    pub fn render(&self, payslip: &Payslip) -> RenderResult<Vec<u8>> {
        let mut page = PageBuilder::new("Pay Slip")?;
        let summary = PaySummary::compute(payslip);

        self.brand_block(&mut page);
        self.title_block(&mut page, payslip);
        self.employee_block(&mut page, payslip);
        self.earnings_block(&mut page, &summary);
        self.bank_and_summary_block(&mut page, payslip, &summary);
        self.footer_block(&mut page);

        page.finish()
    }

    /// Render the document and write it to the media directory.
    ///
    /// A second render for the same identifier fully replaces the first.
    pub fn render_to_file(&self, payslip: &Payslip) -> RenderResult<PathBuf> {
        let bytes = self.render(payslip)?;
        let path = self.document_path(&payslip.payslip_id);

        fs::create_dir_all(&self.media_dir)?;
        fs::write(&path, &bytes)?;

        tracing::info!(path = %path.display(), "Payslip document written");
        Ok(path)
    }

    // === Blocks, top to bottom ===

    fn brand_block(&self, page: &mut PageBuilder) {
        page.color(ACCENT.0, ACCENT.1, ACCENT.2);
        page.bold_at(150.0, 12.0, 16.0, &self.company_name);
        page.black();
    }

    fn title_block(&self, page: &mut PageBuilder, payslip: &Payslip) {
        page.boxed(10.0, 20.0, 200.0, 40.0);
        page.text(100.0, 25.0, 10.0, "Pay Slip");

        page.boxed(10.0, 40.0, 200.0, 70.0);
        page.bold(20.0, 40.0, 10.0, "Pay Period: ");
        page.text(60.0, 40.0, 10.0, &payslip.month.format(MONTH_FORMAT).to_string());
        page.bold(100.0, 40.0, 10.0, "Pay Date: ");
        page.text(140.0, 40.0, 10.0, &payslip.day.format(DATE_FORMAT).to_string());
    }

    fn employee_block(&self, page: &mut PageBuilder, payslip: &Payslip) {
        page.bold(20.0, 50.0, 10.0, "Employee Name: ");
        page.text(60.0, 50.0, 10.0, &payslip.name);
        page.bold(100.0, 50.0, 10.0, "Position: ");
        page.text(140.0, 50.0, 10.0, &payslip.position);

        // A blank employee number omits the whole line, not just the value
        if !payslip.employee_no.trim().is_empty() {
            page.bold(20.0, 60.0, 10.0, "Employee No: ");
            page.text(60.0, 60.0, 10.0, &payslip.employee_no);
        }
    }

    fn earnings_block(&self, page: &mut PageBuilder, summary: &PaySummary) {
        page.boxed(10.0, 70.0, 200.0, 120.0);
        page.vline(120.0, 70.0, 120.0);

        // Left column: earnings & allowances
        page.bold(20.0, 70.0, 10.0, "Earnings & Allowances");
        page.bold(90.0, 70.0, 10.0, "INR");
        let earnings = [
            ("Basic Salary", summary.basic),
            ("House Rent Allowance", summary.house_rent_allowance),
            ("Special / Conv Allowance", summary.special_allowance),
            ("Other Allowance", summary.other_allowance),
        ];
        for (i, (label, amount)) in earnings.iter().enumerate() {
            let y = 80.0 + 10.0 * i as f32;
            page.text(20.0, y, 10.0, label);
            page.text(90.0, y, 10.0, &money(*amount));
        }

        // Right column: deductions
        page.bold(120.0, 70.0, 10.0, "Deductions");
        page.bold(160.0, 70.0, 10.0, "INR");
        let deductions = [
            ("Income Tax", summary.income_tax),
            ("Advance", summary.advance),
            ("Profession Tax", summary.profession_tax),
        ];
        for (i, (label, amount)) in deductions.iter().enumerate() {
            let y = 80.0 + 10.0 * i as f32;
            page.text(120.0, y, 10.0, label);
            page.text(160.0, y, 10.0, &money(*amount));
        }
    }

    fn bank_and_summary_block(
        &self,
        page: &mut PageBuilder,
        payslip: &Payslip,
        summary: &PaySummary,
    ) {
        page.boxed(10.0, 120.0, 200.0, 160.0);
        page.vline(120.0, 120.0, 160.0);

        page.bold(20.0, 120.0, 10.0, "Bank Account: ");
        page.text(20.0, 130.0, 10.0, "Account No: ");
        page.text(60.0, 130.0, 10.0, &payslip.account_no);
        page.text(20.0, 140.0, 10.0, "IFSC Code: ");
        page.text(60.0, 140.0, 10.0, &payslip.ifsc_code);

        page.bold(120.0, 120.0, 10.0, "Pay Summary");
        page.bold(160.0, 120.0, 10.0, "INR");
        let lines = [
            ("Total Gross", summary.total_gross),
            ("Deductions", summary.total_deductions),
            ("NET PAY", summary.net_pay),
        ];
        for (i, (label, amount)) in lines.iter().enumerate() {
            let y = 130.0 + 10.0 * i as f32;
            page.text(120.0, y, 10.0, label);
            page.text(160.0, y, 10.0, &money(*amount));
        }
    }

    fn footer_block(&self, page: &mut PageBuilder) {
        page.boxed(10.0, 160.0, 200.0, 190.0);
        page.text(75.0, 170.0, 10.0, "(*) denotes back pay adjustment");
        page.text(
            75.0,
            180.0,
            10.0,
            "Computer Generated Form does not require signature",
        );
    }
}

/// Byte-level search used by the render tests; PDF text operators keep the
/// literal label bytes in the content stream.
#[cfg(test)]
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
