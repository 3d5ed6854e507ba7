//! Form binder
//!
//! Converts the submitted field/value pairs into a [`PayslipDraft`] through a
//! statically declared mapping: every known form field has exactly one typed
//! setter below, unknown fields fail the bind, and a field that cannot be
//! coerced fails the bind naming the offending field. Pure; the draft is
//! stamped with session-derived fields by the submitting workflow, never
//! here.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::models::{Payslip, PayslipStatus, User};

/// Textual pattern for calendar date fields
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Binding errors
#[derive(Debug, Error)]
pub enum BindError {
    #[error("field '{field}': {reason}")]
    MalformedInput {
        field: &'static str,
        reason: String,
    },

    #[error("unknown form field '{0}'")]
    UnknownField(String),
}

/// Payslip fields sourced from the form body.
///
/// Missing fields keep their zero values, matching HTML form semantics where
/// an empty input submits an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipDraft {
    pub name: String,
    pub day: DateTime<Utc>,
    pub month: DateTime<Utc>,
    pub gross_annual_salary: Decimal,
    pub amount_received_bank: Decimal,
    pub tds: Decimal,
    pub account_no: String,
    pub ifsc_code: String,
    pub position: String,
    pub employee_no: String,
}

impl Default for PayslipDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            day: DateTime::UNIX_EPOCH,
            month: DateTime::UNIX_EPOCH,
            gross_annual_salary: Decimal::ZERO,
            amount_received_bank: Decimal::ZERO,
            tds: Decimal::ZERO,
            account_no: String::new(),
            ifsc_code: String::new(),
            position: String::new(),
            employee_no: String::new(),
        }
    }
}

impl PayslipDraft {
    /// Stamp the session-derived fields and produce the final record.
    ///
    /// The payslip identifier is derived from the requestor, so each user
    /// owns exactly one document slot.
    pub fn into_payslip(self, requestor: User, requested_on: DateTime<Utc>) -> Payslip {
        Payslip {
            id: None,
            payslip_id: requestor.userid.clone(),
            name: self.name,
            requestor,
            approver: None,
            requested_on,
            day: self.day,
            month: self.month,
            gross_annual_salary: self.gross_annual_salary,
            amount_received_bank: self.amount_received_bank,
            tds: self.tds,
            account_no: self.account_no,
            ifsc_code: self.ifsc_code,
            position: self.position,
            employee_no: self.employee_no,
            status: PayslipStatus::Requested,
        }
    }
}

/// Bind submitted form fields into a draft, or fail on the first bad field
pub fn bind_payslip(form: &HashMap<String, String>) -> Result<PayslipDraft, BindError> {
    let mut draft = PayslipDraft::default();

    for (key, value) in form {
        match key.as_str() {
            "name" => draft.name = value.clone(),
            "day" => draft.day = parse_form_date("day", value)?,
            "month" => draft.month = parse_form_date("month", value)?,
            "salary" => draft.gross_annual_salary = parse_amount("salary", value)?,
            "amount" => draft.amount_received_bank = parse_amount("amount", value)?,
            "tds" => draft.tds = parse_amount("tds", value)?,
            "accountno" => draft.account_no = value.clone(),
            "ifsccode" => draft.ifsc_code = value.clone(),
            "position" => draft.position = value.clone(),
            "employeeno" => draft.employee_no = value.clone(),
            other => return Err(BindError::UnknownField(other.to_string())),
        }
    }

    validate(&draft)?;
    Ok(draft)
}

/// Parse a calendar date field (`YYYY-MM-DD`) into UTC midnight
fn parse_form_date(field: &'static str, value: &str) -> Result<DateTime<Utc>, BindError> {
    let date = NaiveDate::parse_from_str(value.trim(), FORM_DATE_FORMAT).map_err(|e| {
        BindError::MalformedInput {
            field,
            reason: format!("expected a YYYY-MM-DD date, got '{}' ({})", value, e),
        }
    })?;

    // Calendar semantics only; midnight keeps the stored precision uniform
    Ok(date
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc())
}

/// Parse a decimal currency field
fn parse_amount(field: &'static str, value: &str) -> Result<Decimal, BindError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| BindError::MalformedInput {
            field,
            reason: format!("expected a decimal amount, got '{}' ({})", value, e),
        })
}

/// Record invariants that only depend on form fields
fn validate(draft: &PayslipDraft) -> Result<(), BindError> {
    if draft.gross_annual_salary < Decimal::ZERO {
        return Err(BindError::MalformedInput {
            field: "salary",
            reason: "gross annual salary must not be negative".to_string(),
        });
    }
    if draft.amount_received_bank > draft.gross_annual_salary {
        return Err(BindError::MalformedInput {
            field: "amount",
            reason: "amount received in bank exceeds gross annual salary".to_string(),
        });
    }
    Ok(())
}
