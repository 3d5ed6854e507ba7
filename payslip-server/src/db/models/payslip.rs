//! Payslip Model

use super::serde_helpers;
use super::user::User;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payslip workflow status
///
/// Stored as a small integer; only `Requested` (0) is produced today,
/// the remaining values are reserved for an approval flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PayslipStatus {
    Requested,
}

impl From<PayslipStatus> for u8 {
    fn from(status: PayslipStatus) -> Self {
        match status {
            PayslipStatus::Requested => 0,
        }
    }
}

impl TryFrom<u8> for PayslipStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PayslipStatus::Requested),
            other => Err(format!("reserved payslip status: {}", other)),
        }
    }
}

/// One payslip request, validated and stamped by the submitting workflow.
///
/// `payslip_id` is derived from the requestor's user id, so each user has
/// exactly one current payslip record and one generated document; a second
/// submission overwrites both. Immutable once rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payslip {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Document identifier, equal to the requestor's userid
    pub payslip_id: String,
    /// Employee name as entered on the form
    pub name: String,
    /// Snapshot of the requesting user
    pub requestor: User,
    /// Reserved for an approval flow, never populated today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver: Option<User>,
    pub requested_on: DateTime<Utc>,
    /// Pay date (calendar day, stored at UTC midnight)
    pub day: DateTime<Utc>,
    /// Pay period (calendar month, stored at UTC midnight of its first day)
    pub month: DateTime<Utc>,
    pub gross_annual_salary: Decimal,
    pub amount_received_bank: Decimal,
    /// Tax deducted at source
    pub tds: Decimal,
    pub account_no: String,
    pub ifsc_code: String,
    pub position: String,
    /// Optional; a blank value omits the line from the rendered document
    #[serde(default)]
    pub employee_no: String,
    pub status: PayslipStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_small_int() {
        assert_eq!(u8::from(PayslipStatus::Requested), 0);
        assert_eq!(PayslipStatus::try_from(0).unwrap(), PayslipStatus::Requested);
        assert!(PayslipStatus::try_from(3).is_err());
    }
}
