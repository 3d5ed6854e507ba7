//! Database models matching the SurrealDB schema

pub mod payslip;
pub mod serde_helpers;
pub mod user;

pub use payslip::{Payslip, PayslipStatus};
pub use user::{User, UserUpsert};
