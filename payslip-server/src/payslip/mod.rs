//! Payslip domain module
//!
//! The request-to-document pipeline's core pieces:
//!
//! - [`binder`] - form fields → validated draft
//! - [`compute`] - derived pay lines
//! - [`renderer`] - record → fixed-layout PDF document

pub mod binder;
pub mod compute;
pub mod renderer;

pub use binder::{BindError, PayslipDraft, bind_payslip};
pub use compute::{PaySummary, money};
pub use renderer::PayslipRenderer;
