//! Pay computation
//!
//! Derived monetary lines for the rendered document. All formulas are fixed
//! fractions of the gross annual salary; everything is rounded to 2 decimal
//! places with half-up rounding so the allowance split always re-adds to the
//! gross amount.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::models::Payslip;

/// Allowance split of the gross amount: 60% basic, 20% house rent,
/// 15% special/conveyance, 5% other.
fn basic_rate() -> Decimal {
    Decimal::new(60, 2)
}

fn hra_rate() -> Decimal {
    Decimal::new(20, 2)
}

fn special_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn other_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Derived pay lines for one payslip
#[derive(Debug, Clone, PartialEq)]
pub struct PaySummary {
    // Earnings & allowances
    pub basic: Decimal,
    pub house_rent_allowance: Decimal,
    pub special_allowance: Decimal,
    pub other_allowance: Decimal,
    // Deductions
    pub income_tax: Decimal,
    pub advance: Decimal,
    pub profession_tax: Decimal,
    // Summary
    pub total_gross: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

impl PaySummary {
    /// Compute the derived lines for a payslip record
    pub fn compute(payslip: &Payslip) -> Self {
        Self::from_amounts(payslip.gross_annual_salary, payslip.amount_received_bank)
    }

    /// Compute from the two source amounts
    pub fn from_amounts(gross: Decimal, received: Decimal) -> Self {
        let deductions = round_money(gross - received);

        Self {
            basic: round_money(gross * basic_rate()),
            house_rent_allowance: round_money(gross * hra_rate()),
            special_allowance: round_money(gross * special_rate()),
            other_allowance: round_money(gross * other_rate()),
            income_tax: deductions,
            advance: Decimal::ZERO,
            profession_tax: Decimal::ZERO,
            total_gross: round_money(gross),
            total_deductions: deductions,
            net_pay: round_money(received),
        }
    }
}

/// Round a currency amount to 2 decimal places, half-up
fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed-point currency text with exactly 2 fraction digits
pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn allowance_split_re_adds_to_gross() {
        for gross in ["0", "660000", "123456.78", "999999.99", "0.01", "73"] {
            let gross = dec(gross);
            let summary = PaySummary::from_amounts(gross, Decimal::ZERO);
            let sum = summary.basic
                + summary.house_rent_allowance
                + summary.special_allowance
                + summary.other_allowance;
            // Rates sum to 1.00; rounding each term at 2 dp keeps the total
            // within a cent of the gross amount
            let drift = (sum - gross).abs();
            assert!(drift <= dec("0.02"), "gross {} drifted by {}", gross, drift);
        }
    }

    #[test]
    fn deductions_mirror_the_bank_shortfall() {
        let summary = PaySummary::from_amounts(dec("660000"), dec("550000"));
        assert_eq!(summary.income_tax, dec("110000.00"));
        assert_eq!(summary.total_deductions, dec("110000.00"));
        assert_eq!(summary.net_pay, dec("550000.00"));
        assert_eq!(summary.total_gross, dec("660000.00"));
    }

    #[test]
    fn fixed_lines_are_zero() {
        let summary = PaySummary::from_amounts(dec("100000"), dec("90000"));
        assert_eq!(summary.advance, Decimal::ZERO);
        assert_eq!(summary.profession_tax, Decimal::ZERO);
    }

    #[test]
    fn known_split_for_a_round_salary() {
        let summary = PaySummary::from_amounts(dec("660000"), dec("550000"));
        assert_eq!(summary.basic, dec("396000.00"));
        assert_eq!(summary.house_rent_allowance, dec("132000.00"));
        assert_eq!(summary.special_allowance, dec("99000.00"));
        assert_eq!(summary.other_allowance, dec("33000.00"));
    }

    #[test]
    fn money_text_always_has_two_fraction_digits() {
        assert_eq!(money(dec("0")), "0.00");
        assert_eq!(money(dec("396000")), "396000.00");
        assert_eq!(money(dec("12.5")), "12.50");
        assert_eq!(money(dec("12.345").round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)), "12.35");
    }
}
