//! Month-by-month amortization schedule for a level-payment loan.
//!
//! Each period accrues interest on the opening balance at the monthly rate;
//! the remainder of the installment retires principal. The closing balance
//! of the final month lands on zero up to Decimal division residue.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::emi::{self, EmiInput};
use crate::error::EmiError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money};
use crate::EmiResult;

/// A single month in the amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub opening_balance: Money,
    /// opening_balance * monthly_rate.
    pub interest: Money,
    /// installment - interest.
    pub principal_component: Money,
    pub closing_balance: Money,
}

/// Output of the schedule builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_installment: Money,
    pub rows: Vec<ScheduleRow>,
    /// Sum of the interest column.
    pub total_interest: Money,
    /// Sum of the principal column; equals the principal up to residue.
    pub total_principal: Money,
    pub currency: Currency,
}

/// Build the full amortization schedule for a loan.
///
/// The tenure must resolve to a whole number of months; a level payment
/// has no meaning for a fractional final period.
pub fn build_schedule(input: &EmiInput) -> EmiResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();

    let emi_env = emi::calculate_emi(input)?;
    let mut warnings = emi_env.warnings;
    let installment = emi_env.result.monthly_installment;
    let monthly_rate = emi_env.result.monthly_rate;

    let months = emi_env
        .result
        .months
        .to_u32()
        .filter(|_| emi_env.result.months.fract().is_zero())
        .ok_or_else(|| EmiError::InvalidInput {
            field: "tenure_years".into(),
            reason: format!(
                "Tenure of {} years does not resolve to a whole number of months",
                input.tenure_years
            ),
        })?;

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(months as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for month in 1..=months {
        let opening_balance = balance;
        let interest = opening_balance * monthly_rate;
        let principal_component = installment - interest;
        let closing_balance = opening_balance - principal_component;

        total_interest += interest;
        total_principal += principal_component;

        rows.push(ScheduleRow {
            month,
            opening_balance,
            interest,
            principal_component,
            closing_balance,
        });

        balance = closing_balance;
    }

    // Division residue from the closed-form installment should be dust.
    if balance.abs() > dec!(0.01) {
        warnings.push(format!(
            "Schedule leaves a residual balance of {balance} after the final month"
        ));
    }

    let output = ScheduleOutput {
        monthly_installment: installment,
        rows,
        total_interest,
        total_principal,
        currency: input.currency.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization Schedule — level payment, monthly compounding",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "months": months,
            "monthly_installment": installment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn one_year_loan() -> EmiInput {
        EmiInput {
            principal: dec!(100_000),
            annual_rate_pct: dec!(7.5),
            tenure_years: dec!(1),
            currency: Currency::USD,
        }
    }

    #[test]
    fn test_schedule_first_month_split() {
        let result = build_schedule(&one_year_loan()).unwrap();
        let first = &result.result.rows[0];

        assert_eq!(first.month, 1);
        assert_eq!(first.opening_balance, dec!(100_000));
        // 100000 * 0.00625
        assert_eq!(first.interest, dec!(625));
        assert!((first.principal_component - dec!(8050.74)).abs() < dec!(0.01));
    }

    #[test]
    fn test_schedule_amortizes_to_zero() {
        let result = build_schedule(&one_year_loan()).unwrap();
        let out = &result.result;

        assert_eq!(out.rows.len(), 12);
        let last = out.rows.last().unwrap();
        assert!(
            last.closing_balance.abs() < dec!(0.01),
            "final balance should be ~0, got {}",
            last.closing_balance
        );
        assert!((out.total_principal - dec!(100_000)).abs() < dec!(0.01));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_schedule_rows_sum_to_installment() {
        let result = build_schedule(&one_year_loan()).unwrap();
        let out = &result.result;
        for row in &out.rows {
            assert_eq!(
                row.interest + row.principal_component,
                out.monthly_installment
            );
        }
    }

    #[test]
    fn test_schedule_total_interest_matches_emi_output() {
        let input = one_year_loan();
        let schedule = build_schedule(&input).unwrap().result;
        let emi_out = emi::calculate_emi(&input).unwrap().result;
        assert!((schedule.total_interest - emi_out.total_interest).abs() < dec!(0.01));
    }

    #[test]
    fn test_schedule_zero_rate_retires_exactly() {
        let input = EmiInput {
            principal: dec!(12_000),
            annual_rate_pct: dec!(0),
            tenure_years: dec!(1),
            currency: Currency::USD,
        };
        let out = build_schedule(&input).unwrap().result;

        assert_eq!(out.monthly_installment, dec!(1000));
        assert_eq!(out.total_interest, dec!(0));
        assert_eq!(out.rows.last().unwrap().closing_balance, dec!(0));
    }

    #[test]
    fn test_schedule_rejects_fractional_months() {
        // 1.1 years = 13.2 months
        let input = EmiInput {
            tenure_years: dec!(1.1),
            ..one_year_loan()
        };
        assert!(matches!(
            build_schedule(&input).unwrap_err(),
            EmiError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_schedule_rejects_invalid_loan() {
        let input = EmiInput {
            principal: dec!(-5),
            ..one_year_loan()
        };
        assert!(matches!(
            build_schedule(&input).unwrap_err(),
            EmiError::InvalidInput { .. }
        ));
    }
}
