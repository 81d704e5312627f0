//! Equal Monthly Installment calculation.
//!
//! Closed-form amortization of a loan into a level monthly payment:
//! `EMI = P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate and
//! `n` the number of months. All math uses `rust_decimal::Decimal`;
//! two-decimal rounding happens only in the formatted output strings.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EmiError;
use crate::types::{format_money, with_metadata, ComputationOutput, Currency, Money, Rate, Years};
use crate::EmiResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
/// Annual percentage to monthly fractional rate: 7.5 -> 7.5 / 1200 = 0.00625
const PERCENT_TO_MONTHLY: Decimal = dec!(1200);
/// Annual rates above this (in percent) draw a warning, not a rejection.
const HIGH_RATE_WARNING_PCT: Decimal = dec!(100);
/// Tenures beyond this draw a warning, not a rejection.
const LONG_TENURE_WARNING_YEARS: Decimal = dec!(50);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Input for an EMI calculation. Constructed per request and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    /// Loan principal. Must be strictly positive.
    pub principal: Money,
    /// Annual interest rate in percent (7.5 = 7.5%). Zero is allowed.
    pub annual_rate_pct: Decimal,
    /// Loan tenure in years. Must be strictly positive; fractions allowed.
    pub tenure_years: Years,
    /// Currency for the formatted output strings.
    #[serde(default)]
    pub currency: Currency,
}

/// Output of an EMI calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    /// Level monthly payment, full precision.
    pub monthly_installment: Money,
    /// total_payment - principal.
    pub total_interest: Money,
    /// monthly_installment * months, exact.
    pub total_payment: Money,
    /// annual_rate_pct / 1200.
    pub monthly_rate: Rate,
    /// tenure_years * 12.
    pub months: Decimal,
    pub currency: Currency,
    /// Two-decimal, symbol-prefixed strings for display.
    pub formatted: FormattedEmi,
}

/// Presentation-ready currency strings, rounded to two decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedEmi {
    pub monthly_installment: String,
    pub total_interest: String,
    pub total_payment: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse three free-text fields into an `EmiInput`.
///
/// This is the parse half of the validation gate: anything that is not a
/// finite decimal number is rejected here, so the calculator is never
/// entered with garbage. Range checks happen again in [`calculate_emi`].
pub fn parse_request(
    principal: &str,
    annual_rate_pct: &str,
    tenure_years: &str,
    currency: Currency,
) -> EmiResult<EmiInput> {
    Ok(EmiInput {
        principal: parse_field("principal", principal)?,
        annual_rate_pct: parse_field("annual_rate_pct", annual_rate_pct)?,
        tenure_years: parse_field("tenure_years", tenure_years)?,
        currency,
    })
}

/// Calculate the equal monthly installment, total payment, and total interest.
///
/// Zero-rate loans degenerate to straight division (`principal / months`),
/// avoiding the `factor - 1` denominator. A positive rate strictly increases
/// the installment over that baseline.
pub fn calculate_emi(input: &EmiInput) -> EmiResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_emi_input(input)?;

    if input.annual_rate_pct > HIGH_RATE_WARNING_PCT {
        warnings.push(format!(
            "Annual rate {}% is unusually high; check the input is a percentage, not a fraction",
            input.annual_rate_pct
        ));
    }
    if input.tenure_years > LONG_TENURE_WARNING_YEARS {
        warnings.push(format!(
            "Tenure of {} years is unusually long",
            input.tenure_years
        ));
    }

    let monthly_rate = input.annual_rate_pct / PERCENT_TO_MONTHLY;
    let months = input.tenure_years * MONTHS_PER_YEAR;

    let monthly_installment = if monthly_rate.is_zero() {
        // No interest: the installment is a straight split of the principal.
        input.principal / months
    } else {
        let factor = (Decimal::ONE + monthly_rate)
            .checked_powd(months)
            .ok_or_else(|| EmiError::Overflow {
                context: format!("compounding factor (1 + {monthly_rate})^{months}"),
            })?;
        let denominator = factor - Decimal::ONE;
        if denominator.is_zero() {
            // Rate so small it vanishes at Decimal precision.
            return Err(EmiError::DivisionByZero {
                context: "EMI annuity denominator".into(),
            });
        }
        input.principal * monthly_rate * factor / denominator
    };

    let total_payment = monthly_installment * months;
    let total_interest = total_payment - input.principal;

    let formatted = FormattedEmi {
        monthly_installment: format_money(monthly_installment, &input.currency),
        total_interest: format_money(total_interest, &input.currency),
        total_payment: format_money(total_payment, &input.currency),
    };

    let output = EmiOutput {
        monthly_installment,
        total_interest,
        total_payment,
        monthly_rate,
        months,
        currency: input.currency.clone(),
        formatted,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Equal Monthly Installment — closed-form level-payment amortization",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_years": input.tenure_years.to_string(),
            "monthly_rate": monthly_rate.to_string(),
            "months": months.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_emi_input(input: &EmiInput) -> EmiResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    // Zero rate is a valid interest-free loan; only negative is rejected.
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Annual interest rate cannot be negative".into(),
        });
    }
    if input.tenure_years <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "tenure_years".into(),
            reason: "Tenure must be positive".into(),
        });
    }
    Ok(())
}

fn parse_field(field: &str, raw: &str) -> EmiResult<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| EmiError::InvalidInput {
            field: field.into(),
            reason: format!("'{}' is not a finite decimal number", raw.trim()),
        })
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
    fn test_emi_known_answer_one_year() {
        let result = calculate_emi(&one_year_loan()).unwrap();
        let out = &result.result;

        assert_eq!(out.monthly_rate, dec!(0.00625));
        assert_eq!(out.months, dec!(12));

        // Closed form: 100000 * 0.00625 * 1.00625^12 / (1.00625^12 - 1) ≈ 8675.7416
        assert!(
            (out.monthly_installment - dec!(8675.7416)).abs() < dec!(0.01),
            "installment: expected ~8675.74, got {}",
            out.monthly_installment
        );
        assert_eq!(out.formatted.monthly_installment, "$8675.74");
        assert_eq!(out.formatted.total_payment, "$104108.90");
        assert_eq!(out.formatted.total_interest, "$4108.90");
    }

    #[test]
    fn test_emi_known_answer_twelve_pct() {
        // 1,000,000 at 12% for 1 year: the textbook 88,848.79 answer.
        let input = EmiInput {
            principal: dec!(1_000_000),
            annual_rate_pct: dec!(12),
            tenure_years: dec!(1),
            currency: Currency::INR,
        };
        let result = calculate_emi(&input).unwrap();
        assert_eq!(result.result.formatted.monthly_installment, "₹88848.79");
    }

    #[test]
    fn test_emi_zero_rate_is_straight_division() {
        let input = EmiInput {
            principal: dec!(12_000),
            annual_rate_pct: dec!(0),
            tenure_years: dec!(1),
            currency: Currency::USD,
        };
        let result = calculate_emi(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.monthly_installment, dec!(1000));
        assert_eq!(out.total_payment, dec!(12000));
        assert_eq!(out.total_interest, dec!(0));
        assert_eq!(out.formatted.monthly_installment, "$1000.00");
        assert_eq!(out.formatted.total_interest, "$0.00");
    }

    #[test]
    fn test_emi_invariants_hold_exactly_pre_rounding() {
        let result = calculate_emi(&one_year_loan()).unwrap();
        let out = &result.result;

        assert_eq!(out.total_payment, out.monthly_installment * out.months);
        assert_eq!(out.total_interest, out.total_payment - dec!(100_000));
    }

    #[test]
    fn test_emi_installment_strictly_increases_with_rate() {
        let mut prev_installment = Decimal::MIN;
        let mut prev_interest = Decimal::MIN;
        for rate in [dec!(0), dec!(3.5), dec!(7.5), dec!(12), dec!(18)] {
            let input = EmiInput {
                annual_rate_pct: rate,
                ..one_year_loan()
            };
            let out = calculate_emi(&input).unwrap().result;
            assert!(
                out.monthly_installment > prev_installment,
                "installment at {rate}% should exceed the one at the previous rate"
            );
            assert!(
                out.total_interest > prev_interest,
                "total interest at {rate}% should exceed the one at the previous rate"
            );
            prev_installment = out.monthly_installment;
            prev_interest = out.total_interest;
        }
    }

    #[test]
    fn test_emi_fractional_tenure() {
        // 2.5 years = 30 months; the invariant still holds.
        let input = EmiInput {
            tenure_years: dec!(2.5),
            ..one_year_loan()
        };
        let out = calculate_emi(&input).unwrap().result;
        assert_eq!(out.months, dec!(30));
        assert_eq!(out.total_payment, out.monthly_installment * dec!(30));
    }

    #[test]
    fn test_emi_rejects_non_positive_principal() {
        for principal in [dec!(0), dec!(-1)] {
            let input = EmiInput {
                principal,
                ..one_year_loan()
            };
            let err = calculate_emi(&input).unwrap_err();
            assert!(matches!(err, EmiError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_emi_rejects_negative_rate_but_not_zero() {
        let negative = EmiInput {
            annual_rate_pct: dec!(-0.01),
            ..one_year_loan()
        };
        assert!(matches!(
            calculate_emi(&negative).unwrap_err(),
            EmiError::InvalidInput { .. }
        ));

        let zero = EmiInput {
            annual_rate_pct: dec!(0),
            ..one_year_loan()
        };
        assert!(calculate_emi(&zero).is_ok());
    }

    #[test]
    fn test_emi_rejects_non_positive_tenure() {
        let input = EmiInput {
            tenure_years: dec!(0),
            ..one_year_loan()
        };
        assert!(matches!(
            calculate_emi(&input).unwrap_err(),
            EmiError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_emi_warns_on_extreme_but_valid_inputs() {
        let input = EmiInput {
            annual_rate_pct: dec!(150),
            tenure_years: dec!(60),
            ..one_year_loan()
        };
        let result = calculate_emi(&input).unwrap();
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_parse_request_accepts_padded_numerics() {
        let input = parse_request(" 100000 ", "7.5", " 1", Currency::USD).unwrap();
        assert_eq!(input.principal, dec!(100000));
        assert_eq!(input.annual_rate_pct, dec!(7.5));
    }

    #[test]
    fn test_parse_request_rejects_text() {
        for bad in ["abc", "", "1.2.3", "NaN"] {
            let err = parse_request("100000", bad, "1", Currency::USD).unwrap_err();
            assert!(matches!(err, EmiError::InvalidInput { .. }), "input: {bad:?}");
        }
    }
}
