//! Rate sensitivity grid: recompute the EMI across a range of annual rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::emi::{self, EmiInput};
use crate::error::EmiError;
use crate::types::{with_metadata, ComputationOutput, Currency, Money};
use crate::EmiResult;

/// Hard cap on grid size; a finer sweep than this is a mistyped step.
const MAX_GRID_POINTS: Decimal = dec!(1000);

/// Input for a rate sensitivity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSensitivityInput {
    /// Base loan. Its `annual_rate_pct` is overridden at each grid point.
    pub base: EmiInput,
    /// Lowest annual rate in percent, inclusive.
    pub rate_min_pct: Decimal,
    /// Highest annual rate in percent, inclusive.
    pub rate_max_pct: Decimal,
    /// Grid step in percentage points.
    pub rate_step_pct: Decimal,
}

/// One grid point of the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityRow {
    pub annual_rate_pct: Decimal,
    pub monthly_installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

/// Output of the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSensitivityOutput {
    pub rows: Vec<SensitivityRow>,
    pub currency: Currency,
}

/// Sweep the annual rate over `[min, max]` by `step`, recomputing the EMI
/// at every point. Installments are strictly increasing in the rate.
pub fn rate_sensitivity(
    input: &RateSensitivityInput,
) -> EmiResult<ComputationOutput<RateSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_sensitivity_input(input)?;

    let mut rows: Vec<SensitivityRow> = Vec::new();
    let mut rate = input.rate_min_pct;

    while rate <= input.rate_max_pct {
        let point = EmiInput {
            annual_rate_pct: rate,
            ..input.base.clone()
        };
        let env = emi::calculate_emi(&point)?;
        for w in env.warnings {
            if !warnings.contains(&w) {
                warnings.push(w);
            }
        }
        let out = env.result;
        rows.push(SensitivityRow {
            annual_rate_pct: rate,
            monthly_installment: out.monthly_installment,
            total_interest: out.total_interest,
            total_payment: out.total_payment,
        });
        rate += input.rate_step_pct;
    }

    let output = RateSensitivityOutput {
        rows,
        currency: input.base.currency.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rate Sensitivity — EMI recomputed across an annual rate grid",
        &serde_json::json!({
            "principal": input.base.principal.to_string(),
            "tenure_years": input.base.tenure_years.to_string(),
            "rate_min_pct": input.rate_min_pct.to_string(),
            "rate_max_pct": input.rate_max_pct.to_string(),
            "rate_step_pct": input.rate_step_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_sensitivity_input(input: &RateSensitivityInput) -> EmiResult<()> {
    if input.rate_min_pct < Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "rate_min_pct".into(),
            reason: "Minimum rate cannot be negative".into(),
        });
    }
    if input.rate_max_pct < input.rate_min_pct {
        return Err(EmiError::InvalidInput {
            field: "rate_max_pct".into(),
            reason: "Maximum rate must be at least the minimum rate".into(),
        });
    }
    if input.rate_step_pct <= Decimal::ZERO {
        return Err(EmiError::InvalidInput {
            field: "rate_step_pct".into(),
            reason: "Step must be positive".into(),
        });
    }
    let points = (input.rate_max_pct - input.rate_min_pct) / input.rate_step_pct + Decimal::ONE;
    if points > MAX_GRID_POINTS {
        return Err(EmiError::InvalidInput {
            field: "rate_step_pct".into(),
            reason: format!("Grid would exceed {MAX_GRID_POINTS} points"),
        });
    }
    Ok(())
}
