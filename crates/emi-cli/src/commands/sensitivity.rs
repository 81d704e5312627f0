use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use emi_core::emi::{self, EmiInput};
use emi_core::sensitivity::{self, RateSensitivityInput};
use emi_core::types::Currency;

use crate::input;

/// Arguments for the rate sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    /// Loan principal (e.g. 100000)
    #[arg(long)]
    pub principal: Option<String>,

    /// Loan tenure in years (e.g. 20)
    #[arg(long)]
    pub tenure_years: Option<String>,

    /// Lowest annual rate in percent, inclusive
    #[arg(long)]
    pub rate_min: Option<Decimal>,

    /// Highest annual rate in percent, inclusive
    #[arg(long)]
    pub rate_max: Option<Decimal>,

    /// Grid step in percentage points
    #[arg(long, default_value = "0.25")]
    pub rate_step: Decimal,

    /// Currency code for formatted output (usd, inr, eur, gbp, jpy, ...)
    #[arg(long, default_value = "usd")]
    pub currency: Currency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: RateSensitivityInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .as_deref()
            .ok_or("--principal is required (or provide --input)")?;
        let tenure = args
            .tenure_years
            .as_deref()
            .ok_or("--tenure-years is required (or provide --input)")?;
        let rate_min = args.rate_min.ok_or("--rate-min is required (or provide --input)")?;
        let rate_max = args.rate_max.ok_or("--rate-max is required (or provide --input)")?;

        // The base rate is swept, so seed it with the grid minimum.
        let base: EmiInput = emi::parse_request(
            principal,
            &rate_min.to_string(),
            tenure,
            args.currency.clone(),
        )
        .map_err(|e| e.user_message())?;

        RateSensitivityInput {
            base,
            rate_min_pct: rate_min,
            rate_max_pct: rate_max,
            rate_step_pct: args.rate_step,
        }
    };

    let result = sensitivity::rate_sensitivity(&sens_input).map_err(|e| e.user_message())?;
    Ok(serde_json::to_value(result)?)
}
