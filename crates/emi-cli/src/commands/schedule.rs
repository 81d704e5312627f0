use clap::Args;
use serde_json::Value;

use emi_core::emi::{self, EmiInput};
use emi_core::schedule;
use emi_core::types::Currency;

use crate::input;

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal (e.g. 100000)
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent (e.g. 7.5)
    #[arg(long, alias = "interest")]
    pub rate: Option<String>,

    /// Loan tenure in years; must resolve to whole months
    #[arg(long)]
    pub tenure_years: Option<String>,

    /// Currency code for formatted output (usd, inr, eur, gbp, jpy, ...)
    #[arg(long, default_value = "usd")]
    pub currency: Currency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .as_deref()
            .ok_or("--principal is required (or provide --input)")?;
        let rate = args
            .rate
            .as_deref()
            .ok_or("--rate is required (or provide --input)")?;
        let tenure = args
            .tenure_years
            .as_deref()
            .ok_or("--tenure-years is required (or provide --input)")?;
        emi::parse_request(principal, rate, tenure, args.currency.clone())
            .map_err(|e| e.user_message())?
    };

    let result = schedule::build_schedule(&emi_input).map_err(|e| e.user_message())?;
    Ok(serde_json::to_value(result)?)
}
