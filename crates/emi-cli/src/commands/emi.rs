use clap::Args;
use serde_json::Value;

use emi_core::emi::{self, EmiInput};
use emi_core::types::Currency;

use crate::input;

/// Arguments for the EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Loan principal (e.g. 100000)
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent (e.g. 7.5)
    #[arg(long, alias = "interest")]
    pub rate: Option<String>,

    /// Loan tenure in years (e.g. 20)
    #[arg(long)]
    pub tenure_years: Option<String>,

    /// Currency code for formatted output (usd, inr, eur, gbp, jpy, ...)
    #[arg(long, default_value = "usd")]
    pub currency: Currency,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

impl EmiArgs {
    /// Resolve the loan from file, piped stdin, or the free-text flags.
    /// Flag values go through the core parse gate, so garbage is rejected
    /// with the canonical validation message.
    pub fn resolve(&self) -> Result<EmiInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::read_json(path);
        }
        if let Some(data) = input::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }

        let principal = self
            .principal
            .as_deref()
            .ok_or("--principal is required (or provide --input)")?;
        let rate = self
            .rate
            .as_deref()
            .ok_or("--rate is required (or provide --input)")?;
        let tenure = self
            .tenure_years
            .as_deref()
            .ok_or("--tenure-years is required (or provide --input)")?;

        emi::parse_request(principal, rate, tenure, self.currency.clone())
            .map_err(|e| e.user_message().into())
    }
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input = args.resolve()?;
    let result = emi::calculate_emi(&emi_input).map_err(|e| e.user_message())?;
    Ok(serde_json::to_value(result)?)
}
