use clap::Args;
use serde_json::Value;

use microcredit_core::provisioning::ProvisionTable;

use crate::input;

/// Arguments for provisioning-rate lookups
#[derive(Args)]
pub struct ProvisionRateArgs {
    /// Path to a JSON file holding the provisioning rate table
    #[arg(long)]
    pub input: Option<String>,

    /// Look up the band containing this number of days late
    #[arg(long, conflicts_with = "rank", allow_hyphen_values = true)]
    pub days: Option<i32>,

    /// Look up the band at this position in the table
    #[arg(long, allow_hyphen_values = true)]
    pub rank: Option<i32>,
}

pub fn run_provision_rate(args: ProvisionRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table: ProvisionTable = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe a rate table on stdin)".into());
    };

    // a query outside every band is a normal not-found, reported as null
    let value = if let Some(days) = args.days {
        serde_json::json!({
            "days_late": days,
            "rate": table.provisioning_rate_by_days_late(days),
        })
    } else if let Some(rank) = args.rank {
        serde_json::json!({
            "rank": rank,
            "rate": table.provisioning_rate(rank),
        })
    } else {
        return Err("provide --days or --rank".into());
    };
    Ok(value)
}
