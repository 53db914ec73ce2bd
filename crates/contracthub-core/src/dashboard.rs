//! Contract list filtering and small presentation helpers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{blueprint::Blueprint, contract::Contract, status::ContractStatus};

/// Name shown for a contract whose blueprint no longer exists.
pub const UNKNOWN_BLUEPRINT: &str = "Unknown";

/// Which contracts a listing shows.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContractFilter {
  #[default]
  All,
  /// Still moving through the workflow.
  Active,
  /// Signed or locked.
  Completed,
}

impl ContractFilter {
  pub fn matches(self, status: ContractStatus) -> bool {
    use ContractStatus::*;
    match self {
      Self::All => true,
      Self::Active => !matches!(status, Signed | Locked | Revoked),
      Self::Completed => matches!(status, Signed | Locked),
    }
  }
}

/// Case-insensitive substring match on the contract name. An empty search
/// matches everything.
pub fn name_matches(contract: &Contract, search: &str) -> bool {
  contract
    .name()
    .to_lowercase()
    .contains(&search.to_lowercase())
}

/// The name suggested for a new contract: `"<blueprint> - <date>"`.
pub fn default_contract_name(blueprint: &Blueprint, date: NaiveDate) -> String {
  format!("{} - {}", blueprint.name, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
  use super::{ContractStatus::*, *};

  #[test]
  fn filters_partition_as_expected() {
    let active: Vec<_> = ContractStatus::ALL
      .into_iter()
      .filter(|s| ContractFilter::Active.matches(*s))
      .collect();
    assert_eq!(active, [Created, Approved, Sent]);

    let done: Vec<_> = ContractStatus::ALL
      .into_iter()
      .filter(|s| ContractFilter::Completed.matches(*s))
      .collect();
    assert_eq!(done, [Signed, Locked]);

    assert!(ContractStatus::ALL.into_iter().all(|s| ContractFilter::All.matches(s)));
  }

  #[test]
  fn filter_parses_from_cli_text() {
    assert_eq!("Completed".parse::<ContractFilter>().unwrap(), ContractFilter::Completed);
    assert_eq!(ContractFilter::Active.to_string(), "active");
  }

  #[test]
  fn default_name_uses_iso_date() {
    let bp = crate::seed::blueprints().remove(0);
    let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(default_contract_name(&bp, date), "Employment Agreement - 2024-12-31");
  }
}
