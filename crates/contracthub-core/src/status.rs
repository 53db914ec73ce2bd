//! Contract statuses and the fixed transition table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where a contract sits in its approval workflow.
///
/// | Current    | Allowed next        |
/// |------------|---------------------|
/// | `Created`  | `Approved`, `Revoked` |
/// | `Approved` | `Sent`              |
/// | `Sent`     | `Signed`, `Revoked` |
/// | `Signed`   | `Locked`            |
/// | `Locked`   | (terminal)          |
/// | `Revoked`  | (terminal)          |
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ContractStatus {
  Created,
  Approved,
  Sent,
  Signed,
  Locked,
  Revoked,
}

impl ContractStatus {
  pub const ALL: [ContractStatus; 6] = [
    Self::Created,
    Self::Approved,
    Self::Sent,
    Self::Signed,
    Self::Locked,
    Self::Revoked,
  ];

  /// Statuses reachable in one step from `self`. Empty for terminal states.
  pub const fn allowed_next(self) -> &'static [ContractStatus] {
    match self {
      Self::Created => &[Self::Approved, Self::Revoked],
      Self::Approved => &[Self::Sent],
      Self::Sent => &[Self::Signed, Self::Revoked],
      Self::Signed => &[Self::Locked],
      Self::Locked | Self::Revoked => &[],
    }
  }

  pub fn can_transition_to(self, target: ContractStatus) -> bool {
    self.allowed_next().contains(&target)
  }

  pub fn is_terminal(self) -> bool { self.allowed_next().is_empty() }

  /// Button text for moving a contract into this status.
  pub fn action_label(self) -> String {
    match self {
      Self::Revoked => "Revoke Contract".to_owned(),
      other => format!("Mark as {other}"),
    }
  }
}

/// One entry in a contract's append-only status history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
  pub status:    ContractStatus,
  pub timestamp: DateTime<Utc>,
}
