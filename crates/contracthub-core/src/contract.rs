//! Contracts: filled-in instances of a blueprint with a status history.
//!
//! A contract's status and history are private: the only way to change them
//! is [`Contract::transition`], which appends exactly one entry. Every
//! constructed or deserialised contract satisfies two invariants:
//!
//! - the history is never empty, and
//! - `status()` equals the status of the last history entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  Error, Result,
  blueprint::Blueprint,
  field::FieldValues,
  id::{BlueprintId, ContractId},
  status::{ContractStatus, StatusEntry},
};

/// A broken status-history invariant, found while loading a contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
  #[error("status history is empty")]
  Empty,

  #[error("status {status} does not match last history entry {last}")]
  StatusMismatch {
    status: ContractStatus,
    last:   ContractStatus,
  },
}

/// An instantiated, evolving document.
///
/// Holds its blueprint by id only; the blueprint may since have been edited
/// or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContractRecord", into = "ContractRecord")]
pub struct Contract {
  id:             ContractId,
  blueprint_id:   BlueprintId,
  name:           String,
  status:         ContractStatus,
  field_values:   FieldValues,
  created_at:     DateTime<Utc>,
  status_history: Vec<StatusEntry>,
}

impl Contract {
  /// A new contract in `Created`, with a single history entry at `now`.
  /// Input validation is the caller's job.
  pub(crate) fn new(
    blueprint_id: BlueprintId,
    name: String,
    field_values: FieldValues,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id: ContractId::generate(),
      blueprint_id,
      name,
      status: ContractStatus::Created,
      field_values,
      created_at: now,
      status_history: vec![StatusEntry {
        status:    ContractStatus::Created,
        timestamp: now,
      }],
    }
  }

  pub fn id(&self) -> &ContractId { &self.id }

  pub fn blueprint_id(&self) -> &BlueprintId { &self.blueprint_id }

  pub fn name(&self) -> &str { &self.name }

  pub fn status(&self) -> ContractStatus { self.status }

  pub fn field_values(&self) -> &FieldValues { &self.field_values }

  pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

  /// Oldest first.
  pub fn status_history(&self) -> &[StatusEntry] { &self.status_history }

  /// History newest first, as shown in an audit trail.
  pub fn audit_trail(&self) -> impl Iterator<Item = &StatusEntry> {
    self.status_history.iter().rev()
  }

  pub fn allowed_next(&self) -> &'static [ContractStatus] {
    self.status.allowed_next()
  }

  pub fn is_terminal(&self) -> bool { self.status.is_terminal() }

  /// Move to `target` if the transition table allows it, appending
  /// `{target, at}` to the history. On failure nothing changes.
  pub fn transition(
    &mut self,
    target: ContractStatus,
    at: DateTime<Utc>,
  ) -> Result<&StatusEntry> {
    if !self.status.can_transition_to(target) {
      return Err(Error::InvalidTransition { from: self.status, to: target });
    }
    self.status = target;
    self.status_history.push(StatusEntry { status: target, timestamp: at });
    debug_assert_eq!(self.check_invariants(), Ok(()));
    Ok(&self.status_history[self.status_history.len() - 1])
  }

  /// Settle loosely typed stored values against `blueprint`'s field types.
  /// Values for fields the blueprint no longer has are left alone.
  pub(crate) fn conform_values(&mut self, blueprint: &Blueprint) {
    let values = std::mem::take(&mut self.field_values);
    self.field_values = values
      .into_iter()
      .map(|(id, value)| match blueprint.field(&id) {
        Some(field) => {
          let value = value.conform_to(field.field_type);
          (id, value)
        }
        None => (id, value),
      })
      .collect();
  }

  pub fn check_invariants(&self) -> Result<(), HistoryError> {
    let last = self.status_history.last().ok_or(HistoryError::Empty)?;
    if last.status != self.status {
      return Err(HistoryError::StatusMismatch {
        status: self.status,
        last:   last.status,
      });
    }
    Ok(())
  }
}

// ─── Wire form ───────────────────────────────────────────────────────────────

/// The persisted shape of a [`Contract`]; checked on the way in.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractRecord {
  id:             ContractId,
  blueprint_id:   BlueprintId,
  name:           String,
  status:         ContractStatus,
  #[serde(default)]
  field_values:   FieldValues,
  created_at:     DateTime<Utc>,
  status_history: Vec<StatusEntry>,
}

impl TryFrom<ContractRecord> for Contract {
  type Error = HistoryError;

  fn try_from(r: ContractRecord) -> Result<Self, Self::Error> {
    let contract = Contract {
      id:             r.id,
      blueprint_id:   r.blueprint_id,
      name:           r.name,
      status:         r.status,
      field_values:   r.field_values,
      created_at:     r.created_at,
      status_history: r.status_history,
    };
    contract.check_invariants()?;
    Ok(contract)
  }
}

impl From<Contract> for ContractRecord {
  fn from(c: Contract) -> Self {
    Self {
      id:             c.id,
      blueprint_id:   c.blueprint_id,
      name:           c.name,
      status:         c.status,
      field_values:   c.field_values,
      created_at:     c.created_at,
      status_history: c.status_history,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use serde_json::json;

  use super::{ContractStatus::*, *};

  fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap() }

  fn contract() -> Contract {
    Contract::new(BlueprintId::from("b1"), "Offer".into(), FieldValues::new(), t0())
  }

  #[test]
  fn new_contract_is_created_with_one_entry() {
    let c = contract();
    assert_eq!(c.status(), Created);
    assert_eq!(c.status_history(), &[StatusEntry { status: Created, timestamp: t0() }]);
    assert_eq!(c.check_invariants(), Ok(()));
  }

  #[test]
  fn transition_appends_exactly_one_entry() {
    let mut c = contract();
    let at = t0() + Duration::hours(1);
    let entry = *c.transition(Approved, at).unwrap();
    assert_eq!(entry, StatusEntry { status: Approved, timestamp: at });
    assert_eq!(c.status(), Approved);
    assert_eq!(c.status_history().len(), 2);
    assert_eq!(c.status_history()[0].status, Created);
  }

  #[test]
  fn rejected_transition_leaves_contract_untouched() {
    let mut c = contract();
    let before = c.clone();
    let err = c.transition(Signed, t0()).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: Created, to: Signed }));
    assert_eq!(c, before);
  }

  #[test]
  fn every_pair_obeys_the_table() {
    for from in ContractStatus::ALL {
      for to in ContractStatus::ALL {
        let mut c = contract();
        c.status = from;
        c.status_history = vec![StatusEntry { status: from, timestamp: t0() }];
        let ok = c.transition(to, t0()).is_ok();
        assert_eq!(ok, from.allowed_next().contains(&to), "{from} -> {to}");
        assert_eq!(c.status_history().len(), if ok { 2 } else { 1 });
      }
    }
  }

  #[test]
  fn audit_trail_is_newest_first() {
    let mut c = contract();
    c.transition(Revoked, t0() + Duration::minutes(5)).unwrap();
    let trail: Vec<_> = c.audit_trail().map(|e| e.status).collect();
    assert_eq!(trail, [Revoked, Created]);
  }

  #[test]
  fn deserialising_checks_invariants() {
    let ok = json!({
      "id": "c1",
      "blueprintId": "b1",
      "name": "Offer",
      "status": "Approved",
      "fieldValues": { "f1": { "type": "text", "value": "Acme" } },
      "createdAt": "2024-06-01T09:00:00Z",
      "statusHistory": [
        { "status": "Created", "timestamp": "2024-06-01T09:00:00Z" },
        { "status": "Approved", "timestamp": "2024-06-01T10:00:00Z" }
      ]
    });
    let c: Contract = serde_json::from_value(ok.clone()).unwrap();
    assert_eq!(c.status(), Approved);
    assert_eq!(serde_json::to_value(&c).unwrap(), ok);

    let mut mismatched = ok.clone();
    mismatched["status"] = json!("Sent");
    assert!(serde_json::from_value::<Contract>(mismatched).is_err());

    let mut empty = ok;
    empty["statusHistory"] = json!([]);
    assert!(serde_json::from_value::<Contract>(empty).is_err());
  }
}
