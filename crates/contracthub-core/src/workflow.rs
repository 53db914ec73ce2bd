//! The workflow engine: contract creation and status transitions.

use chrono::Utc;

use crate::{
  Error, Result, ValidationError,
  blueprint::Blueprint,
  contract::Contract,
  field::FieldValues,
  id::ContractId,
  status::ContractStatus,
};

/// Holds every contract, most recently created first. Contracts are never
/// deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowEngine {
  contracts: Vec<Contract>,
}

impl WorkflowEngine {
  pub fn new(contracts: Vec<Contract>) -> Self { Self { contracts } }

  /// Build a contract from `blueprint` after checking the name and values.
  pub fn create_contract(
    &mut self,
    blueprint: &Blueprint,
    name: impl Into<String>,
    field_values: FieldValues,
  ) -> Result<Contract> {
    let name = name.into();
    validate_contract(blueprint, &name, &field_values)?;

    let contract =
      Contract::new(blueprint.id.clone(), name, field_values, Utc::now());
    tracing::debug!(
      id = %contract.id(),
      blueprint = %blueprint.id,
      "contract created"
    );
    self.contracts.insert(0, contract.clone());
    Ok(contract)
  }

  /// Advance contract `id` to `target`. See [`Contract::transition`].
  pub fn transition(
    &mut self,
    id: &ContractId,
    target: ContractStatus,
  ) -> Result<Contract> {
    let contract = self
      .contracts
      .iter_mut()
      .find(|c| c.id() == id)
      .ok_or_else(|| Error::ContractNotFound(id.clone()))?;
    let from = contract.status();
    contract.transition(target, Utc::now())?;
    tracing::debug!(%id, %from, to = %target, "contract transitioned");
    Ok(contract.clone())
  }

  pub fn get(&self, id: &ContractId) -> Result<&Contract> {
    self
      .contracts
      .iter()
      .find(|c| c.id() == id)
      .ok_or_else(|| Error::ContractNotFound(id.clone()))
  }

  pub fn list(&self) -> &[Contract] { &self.contracts }
}

pub fn is_terminal(status: ContractStatus) -> bool { status.is_terminal() }

/// Creation-time checks for a contract against `blueprint`.
///
/// Every supplied value must belong to a field of the blueprint and match
/// its declared type. Missing required values are reported together, by
/// label, in display order.
pub fn validate_contract(
  blueprint: &Blueprint,
  name: &str,
  field_values: &FieldValues,
) -> Result<(), ValidationError> {
  if name.is_empty() {
    return Err(ValidationError::EmptyContractName);
  }

  for (id, value) in field_values {
    let field = blueprint
      .field(id)
      .ok_or_else(|| ValidationError::UnknownField(id.clone()))?;
    if value.field_type() != field.field_type {
      return Err(ValidationError::TypeMismatch {
        label:    field.label.clone(),
        expected: field.field_type,
        found:    value.field_type(),
      });
    }
  }

  let missing: Vec<String> = blueprint
    .sorted_fields()
    .into_iter()
    .filter(|f| f.required)
    .filter(|f| !field_values.get(&f.id).is_some_and(|v| v.is_filled()))
    .map(|f| f.label.clone())
    .collect();
  if !missing.is_empty() {
    return Err(ValidationError::MissingRequiredFields(missing));
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    field::{FieldType, FieldValue},
    id::FieldId,
    seed,
  };

  fn license() -> Blueprint {
    seed::blueprints().into_iter().find(|b| b.id.as_str() == "b2").unwrap()
  }

  fn values(pairs: &[(&str, FieldValue)]) -> FieldValues {
    pairs.iter().map(|(k, v)| (FieldId::from(*k), v.clone())).collect()
  }

  #[test]
  fn missing_required_fields_are_all_named() {
    let mut engine = WorkflowEngine::default();
    let bp = license();
    let vals = values(&[
      ("f1", FieldValue::Text("Acme".into())),
      ("f2", FieldValue::Text("KEY-123".into())),
    ]);
    let err = engine.create_contract(&bp, "Acme license", vals).unwrap_err();
    match err {
      Error::Validation(ValidationError::MissingRequiredFields(labels)) => {
        assert_eq!(labels, ["Expiration Date", "Authorized Signatory"]);
      }
      other => panic!("unexpected error: {other}"),
    }
    assert!(engine.list().is_empty());
  }

  #[test]
  fn empty_strings_and_unticked_boxes_count_as_missing() {
    let bp = seed::blueprints().into_iter().find(|b| b.id.as_str() == "b1").unwrap();
    let vals = values(&[
      ("f1", FieldValue::Text("Ada".into())),
      ("f2", FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())),
      ("f3", FieldValue::Text(String::new())),
      ("f4", FieldValue::Checkbox(false)),
      ("f5", FieldValue::Signature("Ada L.".into())),
    ]);
    assert_eq!(
      validate_contract(&bp, "Hire", &vals),
      Err(ValidationError::MissingRequiredFields(vec![
        "Job Title".into(),
        "Agree to NDA".into(),
      ]))
    );
  }

  #[test]
  fn rejects_empty_name_unknown_fields_and_wrong_types() {
    let bp = license();
    assert_eq!(
      validate_contract(&bp, "", &FieldValues::new()),
      Err(ValidationError::EmptyContractName)
    );
    assert_eq!(
      validate_contract(&bp, "x", &values(&[("zz", FieldValue::Text("?".into()))])),
      Err(ValidationError::UnknownField(FieldId::from("zz")))
    );
    assert_eq!(
      validate_contract(&bp, "x", &values(&[("f3", FieldValue::Text("soon".into()))])),
      Err(ValidationError::TypeMismatch {
        label:    "Expiration Date".into(),
        expected: FieldType::Date,
        found:    FieldType::Text,
      })
    );
  }

  #[test]
  fn optional_fields_may_be_absent() {
    let mut bp = license();
    for f in &mut bp.fields {
      f.required = false;
    }
    assert_eq!(validate_contract(&bp, "x", &FieldValues::new()), Ok(()));
  }

  #[test]
  fn transition_through_engine() {
    let mut engine = WorkflowEngine::default();
    let mut bp = license();
    bp.fields.iter_mut().for_each(|f| f.required = false);
    let c = engine.create_contract(&bp, "draft", FieldValues::new()).unwrap();

    let err = engine.transition(c.id(), ContractStatus::Sent).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));
    assert_eq!(engine.get(c.id()).unwrap().status_history().len(), 1);

    let c = engine.transition(c.id(), ContractStatus::Revoked).unwrap();
    assert!(is_terminal(c.status()));

    let err = engine.transition(&ContractId::from("missing"), ContractStatus::Sent);
    assert!(matches!(err, Err(Error::ContractNotFound(_))));
  }
}
