//! Error types for `contracthub-core`.

use thiserror::Error;

use crate::{
  field::FieldType,
  id::{BlueprintId, ContractId, FieldId},
  status::ContractStatus,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("blueprint not found: {0}")]
  BlueprintNotFound(BlueprintId),

  #[error("contract not found: {0}")]
  ContractNotFound(ContractId),

  #[error("field not found: {0}")]
  FieldNotFound(FieldId),

  #[error("cannot transition from {from} to {to}")]
  InvalidTransition {
    from: ContractStatus,
    to:   ContractStatus,
  },

  /// A persisted collection could not be decoded. Loading recovers from this
  /// by substituting the default collection.
  #[error("stored value under {key:?} is corrupt: {source}")]
  StorageCorrupt {
    key:    String,
    source: serde_json::Error,
  },

  #[error("storage backend error: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// A structural rule on user input was broken. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("blueprint name must not be empty")]
  EmptyBlueprintName,

  #[error("blueprint must have at least one field")]
  NoFields,

  #[error("duplicate field id {0}")]
  DuplicateFieldId(FieldId),

  #[error("contract name must not be empty")]
  EmptyContractName,

  /// Labels of every required field left empty, in display order.
  #[error("required: {}", .0.join(", "))]
  MissingRequiredFields(Vec<String>),

  #[error("value supplied for unknown field {0}")]
  UnknownField(FieldId),

  #[error("{label}: expected a {expected} value, got {found}")]
  TypeMismatch {
    label:    String,
    expected: FieldType,
    found:    FieldType,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
