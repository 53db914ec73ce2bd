//! Blueprints: reusable, named field schemas that contracts are built from.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  ValidationError,
  field::FieldSpec,
  id::{BlueprintId, FieldId},
};

/// A named, versionless document schema.
///
/// Edits replace the record in place; contracts built earlier always see the
/// current field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
  pub id:          BlueprintId,
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
  pub fields:      Vec<FieldSpec>,
}

impl Blueprint {
  pub fn field(&self, id: &FieldId) -> Option<&FieldSpec> {
    self.fields.iter().find(|f| &f.id == id)
  }

  /// The save-time checks of [`BlueprintSpec::validate`], applied to a
  /// stored record.
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_shape(&self.name, &self.fields)
  }

  /// Fields in display order. Ties keep their stored order.
  pub fn sorted_fields(&self) -> Vec<&FieldSpec> {
    let mut fields: Vec<&FieldSpec> = self.fields.iter().collect();
    fields.sort_by_key(|f| f.order);
    fields
  }
}

/// The user-editable part of a blueprint; input to
/// [`TemplateCatalog::create`](crate::catalog::TemplateCatalog::create) and
/// [`TemplateCatalog::update`](crate::catalog::TemplateCatalog::update).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintSpec {
  pub name:        String,
  pub description: Option<String>,
  pub fields:      Vec<FieldSpec>,
}

impl BlueprintSpec {
  pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
    Self { name: name.into(), description: None, fields }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Save-time checks: a name, at least one field, and no repeated field
  /// ids. Labels and types are not checked.
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_shape(&self.name, &self.fields)
  }
}

fn check_shape(name: &str, fields: &[FieldSpec]) -> Result<(), ValidationError> {
  if name.is_empty() {
    return Err(ValidationError::EmptyBlueprintName);
  }
  if fields.is_empty() {
    return Err(ValidationError::NoFields);
  }
  let mut seen = HashSet::new();
  for field in fields {
    if !seen.insert(&field.id) {
      return Err(ValidationError::DuplicateFieldId(field.id.clone()));
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::field::FieldType;

  fn field(id: &str, order: i64) -> FieldSpec {
    FieldSpec {
      id: FieldId::from(id),
      field_type: FieldType::Text,
      label: id.to_uppercase(),
      required: true,
      order,
    }
  }

  #[test]
  fn validate_rejects_empty_name_and_fields() {
    let spec = BlueprintSpec::new("", vec![field("a", 0)]);
    assert_eq!(spec.validate(), Err(ValidationError::EmptyBlueprintName));

    let spec = BlueprintSpec::new("NDA", vec![]);
    assert_eq!(spec.validate(), Err(ValidationError::NoFields));

    let spec = BlueprintSpec::new("NDA", vec![field("a", 0)]);
    assert_eq!(spec.validate(), Ok(()));
  }

  #[test]
  fn validate_rejects_duplicate_field_ids() {
    let spec = BlueprintSpec::new("NDA", vec![field("a", 0), field("a", 1)]);
    assert_eq!(
      spec.validate(),
      Err(ValidationError::DuplicateFieldId(FieldId::from("a")))
    );
  }

  #[test]
  fn sorted_fields_uses_order_key() {
    let bp = Blueprint {
      id:          BlueprintId::from("b"),
      name:        "x".into(),
      description: None,
      created_at:  Utc::now(),
      fields:      vec![field("c", 7), field("a", -1), field("b", 3)],
    };
    let ids: Vec<&str> = bp.sorted_fields().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
  }
}
