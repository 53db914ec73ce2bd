//! An editable blueprint that has not been saved yet.
//!
//! Field edits on a draft are unchecked; the blueprint-level rules apply
//! when the draft is saved through the catalog.

use crate::{
  Error, Result,
  blueprint::{Blueprint, BlueprintSpec},
  field::{FieldSpec, FieldType},
  id::{BlueprintId, FieldId},
};

/// Partial changes to a field. `None` leaves the existing value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
  pub label:      Option<String>,
  pub field_type: Option<FieldType>,
  pub required:   Option<bool>,
  pub order:      Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintDraft {
  /// The blueprint being edited, or `None` for a new one.
  editing:         Option<BlueprintId>,
  pub name:        String,
  pub description: Option<String>,
  fields:          Vec<FieldSpec>,
}

impl BlueprintDraft {
  pub fn new() -> Self { Self::default() }

  /// Start editing an existing blueprint. Saving the draft updates it.
  pub fn from_blueprint(blueprint: &Blueprint) -> Self {
    Self {
      editing:     Some(blueprint.id.clone()),
      name:        blueprint.name.clone(),
      description: blueprint.description.clone(),
      fields:      blueprint.fields.clone(),
    }
  }

  pub fn editing(&self) -> Option<&BlueprintId> { self.editing.as_ref() }

  pub fn fields(&self) -> &[FieldSpec] { &self.fields }

  /// Append a required, unlabeled text field ordered after the existing ones.
  pub fn add_field(&mut self) -> FieldId {
    let field = FieldSpec::new(FieldType::Text, "", true, self.fields.len() as i64);
    let id = field.id.clone();
    self.fields.push(field);
    id
  }

  pub fn remove_field(&mut self, id: &FieldId) -> Result<FieldSpec> {
    let pos = self
      .fields
      .iter()
      .position(|f| &f.id == id)
      .ok_or_else(|| Error::FieldNotFound(id.clone()))?;
    Ok(self.fields.remove(pos))
  }

  pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<&FieldSpec> {
    let field = self
      .fields
      .iter_mut()
      .find(|f| &f.id == id)
      .ok_or_else(|| Error::FieldNotFound(id.clone()))?;
    if let Some(label) = patch.label {
      field.label = label;
    }
    if let Some(field_type) = patch.field_type {
      field.field_type = field_type;
    }
    if let Some(required) = patch.required {
      field.required = required;
    }
    if let Some(order) = patch.order {
      field.order = order;
    }
    Ok(&*field)
  }

  /// Split into the blueprint being edited (if any) and the `BlueprintSpec` to save.
  pub fn into_spec(self) -> (Option<BlueprintId>, BlueprintSpec) {
    let spec = BlueprintSpec {
      name:        self.name,
      description: self.description.filter(|d| !d.is_empty()),
      fields:      self.fields,
    };
    (self.editing, spec)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_field_defaults() {
    let mut draft = BlueprintDraft::new();
    let a = draft.add_field();
    let b = draft.add_field();
    assert_ne!(a, b);
    let f = &draft.fields()[1];
    assert_eq!(f.field_type, FieldType::Text);
    assert!(f.required);
    assert_eq!(f.order, 1);
    assert_eq!(f.label, "");
  }

  #[test]
  fn update_merges_only_given_parts() {
    let mut draft = BlueprintDraft::new();
    let id = draft.add_field();
    draft
      .update_field(&id, FieldPatch {
        label: Some("Signed by".into()),
        field_type: Some(FieldType::Signature),
        ..Default::default()
      })
      .unwrap();
    let f = &draft.fields()[0];
    assert_eq!(f.label, "Signed by");
    assert_eq!(f.field_type, FieldType::Signature);
    assert!(f.required);
    assert_eq!(f.order, 0);
  }

  #[test]
  fn remove_unknown_field_fails() {
    let mut draft = BlueprintDraft::new();
    let id = draft.add_field();
    assert!(matches!(
      draft.remove_field(&FieldId::from("x")),
      Err(Error::FieldNotFound(_))
    ));
    draft.remove_field(&id).unwrap();
    assert!(draft.fields().is_empty());
  }

  #[test]
  fn into_spec_drops_blank_description() {
    let mut draft = BlueprintDraft::new();
    draft.name = "NDA".into();
    draft.description = Some(String::new());
    let (editing, spec) = draft.into_spec();
    assert!(editing.is_none());
    assert_eq!(spec.description, None);
  }
}
