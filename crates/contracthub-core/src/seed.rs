//! Built-in blueprints used when no blueprint collection has been stored.

use chrono::Utc;

use crate::{
  blueprint::Blueprint,
  field::{FieldSpec, FieldType},
  id::{BlueprintId, FieldId},
};

fn field(id: &str, field_type: FieldType, label: &str, order: i64) -> FieldSpec {
  FieldSpec {
    id: FieldId::from(id),
    field_type,
    label: label.to_owned(),
    required: true,
    order,
  }
}

/// "Employment Agreement" (`b1`) and "Software License" (`b2`), stamped with
/// the current time.
pub fn blueprints() -> Vec<Blueprint> {
  let now = Utc::now();
  vec![
    Blueprint {
      id:          BlueprintId::from("b1"),
      name:        "Employment Agreement".into(),
      description: Some(
        "Standard full-time employment contract for new hires.".into(),
      ),
      created_at:  now,
      fields:      vec![
        field("f1", FieldType::Text, "Employee Full Name", 0),
        field("f2", FieldType::Date, "Start Date", 1),
        field("f3", FieldType::Text, "Job Title", 2),
        field("f4", FieldType::Checkbox, "Agree to NDA", 3),
        field("f5", FieldType::Signature, "Employee Signature", 4),
      ],
    },
    Blueprint {
      id:          BlueprintId::from("b2"),
      name:        "Software License".into(),
      description: Some("B2B software licensing terms.".into()),
      created_at:  now,
      fields:      vec![
        field("f1", FieldType::Text, "Client Organization", 0),
        field("f2", FieldType::Text, "License Key", 1),
        field("f3", FieldType::Date, "Expiration Date", 2),
        field("f4", FieldType::Signature, "Authorized Signatory", 3),
      ],
    },
  ]
}
