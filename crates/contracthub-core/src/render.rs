//! Read-only projection of a contract's values through its blueprint.

use std::fmt;

use serde::Serialize;

use crate::{
  blueprint::Blueprint,
  contract::Contract,
  field::FieldType,
  id::FieldId,
};

/// What to show for one field of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum DisplayValue {
  /// A ticked checkbox.
  Agreed,
  /// An unticked or absent checkbox.
  Incomplete,
  Value(String),
  NoData,
}

impl fmt::Display for DisplayValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Agreed => f.write_str("AGREED & ACKNOWLEDGED"),
      Self::Incomplete => f.write_str("INCOMPLETE"),
      Self::Value(v) => f.write_str(v),
      Self::NoData => f.write_str("NO DATA"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
  pub field_id:   FieldId,
  pub label:      String,
  pub field_type: FieldType,
  pub display:    DisplayValue,
}

/// Project `contract` through the *current* field list of `blueprint`,
/// sorted by field order. Values for fields the blueprint no longer has are
/// not shown.
pub fn render(contract: &Contract, blueprint: &Blueprint) -> Vec<RenderedField> {
  blueprint
    .sorted_fields()
    .into_iter()
    .map(|field| {
      let value = contract.field_values().get(&field.id);
      let display = match field.field_type {
        FieldType::Checkbox => {
          if value.is_some_and(|v| v.is_filled()) {
            DisplayValue::Agreed
          } else {
            DisplayValue::Incomplete
          }
        }
        FieldType::Text | FieldType::Date | FieldType::Signature => value
          .filter(|v| v.is_filled())
          .map(|v| DisplayValue::Value(v.display_text()))
          .unwrap_or(DisplayValue::NoData),
      };
      RenderedField {
        field_id: field.id.clone(),
        label: field.label.clone(),
        field_type: field.field_type,
        display,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::{
    field::{FieldSpec, FieldValue, FieldValues},
    id::BlueprintId,
  };

  fn blueprint() -> Blueprint {
    let mut fields = vec![
      FieldSpec::new(FieldType::Signature, "Sign", false, 3),
      FieldSpec::new(FieldType::Checkbox, "Agree", false, 2),
      FieldSpec::new(FieldType::Text, "Party", false, 0),
      FieldSpec::new(FieldType::Date, "Start", false, 1),
    ];
    fields[2].id = FieldId::from("party");
    fields[3].id = FieldId::from("start");
    Blueprint {
      id: BlueprintId::from("b"),
      name: "Test".into(),
      description: None,
      created_at: Utc::now(),
      fields,
    }
  }

  #[test]
  fn renders_in_order_with_markers() {
    let bp = blueprint();
    let mut values = FieldValues::new();
    values.insert(FieldId::from("party"), FieldValue::Text("Acme".into()));
    values.insert(
      FieldId::from("start"),
      FieldValue::Date(NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()),
    );
    let contract = Contract::new(bp.id.clone(), "c".into(), values, Utc::now());

    let rendered = render(&contract, &bp);
    let labels: Vec<&str> = rendered.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Party", "Start", "Agree", "Sign"]);
    assert_eq!(rendered[0].display, DisplayValue::Value("Acme".into()));
    assert_eq!(rendered[1].display.to_string(), "2025-02-03");
    assert_eq!(rendered[2].display, DisplayValue::Incomplete);
    assert_eq!(rendered[3].display, DisplayValue::NoData);
  }

  #[test]
  fn ticked_checkbox_is_agreed() {
    let bp = blueprint();
    let agree = bp.fields[1].id.clone();
    let mut values = FieldValues::new();
    values.insert(agree, FieldValue::Checkbox(true));
    let contract = Contract::new(bp.id.clone(), "c".into(), values, Utc::now());
    let rendered = render(&contract, &bp);
    assert_eq!(rendered[2].display.to_string(), "AGREED & ACKNOWLEDGED");
  }
}
