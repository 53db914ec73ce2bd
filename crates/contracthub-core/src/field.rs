//! Field definitions and the typed values stored against them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::id::FieldId;

// ─── FieldType ───────────────────────────────────────────────────────────────

/// The closed set of input kinds a blueprint field can take.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldType {
  #[default]
  Text,
  Date,
  Checkbox,
  Signature,
}

impl FieldType {
  pub const ALL: [FieldType; 4] =
    [Self::Text, Self::Date, Self::Checkbox, Self::Signature];

  /// Human-readable name shown in field pickers.
  pub fn label(self) -> &'static str {
    match self {
      Self::Text => "Text Input",
      Self::Date => "Date Picker",
      Self::Checkbox => "Checkbox",
      Self::Signature => "Signature Line",
    }
  }

  /// Interpret raw user input as a value of this type.
  ///
  /// Dates must be `YYYY-MM-DD`. Checkboxes accept the usual yes/no
  /// spellings. Returns `None` when the input cannot be read as this type.
  pub fn parse_value(self, raw: &str) -> Option<FieldValue> {
    match self {
      Self::Text => Some(FieldValue::Text(raw.to_owned())),
      Self::Signature => Some(FieldValue::Signature(raw.to_owned())),
      Self::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(FieldValue::Date),
      Self::Checkbox => match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(FieldValue::Checkbox(true)),
        "false" | "no" | "n" | "0" | "off" | "" => {
          Some(FieldValue::Checkbox(false))
        }
        _ => None,
      },
    }
  }
}

// ─── FieldSpec ───────────────────────────────────────────────────────────────

/// One form field inside a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
  pub id:         FieldId,
  #[serde(rename = "type")]
  pub field_type: FieldType,
  pub label:      String,
  /// Contracts must supply a filled value for this field at creation time.
  pub required:   bool,
  /// Sort key for display. Need not be contiguous.
  pub order:      i64,
}

impl FieldSpec {
  /// A field with a freshly generated id.
  pub fn new(
    field_type: FieldType,
    label: impl Into<String>,
    required: bool,
    order: i64,
  ) -> Self {
    Self {
      id: FieldId::generate(),
      field_type,
      label: label.into(),
      required,
      order,
    }
  }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A value entered for a field. The variant always corresponds to the
/// [`FieldType`] of the field it was entered against.
///
/// Written as `{"type": ..., "value": ...}`. Reading also accepts a bare
/// string or boolean, which decode as `Text` and `Checkbox`; use
/// [`FieldValue::conform_to`] to settle a bare string against its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
  Text(String),
  Date(NaiveDate),
  Checkbox(bool),
  Signature(String),
}

impl FieldValue {
  pub fn field_type(&self) -> FieldType {
    match self {
      Self::Text(_) => FieldType::Text,
      Self::Date(_) => FieldType::Date,
      Self::Checkbox(_) => FieldType::Checkbox,
      Self::Signature(_) => FieldType::Signature,
    }
  }

  /// Whether this value satisfies a `required` field. An unticked checkbox
  /// and an empty string both count as missing.
  pub fn is_filled(&self) -> bool {
    match self {
      Self::Text(s) | Self::Signature(s) => !s.is_empty(),
      Self::Date(_) => true,
      Self::Checkbox(checked) => *checked,
    }
  }

  /// Reinterpret a loosely typed value as `ty`, the declared type of its
  /// field. Text is re-parsed as that type; anything that does not fit is
  /// returned unchanged.
  pub fn conform_to(self, ty: FieldType) -> FieldValue {
    if self.field_type() == ty {
      return self;
    }
    match self {
      Self::Text(raw) => match ty.parse_value(&raw) {
        Some(value) => value,
        None => Self::Text(raw),
      },
      other => other,
    }
  }

  /// Plain-text form of the value.
  pub fn display_text(&self) -> String {
    match self {
      Self::Text(s) | Self::Signature(s) => s.clone(),
      Self::Date(d) => d.format("%Y-%m-%d").to_string(),
      Self::Checkbox(true) => "yes".to_owned(),
      Self::Checkbox(false) => "no".to_owned(),
    }
  }
}

impl<'de> Deserialize<'de> for FieldValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match StoredValue::deserialize(deserializer)? {
      StoredValue::Tagged(tagged) => match tagged {
        TaggedValue::Text(s) => Self::Text(s),
        TaggedValue::Date(d) => Self::Date(d),
        TaggedValue::Checkbox(b) => Self::Checkbox(b),
        TaggedValue::Signature(s) => Self::Signature(s),
      },
      StoredValue::Flag(b) => Self::Checkbox(b),
      StoredValue::Bare(s) => Self::Text(s),
    })
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
  Tagged(TaggedValue),
  Flag(bool),
  Bare(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum TaggedValue {
  Text(String),
  Date(NaiveDate),
  Checkbox(bool),
  Signature(String),
}

/// Values entered for a contract, keyed by field id.
pub type FieldValues = BTreeMap<FieldId, FieldValue>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn field_type_parses_case_insensitively() {
    assert_eq!("Checkbox".parse::<FieldType>().unwrap(), FieldType::Checkbox);
    assert_eq!("text".parse::<FieldType>().unwrap(), FieldType::Text);
    assert!("dropdown".parse::<FieldType>().is_err());
    assert_eq!(FieldType::Signature.to_string(), "signature");
  }

  #[test]
  fn parse_value_follows_type() {
    assert_eq!(
      FieldType::Date.parse_value("2024-03-01"),
      Some(FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
    );
    assert_eq!(FieldType::Date.parse_value("March 1st"), None);
    assert_eq!(
      FieldType::Checkbox.parse_value("Yes"),
      Some(FieldValue::Checkbox(true))
    );
    assert_eq!(FieldType::Checkbox.parse_value("maybe"), None);
    assert_eq!(
      FieldType::Signature.parse_value("J. Doe"),
      Some(FieldValue::Signature("J. Doe".into()))
    );
  }

  #[test]
  fn filled_matches_truthiness() {
    assert!(!FieldValue::Text(String::new()).is_filled());
    assert!(FieldValue::Text(" ".into()).is_filled());
    assert!(!FieldValue::Checkbox(false).is_filled());
    assert!(FieldValue::Checkbox(true).is_filled());
  }

  #[test]
  fn bare_values_are_read_and_conformed() {
    let bare: FieldValue = serde_json::from_str("\"2024-03-01\"").unwrap();
    assert_eq!(bare, FieldValue::Text("2024-03-01".into()));
    assert_eq!(
      bare.conform_to(FieldType::Date),
      FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );

    let flag: FieldValue = serde_json::from_str("true").unwrap();
    assert_eq!(flag, FieldValue::Checkbox(true));

    let sig: FieldValue = serde_json::from_str("\"J. Doe\"").unwrap();
    assert_eq!(
      sig.conform_to(FieldType::Signature),
      FieldValue::Signature("J. Doe".into())
    );
    assert_eq!(
      FieldValue::Text("soon".into()).conform_to(FieldType::Date),
      FieldValue::Text("soon".into())
    );
    assert!(serde_json::from_str::<FieldValue>("42").is_err());
  }

  #[test]
  fn value_wire_shape_is_tagged() {
    let json = serde_json::to_value(FieldValue::Checkbox(true)).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "checkbox", "value": true }));

    let spec = FieldSpec {
      id:         FieldId::from("f1"),
      field_type: FieldType::Date,
      label:      "Start Date".into(),
      required:   true,
      order:      1,
    };
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(json["type"], "date");
  }
}
