//! Opaque string identifiers.
//!
//! Fresh identifiers are random UUIDs, but any string is accepted so that
//! seed data (`b1`, `f1`, ...) and previously persisted ids load unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      /// A new, random identifier.
      pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

      pub fn as_str(&self) -> &str { &self.0 }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self { Self(s.to_owned()) }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self { Self(s) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }
  };
}

string_id!(
  /// Identifies a [`Blueprint`](crate::blueprint::Blueprint). Immutable after
  /// creation.
  BlueprintId
);

string_id!(
  /// Identifies a [`FieldSpec`](crate::field::FieldSpec) within its owning
  /// blueprint.
  FieldId
);

string_id!(
  /// Identifies a [`Contract`](crate::contract::Contract).
  ContractId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generated_ids_are_distinct() {
    let a = ContractId::generate();
    let b = ContractId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
  }

  #[test]
  fn serializes_as_bare_string() {
    let id = BlueprintId::from("b1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"b1\"");
    let back: BlueprintId = serde_json::from_str("\"b1\"").unwrap();
    assert_eq!(back, id);
  }
}
