//! The template catalog: create, update, delete and look up blueprints.

use chrono::Utc;

use crate::{
  Error, Result,
  blueprint::{Blueprint, BlueprintSpec},
  id::BlueprintId,
};

/// Holds every blueprint, most recently created first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
  blueprints: Vec<Blueprint>,
}

impl TemplateCatalog {
  pub fn new(blueprints: Vec<Blueprint>) -> Self { Self { blueprints } }

  /// Validate `spec` and store it under a fresh id and the current time.
  pub fn create(&mut self, spec: BlueprintSpec) -> Result<Blueprint> {
    spec.validate()?;
    let blueprint = Blueprint {
      id:          BlueprintId::generate(),
      name:        spec.name,
      description: spec.description,
      created_at:  Utc::now(),
      fields:      spec.fields,
    };
    tracing::debug!(id = %blueprint.id, name = %blueprint.name, "blueprint created");
    self.blueprints.insert(0, blueprint.clone());
    Ok(blueprint)
  }

  /// Replace the stored blueprint `id`, keeping its id and creation time.
  pub fn update(&mut self, id: &BlueprintId, spec: BlueprintSpec) -> Result<Blueprint> {
    spec.validate()?;
    let slot = self
      .blueprints
      .iter_mut()
      .find(|b| &b.id == id)
      .ok_or_else(|| Error::BlueprintNotFound(id.clone()))?;
    *slot = Blueprint {
      id:          slot.id.clone(),
      name:        spec.name,
      description: spec.description,
      created_at:  slot.created_at,
      fields:      spec.fields,
    };
    tracing::debug!(id = %slot.id, "blueprint updated");
    Ok(slot.clone())
  }

  /// Remove blueprint `id` if present. Contracts referencing it are left
  /// alone and become orphaned. Returns the removed record.
  pub fn delete(&mut self, id: &BlueprintId) -> Option<Blueprint> {
    let pos = self.blueprints.iter().position(|b| &b.id == id)?;
    tracing::debug!(%id, "blueprint deleted");
    Some(self.blueprints.remove(pos))
  }

  pub fn get(&self, id: &BlueprintId) -> Result<&Blueprint> {
    self
      .blueprints
      .iter()
      .find(|b| &b.id == id)
      .ok_or_else(|| Error::BlueprintNotFound(id.clone()))
  }

  pub fn list(&self) -> &[Blueprint] { &self.blueprints }

  pub fn len(&self) -> usize { self.blueprints.len() }

  pub fn is_empty(&self) -> bool { self.blueprints.is_empty() }
}
