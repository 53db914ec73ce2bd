//! [`Session`]: a [`Hub`] bound to its backing store.
//!
//! Every successful mutation re-serialises the collection it touched. A
//! rejected operation writes nothing. Mutations run against a copy of the
//! hub that replaces the live one only once the write has succeeded, so a
//! failing backend leaves memory and store agreeing.

use crate::{
  Result,
  blueprint::{Blueprint, BlueprintSpec},
  contract::Contract,
  draft::BlueprintDraft,
  field::FieldValues,
  hub::Hub,
  id::{BlueprintId, ContractId},
  persist::KeyValueStore,
  status::ContractStatus,
};

pub struct Session<K> {
  hub:   Hub,
  store: K,
}

impl<K: KeyValueStore> Session<K> {
  /// Load a hub from `store` and keep the store for saving.
  pub fn open(store: K) -> Result<Self> {
    let hub = Hub::load(&store)?;
    Ok(Self { hub, store })
  }

  pub fn hub(&self) -> &Hub { &self.hub }

  pub fn store(&self) -> &K { &self.store }

  pub fn into_parts(self) -> (Hub, K) { (self.hub, self.store) }

  /// Apply `op` to a copy of the hub, persist it with `save`, then adopt it.
  fn commit<T>(
    &mut self,
    op: impl FnOnce(&mut Hub) -> Result<T>,
    save: impl FnOnce(&Hub, &mut K) -> Result<()>,
  ) -> Result<T> {
    let mut next = self.hub.clone();
    let out = op(&mut next)?;
    save(&next, &mut self.store)?;
    self.hub = next;
    Ok(out)
  }

  pub fn create_blueprint(&mut self, spec: BlueprintSpec) -> Result<Blueprint> {
    self.commit(|hub| hub.create_blueprint(spec), |hub, store| hub.save_blueprints(store))
  }

  pub fn update_blueprint(
    &mut self,
    id: &BlueprintId,
    spec: BlueprintSpec,
  ) -> Result<Blueprint> {
    self.commit(
      |hub| hub.update_blueprint(id, spec),
      |hub, store| hub.save_blueprints(store),
    )
  }

  /// Nothing is written when `id` was not present.
  pub fn delete_blueprint(&mut self, id: &BlueprintId) -> Result<Option<Blueprint>> {
    if self.hub.blueprint(id).is_err() {
      return Ok(None);
    }
    self.commit(
      |hub| Ok(hub.delete_blueprint(id)),
      |hub, store| hub.save_blueprints(store),
    )
  }

  pub fn save_draft(&mut self, draft: BlueprintDraft) -> Result<Blueprint> {
    self.commit(|hub| hub.save_draft(draft), |hub, store| hub.save_blueprints(store))
  }

  pub fn create_contract(
    &mut self,
    blueprint_id: &BlueprintId,
    name: impl Into<String>,
    field_values: FieldValues,
  ) -> Result<Contract> {
    self.commit(
      |hub| hub.create_contract(blueprint_id, name, field_values),
      |hub, store| hub.save_contracts(store),
    )
  }

  pub fn transition(
    &mut self,
    id: &ContractId,
    target: ContractStatus,
  ) -> Result<Contract> {
    self.commit(
      |hub| hub.transition(id, target),
      |hub, store| hub.save_contracts(store),
    )
  }
}
