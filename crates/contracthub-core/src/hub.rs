//! [`Hub`]: the store object that owns both collections.
//!
//! All operations are synchronous and in-memory. Loading and saving go
//! through an injected [`KeyValueStore`]; deciding *when* to save is left to
//! the caller (see [`Session`](crate::Session) for the usual policy).

use crate::{
  Result,
  blueprint::{Blueprint, BlueprintSpec},
  catalog::TemplateCatalog,
  contract::Contract,
  dashboard::{self, ContractFilter, UNKNOWN_BLUEPRINT},
  draft::BlueprintDraft,
  field::FieldValues,
  id::{BlueprintId, ContractId},
  persist::{self, BLUEPRINTS_KEY, CONTRACTS_KEY, KeyValueStore},
  render::{self, RenderedField},
  seed,
  status::ContractStatus,
  workflow::WorkflowEngine,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hub {
  catalog:  TemplateCatalog,
  workflow: WorkflowEngine,
}

impl Hub {
  pub fn new(blueprints: Vec<Blueprint>, contracts: Vec<Contract>) -> Self {
    Self {
      catalog:  TemplateCatalog::new(blueprints),
      workflow: WorkflowEngine::new(contracts),
    }
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Load both collections from `store`.
  ///
  /// A missing or non-array blueprint collection is replaced by the seed
  /// blueprints; a missing or non-array contract collection by an empty one.
  /// Within an array, records that cannot be read and blueprints that fail
  /// their save-time checks are skipped with a warning. Bare stored values
  /// are settled against their blueprint's field types.
  pub fn load<K: KeyValueStore + ?Sized>(store: &K) -> Result<Self> {
    let mut blueprints: Vec<Blueprint> =
      match persist::read_collection(store, BLUEPRINTS_KEY)? {
        Some(blueprints) => blueprints,
        None => {
          tracing::info!("no stored blueprints; using built-in templates");
          seed::blueprints()
        }
      };
    blueprints.retain(|bp| match bp.validate() {
      Ok(()) => true,
      Err(err) => {
        tracing::warn!(id = %bp.id, %err, "skipping invalid stored blueprint");
        false
      }
    });

    let mut contracts: Vec<Contract> =
      persist::read_collection(store, CONTRACTS_KEY)?.unwrap_or_default();
    for contract in &mut contracts {
      if let Some(bp) = blueprints.iter().find(|b| &b.id == contract.blueprint_id()) {
        contract.conform_values(bp);
      }
    }

    tracing::debug!(
      blueprints = blueprints.len(),
      contracts = contracts.len(),
      "hub loaded"
    );
    Ok(Self::new(blueprints, contracts))
  }

  pub fn save_blueprints<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<()> {
    persist::write_collection(store, BLUEPRINTS_KEY, self.catalog.list())
  }

  pub fn save_contracts<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<()> {
    persist::write_collection(store, CONTRACTS_KEY, self.workflow.list())
  }

  pub fn save_all<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<()> {
    self.save_blueprints(store)?;
    self.save_contracts(store)
  }

  pub fn catalog(&self) -> &TemplateCatalog { &self.catalog }

  pub fn workflow(&self) -> &WorkflowEngine { &self.workflow }

  // ── Blueprints ────────────────────────────────────────────────────────────

  pub fn create_blueprint(&mut self, spec: BlueprintSpec) -> Result<Blueprint> {
    self.catalog.create(spec)
  }

  pub fn update_blueprint(
    &mut self,
    id: &BlueprintId,
    spec: BlueprintSpec,
  ) -> Result<Blueprint> {
    self.catalog.update(id, spec)
  }

  /// Delete a blueprint even if contracts use it. Check
  /// [`Hub::has_contracts`] first to warn about orphans.
  pub fn delete_blueprint(&mut self, id: &BlueprintId) -> Option<Blueprint> {
    self.catalog.delete(id)
  }

  /// Create or update, depending on where the draft came from.
  pub fn save_draft(&mut self, draft: BlueprintDraft) -> Result<Blueprint> {
    match draft.into_spec() {
      (Some(id), spec) => self.catalog.update(&id, spec),
      (None, spec) => self.catalog.create(spec),
    }
  }

  pub fn blueprint(&self, id: &BlueprintId) -> Result<&Blueprint> {
    self.catalog.get(id)
  }

  /// The blueprint's name, or `"Unknown"` if it has been deleted.
  pub fn blueprint_name(&self, id: &BlueprintId) -> &str {
    self
      .catalog
      .get(id)
      .map(|b| b.name.as_str())
      .unwrap_or(UNKNOWN_BLUEPRINT)
  }

  pub fn contracts_using<'a>(
    &'a self,
    id: &'a BlueprintId,
  ) -> impl Iterator<Item = &'a Contract> + 'a {
    self.workflow.list().iter().filter(move |c| c.blueprint_id() == id)
  }

  pub fn has_contracts(&self, id: &BlueprintId) -> bool {
    self.contracts_using(id).next().is_some()
  }

  // ── Contracts ─────────────────────────────────────────────────────────────

  pub fn create_contract(
    &mut self,
    blueprint_id: &BlueprintId,
    name: impl Into<String>,
    field_values: FieldValues,
  ) -> Result<Contract> {
    let blueprint = self.catalog.get(blueprint_id)?;
    self.workflow.create_contract(blueprint, name, field_values)
  }

  pub fn transition(
    &mut self,
    id: &ContractId,
    target: ContractStatus,
  ) -> Result<Contract> {
    self.workflow.transition(id, target)
  }

  pub fn contract(&self, id: &ContractId) -> Result<&Contract> {
    self.workflow.get(id)
  }

  /// The blueprint a contract was built from. Fails for orphaned contracts.
  pub fn blueprint_for(&self, contract: &Contract) -> Result<&Blueprint> {
    self.catalog.get(contract.blueprint_id())
  }

  /// Render a contract through its blueprint's current fields. Fails with
  /// `BlueprintNotFound` for orphaned contracts.
  pub fn render_contract(&self, id: &ContractId) -> Result<Vec<RenderedField>> {
    let contract = self.workflow.get(id)?;
    let blueprint = self.blueprint_for(contract)?;
    Ok(render::render(contract, blueprint))
  }

  /// Contracts passing `filter` whose name contains `search`, newest first.
  pub fn query_contracts(&self, filter: ContractFilter, search: &str) -> Vec<&Contract> {
    self
      .workflow
      .list()
      .iter()
      .filter(|c| filter.matches(c.status()))
      .filter(|c| dashboard::name_matches(c, search))
      .collect()
  }
}
