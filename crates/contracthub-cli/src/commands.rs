//! Command dispatch. Each command performs at most one mutation; the
//! session persists it.

use std::io::Write;

use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use contracthub_core::{
  Error, Session,
  blueprint::Blueprint,
  dashboard::default_contract_name,
  draft::{BlueprintDraft, FieldPatch},
  field::FieldValues,
  id::{BlueprintId, ContractId, FieldId},
  persist::KeyValueStore,
  status::ContractStatus,
};

use crate::{
  args::{BlueprintCommand, Command, ContractCommand, FieldArg},
  output,
};

pub fn run<K, W>(
  session: &mut Session<K>,
  command: Command,
  json: bool,
  out: &mut W,
) -> Result<()>
where
  K: KeyValueStore,
  W: Write,
{
  match command {
    Command::Blueprint(cmd) => blueprint(session, cmd, json, out),
    Command::Contract(cmd) => contract(session, cmd, json, out),
  }
}

// ─── Blueprints ──────────────────────────────────────────────────────────────

fn blueprint<K: KeyValueStore, W: Write>(
  session: &mut Session<K>,
  cmd: BlueprintCommand,
  json: bool,
  out: &mut W,
) -> Result<()> {
  match cmd {
    BlueprintCommand::List => output::blueprints(out, session.hub(), json),

    BlueprintCommand::Show { id } => {
      let bp = session.hub().blueprint(&BlueprintId::from(id))?;
      output::blueprint(out, bp, json)
    }

    BlueprintCommand::Create { name, description, fields } => {
      let mut draft = BlueprintDraft::new();
      draft.name = name;
      draft.description = description;
      apply_fields(&mut draft, &fields)?;
      let bp = session.save_draft(draft)?;
      writeln!(out, "created blueprint {} ({})", bp.name, bp.id)?;
      Ok(())
    }

    BlueprintCommand::Update { id, name, description, fields } => {
      let existing = session.hub().blueprint(&BlueprintId::from(id))?;
      let mut draft = BlueprintDraft::from_blueprint(existing);
      if let Some(name) = name {
        draft.name = name;
      }
      if let Some(description) = description {
        draft.description = Some(description);
      }
      if !fields.is_empty() {
        apply_fields(&mut draft, &fields)?;
      }
      let bp = session.save_draft(draft)?;
      writeln!(out, "updated blueprint {} ({})", bp.name, bp.id)?;
      Ok(())
    }

    BlueprintCommand::Delete { id, force } => {
      let id = BlueprintId::from(id);
      let users = session.hub().contracts_using(&id).count();
      if users > 0 && !force {
        bail!(
          "{users} contract(s) use blueprint {id} and would be orphaned; \
           pass --force to delete it anyway"
        );
      }
      match session.delete_blueprint(&id)? {
        Some(bp) => {
          if users > 0 {
            tracing::warn!(%id, users, "deleted blueprint still referenced by contracts");
          }
          writeln!(out, "deleted blueprint {} ({})", bp.name, bp.id)?;
        }
        None => writeln!(out, "no blueprint with id {id}")?,
      }
      Ok(())
    }
  }
}

/// Make the draft's field list match `fields`, in order. A field whose
/// label already exists keeps its id so stored contract values still line
/// up with it.
fn apply_fields(draft: &mut BlueprintDraft, fields: &[FieldArg]) -> Result<()> {
  let mut kept: Vec<FieldId> = Vec::with_capacity(fields.len());
  for (order, arg) in fields.iter().enumerate() {
    let reuse = draft
      .fields()
      .iter()
      .find(|f| f.label == arg.label && !kept.contains(&f.id))
      .map(|f| f.id.clone());
    let id = match reuse {
      Some(id) => id,
      None => draft.add_field(),
    };
    draft.update_field(&id, FieldPatch {
      label:      Some(arg.label.clone()),
      field_type: Some(arg.field_type),
      required:   Some(arg.required),
      order:      Some(order as i64),
    })?;
    kept.push(id);
  }

  let stale: Vec<FieldId> = draft
    .fields()
    .iter()
    .filter(|f| !kept.contains(&f.id))
    .map(|f| f.id.clone())
    .collect();
  for id in stale {
    draft.remove_field(&id)?;
  }
  Ok(())
}

// ─── Contracts ───────────────────────────────────────────────────────────────

fn contract<K: KeyValueStore, W: Write>(
  session: &mut Session<K>,
  cmd: ContractCommand,
  json: bool,
  out: &mut W,
) -> Result<()> {
  match cmd {
    ContractCommand::List { filter, search } => {
      let hub = session.hub();
      output::contracts(out, hub, &hub.query_contracts(filter, &search), json)
    }

    ContractCommand::Create { blueprint, name, values } => {
      let blueprint_id = BlueprintId::from(blueprint);
      let bp = session.hub().blueprint(&blueprint_id)?;
      let field_values = parse_values(bp, &values)?;
      let name = name.unwrap_or_else(|| default_contract_name(bp, Utc::now().date_naive()));
      let contract = session.create_contract(&blueprint_id, name, field_values)?;
      writeln!(out, "created contract {} ({})", contract.name(), contract.id())?;
      Ok(())
    }

    ContractCommand::Show { id } => {
      let hub = session.hub();
      let contract = hub.contract(&ContractId::from(id))?;
      let rendered = match hub.render_contract(contract.id()) {
        Ok(fields) => Some(fields),
        Err(Error::BlueprintNotFound(_)) => None,
        Err(err) => return Err(err.into()),
      };
      output::contract(out, hub, contract, rendered.as_deref(), json)
    }

    ContractCommand::Transition { id, status } => {
      let id = ContractId::from(id);
      let contract = session.transition(&id, status).map_err(|err| match err {
        Error::InvalidTransition { from, .. } => {
          anyhow!("{err}; allowed from {from}: {}", describe_next(from))
        }
        other => other.into(),
      })?;
      writeln!(out, "{} is now {}", contract.name(), contract.status())?;
      Ok(())
    }
  }
}

fn describe_next(from: ContractStatus) -> String {
  if from.is_terminal() {
    return "nothing (terminal)".to_owned();
  }
  from
    .allowed_next()
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}

/// Resolve `FIELD=VALUE` pairs against the blueprint's fields, by id or by
/// case-insensitive label, and parse each value as its field's type.
fn parse_values(bp: &Blueprint, values: &[(String, String)]) -> Result<FieldValues> {
  let mut parsed = FieldValues::new();
  for (key, raw) in values {
    let field = bp
      .fields
      .iter()
      .find(|f| f.id.as_str() == key || f.label.eq_ignore_ascii_case(key))
      .ok_or_else(|| anyhow!("blueprint {:?} has no field {key:?}", bp.name))?;
    let value = field.field_type.parse_value(raw).ok_or_else(|| {
      anyhow!("{}: {raw:?} is not a valid {} value", field.label, field.field_type)
    })?;
    parsed.insert(field.id.clone(), value);
  }
  Ok(parsed)
}
