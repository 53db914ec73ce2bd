//! Text and JSON rendering of hub data for the terminal.

use std::io::Write;

use anyhow::Result;
use contracthub_core::{
  Hub,
  blueprint::Blueprint,
  contract::Contract,
  render::RenderedField,
};
use serde::Serialize;
use serde_json::json;

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
  serde_json::to_writer_pretty(&mut *out, value)?;
  writeln!(out)?;
  Ok(())
}

fn short_id(id: &str) -> &str { id.get(..8).unwrap_or(id) }

// ─── Blueprints ──────────────────────────────────────────────────────────────

pub fn blueprints<W: Write>(out: &mut W, hub: &Hub, json: bool) -> Result<()> {
  let list = hub.catalog().list();
  if json {
    return write_json(out, list);
  }
  if list.is_empty() {
    writeln!(out, "No blueprints yet.")?;
    return Ok(());
  }
  for bp in list {
    let in_use = hub.contracts_using(&bp.id).count();
    writeln!(
      out,
      "{:<10} {}  ({} fields, {} contracts)",
      short_id(bp.id.as_str()),
      bp.name,
      bp.fields.len(),
      in_use
    )?;
    writeln!(
      out,
      "           {}",
      bp.description.as_deref().unwrap_or("No description provided.")
    )?;
  }
  Ok(())
}

pub fn blueprint<W: Write>(out: &mut W, bp: &Blueprint, json: bool) -> Result<()> {
  if json {
    return write_json(out, bp);
  }
  writeln!(out, "{} ({})", bp.name, bp.id)?;
  if let Some(description) = &bp.description {
    writeln!(out, "{description}")?;
  }
  writeln!(out, "Created {}", bp.created_at.format("%Y-%m-%d %H:%M UTC"))?;
  for field in bp.sorted_fields() {
    writeln!(
      out,
      "  {}{}  [{}]  id={}",
      field.label,
      if field.required { " *" } else { "" },
      field.field_type.label(),
      field.id
    )?;
  }
  Ok(())
}

// ─── Contracts ───────────────────────────────────────────────────────────────

pub fn contracts<W: Write>(
  out: &mut W,
  hub: &Hub,
  list: &[&Contract],
  json: bool,
) -> Result<()> {
  if json {
    return write_json(out, list);
  }
  if list.is_empty() {
    writeln!(out, "No records found matching criteria")?;
    return Ok(());
  }
  for c in list {
    writeln!(
      out,
      "{:<10} {:<32} {:<24} {:<9} {}",
      short_id(c.id().as_str()),
      c.name(),
      hub.blueprint_name(c.blueprint_id()),
      c.status().to_string(),
      c.created_at().format("%Y-%m-%d")
    )?;
  }
  Ok(())
}

/// Full detail for one contract. `fields` is `None` when the contract's
/// blueprint has been deleted.
pub fn contract<W: Write>(
  out: &mut W,
  hub: &Hub,
  c: &Contract,
  fields: Option<&[RenderedField]>,
  json: bool,
) -> Result<()> {
  if json {
    return write_json(
      out,
      &json!({
        "contract": c,
        "blueprintName": hub.blueprint_name(c.blueprint_id()),
        "fields": fields,
        "allowedNext": c.allowed_next(),
      }),
    );
  }

  writeln!(out, "{}  [{}]", c.name(), c.status())?;
  writeln!(out, "Document ID: {}", c.id().as_str().to_uppercase())?;
  writeln!(out, "Blueprint:   {}", hub.blueprint_name(c.blueprint_id()))?;
  writeln!(out, "Filed:       {}", c.created_at().format("%Y-%m-%d"))?;
  writeln!(out)?;

  match fields {
    Some(fields) => {
      for field in fields {
        writeln!(out, "  {}: {}", field.label, field.display)?;
      }
    }
    None => writeln!(
      out,
      "  Blueprint {} no longer exists; this contract is orphaned.",
      c.blueprint_id()
    )?,
  }
  writeln!(out)?;

  writeln!(out, "Next actions:")?;
  if c.is_terminal() {
    writeln!(out, "  Lifecycle completed. No further actions possible.")?;
  } else {
    for next in c.allowed_next() {
      writeln!(out, "  {}  (contract transition {} {})", next.action_label(), c.id(), next)?;
    }
  }
  writeln!(out)?;

  writeln!(out, "Audit trail:")?;
  for entry in c.audit_trail() {
    writeln!(
      out,
      "  {:<9} {}",
      entry.status.to_string(),
      entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
  }
  Ok(())
}
