//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use contracthub_core::{
  dashboard::ContractFilter,
  field::FieldType,
  status::ContractStatus,
};

#[derive(Parser, Debug)]
#[command(
  name = "contracthub",
  version,
  about = "Manage contract blueprints and their approval workflow"
)]
pub struct Args {
  /// Path to a TOML settings file.
  #[arg(short, long, global = true, value_name = "FILE", default_value = "contracthub.toml")]
  pub config: PathBuf,

  /// SQLite file to use; overrides `store_path` from the settings file.
  #[arg(long, global = true, value_name = "PATH", env = "CONTRACTHUB_STORE")]
  pub store: Option<PathBuf>,

  /// Print JSON instead of text.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Work with blueprints (document templates).
  #[command(subcommand)]
  Blueprint(BlueprintCommand),

  /// Work with contracts.
  #[command(subcommand)]
  Contract(ContractCommand),
}

#[derive(Subcommand, Debug)]
pub enum BlueprintCommand {
  /// List all blueprints, newest first.
  List,

  /// Show one blueprint's fields.
  Show { id: String },

  /// Create a blueprint.
  Create {
    #[arg(long)]
    name:        String,
    #[arg(long)]
    description: Option<String>,
    /// A field as `TYPE:LABEL`, or `TYPE:LABEL:optional`. Repeatable.
    #[arg(long = "field", value_name = "TYPE:LABEL", value_parser = parse_field_arg)]
    fields:      Vec<FieldArg>,
  },

  /// Edit a blueprint. Given `--field`s replace the field list; fields whose
  /// label is unchanged keep their id.
  Update {
    id:          String,
    #[arg(long)]
    name:        Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long = "field", value_name = "TYPE:LABEL", value_parser = parse_field_arg)]
    fields:      Vec<FieldArg>,
  },

  /// Delete a blueprint.
  Delete {
    id:    String,
    /// Delete even if contracts use it; they become orphaned.
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand, Debug)]
pub enum ContractCommand {
  /// List contracts, newest first.
  List {
    #[arg(long, default_value = "all")]
    filter: ContractFilter,
    /// Only show contracts whose name contains this text.
    #[arg(long, default_value = "")]
    search: String,
  },

  /// Create a contract from a blueprint.
  Create {
    blueprint: String,
    /// Defaults to "<blueprint name> - <today>".
    #[arg(long)]
    name:      Option<String>,
    /// A value as `FIELD=VALUE`, where FIELD is a field label or id.
    #[arg(long = "value", value_name = "FIELD=VALUE", value_parser = parse_value_arg)]
    values:    Vec<(String, String)>,
  },

  /// Show a contract's values, next actions and audit trail.
  Show { id: String },

  /// Move a contract to another status.
  Transition { id: String, status: ContractStatus },
}

/// One `--field` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldArg {
  pub field_type: FieldType,
  pub label:      String,
  pub required:   bool,
}

fn parse_field_arg(raw: &str) -> Result<FieldArg, String> {
  let (ty, rest) = raw
    .split_once(':')
    .ok_or_else(|| format!("expected TYPE:LABEL, got {raw:?}"))?;
  let field_type: FieldType = ty.parse().map_err(|_| {
    let known: Vec<String> = FieldType::ALL.iter().map(ToString::to_string).collect();
    format!("unknown field type {ty:?}; expected one of {}", known.join(", "))
  })?;
  let (label, required) = match rest.strip_suffix(":optional") {
    Some(label) => (label, false),
    None => (rest, true),
  };
  if label.is_empty() {
    return Err(format!("field label missing in {raw:?}"));
  }
  Ok(FieldArg { field_type, label: label.to_owned(), required })
}

fn parse_value_arg(raw: &str) -> Result<(String, String), String> {
  raw
    .split_once('=')
    .map(|(k, v)| (k.trim().to_owned(), v.to_owned()))
    .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Args::command().debug_assert(); }

  #[test]
  fn field_args() {
    assert_eq!(
      parse_field_arg("date:Start Date").unwrap(),
      FieldArg { field_type: FieldType::Date, label: "Start Date".into(), required: true }
    );
    assert_eq!(
      parse_field_arg("Checkbox:Marketing opt-in:optional").unwrap(),
      FieldArg {
        field_type: FieldType::Checkbox,
        label:      "Marketing opt-in".into(),
        required:   false,
      }
    );
    assert!(parse_field_arg("text").is_err());
    assert!(parse_field_arg("radio:Choice").is_err());
    assert!(parse_field_arg("text:").is_err());
  }

  #[test]
  fn parses_transition_status() {
    let args = Args::try_parse_from([
      "contracthub", "contract", "transition", "abc", "approved",
    ])
    .unwrap();
    match args.command {
      Command::Contract(ContractCommand::Transition { id, status }) => {
        assert_eq!(id, "abc");
        assert_eq!(status, ContractStatus::Approved);
      }
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn store_and_config_are_accepted_after_subcommands() {
    let args = Args::try_parse_from([
      "contracthub", "contract", "list", "--store", "x.db", "--config", "alt.toml",
    ])
    .unwrap();
    assert_eq!(args.store, Some(PathBuf::from("x.db")));
    assert_eq!(args.config, PathBuf::from("alt.toml"));

    let args =
      Args::try_parse_from(["contracthub", "blueprint", "list", "-c", "other.toml"]).unwrap();
    assert_eq!(args.config, PathBuf::from("other.toml"));
  }

  #[test]
  fn value_args_split_on_first_equals() {
    assert_eq!(
      parse_value_arg("License Key=a=b").unwrap(),
      ("License Key".to_owned(), "a=b".to_owned())
    );
    assert!(parse_value_arg("nothing").is_err());
  }
}
