//! Configuration loading from files and environment.

use crate::{Config, ConfigError};
use spoke_adapters::schema_for;
use spoke_types::{
	validators, ChainFamily, Field, FieldType, HubChainConfig, Schema, SpokeChainConfig,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const PRIVATE_KEY_VAR: &str = "SPOKE_PRIVATE_KEY";
const HUB_RPC_URL_VAR: &str = "SPOKE_HUB_RPC_URL";
const RPC_URL_PREFIX: &str = "SPOKE_RPC_URL_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Loads a TOML file, applying environment overrides before validation.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path)?;
		Self::from_toml_with_env(&contents, std::env::vars())
	}

	/// Parses and validates a TOML string without consulting the environment.
	pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
		Self::from_toml_with_env(contents, std::iter::empty())
	}

	/// Parses `contents`, overriding values from `vars` (`SPOKE_PRIVATE_KEY`,
	/// `SPOKE_HUB_RPC_URL`, `SPOKE_RPC_URL_<NAME>`).
	pub fn from_toml_with_env<I>(contents: &str, vars: I) -> Result<Config, ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut root: toml::Table =
			toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
		Self::apply_env_overrides(&mut root, vars);
		Self::build(root)
	}

	fn apply_env_overrides<I>(root: &mut toml::Table, vars: I)
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (name, value) in vars {
			if name == PRIVATE_KEY_VAR {
				debug!("Overriding private key from environment");
				root.insert("private_key".into(), toml::Value::String(value));
			} else if name == HUB_RPC_URL_VAR {
				debug!("Overriding hub RPC URL from environment");
				if let Some(hub) = root.get_mut("hub").and_then(|hub| hub.as_table_mut()) {
					hub.insert("rpc_url".into(), toml::Value::String(value));
				}
			} else if let Some(chain) = name.strip_prefix(RPC_URL_PREFIX) {
				let spokes = root.get_mut("spokes").and_then(|spokes| spokes.as_table_mut());
				let Some(spokes) = spokes else { continue };
				for (spoke_name, table) in spokes.iter_mut() {
					if env_key(spoke_name) == chain {
						debug!("Overriding RPC URL for {} from environment", spoke_name);
						if let Some(table) = table.as_table_mut() {
							table.insert("rpc_url".into(), toml::Value::String(value.clone()));
						}
					}
				}
			}
		}
	}

	fn build(root: toml::Table) -> Result<Config, ConfigError> {
		let hub_table = root.get("hub").ok_or_else(|| ConfigError::Validation {
			section: "hub".into(),
			message: "missing [hub] table".into(),
		})?;
		hub_schema()
			.validate(hub_table)
			.map_err(|e| invalid("hub", e))?;
		let hub: HubChainConfig = hub_table
			.clone()
			.try_into()
			.map_err(|e| invalid("hub", e))?;

		let mut spokes = BTreeMap::new();
		if let Some(tables) = root.get("spokes") {
			let tables = tables.as_table().ok_or_else(|| ConfigError::Validation {
				section: "spokes".into(),
				message: "expected a table of spoke chains".into(),
			})?;
			for (name, table) in tables {
				let spoke = Self::build_spoke(name, table)?;
				spokes.insert(name.clone(), spoke);
			}
		}

		let private_key = match root.get("private_key") {
			None => None,
			Some(toml::Value::String(key)) => Some(key.clone()),
			Some(_) => {
				return Err(ConfigError::Validation {
					section: "private_key".into(),
					message: "expected a hex string".into(),
				})
			}
		};

		Self::validate_config(&hub, &spokes)?;
		info!(spokes = spokes.len(), hub_chain_id = hub.chain_id, "Configuration loaded");

		Ok(Config {
			hub,
			spokes,
			private_key,
		})
	}

	fn build_spoke(name: &str, table: &toml::Value) -> Result<SpokeChainConfig, ConfigError> {
		let section = format!("spokes.{}", name);
		let family: ChainFamily = table
			.get("family")
			.and_then(|family| family.as_str())
			.ok_or_else(|| ConfigError::Validation {
				section: section.clone(),
				message: "missing family".into(),
			})?
			.parse()?;

		schema_for(family)
			.validate(table)
			.map_err(|e| invalid(&section, e))?;

		let mut table = table.clone();
		if let Some(fields) = table.as_table_mut() {
			fields.insert("name".into(), toml::Value::String(name.to_string()));
			fields.insert("family".into(), toml::Value::String(family.as_str().into()));
		}
		table
			.try_into()
			.map_err(|e| invalid(&section, e))
	}

	/// Cross-chain checks that no single table can express.
	fn validate_config(
		hub: &HubChainConfig,
		spokes: &BTreeMap<String, SpokeChainConfig>,
	) -> Result<(), ConfigError> {
		let mut seen = BTreeMap::new();
		for spoke in spokes.values() {
			if let Some(other) = seen.insert(spoke.chain_id, &spoke.name) {
				return Err(ConfigError::Validation {
					section: format!("spokes.{}", spoke.name),
					message: format!("chain id {} already used by {}", spoke.chain_id, other),
				});
			}
			if spoke.family == ChainFamily::Sonic && spoke.chain_id != hub.chain_id {
				return Err(ConfigError::Validation {
					section: format!("spokes.{}", spoke.name),
					message: format!(
						"sonic spoke chain id {} differs from hub chain id {}",
						spoke.chain_id, hub.chain_id
					),
				});
			}
			if let Some(factory) = &spoke.wallet_abstraction {
				if !factory.eq_ignore_ascii_case(&hub.wallet_factory) {
					return Err(ConfigError::Validation {
						section: format!("spokes.{}", spoke.name),
						message: format!(
							"wallet_abstraction {} differs from hub wallet_factory {}",
							factory, hub.wallet_factory
						),
					});
				}
			}
		}
		Ok(())
	}
}

fn hub_schema() -> Schema {
	Schema::new(
		vec![
			Field::new(
				"chain_id",
				FieldType::Integer {
					min: Some(1),
					max: None,
				},
			),
			Field::new("rpc_url", FieldType::String).with_validator(validators::rpc_url),
			Field::new("wallet_factory", FieldType::String).with_validator(validators::evm_address),
			Field::new("asset_manager", FieldType::String).with_validator(validators::evm_address),
		],
		vec![],
	)
}

fn invalid(section: &str, err: impl std::fmt::Display) -> ConfigError {
	ConfigError::Validation {
		section: section.to_string(),
		message: err.to_string(),
	}
}

/// `base-sepolia` is overridden by `SPOKE_RPC_URL_BASE_SEPOLIA`.
fn env_key(name: &str) -> String {
	name.to_ascii_uppercase().replace('-', "_")
}
