//! Configuration schema validation for spoke and hub chain tables.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

impl ValidationError {
	fn mismatch(field: &str, expected: &str, value: &toml::Value) -> Self {
		ValidationError::TypeMismatch {
			field: field.to_string(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		}
	}

	fn invalid(field: &str, message: impl Into<String>) -> Self {
		ValidationError::InvalidValue {
			field: field.to_string(),
			message: message.into(),
		}
	}

	/// Qualifies the offending field with the enclosing table name.
	fn nested_in(self, parent: &str) -> Self {
		match self {
			ValidationError::MissingField(f) => {
				ValidationError::MissingField(format!("{}.{}", parent, f))
			}
			ValidationError::InvalidValue { field, message } => ValidationError::InvalidValue {
				field: format!("{}.{}", parent, field),
				message,
			},
			ValidationError::TypeMismatch {
				field,
				expected,
				actual,
			} => ValidationError::TypeMismatch {
				field: format!("{}.{}", parent, field),
				expected,
				actual,
			},
		}
	}
}

/// Type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	String,
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
	Table(Schema),
}

pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field with its type and an optional value check.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		let name = self.name.as_str();
		match &self.field_type {
			FieldType::String if !value.is_str() => {
				return Err(ValidationError::mismatch(name, "string", value));
			}
			FieldType::Boolean if !value.is_bool() => {
				return Err(ValidationError::mismatch(name, "boolean", value));
			}
			FieldType::Integer { min, max } => {
				let int_val = value
					.as_integer()
					.ok_or_else(|| ValidationError::mismatch(name, "integer", value))?;
				if min.is_some_and(|min| int_val < min) {
					return Err(ValidationError::invalid(
						name,
						format!("Value {} is less than minimum {}", int_val, min.unwrap_or_default()),
					));
				}
				if max.is_some_and(|max| int_val > max) {
					return Err(ValidationError::invalid(
						name,
						format!("Value {} is greater than maximum {}", int_val, max.unwrap_or_default()),
					));
				}
			}
			FieldType::Table(schema) => {
				schema.validate(value).map_err(|e| e.nested_in(name))?;
			}
			_ => {}
		}

		match &self.validator {
			Some(validator) => validator(value).map_err(|msg| ValidationError::invalid(name, msg)),
			None => Ok(()),
		}
	}
}

/// Required and optional fields of one TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::mismatch("root", "table", config))?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

/// Schema of one chain family's configuration table.
pub trait ConfigSchema: Send + Sync {
	/// Checks required fields, field types and value constraints.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

/// Field validators shared by the family schemas.
pub mod validators {
	/// RPC endpoints must be HTTP(S) or WebSocket URLs.
	pub fn rpc_url(value: &toml::Value) -> Result<(), String> {
		let url = value.as_str().unwrap_or_default();
		const SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];
		if SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
			Ok(())
		} else {
			Err("RPC URL must start with http(s):// or ws(s)://".to_string())
		}
	}

	/// `0x`-prefixed 20-byte hex address.
	pub fn evm_address(value: &toml::Value) -> Result<(), String> {
		prefixed_hex(value, "0x", 20)
	}

	/// ICON contract address (`cx` + 20 bytes hex).
	pub fn icon_contract(value: &toml::Value) -> Result<(), String> {
		prefixed_hex(value, "cx", 20)
	}

	/// `0x`-prefixed Sui object or package id of up to 32 bytes.
	pub fn sui_object_id(value: &toml::Value) -> Result<(), String> {
		let id = value.as_str().unwrap_or_default();
		let digits = id
			.strip_prefix("0x")
			.ok_or_else(|| "Sui object id must start with 0x".to_string())?;
		if digits.is_empty() || digits.len() > 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err("Sui object id must be at most 32 bytes of hex".to_string());
		}
		Ok(())
	}

	/// Stellar contract strkey: `C` followed by 55 base32 characters.
	pub fn stellar_contract(value: &toml::Value) -> Result<(), String> {
		let id = value.as_str().unwrap_or_default();
		let valid = id.len() == 56
			&& id.starts_with('C')
			&& id
				.chars()
				.all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c));
		if valid {
			Ok(())
		} else {
			Err("Stellar contract id must be a 56 character C... strkey".to_string())
		}
	}

	/// Bech32 account or contract address with the given human-readable part.
	pub fn bech32_with_prefix(value: &toml::Value, hrp: &str) -> Result<(), String> {
		let address = value.as_str().unwrap_or_default();
		let prefix = format!("{}1", hrp);
		let data = address
			.strip_prefix(&prefix)
			.ok_or_else(|| format!("Address must start with {}", prefix))?;
		const CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
		if data.len() < 38 || !data.chars().all(|c| CHARSET.contains(c)) {
			return Err("Address is not valid bech32".to_string());
		}
		Ok(())
	}

	fn prefixed_hex(value: &toml::Value, prefix: &str, len: usize) -> Result<(), String> {
		let text = value.as_str().unwrap_or_default();
		let digits = text
			.strip_prefix(prefix)
			.ok_or_else(|| format!("Address must start with {}", prefix))?;
		match hex::decode(digits) {
			Ok(bytes) if bytes.len() == len => Ok(()),
			Ok(_) => Err(format!("Address must be {} bytes", len)),
			Err(_) => Err("Address must be valid hexadecimal".to_string()),
		}
	}
}
