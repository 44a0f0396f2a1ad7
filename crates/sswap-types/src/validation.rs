//! Schema validation for TOML configuration sections.
//!
//! Ledger and storage backends describe their `implementations.<name>` table
//! with a [`Schema`]; the service checks every table against it before the
//! backend factory runs, so configuration mistakes are reported with the
//! offending field path instead of as a deserialization failure.

use crate::utils::{parse_address, parse_u256};
use async_trait::async_trait;
use thiserror::Error;

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
	#[error("Failed to deserialize config: {0}")]
	DeserializationError(String),
}

impl ValidationError {
	/// Prefixes the field path with `parent`.
	fn within(self, parent: &str) -> Self {
		match self {
			ValidationError::MissingField(f) => {
				ValidationError::MissingField(format!("{}.{}", parent, f))
			},
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
			other => other,
		}
	}

	fn mismatch(field: &str, expected: &str, value: &toml::Value) -> Self {
		ValidationError::TypeMismatch {
			field: field.to_string(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		}
	}
}

/// Expected type of a configuration value.
#[derive(Debug)]
pub enum FieldType {
	String,
	/// Integer with inclusive bounds.
	Integer {
		min: Option<i64>,
		max: Option<i64>,
	},
	Boolean,
	/// 20-byte hex address string.
	Address,
	/// 256-bit unsigned integer, as a non-negative integer or a decimal/0x-hex string.
	Uint,
	Array(Box<FieldType>),
	Table(Schema),
}

/// Extra check run on a field's value after its type matches.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field in a [`Schema`].
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	/// Optional check beyond the type.
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

	/// Attaches a check that runs after the type check succeeds.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		self.field_type.check(&self.name, value)?;
		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}
		Ok(())
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

	/// Checks `config` against the schema. Unknown keys are ignored.
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

impl FieldType {
	fn check(&self, name: &str, value: &toml::Value) -> Result<(), ValidationError> {
		match self {
			FieldType::String => {
				if !value.is_str() {
					return Err(ValidationError::mismatch(name, "string", value));
				}
			},
			FieldType::Integer { min, max } => {
				let n = value
					.as_integer()
					.ok_or_else(|| ValidationError::mismatch(name, "integer", value))?;
				if let Some(min) = min.filter(|min| n < *min) {
					return Err(ValidationError::InvalidValue {
						field: name.to_string(),
						message: format!("Value {} is less than minimum {}", n, min),
					});
				}
				if let Some(max) = max.filter(|max| n > *max) {
					return Err(ValidationError::InvalidValue {
						field: name.to_string(),
						message: format!("Value {} is greater than maximum {}", n, max),
					});
				}
			},
			FieldType::Boolean => {
				if !value.is_bool() {
					return Err(ValidationError::mismatch(name, "boolean", value));
				}
			},
			FieldType::Address => {
				let s = value
					.as_str()
					.ok_or_else(|| ValidationError::mismatch(name, "address string", value))?;
				parse_address(s).map_err(|message| ValidationError::InvalidValue {
					field: name.to_string(),
					message,
				})?;
			},
			FieldType::Uint => match value {
				toml::Value::Integer(n) if *n >= 0 => {},
				toml::Value::Integer(n) => {
					return Err(ValidationError::InvalidValue {
						field: name.to_string(),
						message: format!("Value {} is negative", n),
					});
				},
				toml::Value::String(s) => {
					parse_u256(s).map_err(|message| ValidationError::InvalidValue {
						field: name.to_string(),
						message,
					})?;
				},
				other => return Err(ValidationError::mismatch(name, "unsigned integer", other)),
			},
			FieldType::Array(inner) => {
				let items = value
					.as_array()
					.ok_or_else(|| ValidationError::mismatch(name, "array", value))?;
				for (i, item) in items.iter().enumerate() {
					inner.check(&format!("{}[{}]", name, i), item)?;
				}
			},
			FieldType::Table(schema) => {
				schema.validate(value).map_err(|e| e.within(name))?;
			},
		}
		Ok(())
	}
}

/// Validation entry point exposed by each pluggable implementation.
#[async_trait]
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}
