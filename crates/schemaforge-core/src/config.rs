//! Generator configuration.
//!
//! One [`GeneratorConfig`] is built (or deserialized) before a run and then
//! shared read-only by every component. Changing a strategy only affects
//! expressions produced afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// How `Decimal` fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecimalMode {
    /// Regex-constrained string.
    String,
    /// Plain number; loses precision.
    Number,
    /// Instance of the arbitrary-precision decimal class.
    #[default]
    Decimal,
}

/// Decimal strategy and bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecimalConfig {
    pub mode: DecimalMode,
    /// Total number of digits.
    pub max_precision: Option<u32>,
    /// Digits after the decimal point.
    pub max_scale: Option<u32>,
    pub allow_negative: bool,
}

impl Default for DecimalConfig {
    fn default() -> Self {
        Self {
            mode: DecimalMode::default(),
            max_precision: None,
            max_scale: None,
            allow_negative: true,
        }
    }
}

/// How `DateTime` fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateTimeStrategy {
    /// A date value (or date / ISO string union when not strict).
    #[default]
    Date,
    /// ISO-8601 string transformed into a date value.
    IsoString,
    /// Permissive coercion into a date value.
    Coerce,
}

/// Time zone policy applied to ISO date-time strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimezonePolicy {
    /// Any offset, or none.
    #[default]
    Any,
    /// Only `Z`-terminated UTC timestamps.
    RequireUtc,
}

/// Date-time strategy and bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeConfig {
    pub strategy: DateTimeStrategy,
    /// Strict mode accepts date values only; bounds are enforced.
    pub strict: bool,
    /// Inclusive lower bound (ISO-8601).
    pub min: Option<String>,
    /// Inclusive upper bound (ISO-8601).
    pub max: Option<String>,
    pub allow_future: bool,
    pub allow_past: bool,
    pub timezone: TimezonePolicy,
}

impl Default for DateTimeConfig {
    fn default() -> Self {
        Self {
            strategy: DateTimeStrategy::default(),
            strict: true,
            min: None,
            max: None,
            allow_future: true,
            allow_past: true,
            timezone: TimezonePolicy::default(),
        }
    }
}

/// How `Json` fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JsonMode {
    #[default]
    Unknown,
    /// Keyed record of unknown values.
    Record,
    /// Fully permissive.
    Any,
}

/// JSON strategy and structural limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonConfig {
    pub mode: JsonMode,
    pub allow_null: bool,
    /// Maximum nesting depth of objects and arrays.
    pub max_depth: Option<u32>,
    /// Maximum length of the serialized value.
    pub max_length: Option<u64>,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            mode: JsonMode::default(),
            allow_null: true,
            max_depth: None,
            max_length: None,
        }
    }
}

/// How `Bytes` fields are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BytesRepresentation {
    /// Base64-encoded string.
    #[default]
    Base64,
    /// Raw binary buffer.
    Binary,
}

/// Largest accepted byte bound; its base64 length still fits in a `u64`.
pub const MAX_BYTES_SIZE: u64 = u64::MAX / 4;

/// Bytes strategy and size policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BytesConfig {
    pub representation: BytesRepresentation,
    /// Minimum decoded size in bytes.
    pub min_size: Option<u64>,
    /// Maximum decoded size in bytes.
    pub max_size: Option<u64>,
    /// Documented only; no content sniffing happens.
    pub allowed_mime_types: Vec<String>,
}

/// Date-time format under JSON-Schema-compatible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JsonSchemaDateFormat {
    #[serde(rename = "date")]
    Date,
    #[default]
    #[serde(rename = "date-time")]
    DateTime,
}

/// Big-integer format under JSON-Schema-compatible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BigIntFormat {
    #[default]
    String,
    Number,
}

/// Bytes format under JSON-Schema-compatible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BytesFormat {
    #[default]
    Base64,
    Hex,
}

/// JSON-Schema-compatible output: no transforms, no class instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonSchemaCompat {
    pub enabled: bool,
    pub date_time_format: JsonSchemaDateFormat,
    pub big_int_format: BigIntFormat,
    pub bytes_format: BytesFormat,
}

/// Modifier used for fields the schema marks optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionalFieldBehavior {
    #[default]
    Optional,
    Nullable,
    Nullish,
}

impl OptionalFieldBehavior {
    /// Name of the chained modifier.
    #[must_use]
    pub const fn modifier_name(&self) -> &'static str {
        match self {
            OptionalFieldBehavior::Optional => "optional",
            OptionalFieldBehavior::Nullable => "nullable",
            OptionalFieldBehavior::Nullish => "nullish",
        }
    }
}

/// Database provider tag. Only affects informational notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    #[default]
    Postgresql,
    Mysql,
    Sqlite,
    Sqlserver,
    Mongodb,
    Cockroachdb,
}

impl DatabaseProvider {
    /// Display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            DatabaseProvider::Postgresql => "PostgreSQL",
            DatabaseProvider::Mysql => "MySQL",
            DatabaseProvider::Sqlite => "SQLite",
            DatabaseProvider::Sqlserver => "SQL Server",
            DatabaseProvider::Mongodb => "MongoDB",
            DatabaseProvider::Cockroachdb => "CockroachDB",
        }
    }
}

/// Version of the target expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetVersion {
    V3,
    #[default]
    V4,
}

impl TargetVersion {
    /// Key used for custom error messages in builder parameters.
    #[must_use]
    pub const fn message_key(&self) -> &'static str {
        match self {
            TargetVersion::V3 => "message",
            TargetVersion::V4 => "error",
        }
    }

    /// Builder call producing an ISO-8601 date-time string validator.
    #[must_use]
    pub const fn iso_datetime_call(&self) -> &'static str {
        match self {
            TargetVersion::V3 => "z.string().datetime",
            TargetVersion::V4 => "z.iso.datetime",
        }
    }
}

/// Process-wide configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub decimal: DecimalConfig,
    pub date_time: DateTimeConfig,
    pub json: JsonConfig,
    pub bytes: BytesConfig,
    pub json_schema: JsonSchemaCompat,
    pub optional_field_behavior: OptionalFieldBehavior,
    pub provider: DatabaseProvider,
    /// When false, relation fields are left out ("pure" generation).
    pub include_relations: bool,
    pub target: TargetVersion,
    /// Suppress documentation and statistics in rendered output.
    pub lean: bool,
    /// Emit the legacy value alias next to the schema symbol.
    pub legacy_aliases: bool,
    /// Attach provider-specific informational notes.
    pub database_validation: bool,
    /// Emit the file-level documentation header.
    pub file_header: bool,
    /// Expressions for custom scalar type names.
    pub custom_type_mappings: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            decimal: DecimalConfig::default(),
            date_time: DateTimeConfig::default(),
            json: JsonConfig::default(),
            bytes: BytesConfig::default(),
            json_schema: JsonSchemaCompat::default(),
            optional_field_behavior: OptionalFieldBehavior::default(),
            provider: DatabaseProvider::default(),
            include_relations: true,
            target: TargetVersion::default(),
            lean: false,
            legacy_aliases: true,
            database_validation: false,
            file_header: true,
            custom_type_mappings: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default strategies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize from a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the decimal strategy.
    #[must_use]
    pub fn decimal(mut self, decimal: DecimalConfig) -> Self {
        self.decimal = decimal;
        self
    }

    /// Set the date-time strategy.
    #[must_use]
    pub fn date_time(mut self, date_time: DateTimeConfig) -> Self {
        self.date_time = date_time;
        self
    }

    /// Set the JSON strategy.
    #[must_use]
    pub fn json(mut self, json: JsonConfig) -> Self {
        self.json = json;
        self
    }

    /// Set the bytes strategy.
    #[must_use]
    pub fn bytes(mut self, bytes: BytesConfig) -> Self {
        self.bytes = bytes;
        self
    }

    /// Set the JSON-Schema-compatibility options.
    #[must_use]
    pub fn json_schema(mut self, json_schema: JsonSchemaCompat) -> Self {
        self.json_schema = json_schema;
        self
    }

    /// Set the modifier used for schema-optional fields.
    #[must_use]
    pub fn optional_field_behavior(mut self, behavior: OptionalFieldBehavior) -> Self {
        self.optional_field_behavior = behavior;
        self
    }

    /// Set the database provider.
    #[must_use]
    pub fn provider(mut self, provider: DatabaseProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Include or drop relation fields.
    #[must_use]
    pub fn include_relations(mut self, value: bool) -> Self {
        self.include_relations = value;
        self
    }

    /// Set the target expression-language version.
    #[must_use]
    pub fn target(mut self, target: TargetVersion) -> Self {
        self.target = target;
        self
    }

    /// Enable or disable lean rendering.
    #[must_use]
    pub fn lean(mut self, value: bool) -> Self {
        self.lean = value;
        self
    }

    /// Enable or disable the legacy alias export.
    #[must_use]
    pub fn legacy_aliases(mut self, value: bool) -> Self {
        self.legacy_aliases = value;
        self
    }

    /// Enable or disable database-specific notes.
    #[must_use]
    pub fn database_validation(mut self, value: bool) -> Self {
        self.database_validation = value;
        self
    }

    /// Map a custom scalar type name to an expression.
    #[must_use]
    pub fn custom_type(
        mut self,
        type_name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.custom_type_mappings
            .insert(type_name.into(), expression.into());
        self
    }

    /// Permissive expression used whenever a field degrades.
    #[must_use]
    pub fn fallback_expression(&self) -> &'static str {
        if self.json_schema.enabled {
            "z.any"
        } else {
            "z.unknown"
        }
    }

    /// Reject internally inconsistent settings.
    pub fn validate(&self) -> Result<()> {
        if let (Some(precision), Some(scale)) =
            (self.decimal.max_precision, self.decimal.max_scale)
        {
            if scale > precision {
                return Err(Error::Config(format!(
                    "decimal maxScale ({scale}) exceeds maxPrecision ({precision})"
                )));
            }
        }
        if self.decimal.max_precision == Some(0) {
            return Err(Error::Config("decimal maxPrecision must be positive".to_string()));
        }
        for (label, size) in [
            ("minSize", self.bytes.min_size),
            ("maxSize", self.bytes.max_size),
        ] {
            if let Some(size) = size.filter(|s| *s > MAX_BYTES_SIZE) {
                return Err(Error::Config(format!(
                    "bytes {label} ({size}) exceeds the supported maximum ({MAX_BYTES_SIZE})"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.bytes.min_size, self.bytes.max_size) {
            if min > max {
                return Err(Error::Config(format!("bytes minSize ({min}) exceeds maxSize ({max})")));
            }
        }
        if self.json.max_depth == Some(0) {
            return Err(Error::Config("json maxDepth must be positive".to_string()));
        }
        if !self.date_time.allow_future && !self.date_time.allow_past {
            return Err(Error::Config(
                "dateTime cannot disallow both future and past values".to_string(),
            ));
        }
        for (type_name, expression) in &self.custom_type_mappings {
            if expression.trim().is_empty() {
                return Err(Error::Config(format!(
                    "custom type mapping for `{type_name}` is empty"
                )));
            }
        }
        Ok(())
    }

    /// Stable fingerprint over the active configuration.
    ///
    /// SHA-256 of the canonical JSON serialization, truncated to 16 hex
    /// characters. Map-valued settings are ordered, so equal configurations
    /// always hash equally.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        match serde_json::to_vec(self) {
            Ok(bytes) => {
                let digest = Sha256::digest(&bytes);
                hex::encode(&digest[..8])
            }
            Err(e) => {
                tracing::warn!(error = %e, "Configuration could not be serialized for fingerprinting");
                "0000000000000000".to_string()
            }
        }
    }
}
