//! Generic effect configuration: a typed option bag driven by a declarative
//! schema.
//!
//! Every effect shares the same configuration shape — named options with a
//! default, a type, and a validator — so the set/get/validate machinery lives
//! here once instead of being duplicated per effect. An effect declares a
//! `&'static [OptionSpec]` and wraps an [`EffectConfig`] built from it; typed
//! getters on the effect read the bag.
//!
//! Two invariants hold for the bag:
//!
//! - `set` is atomic: a rejected value leaves the previously stored value
//!   intact.
//! - Validation happens at `set` time, never deferred to effect execution.

use crate::backend::GeometrySource;
use crate::effect::EffectError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A typed option value as stored in the bag.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Non-negative integer (dimensions, constraints).
    Uint(u32),
    /// Signed integer (offsets).
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Uint,
    Int,
    Float,
    Str,
    Bool,
}

impl ValueKind {
    fn describe(self) -> &'static str {
        match self {
            ValueKind::Uint => "a non-negative integer",
            ValueKind::Int => "an integer",
            ValueKind::Float => "a number",
            ValueKind::Str => "a string",
            ValueKind::Bool => "a boolean",
        }
    }
}

impl OptionValue {
    fn kind(&self) -> ValueKind {
        match self {
            OptionValue::Uint(_) => ValueKind::Uint,
            OptionValue::Int(_) => ValueKind::Int,
            OptionValue::Float(_) => ValueKind::Float,
            OptionValue::Str(_) => ValueKind::Str,
            OptionValue::Bool(_) => ValueKind::Bool,
        }
    }
}

/// Default value for an option, const-constructible so schemas can live in
/// `static` slices.
#[derive(Debug, Clone, Copy)]
pub enum OptionDefault {
    Uint(u32),
    Int(i64),
    Float(f64),
    Str(&'static str),
    Bool(bool),
}

impl OptionDefault {
    fn kind(self) -> ValueKind {
        match self {
            OptionDefault::Uint(_) => ValueKind::Uint,
            OptionDefault::Int(_) => ValueKind::Int,
            OptionDefault::Float(_) => ValueKind::Float,
            OptionDefault::Str(_) => ValueKind::Str,
            OptionDefault::Bool(_) => ValueKind::Bool,
        }
    }

    fn value(self) -> OptionValue {
        match self {
            OptionDefault::Uint(v) => OptionValue::Uint(v),
            OptionDefault::Int(v) => OptionValue::Int(v),
            OptionDefault::Float(v) => OptionValue::Float(v),
            OptionDefault::Str(v) => OptionValue::Str(v.to_string()),
            OptionDefault::Bool(v) => OptionValue::Bool(v),
        }
    }
}

/// Per-option validation rule, run on every `set`.
#[derive(Debug, Clone, Copy)]
pub enum Validator {
    /// Any value of the declared type.
    Any,
    /// String drawn from a fixed set.
    OneOf(&'static [&'static str]),
    /// Float in the closed interval `[0, 1]`.
    UnitInterval,
    /// String drawn from the bound image's gravity vocabulary.
    Gravity,
}

impl Validator {
    fn check(
        self,
        option: &'static str,
        value: &OptionValue,
        geometry: &dyn GeometrySource,
    ) -> Result<(), EffectError> {
        let fail = |reason: String| EffectError::InvalidParameter {
            option: option.to_string(),
            reason,
        };
        match (self, value) {
            (Validator::Any, _) => Ok(()),
            (Validator::OneOf(allowed), OptionValue::Str(s)) => {
                if allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(fail(format!("`{s}` is not one of {allowed:?}")))
                }
            }
            (Validator::UnitInterval, OptionValue::Float(v)) => {
                if (0.0..=1.0).contains(v) {
                    Ok(())
                } else {
                    Err(fail(format!("{v} is outside [0, 1]")))
                }
            }
            (Validator::Gravity, OptionValue::Str(s)) => {
                if geometry.available_gravities().iter().any(|g| g == s) {
                    Ok(())
                } else {
                    Err(fail(format!("`{s}` is not a valid gravity")))
                }
            }
            // Type mismatches are caught before validators run.
            _ => Err(fail("value has the wrong type for its validator".to_string())),
        }
    }
}

/// One entry of an effect's option schema.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: OptionDefault,
    pub validator: Validator,
}

/// Schema-driven option bag shared by every effect.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    schema: &'static [OptionSpec],
    values: BTreeMap<&'static str, OptionValue>,
}

impl EffectConfig {
    pub fn new(schema: &'static [OptionSpec]) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    fn spec(&self, name: &str) -> Option<&'static OptionSpec> {
        self.schema.iter().find(|spec| spec.name == name)
    }

    /// Store `value` under `name` after type-checking it against the schema
    /// and running the option's validator. On failure nothing is stored.
    pub fn set(
        &mut self,
        name: &str,
        value: OptionValue,
        geometry: &dyn GeometrySource,
    ) -> Result<(), EffectError> {
        let spec = self.spec(name).ok_or_else(|| EffectError::InvalidParameter {
            option: name.to_string(),
            reason: "unknown option".to_string(),
        })?;
        let expected = spec.default.kind();
        if value.kind() != expected {
            return Err(EffectError::InvalidParameter {
                option: spec.name.to_string(),
                reason: format!("must be {}", expected.describe()),
            });
        }
        spec.validator.check(spec.name, &value, geometry)?;
        self.values.insert(spec.name, value);
        Ok(())
    }

    /// Apply every schema option present and non-null in an untyped JSON map.
    ///
    /// Stops at the first conversion or validation failure; earlier sets
    /// remain applied (best-effort loader, not a transaction). Keys the schema
    /// does not know are ignored.
    pub fn apply_bulk(
        &mut self,
        data: &Map<String, Value>,
        geometry: &dyn GeometrySource,
    ) -> Result<(), EffectError> {
        for spec in self.schema {
            let Some(raw) = data.get(spec.name) else {
                continue;
            };
            if raw.is_null() {
                continue;
            }
            let value = convert(spec, raw)?;
            self.set(spec.name, value, geometry)?;
        }
        Ok(())
    }

    /// Stored value for `name`, or its schema default when unset.
    pub fn value(&self, name: &str) -> Option<OptionValue> {
        self.values
            .get(name)
            .cloned()
            .or_else(|| self.spec(name).map(|spec| spec.default.value()))
    }

    pub fn uint(&self, name: &str) -> u32 {
        match self.value(name) {
            Some(OptionValue::Uint(v)) => v,
            _ => 0,
        }
    }

    pub fn int(&self, name: &str) -> i64 {
        match self.value(name) {
            Some(OptionValue::Int(v)) => v,
            _ => 0,
        }
    }

    pub fn float(&self, name: &str) -> f64 {
        match self.value(name) {
            Some(OptionValue::Float(v)) => v,
            _ => 0.0,
        }
    }

    pub fn string(&self, name: &str) -> String {
        match self.value(name) {
            Some(OptionValue::Str(v)) => v,
            _ => String::new(),
        }
    }

    pub fn bool(&self, name: &str) -> bool {
        matches!(self.value(name), Some(OptionValue::Bool(true)))
    }
}

/// Convert a raw JSON value into the option's declared type.
fn convert(spec: &OptionSpec, raw: &Value) -> Result<OptionValue, EffectError> {
    let fail = |reason: &str| EffectError::InvalidParameter {
        option: spec.name.to_string(),
        reason: reason.to_string(),
    };
    match spec.default.kind() {
        ValueKind::Uint => raw
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(OptionValue::Uint)
            .ok_or_else(|| fail("must be a non-negative integer")),
        ValueKind::Int => raw
            .as_i64()
            .map(OptionValue::Int)
            .ok_or_else(|| fail("must be an integer")),
        ValueKind::Float => raw
            .as_f64()
            .map(OptionValue::Float)
            .ok_or_else(|| fail("must be a number")),
        ValueKind::Str => raw
            .as_str()
            .map(|s| OptionValue::Str(s.to_string()))
            .ok_or_else(|| fail("must be a string")),
        ValueKind::Bool => raw
            .as_bool()
            .map(OptionValue::Bool)
            .ok_or_else(|| fail("must be a boolean")),
    }
}
