//! Named, typed, deterministic tools
//!
//! Every tool declares its parameters up front. [`ToolRegistry::call`] checks
//! arguments against those declarations and fills defaults before the handler
//! runs, so handlers read already-validated values through [`ToolArgs`].

mod api;
mod data;
mod math;
mod reward;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RewardError, Result};

/// JSON shape accepted for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    Integer,
    Boolean,
    String,
    Array,
    Object,
    Any,
}

impl ParamKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Number => value.is_number(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::String => value.is_string(),
            ParamKind::Array => value.is_array(),
            ParamKind::Object => value.is_object(),
            ParamKind::Any => true,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::String => "string",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
            ParamKind::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
        }
    }

    /// Optional parameter; absent or null reads as `default`
    pub fn optional(name: &'static str, kind: ParamKind, default: Option<Value>) -> Self {
        Self {
            name,
            kind,
            required: false,
            default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

pub type ToolHandler = fn(&ToolArgs) -> Result<Value>;

/// Validated arguments for one tool call
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| RewardError::invalid_value("argument", format!("{name} is required")))
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        self.require(name)?
            .as_f64()
            .ok_or_else(|| RewardError::invalid_value("argument", format!("{name} must be a number")))
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.require(name)?.as_i64().ok_or_else(|| {
            RewardError::invalid_value("argument", format!("{name} must be an integer"))
        })
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        self.require(name)?.as_bool().ok_or_else(|| {
            RewardError::invalid_value("argument", format!("{name} must be a boolean"))
        })
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| RewardError::invalid_value("argument", format!("{name} must be a string")))
    }

    pub fn array(&self, name: &str) -> Result<&[Value]> {
        self.require(name)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| RewardError::invalid_value("argument", format!("{name} must be an array")))
    }

    pub fn object(&self, name: &str) -> Result<&Map<String, Value>> {
        self.require(name)?.as_object().ok_or_else(|| {
            RewardError::invalid_value("argument", format!("{name} must be an object"))
        })
    }

    /// Array of numbers; any other element is rejected
    pub fn numbers(&self, name: &str) -> Result<Vec<f64>> {
        self.array(name)?
            .iter()
            .map(|v| {
                v.as_f64().ok_or_else(|| {
                    RewardError::invalid_value("argument", format!("{name} must contain only numbers"))
                })
            })
            .collect()
    }

    /// Array of strings; any other element is rejected
    pub fn strings(&self, name: &str) -> Result<Vec<&str>> {
        self.array(name)?
            .iter()
            .map(|v| {
                v.as_str().ok_or_else(|| {
                    RewardError::invalid_value("argument", format!("{name} must contain only strings"))
                })
            })
            .collect()
    }
}

struct RegisteredTool {
    spec: ToolSpec,
    handler: ToolHandler,
}

/// Immutable set of tools, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        math::register(&mut registry);
        api::register(&mut registry);
        data::register(&mut registry);
        reward::register(&mut registry);
        tracing::debug!(count = registry.tools.len(), "registered built-in tools");
        registry
    }

    pub fn register(&mut self, spec: ToolSpec, handler: ToolHandler) {
        self.tools.insert(spec.name, RegisteredTool { spec, handler });
    }

    /// Tool specs in name order
    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values().map(|t| &t.spec)
    }

    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name).map(|t| &t.spec)
    }

    /// Validate `args` against the tool's parameters and run it
    #[tracing::instrument(skip(self, args))]
    pub fn call(&self, name: &str, args: &Value) -> Result<Value> {
        let tool = self.tools.get(name).ok_or_else(|| RewardError::not_found("tool", name))?;
        let args = bind_args(&tool.spec, args)?;
        (tool.handler)(&args)
    }
}

fn bind_args(spec: &ToolSpec, args: &Value) -> Result<ToolArgs> {
    let provided = match args {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(RewardError::invalid_value(
                &format!("arguments for {}", spec.name),
                format!("expected a JSON object, got {other}"),
            ))
        }
    };

    if let Some(unknown) = provided
        .keys()
        .find(|key| !spec.params.iter().any(|p| p.name == key.as_str()))
    {
        return Err(RewardError::invalid_value(
            &format!("arguments for {}", spec.name),
            format!("unknown parameter '{unknown}'"),
        ));
    }

    let mut values = Map::new();
    for param in &spec.params {
        let value = provided
            .get(param.name)
            .filter(|v| param.kind == ParamKind::Any || !v.is_null());
        match value {
            Some(value) if param.kind.accepts(value) => {
                values.insert(param.name.to_string(), value.clone());
            }
            Some(value) => {
                return Err(RewardError::invalid_value(
                    &format!("arguments for {}", spec.name),
                    format!("'{}' must be {}, got {}", param.name, param.kind, value),
                ))
            }
            None if param.required => {
                return Err(RewardError::invalid_value(
                    &format!("arguments for {}", spec.name),
                    format!("missing required parameter '{}'", param.name),
                ))
            }
            None => {
                if let Some(default) = &param.default {
                    values.insert(param.name.to_string(), default.clone());
                }
            }
        }
    }

    Ok(ToolArgs { values })
}
