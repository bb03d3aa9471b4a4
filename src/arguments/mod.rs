//! argument collection
//!
//! a request's arguments are copied into a private [`ArgumentNode`] tree that
//! a [`session::ArgumentSession`] walks and fills in. the schema registry is
//! only read, never written, so it can be rebuilt at any time.

pub mod prompt;
pub mod session;

pub use prompt::{collect_variables, Choice, Prompter};
pub use session::{ArgumentSession, Effect, Event, ListItem, ListView, ValuePrompt};

use crate::registry::SchemaRegistry;
use crate::schema::{FieldDescriptor, FieldType};
use crate::tree::DEFAULT_MAX_DEPTH;
use serde_json::{Map, Number, Value};
use std::fmt;

/// what kind of input an argument node takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// typed free-text value
    Scalar,
    /// one of the child value leaves
    Enum,
    /// a single value of an enum, selected or not
    EnumValue,
    /// input object with child fields
    Input,
    /// type unknown to the schema, value must be json when required
    Unresolved,
}

/// value held by a leaf
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Unset,
    /// explicit null, from empty input or finalization
    Null,
    Value(Value),
    /// enum value leaves only
    Selected,
}

/// rejected input, reported inline while the prompt stays open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub type_name: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.type_name, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// one argument, input field, or enum value during collection
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentNode {
    pub key: String,
    pub value: ArgumentValue,
    pub type_name: String,
    pub type_ref: String,
    pub non_null: bool,
    pub is_list: bool,
    pub kind: ArgumentKind,
    pub description: Option<String>,
    pub children: Vec<ArgumentNode>,
}

impl ArgumentNode {
    /// copy a descriptor, expanding input objects and enums from the registry
    pub fn from_descriptor(field: &FieldDescriptor, registry: &SchemaRegistry) -> Self {
        Self::build(field, registry, 0)
    }

    /// the private tree for a list of argument descriptors
    pub fn forest(arguments: &[FieldDescriptor], registry: &SchemaRegistry) -> Vec<ArgumentNode> {
        arguments
            .iter()
            .map(|arg| Self::from_descriptor(arg, registry))
            .collect()
    }

    fn build(field: &FieldDescriptor, registry: &SchemaRegistry, depth: usize) -> Self {
        let mut node = Self {
            key: field.name.clone(),
            value: ArgumentValue::Unset,
            type_name: field.of_type.clone(),
            type_ref: field.type_ref.clone(),
            non_null: field.non_null,
            is_list: field.is_list,
            kind: ArgumentKind::Scalar,
            description: field.description.clone(),
            children: Vec::new(),
        };

        match &field.kind {
            FieldType::Scalar(_) => {}
            FieldType::Enum(name) => {
                node.kind = ArgumentKind::Enum;
                if let Some(enum_ty) = registry.enum_type(name) {
                    node.children = enum_ty
                        .values
                        .iter()
                        .map(|value| Self::enum_value(value, name))
                        .collect();
                }
            }
            FieldType::InputObject(name) => {
                node.kind = ArgumentKind::Input;
                match registry.input(name) {
                    Some(input) if depth < DEFAULT_MAX_DEPTH => {
                        node.children = input
                            .fields
                            .iter()
                            .map(|f| Self::build(f, registry, depth + 1))
                            .collect();
                    }
                    Some(_) => {
                        tracing::debug!(input = %name, depth, "input expansion truncated");
                    }
                    None => {
                        tracing::debug!(input = %name, "input type missing from registry");
                    }
                }
            }
            other => {
                tracing::debug!(type_name = %other.name(), key = %field.name, "argument type is not an input type");
                node.kind = ArgumentKind::Unresolved;
            }
        }
        node
    }

    fn enum_value(value: &str, enum_name: &str) -> Self {
        Self {
            key: value.to_string(),
            value: ArgumentValue::Unset,
            type_name: enum_name.to_string(),
            type_ref: enum_name.to_string(),
            non_null: false,
            is_list: false,
            kind: ArgumentKind::EnumValue,
            description: None,
            children: Vec::new(),
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ArgumentKind::Enum
    }

    /// navigable nodes: input objects and enums
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ArgumentKind::Input | ArgumentKind::Enum)
    }

    /// leaf has a value; composite has any set descendant
    pub fn is_set(&self) -> bool {
        match self.kind {
            ArgumentKind::Enum | ArgumentKind::Input => self.children.iter().any(Self::is_set),
            _ => self.value != ArgumentValue::Unset,
        }
    }

    /// short text for list displays
    pub fn value_preview(&self) -> Option<String> {
        match (&self.kind, &self.value) {
            (ArgumentKind::Enum, _) => self
                .children
                .iter()
                .find(|c| c.value == ArgumentValue::Selected)
                .map(|c| c.key.clone()),
            (ArgumentKind::Input, _) => None,
            (_, ArgumentValue::Null) => Some("null".to_string()),
            (_, ArgumentValue::Value(value)) => Some(value.to_string()),
            (_, ArgumentValue::Selected) => Some("selected".to_string()),
            (_, ArgumentValue::Unset) => None,
        }
    }

    /// check raw input against the declared type and convert it.
    ///
    /// empty input on an optional leaf becomes `null`.
    pub fn validate(&self, raw: &str) -> Result<ArgumentValue, ValidationError> {
        if raw.is_empty() {
            return if self.non_null {
                Err(self.invalid("a value is required"))
            } else {
                Ok(ArgumentValue::Null)
            };
        }

        if self.kind == ArgumentKind::Unresolved {
            return match serde_json::from_str::<Value>(raw) {
                Ok(value) => Ok(ArgumentValue::Value(value)),
                Err(_) if !self.non_null => Ok(ArgumentValue::Value(Value::String(raw.to_string()))),
                Err(err) => Err(self.invalid(&format!("expected json ({err})"))),
            };
        }

        if self.is_list {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                let items: Vec<Value> = serde_json::from_str(trimmed)
                    .map_err(|err| self.invalid(&format!("expected a json list ({err})")))?;
                let items = items
                    .into_iter()
                    .map(|item| coerce_item(&self.type_name, item))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|message| self.invalid(&message))?;
                return Ok(ArgumentValue::Value(Value::Array(items)));
            }
        }

        let value = coerce_scalar(&self.type_name, raw).map_err(|message| self.invalid(&message))?;
        if self.is_list {
            Ok(ArgumentValue::Value(Value::Array(vec![value])))
        } else {
            Ok(ArgumentValue::Value(value))
        }
    }

    fn invalid(&self, message: &str) -> ValidationError {
        ValidationError {
            type_name: self.type_ref.clone(),
            message: message.to_string(),
        }
    }

    /// json form of this node; unset optional composites become `null`
    pub fn to_json(&self) -> Value {
        let value = match self.kind {
            ArgumentKind::Enum => {
                match self
                    .children
                    .iter()
                    .find(|c| c.value == ArgumentValue::Selected)
                {
                    Some(selected) => Value::String(selected.key.clone()),
                    None => return Value::Null,
                }
            }
            ArgumentKind::Input => {
                if !self.is_set() && !self.non_null {
                    return Value::Null;
                }
                let mut object = Map::new();
                for child in &self.children {
                    object.insert(child.key.clone(), child.to_json());
                }
                Value::Object(object)
            }
            ArgumentKind::EnumValue => return Value::Null,
            ArgumentKind::Scalar | ArgumentKind::Unresolved => {
                return match &self.value {
                    ArgumentValue::Value(value) => value.clone(),
                    _ => Value::Null,
                };
            }
        };
        if self.is_list {
            Value::Array(vec![value])
        } else {
            value
        }
    }

    /// mark `index` as the only selected value of this enum
    pub(crate) fn select_enum_value(&mut self, index: usize) {
        for (idx, child) in self.children.iter_mut().enumerate() {
            child.value = if idx == index {
                ArgumentValue::Selected
            } else {
                ArgumentValue::Unset
            };
        }
    }
}

/// dotted paths of required arguments that are still unset.
///
/// a composite is only descended into when it is required itself or already
/// partially filled; an untouched optional composite is dropped as `null`.
pub fn missing_required(nodes: &[ArgumentNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_missing(nodes, "", &mut out);
    out
}

fn collect_missing(nodes: &[ArgumentNode], prefix: &str, out: &mut Vec<String>) {
    for node in nodes {
        let path = if prefix.is_empty() {
            node.key.clone()
        } else {
            format!("{prefix}.{}", node.key)
        };
        match node.kind {
            ArgumentKind::Scalar | ArgumentKind::Unresolved => {
                if node.non_null && node.value == ArgumentValue::Unset {
                    out.push(path);
                }
            }
            ArgumentKind::Enum => {
                if node.non_null && !node.is_set() {
                    out.push(path);
                }
            }
            ArgumentKind::Input => {
                if node.non_null && node.children.is_empty() {
                    out.push(path);
                } else if node.non_null || node.is_set() {
                    collect_missing(&node.children, &path, out);
                }
            }
            ArgumentKind::EnumValue => {}
        }
    }
}

/// set every unset optional leaf that will be sent to `null`
pub fn fill_nulls(nodes: &mut [ArgumentNode]) {
    for node in nodes {
        match node.kind {
            ArgumentKind::Scalar | ArgumentKind::Unresolved => {
                if node.value == ArgumentValue::Unset {
                    node.value = ArgumentValue::Null;
                }
            }
            ArgumentKind::Input => {
                if node.non_null || node.is_set() {
                    fill_nulls(&mut node.children);
                }
            }
            ArgumentKind::Enum | ArgumentKind::EnumValue => {}
        }
    }
}

/// variables object for the whole argument tree
pub fn to_variables(nodes: &[ArgumentNode]) -> Value {
    let mut object = Map::new();
    for node in nodes {
        object.insert(node.key.clone(), node.to_json());
    }
    Value::Object(object)
}

fn coerce_scalar(type_name: &str, raw: &str) -> Result<Value, String> {
    match type_name {
        "Boolean" => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("expected `true` or `false`".to_string()),
        },
        "Int" => raw
            .trim()
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| "expected a 32-bit integer".to_string()),
        "Float" => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| "expected a finite number".to_string()),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn coerce_item(type_name: &str, item: Value) -> Result<Value, String> {
    match (type_name, item) {
        (_, Value::Null) => Ok(Value::Null),
        (_, Value::String(raw)) => coerce_scalar(type_name, &raw),
        ("Boolean", Value::Bool(flag)) => Ok(Value::Bool(flag)),
        ("Int", Value::Number(n)) if n.as_i64().is_some_and(|v| i32::try_from(v).is_ok()) => {
            Ok(Value::Number(n))
        }
        ("Float", Value::Number(n)) => Ok(Value::Number(n)),
        ("Boolean" | "Int" | "Float", other) => {
            Err(format!("list item {other} is not a {type_name}"))
        }
        ("ID", Value::Number(n)) => Ok(Value::String(n.to_string())),
        ("String" | "ID", other) => Ok(Value::String(other.to_string())),
        (_, other) => Ok(other),
    }
}
