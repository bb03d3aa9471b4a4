//! request serialization
//!
//! turns the selected part of a request tree into graphql operation text and
//! packages it as a [`SavedRequest`].

use crate::error::{Error, Result};
use crate::schema::{input_type_name, FieldDescriptor, FieldType, RequestKind};
use crate::tree::RequestNode;
use serde::{Deserialize, Serialize};

/// a named, reusable operation built from a request tree selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRequest {
    pub name: String,
    pub kind: RequestKind,
    pub return_type: String,
    /// complete operation text, header included
    pub operation: String,
    pub input_type: String,
    /// variables the operation declares, in header order
    pub arguments: Vec<FieldDescriptor>,
}

impl SavedRequest {
    /// build a saved request from a root node and its current selection
    pub fn from_node(name: &str, node: &RequestNode) -> Result<Self> {
        let kind = node.root.ok_or_else(|| {
            Error::Config(format!("`{}` is not a request root", node.label))
        })?;
        Ok(Self {
            name: name.to_string(),
            kind,
            return_type: node.type_name.clone(),
            operation: build_operation(name, node)?,
            input_type: input_type_name(&node.label),
            arguments: variable_arguments(node)?,
        })
    }
}

/// render a node and its effectively selected descendants.
///
/// `label(arg:$arg) { child ... }`; arguments only appear when the node
/// declares some, the braces only when a child is selected.
pub fn serialize(node: &RequestNode) -> String {
    let mut out = node.label.clone();
    if !node.arguments.is_empty() {
        let args = node
            .arguments
            .iter()
            .map(|arg| format!("{}:${}", arg.name, arg.name))
            .collect::<Vec<_>>();
        out.push_str(&format!("({})", args.join(", ")));
    }

    let children = node
        .children
        .iter()
        .filter(|child| child.is_effectively_selected())
        .map(serialize)
        .collect::<Vec<_>>();
    if !children.is_empty() {
        out.push_str(&format!(" {{ {} }}", children.join(" ")));
    } else if matches!(node.kind, FieldType::Union(_)) && !node.expandable {
        out.push_str(" { __typename }");
    }
    out
}

/// variables referenced by [`serialize`]: the node's own arguments, then the
/// arguments of every selected descendant.
///
/// a name shared by several fields is declared once; it fails with
/// [`Error::ConflictingVariable`] when the declared types differ.
pub fn variable_arguments(node: &RequestNode) -> Result<Vec<FieldDescriptor>> {
    let mut out: Vec<FieldDescriptor> = Vec::new();
    collect_arguments(node, &mut out)?;
    Ok(out)
}

fn collect_arguments(node: &RequestNode, out: &mut Vec<FieldDescriptor>) -> Result<()> {
    for arg in &node.arguments {
        match out.iter().find(|existing| existing.name == arg.name) {
            Some(existing) if existing.type_ref != arg.type_ref => {
                return Err(Error::ConflictingVariable {
                    name: arg.name.clone(),
                    first: existing.type_ref.clone(),
                    second: arg.type_ref.clone(),
                });
            }
            Some(_) => {}
            None => out.push(arg.clone()),
        }
    }
    for child in node.children.iter().filter(|c| c.is_effectively_selected()) {
        collect_arguments(child, out)?;
    }
    Ok(())
}

/// `($id: Int!, $after: String)`, empty when there are no variables
pub fn variable_header(arguments: &[FieldDescriptor]) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    let defs = arguments
        .iter()
        .map(|arg| format!("${}: {}", arg.name, arg.type_ref))
        .collect::<Vec<_>>();
    format!("({})", defs.join(", "))
}

/// complete `query|mutation Name($v: T) { ... }` text for a request root
pub fn build_operation(name: &str, node: &RequestNode) -> Result<String> {
    if !is_valid_name(name) {
        return Err(Error::InvalidName(name.to_string()));
    }
    let kind = node.root.unwrap_or(RequestKind::Query);
    Ok(format!(
        "{} {}{} {{ {} }}",
        kind.keyword(),
        name,
        variable_header(&variable_arguments(node)?),
        serialize(node)
    ))
}

/// graphql name: `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}
