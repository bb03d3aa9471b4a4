//! request tree
//!
//! every request expands into a tree of selectable fields, bounded by a
//! maximum depth so that cyclic schemas (`User -> Post -> User`) stay finite.
//! leaves hold the selection; composite nodes derive theirs from descendants.

use crate::registry::SchemaRegistry;
use crate::schema::{FieldDescriptor, FieldType, RequestDescriptor, RequestKind};
use serde::{Deserialize, Serialize};

/// default expansion depth for [`build_tree`]
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// one node of the request tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestNode {
    pub label: String,
    pub type_name: String,
    pub returns_list: bool,
    /// false for selectable leaves (scalars, enums, unions, unknown types)
    pub expandable: bool,
    /// set on the request roots only
    #[serde(default)]
    pub root: Option<RequestKind>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<FieldDescriptor>,
    #[serde(default)]
    pub children: Vec<RequestNode>,
    pub kind: FieldType,
    #[serde(default)]
    selected: bool,
}

impl RequestNode {
    /// root node for a query or mutation, not yet expanded
    pub fn for_request(request: &RequestDescriptor, kind: FieldType) -> Self {
        Self {
            label: request.name.clone(),
            type_name: request.return_type.clone(),
            returns_list: request.returns_list,
            expandable: kind.is_expandable(),
            root: Some(request.kind),
            description: request.description.clone(),
            arguments: request.arguments.clone(),
            children: Vec::new(),
            kind,
            selected: false,
        }
    }

    /// child node for a field, not yet expanded
    pub fn for_field(field: &FieldDescriptor) -> Self {
        Self {
            label: field.name.clone(),
            type_name: field.of_type.clone(),
            returns_list: field.is_list,
            expandable: field.kind.is_expandable(),
            root: None,
            description: field.description.clone(),
            arguments: field.arguments.clone(),
            children: Vec::new(),
            kind: field.kind.clone(),
            selected: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        !self.expandable
    }

    /// raw selection flag; only meaningful on leaves
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// flip a leaf's selection. composite nodes never hold selection
    /// directly, so toggling one is a no-op that returns `false`.
    pub fn toggle(&mut self) -> bool {
        if self.expandable {
            return false;
        }
        self.selected = !self.selected;
        true
    }

    /// set a leaf's selection, returns `false` on composite nodes
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if self.expandable {
            return false;
        }
        self.selected = selected;
        true
    }

    /// leaf: its own flag. composite: any descendant selected.
    pub fn is_effectively_selected(&self) -> bool {
        if self.expandable {
            self.children.iter().any(RequestNode::is_effectively_selected)
        } else {
            self.selected
        }
    }

    /// clear this node and every descendant
    pub fn deselect_all(&mut self) {
        self.selected = false;
        for child in &mut self.children {
            child.deselect_all();
        }
    }

    pub fn child(&self, label: &str) -> Option<&RequestNode> {
        self.children.iter().find(|child| child.label == label)
    }

    /// follow labels below this node; an empty path is the node itself
    pub fn descendant<S: AsRef<str>>(&self, path: &[S]) -> Option<&RequestNode> {
        let mut node = self;
        for label in path {
            node = node.child(label.as_ref())?;
        }
        Some(node)
    }

    pub fn descendant_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut RequestNode> {
        let mut node = self;
        for label in path {
            node = node
                .children
                .iter_mut()
                .find(|child| child.label == label.as_ref())?;
        }
        Some(node)
    }

    /// number of edges on the longest downward path
    pub fn effective_depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.effective_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// label paths of every effectively selected leaf, relative to this node
    pub fn selected_paths(&self) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        collect_selected(self, &mut prefix, &mut out);
        out
    }
}

fn collect_selected(node: &RequestNode, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for child in &node.children {
        prefix.push(child.label.clone());
        if child.expandable {
            collect_selected(child, prefix, out);
        } else if child.selected {
            out.push(prefix.clone());
        }
        prefix.pop();
    }
}

/// find a node in a forest by its full label path, root label first
pub fn find<'t, S: AsRef<str>>(forest: &'t [RequestNode], path: &[S]) -> Option<&'t RequestNode> {
    let (first, rest) = path.split_first()?;
    forest
        .iter()
        .find(|root| root.label == first.as_ref())?
        .descendant(rest)
}

pub fn find_mut<'t, S: AsRef<str>>(
    forest: &'t mut [RequestNode],
    path: &[S],
) -> Option<&'t mut RequestNode> {
    let (first, rest) = path.split_first()?;
    forest
        .iter_mut()
        .find(|root| root.label == first.as_ref())?
        .descendant_mut(rest)
}

/// toggle the leaf at `path`; `false` if it is missing or not a leaf
pub fn toggle_path<S: AsRef<str>>(forest: &mut [RequestNode], path: &[S]) -> bool {
    find_mut(forest, path).is_some_and(RequestNode::toggle)
}

pub fn select_path<S: AsRef<str>>(forest: &mut [RequestNode], path: &[S], selected: bool) -> bool {
    find_mut(forest, path).is_some_and(|node| node.set_selected(selected))
}

/// one root per request, each expanded to at most `max_depth` edges
pub fn build_tree(registry: &SchemaRegistry, max_depth: usize) -> Vec<RequestNode> {
    let roots: Vec<RequestNode> = registry
        .requests()
        .iter()
        .map(|request| {
            let mut root = RequestNode::for_request(request, registry.resolve(&request.return_type));
            expand(&mut root, registry, 0, max_depth);
            root
        })
        .collect();
    tracing::debug!(roots = roots.len(), max_depth, "request tree built");
    roots
}

fn expand(node: &mut RequestNode, registry: &SchemaRegistry, depth: usize, max_depth: usize) {
    if !node.expandable || depth >= max_depth {
        return;
    }
    let Some(object) = registry.object(&node.type_name) else {
        tracing::debug!(type_name = %node.type_name, "no object type to expand");
        return;
    };
    for field in &object.fields {
        let mut child = RequestNode::for_field(field);
        expand(&mut child, registry, depth + 1, max_depth);
        node.children.push(child);
    }
}
