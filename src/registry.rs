//! schema registry
//!
//! owns everything derived from one schema load plus the user's saved
//! requests. a load always starts from an empty registry, so a failed load
//! leaves nothing stale behind.

use crate::error::{Error, Result};
use crate::operation::SavedRequest;
use crate::schema::builder::{self, SchemaParts};
use crate::schema::introspection::{self, IntrospectionResponse};
use crate::schema::{
    EnumType, FieldType, InputType, ObjectType, RequestDescriptor, ScalarType, UnionType,
};
use crate::tree::{self, RequestNode};
use graphql_parser::schema::{parse_schema, Document};
use std::collections::BTreeMap;

/// scalars, enums, inputs, objects, unions, requests, the current request
/// tree, and saved requests for one workspace
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    scalars: BTreeMap<String, ScalarType>,
    enums: BTreeMap<String, EnumType>,
    inputs: BTreeMap<String, InputType>,
    objects: BTreeMap<String, ObjectType>,
    unions: BTreeMap<String, UnionType>,
    requests: Vec<RequestDescriptor>,
    tree: Vec<RequestNode>,
    saved: Vec<SavedRequest>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// load from sdl text
    pub fn load_sdl(&mut self, sdl: &str) -> Result<()> {
        self.clear();
        let doc = parse_schema::<String>(sdl)
            .map_err(|err| Error::Schema(format!("failed to parse schema: {err}")))?;
        self.load_document(&doc)
    }

    /// load from an already parsed sdl document
    pub fn load_document(&mut self, doc: &Document<'_, String>) -> Result<()> {
        self.clear();
        let parts = builder::build(doc)?;
        self.apply(parts);
        tracing::info!(
            requests = self.requests.len(),
            objects = self.objects.len(),
            inputs = self.inputs.len(),
            enums = self.enums.len(),
            "schema loaded"
        );
        Ok(())
    }

    /// load from an introspection query result
    pub fn load_introspection(&mut self, value: serde_json::Value) -> Result<()> {
        self.clear();
        let response = IntrospectionResponse::from_value(value)?;
        let sdl = introspection::to_sdl(response.schema())?;
        self.load_sdl(&sdl)
    }

    /// load from text that is either introspection json or sdl
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        if text.trim_start().starts_with('{') {
            self.clear();
            let value: serde_json::Value = serde_json::from_str(text)?;
            self.load_introspection(value)
        } else {
            self.load_sdl(text)
        }
    }

    /// drop every schema-derived entry and the current tree.
    /// saved requests are user data and survive reloads.
    pub fn clear(&mut self) {
        self.scalars.clear();
        self.enums.clear();
        self.inputs.clear();
        self.objects.clear();
        self.unions.clear();
        self.requests.clear();
        self.tree.clear();
    }

    fn apply(&mut self, parts: SchemaParts) {
        self.scalars = parts.scalars;
        self.enums = parts.enums;
        self.inputs = parts.inputs;
        self.objects = parts.objects;
        self.unions = parts.unions;
        self.requests = parts.requests;
    }

    pub fn is_loaded(&self) -> bool {
        !self.objects.is_empty()
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarType> {
        self.scalars.get(name)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&InputType> {
        self.inputs.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.objects.get(name)
    }

    pub fn union_type(&self, name: &str) -> Option<&UnionType> {
        self.unions.get(name)
    }

    pub fn scalars(&self) -> impl Iterator<Item = &ScalarType> {
        self.scalars.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumType> {
        self.enums.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputType> {
        self.inputs.values()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> {
        self.objects.values()
    }

    pub fn unions(&self) -> impl Iterator<Item = &UnionType> {
        self.unions.values()
    }

    pub fn requests(&self) -> &[RequestDescriptor] {
        &self.requests
    }

    pub fn request(&self, name: &str) -> Option<&RequestDescriptor> {
        self.requests.iter().find(|request| request.name == name)
    }

    /// classify a type name against the loaded registries
    pub fn resolve(&self, name: &str) -> FieldType {
        let owned = name.to_string();
        if self.scalars.contains_key(name) {
            FieldType::Scalar(owned)
        } else if self.enums.contains_key(name) {
            FieldType::Enum(owned)
        } else if let Some(object) = self.objects.get(name) {
            if object.is_interface {
                FieldType::Interface(owned)
            } else {
                FieldType::Object(owned)
            }
        } else if self.unions.contains_key(name) {
            FieldType::Union(owned)
        } else if self.inputs.contains_key(name) {
            FieldType::InputObject(owned)
        } else {
            FieldType::Unresolved(owned)
        }
    }

    /// rebuild the request tree from the loaded schema
    pub fn build_tree(&mut self, max_depth: usize) -> &[RequestNode] {
        self.tree = tree::build_tree(self, max_depth);
        &self.tree
    }

    pub fn tree(&self) -> &[RequestNode] {
        &self.tree
    }

    /// node by label path, request name first
    pub fn node<S: AsRef<str>>(&self, path: &[S]) -> Option<&RequestNode> {
        tree::find(&self.tree, path)
    }

    pub fn node_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut RequestNode> {
        tree::find_mut(&mut self.tree, path)
    }

    /// toggle the leaf at `path`; `false` if missing or not a leaf
    pub fn toggle<S: AsRef<str>>(&mut self, path: &[S]) -> bool {
        tree::toggle_path(&mut self.tree, path)
    }

    /// set the leaf at `path` selected or not; `false` if missing or not a leaf
    pub fn select<S: AsRef<str>>(&mut self, path: &[S], selected: bool) -> bool {
        tree::select_path(&mut self.tree, path, selected)
    }

    /// save the current selection of request `request` under `name`.
    ///
    /// a name that is already taken fails with [`Error::DuplicateName`] and
    /// leaves the saved list untouched. on success the request's selection
    /// is cleared.
    pub fn save_request(&mut self, name: &str, request: &str) -> Result<SavedRequest> {
        let root = self
            .tree
            .iter_mut()
            .find(|root| root.label == request)
            .ok_or_else(|| Error::UnknownRequest(request.to_string()))?;
        let saved = SavedRequest::from_node(name, root)?;
        if let Some(existing) = self.saved.iter().find(|s| s.name == name) {
            return Err(Error::DuplicateName {
                existing: Box::new(existing.clone()),
            });
        }
        root.deselect_all();
        tracing::info!(name, request, "request saved");
        self.saved.push(saved.clone());
        Ok(saved)
    }

    pub fn saved_requests(&self) -> &[SavedRequest] {
        &self.saved
    }

    pub fn saved_request(&self, name: &str) -> Option<&SavedRequest> {
        self.saved.iter().find(|saved| saved.name == name)
    }

    pub fn remove_saved_request(&mut self, name: &str) -> Option<SavedRequest> {
        let idx = self.saved.iter().position(|saved| saved.name == name)?;
        Some(self.saved.remove(idx))
    }

    /// replace the saved list, e.g. with records persisted by the host
    pub fn restore_saved_requests(&mut self, saved: Vec<SavedRequest>) {
        self.saved = saved;
    }

    /// every declaration as typescript: custom scalars, enums, unions,
    /// inputs, then objects, each group sorted by name
    pub fn render_declarations(&self) -> String {
        let mut out = String::new();
        let blocks = self
            .scalars()
            .filter(|scalar| !scalar.is_builtin())
            .map(ScalarType::render)
            .chain(self.enums().map(EnumType::render))
            .chain(self.unions().map(UnionType::render))
            .chain(self.inputs().map(InputType::render))
            .chain(self.objects().map(ObjectType::render));
        for block in blocks {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&block);
        }
        out
    }
}
