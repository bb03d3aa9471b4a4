//! argument collection state machine
//!
//! [`ArgumentSession::step`] takes one [`Event`] from the front-end and returns
//! the [`Effect`] it should present next. the session never blocks and never
//! recurses, so arbitrarily nested input objects cost one focus entry per
//! level.

use super::{
    fill_nulls, missing_required, to_variables, ArgumentKind, ArgumentNode, ArgumentValue,
};
use crate::registry::SchemaRegistry;
use crate::schema::FieldDescriptor;
use serde_json::Value;

/// input from the front-end
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// choose an item of the current list, by [`ListItem::index`]
    Pick(usize),
    Back,
    /// finalize the whole argument tree
    Run,
    /// show all items or only required ones
    ToggleFilter,
    /// text entered at a value prompt
    Submit(String),
    /// answer to the final confirmation
    Confirm(bool),
    /// prompt dismissed without an answer
    Cancel,
}

/// what the front-end should present next
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ShowList(ListView),
    PromptValue(ValuePrompt),
    /// required arguments still unset; the session is back at the top level
    Incomplete(Vec<String>),
    /// variables about to be sent, pretty printed
    Confirm(String),
    Finished(Value),
    Abandoned,
}

/// one level of the argument tree
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    /// keys from the top level down to this group
    pub path: Vec<String>,
    pub items: Vec<ListItem>,
    pub hide_optional: bool,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// position among all siblings, stable under filtering
    pub index: usize,
    pub label: String,
    /// declared type, e.g. `Int!`
    pub detail: String,
    pub required: bool,
    pub is_set: bool,
    pub kind: ArgumentKind,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuePrompt {
    pub path: Vec<String>,
    pub key: String,
    pub type_ref: String,
    pub required: bool,
    pub description: Option<String>,
    pub current: Option<String>,
    /// message from the last rejected submission
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Browsing,
    Collecting { index: usize, error: Option<String> },
    Confirming { variables: Value },
    Finished(Value),
    Abandoned,
}

/// private, mutable copy of one request's arguments plus the navigation state
#[derive(Debug, Clone)]
pub struct ArgumentSession {
    roots: Vec<ArgumentNode>,
    focus: Vec<usize>,
    state: State,
    hide_optional: bool,
}

impl ArgumentSession {
    pub fn new(registry: &SchemaRegistry, arguments: &[FieldDescriptor]) -> Self {
        Self::from_nodes(ArgumentNode::forest(arguments, registry))
    }

    pub fn from_nodes(roots: Vec<ArgumentNode>) -> Self {
        Self {
            roots,
            focus: Vec::new(),
            state: State::Browsing,
            hide_optional: false,
        }
    }

    pub fn arguments(&self) -> &[ArgumentNode] {
        &self.roots
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Finished(_) | State::Abandoned)
    }

    /// tear the session down from outside; nothing is committed
    pub fn abort(&mut self) {
        tracing::debug!("argument session aborted");
        self.state = State::Abandoned;
    }

    /// effect for the current state, without changing it
    pub fn current(&self) -> Effect {
        match &self.state {
            State::Browsing => Effect::ShowList(self.list_view()),
            State::Collecting { index, error } => {
                Effect::PromptValue(self.value_prompt(*index, error.clone()))
            }
            State::Confirming { variables } => Effect::Confirm(pretty(variables)),
            State::Finished(variables) => Effect::Finished(variables.clone()),
            State::Abandoned => Effect::Abandoned,
        }
    }

    pub fn step(&mut self, event: Event) -> Effect {
        tracing::trace!(?event, state = ?self.state, "argument session step");
        // arms that do not assign a state stay in browsing
        let state = std::mem::replace(&mut self.state, State::Browsing);
        match (state, event) {
            (State::Browsing, Event::Pick(index)) => self.pick(index),
            (State::Browsing, Event::Back) => {
                self.focus.pop();
                self.current()
            }
            (State::Browsing, Event::Cancel) => {
                if self.focus.pop().is_none() {
                    self.state = State::Abandoned;
                }
                self.current()
            }
            (State::Browsing, Event::ToggleFilter) => {
                self.hide_optional = !self.hide_optional;
                self.current()
            }
            (State::Browsing, Event::Run) => self.finalize(),
            (State::Collecting { index, .. }, Event::Submit(raw)) => self.submit(index, &raw),
            (State::Collecting { .. }, Event::Cancel | Event::Back) => self.current(),
            (State::Confirming { variables }, Event::Confirm(true)) => {
                tracing::debug!("argument session finished");
                self.state = State::Finished(variables);
                self.current()
            }
            (State::Confirming { .. }, Event::Confirm(false) | Event::Cancel | Event::Back) => {
                self.focus.clear();
                self.current()
            }
            (state, event) => {
                tracing::debug!(?event, "event ignored in the current state");
                self.state = state;
                self.current()
            }
        }
    }

    fn pick(&mut self, index: usize) -> Effect {
        let Some(kind) = self.group().get(index).map(|node| node.kind) else {
            tracing::debug!(index, "pick out of range");
            return self.current();
        };

        match kind {
            ArgumentKind::Input | ArgumentKind::Enum => {
                self.focus.push(index);
            }
            ArgumentKind::EnumValue => {
                // enum values always bounce back to the top level
                if let Some((&enum_index, parents)) = self.focus.split_last() {
                    let parents = parents.to_vec();
                    group_at(&mut self.roots, &parents)[enum_index].select_enum_value(index);
                }
                self.focus.clear();
            }
            ArgumentKind::Scalar | ArgumentKind::Unresolved => {
                self.state = State::Collecting { index, error: None };
            }
        }
        self.current()
    }

    fn submit(&mut self, index: usize, raw: &str) -> Effect {
        let focus = self.focus.clone();
        let leaf = &mut group_at(&mut self.roots, &focus)[index];
        match leaf.validate(raw) {
            Ok(value) => {
                leaf.value = value;
                self.state = State::Browsing;
            }
            Err(err) => {
                tracing::debug!(key = %leaf.key, %err, "argument value rejected");
                self.state = State::Collecting {
                    index,
                    error: Some(err.to_string()),
                };
            }
        }
        self.current()
    }

    fn finalize(&mut self) -> Effect {
        let missing = missing_required(&self.roots);
        self.focus.clear();
        if !missing.is_empty() {
            tracing::debug!(?missing, "required arguments unset");
            self.state = State::Browsing;
            return Effect::Incomplete(missing);
        }
        fill_nulls(&mut self.roots);
        self.state = State::Confirming {
            variables: to_variables(&self.roots),
        };
        self.current()
    }

    fn group(&self) -> &[ArgumentNode] {
        let mut nodes: &[ArgumentNode] = &self.roots;
        for &idx in &self.focus {
            nodes = &nodes[idx].children;
        }
        nodes
    }

    fn path(&self) -> Vec<String> {
        let mut nodes: &[ArgumentNode] = &self.roots;
        let mut path = Vec::with_capacity(self.focus.len());
        for &idx in &self.focus {
            path.push(nodes[idx].key.clone());
            nodes = &nodes[idx].children;
        }
        path
    }

    fn list_view(&self) -> ListView {
        let items = self
            .group()
            .iter()
            .enumerate()
            .filter(|(_, node)| {
                !self.hide_optional || node.non_null || node.kind == ArgumentKind::EnumValue
            })
            .map(|(index, node)| ListItem {
                index,
                label: node.key.clone(),
                detail: node.type_ref.clone(),
                required: node.non_null,
                is_set: node.is_set(),
                kind: node.kind,
                preview: node.value_preview(),
            })
            .collect();
        ListView {
            path: self.path(),
            items,
            hide_optional: self.hide_optional,
            can_go_back: !self.focus.is_empty(),
        }
    }

    fn value_prompt(&self, index: usize, error: Option<String>) -> ValuePrompt {
        let leaf = &self.group()[index];
        ValuePrompt {
            path: self.path(),
            key: leaf.key.clone(),
            type_ref: leaf.type_ref.clone(),
            required: leaf.non_null,
            description: leaf.description.clone(),
            current: match &leaf.value {
                ArgumentValue::Value(value) => Some(value.to_string()),
                ArgumentValue::Null => Some("null".to_string()),
                _ => None,
            },
            error,
        }
    }
}

fn group_at<'a>(roots: &'a mut Vec<ArgumentNode>, focus: &[usize]) -> &'a mut Vec<ArgumentNode> {
    let mut nodes = roots;
    for &idx in focus {
        nodes = &mut nodes[idx].children;
    }
    nodes
}

fn pretty(variables: &Value) -> String {
    serde_json::to_string_pretty(variables).unwrap_or_else(|_| variables.to_string())
}
