//! front-end seam for argument collection

use super::session::{ArgumentSession, Effect, Event, ListView, ValuePrompt};
use crate::error::Error;
use serde_json::Value;

/// answer to a list prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Item(usize),
    Back,
    Run,
    ToggleFilter,
}

/// the three interactions a host has to offer, plus a message sink.
///
/// `None` from any prompt means it was dismissed without an answer.
#[allow(async_fn_in_trait)]
pub trait Prompter {
    async fn pick(&mut self, view: &ListView) -> Option<Choice>;
    async fn input(&mut self, prompt: &ValuePrompt) -> Option<String>;
    async fn confirm(&mut self, message: &str) -> Option<bool>;
    async fn notify(&mut self, message: &str);
}

/// drive `session` with `prompter` until it finishes.
///
/// returns the variables object, or `None` when the session was abandoned.
/// only one prompt is ever outstanding at a time.
pub async fn collect_variables<P: Prompter>(
    session: &mut ArgumentSession,
    prompter: &mut P,
) -> Option<Value> {
    let mut effect = session.current();
    loop {
        let event = match effect {
            Effect::ShowList(view) => match prompter.pick(&view).await {
                Some(Choice::Item(index)) => Event::Pick(index),
                Some(Choice::Back) => Event::Back,
                Some(Choice::Run) => Event::Run,
                Some(Choice::ToggleFilter) => Event::ToggleFilter,
                None => Event::Cancel,
            },
            Effect::PromptValue(prompt) => match prompter.input(&prompt).await {
                Some(text) => Event::Submit(text),
                None => Event::Cancel,
            },
            Effect::Incomplete(missing) => {
                let message = Error::IncompleteArguments { missing }.to_string();
                prompter.notify(&message).await;
                effect = session.current();
                continue;
            }
            Effect::Confirm(text) => match prompter.confirm(&text).await {
                Some(answer) => Event::Confirm(answer),
                None => Event::Cancel,
            },
            Effect::Finished(variables) => return Some(variables),
            Effect::Abandoned => return None,
        };
        effect = session.step(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use serde_json::json;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        picks: VecDeque<Option<Choice>>,
        inputs: VecDeque<Option<String>>,
        confirms: VecDeque<Option<bool>>,
        notes: Vec<String>,
        prompts_seen: Vec<ValuePrompt>,
    }

    impl Prompter for Scripted {
        async fn pick(&mut self, _view: &ListView) -> Option<Choice> {
            self.picks.pop_front().flatten()
        }

        async fn input(&mut self, prompt: &ValuePrompt) -> Option<String> {
            self.prompts_seen.push(prompt.clone());
            self.inputs.pop_front().flatten()
        }

        async fn confirm(&mut self, _message: &str) -> Option<bool> {
            self.confirms.pop_front().flatten()
        }

        async fn notify(&mut self, message: &str) {
            self.notes.push(message.to_string());
        }
    }

    fn session() -> ArgumentSession {
        let mut registry = SchemaRegistry::new();
        registry
            .load_sdl(
                "type Item { id: ID } type Query { items(first: Int!, after: String): [Item] }",
            )
            .unwrap();
        let request = registry.request("items").unwrap();
        ArgumentSession::new(&registry, &request.arguments)
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore)]
    async fn test_collects_after_retry() {
        let mut session = session();
        let mut prompter = Scripted {
            picks: VecDeque::from([
                Some(Choice::Run),
                Some(Choice::Item(0)),
                Some(Choice::Run),
            ]),
            inputs: VecDeque::from([Some("abc".to_string()), Some("42".to_string())]),
            confirms: VecDeque::from([Some(true)]),
            ..Default::default()
        };

        let variables = collect_variables(&mut session, &mut prompter).await;
        assert_eq!(variables, Some(json!({"first": 42, "after": null})));
        assert_eq!(prompter.notes.len(), 1);
        assert!(prompter.notes[0].contains("first"));
        assert_eq!(prompter.prompts_seen.len(), 2);
        assert!(prompter.prompts_seen[1].error.is_some());
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore)]
    async fn test_dismiss_at_top_level_abandons() {
        let mut session = session();
        let mut prompter = Scripted {
            picks: VecDeque::from([Some(Choice::Item(0)), None]),
            inputs: VecDeque::from([None]),
            ..Default::default()
        };

        assert_eq!(collect_variables(&mut session, &mut prompter).await, None);
        assert_eq!(prompter.prompts_seen.len(), 1);
        assert!(session.is_done());
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore)]
    async fn test_declined_confirmation_keeps_going() {
        let mut session = session();
        let mut prompter = Scripted {
            picks: VecDeque::from([
                Some(Choice::Item(0)),
                Some(Choice::Run),
                Some(Choice::ToggleFilter),
                Some(Choice::Back),
                Some(Choice::Run),
            ]),
            inputs: VecDeque::from([Some("5".to_string())]),
            confirms: VecDeque::from([Some(false), Some(true)]),
            ..Default::default()
        };

        let variables = collect_variables(&mut session, &mut prompter).await;
        assert_eq!(variables, Some(json!({"first": 5, "after": null})));
        assert!(prompter.notes.is_empty());
    }
}
