use std::{
    future::Future,
    sync::{Arc, Mutex},
};

use docflow_proto::{Message, MessageBatch, MessageType};
use tracing::debug;

use crate::{
    error::LifecycleError,
    traits::{Presenter, ShowMessageOptions},
};

/// The process-wide message store. Backends push into it; operations consume from it.
#[derive(Clone, Default)]
pub struct MessageModel(Arc<Mutex<Vec<Message>>>);

impl MessageModel {
    pub fn new() -> Self { Self::default() }

    pub fn add(&self, message: Message) { self.0.lock().expect("Failed to lock messages").push(message); }

    pub fn extend(&self, messages: impl IntoIterator<Item = Message>) {
        self.0.lock().expect("Failed to lock messages").extend(messages);
    }

    pub fn all(&self) -> Vec<Message> { self.0.lock().expect("Failed to lock messages").clone() }

    pub fn len(&self) -> usize { self.0.lock().expect("Failed to lock messages").len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Messages matching both the bound and the transition flag.
    pub fn messages(&self, bound: bool, transition: bool) -> Vec<Message> {
        self.0.lock().expect("Failed to lock messages").iter().filter(|m| m.is_bound() == bound && m.transition == transition).cloned().collect()
    }

    /// Remove and return every message matching `predicate`, preserving order.
    pub fn take(&self, predicate: impl Fn(&Message) -> bool) -> Vec<Message> {
        let mut messages = self.0.lock().expect("Failed to lock messages");
        let (taken, kept): (Vec<Message>, Vec<Message>) = messages.drain(..).partition(|m| predicate(m));
        *messages = kept;
        taken
    }

    pub fn update(&self, f: impl Fn(&mut Message)) { self.0.lock().expect("Failed to lock messages").iter_mut().for_each(f); }
}

/// The message capability handed into every lifecycle operation.
///
/// Discipline: transition messages are cleared before a state-changing call and the
/// resulting batch is consumed and shown after it. [`MessageSink::with_transition_message_scope`]
/// makes that ordering structural.
#[derive(Clone)]
pub struct MessageSink {
    model: MessageModel,
    presenter: Arc<dyn Presenter>,
}

impl MessageSink {
    pub fn new(model: MessageModel, presenter: Arc<dyn Presenter>) -> Self { Self { model, presenter } }

    pub fn model(&self) -> &MessageModel { &self.model }

    pub fn add(&self, message: Message) { self.model.add(message) }

    pub fn messages(&self, bound: bool, transition: bool) -> Vec<Message> { self.model.messages(bound, transition) }

    pub fn remove_transition_messages(&self) {
        let removed = self.model.take(|m| m.transition);
        if !removed.is_empty() {
            debug!("removed {} transition messages", removed.len());
        }
    }

    pub fn remove_bound_transition_messages(&self) { self.model.take(|m| m.transition && m.is_bound()); }

    /// Remove and return the pending transition messages of one type.
    pub fn take_transition_messages(&self, message_type: MessageType) -> Vec<Message> {
        self.model.take(|m| m.transition && m.message_type == message_type)
    }

    /// Whether a success message is pending that a default `show_messages` would present.
    pub fn has_unbound_transition_success(&self) -> bool {
        self.model.all().iter().any(|m| m.transition && !m.is_bound() && m.message_type == MessageType::Success)
    }

    /// Make sure a failed call leaves an error in the batch. Backend errors usually arrive with
    /// messages of their own; when none is pending, the error text is added unbound.
    pub fn report_failure<T>(&self, result: &Result<T, LifecycleError>) {
        let Err(err) = result else {
            return;
        };
        let Some(text) = err.user_text() else {
            return;
        };
        if self.model.all().iter().any(|m| m.transition && m.message_type == MessageType::Error) {
            return;
        }
        debug!("no backend message for failure, reporting {}", text);
        self.model.add(Message::error(text));
    }

    /// Attribute untagged transition messages to the action that produced them.
    pub fn tag_transition_messages(&self, label: &str) {
        self.model.update(|m| {
            if m.transition && m.source_label.is_none() {
                m.source_label = Some(label.to_string());
            }
        });
    }

    /// Consume the unbound messages (and bound transition messages, if requested) and present them.
    pub async fn show_messages(&self, options: ShowMessageOptions) -> MessageBatch {
        let include_bound = options.include_bound;
        let batch = MessageBatch::new(self.model.take(|m| !m.is_bound() || (include_bound && m.transition)));
        debug!("showing {} messages", batch.len());
        self.presenter.show_messages(&batch, &options).await;
        batch
    }

    pub async fn show_message_dialog(&self, options: ShowMessageOptions) -> MessageBatch {
        self.show_messages(ShowMessageOptions { force_dialog: true, ..options }).await
    }

    /// Clear transition messages, run `fut`, then show what it produced, whatever its outcome.
    pub async fn with_transition_message_scope<F: Future>(&self, options: ShowMessageOptions, fut: F) -> F::Output {
        self.remove_transition_messages();
        let output = fut.await;
        self.show_messages(options).await;
        output
    }
}
