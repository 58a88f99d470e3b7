use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::path::DocumentPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MessageType {
    Success,
    Information,
    Warning,
    Error,
}

/// One backend- or client-produced message.
///
/// A message with a `target` is *bound* to that document; without one it is *unbound*.
/// *Transition* messages belong to the current user interaction only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Ulid,
    pub message_type: MessageType,
    pub text: String,
    pub target: Option<DocumentPath>,
    pub transition: bool,
    /// Display label of the action that produced the message, if any.
    pub source_label: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType, text: impl Into<String>) -> Self {
        Self { id: Ulid::new(), message_type, text: text.into(), target: None, transition: true, source_label: None }
    }

    pub fn success(text: impl Into<String>) -> Self { Self::new(MessageType::Success, text) }
    pub fn info(text: impl Into<String>) -> Self { Self::new(MessageType::Information, text) }
    pub fn warning(text: impl Into<String>) -> Self { Self::new(MessageType::Warning, text) }
    pub fn error(text: impl Into<String>) -> Self { Self::new(MessageType::Error, text) }

    pub fn with_target(mut self, target: DocumentPath) -> Self {
        self.target = Some(target);
        self
    }

    /// State messages outlive the interaction that produced them.
    pub fn persistent(mut self) -> Self {
        self.transition = false;
        self
    }

    pub fn is_bound(&self) -> bool { self.target.is_some() }
}

/// Messages collected since the last checkpoint, handed to the presenter in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBatch {
    pub messages: Vec<Message>,
}

impl MessageBatch {
    pub fn new(messages: Vec<Message>) -> Self { Self { messages } }

    pub fn len(&self) -> usize { self.messages.len() }

    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    pub fn count(&self, message_type: MessageType) -> usize { self.messages.iter().filter(|m| m.message_type == message_type).count() }

    pub fn has_errors(&self) -> bool { self.count(MessageType::Error) > 0 }

    /// Highest severity in the batch.
    pub fn severity(&self) -> Option<MessageType> { self.messages.iter().map(|m| m.message_type).max() }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> { self.messages.iter() }
}

impl IntoIterator for MessageBatch {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter { self.messages.into_iter() }
}
