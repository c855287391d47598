//! Message creation form.

use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::message::{Message, Priority};
use crate::core::storage::{KeyValueStore, MessageStorage};
use crate::screens::{Alert, Route};

pub const SUCCESS_ALERT: Alert = Alert {
    title: "Success",
    message: "Message created successfully!",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a message")]
    EmptyContent,
    #[error("Failed to create message. Please try again.")]
    SaveFailed,
}

impl FormError {
    pub fn alert(&self) -> Alert {
        let message = match self {
            FormError::EmptyContent => "Please enter a message",
            FormError::SaveFailed => "Failed to create message. Please try again.",
        };
        Alert { title: "Error", message }
    }
}

/// State of the create-message form. `submit` borrows the form mutably, so
/// it cannot be edited while a submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageForm {
    pub content: String,
    pub priority: Priority,
}

impl MessageForm {
    pub fn new(content: impl Into<String>, priority: Priority) -> Self {
        Self {
            content: content.into(),
            priority,
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn select_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Resets content and priority.
    pub fn clear(&mut self) {
        self.content.clear();
        self.priority = Priority::Normal;
    }

    /// Returns the trimmed content, rejecting blank input.
    pub fn validate(&self) -> Result<&str, FormError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(FormError::EmptyContent);
        }
        Ok(content)
    }

    /// Saves a new pending message built from the form. On success the form
    /// is reset and the caller should show [`SUCCESS_ALERT`] and navigate to
    /// [`Route::MessageQueue`].
    pub async fn submit<S: KeyValueStore>(
        &mut self,
        storage: &MessageStorage<S>,
    ) -> Result<Message, FormError> {
        let message = Message::new(self.validate()?, self.priority);

        match storage.save_message(&message).await {
            Ok(()) => {
                self.clear();
                Ok(message)
            }
            Err(e) => {
                error!("Error creating message: {}", e);
                Err(FormError::SaveFailed)
            }
        }
    }

    /// Where the form sends the user after a successful submit.
    pub fn next_route() -> Route {
        Route::MessageQueue
    }
}
