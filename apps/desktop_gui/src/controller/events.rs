//! Backend to UI events and error modeling for the nickname screen.

use shared::domain::{ConfirmationPrompt, Nickname};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Loaded(Nickname),
    Saved,
    SaveRejected(ConfirmationPrompt),
    Removed,
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Save,
    Remove,
    Dispatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Storage failures on save/remove still dismiss the keyboard focus.
    pub fn dismisses_focus(&self) -> bool {
        matches!(self.context, UiErrorContext::Save | UiErrorContext::Remove)
    }
}
