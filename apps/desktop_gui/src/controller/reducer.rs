//! View state for the nickname screen and the transitions backend events drive.

use shared::domain::{ConfirmChoice, ConfirmationPrompt, Heading, Nickname};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Default)]
pub struct NicknameView {
    /// Text field buffer; edits are mirrored into `nickname` by `sync_input`.
    pub input: String,
    nickname: Nickname,
    loaded: bool,
    pending: bool,
    prompt: Option<ConfirmationPrompt>,
    status: Option<String>,
    dismiss_focus: bool,
}

impl NicknameView {
    pub fn heading(&self) -> Heading {
        self.nickname.heading()
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn prompt(&self) -> Option<&ConfirmationPrompt> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn sync_input(&mut self) {
        self.nickname = Nickname::Present(self.input.clone());
    }

    /// Buttons stay disabled while a command is in flight or the dialog is open.
    pub fn can_submit(&self) -> bool {
        self.loaded && !self.pending && self.prompt.is_none()
    }

    pub fn save_command(&self) -> BackendCommand {
        BackendCommand::Save {
            candidate: self.nickname.clone(),
        }
    }

    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    pub fn dispatch_failed(&mut self, err: UiError) {
        self.pending = false;
        self.status = Some(err.message().to_string());
    }

    pub fn resolve_prompt(&mut self, choice: ConfirmChoice) {
        if let Some(prompt) = self.prompt.take() {
            prompt.resolve(choice);
        }
    }

    /// Returns true once per completed save/remove attempt.
    pub fn take_focus_dismissal(&mut self) -> bool {
        std::mem::take(&mut self.dismiss_focus)
    }
}

pub fn reduce(view: &mut NicknameView, event: UiEvent) {
    match event {
        UiEvent::Loaded(nickname) => {
            view.input = nickname.input_text().to_string();
            view.nickname = nickname;
            view.loaded = true;
            view.pending = false;
        }
        UiEvent::Saved => {
            view.pending = false;
            view.status = None;
            view.dismiss_focus = true;
        }
        UiEvent::SaveRejected(prompt) => {
            view.pending = false;
            view.prompt = Some(prompt);
        }
        UiEvent::Removed => {
            view.nickname = Nickname::Absent;
            view.input.clear();
            view.pending = false;
            view.status = None;
            view.dismiss_focus = true;
        }
        UiEvent::Error(err) => {
            view.pending = false;
            if err.context() == UiErrorContext::BackendStartup {
                view.loaded = true;
                view.nickname = Nickname::Absent;
            }
            view.dismiss_focus |= err.dismisses_focus();
            view.status = Some(err.message().to_string());
        }
    }
}
