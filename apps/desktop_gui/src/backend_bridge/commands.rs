//! Backend commands queued from UI to backend worker.

use shared::domain::Nickname;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Load,
    Save { candidate: Nickname },
    Remove,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save { .. } => "save",
            Self::Remove => "remove",
        }
    }
}
