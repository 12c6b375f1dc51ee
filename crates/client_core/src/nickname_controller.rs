use shared::{
    domain::{ConfirmationPrompt, Heading, Nickname},
    error::StorageOperationFailed,
};
use storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Uninitialized,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing was written; the caller must show the prompt.
    NeedsConfirmation(ConfirmationPrompt),
    Failed(StorageOperationFailed),
}

impl SaveOutcome {
    /// Input focus drops after every attempted write, never after a rejection.
    pub fn dismisses_focus(&self) -> bool {
        !matches!(self, Self::NeedsConfirmation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Failed(StorageOperationFailed),
}

impl RemoveOutcome {
    pub fn dismisses_focus(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameSnapshot {
    pub nickname: Nickname,
    pub phase: LoadPhase,
    pub diverged: bool,
}

impl NicknameSnapshot {
    pub fn heading(&self) -> Heading {
        self.nickname.heading()
    }
}

struct ControllerState {
    current: Nickname,
    phase: LoadPhase,
    diverged: bool,
}

/// Owns the in-memory nickname and keeps it in step with one store key.
///
/// The state lock is held across each store call, so overlapping callers
/// queue up instead of interleaving their writes.
pub struct NicknameController<S: KeyValueStore> {
    store: S,
    key: String,
    state: Mutex<ControllerState>,
}

impl<S: KeyValueStore> NicknameController<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            state: Mutex::new(ControllerState {
                current: Nickname::Absent,
                phase: LoadPhase::Uninitialized,
                diverged: false,
            }),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the persisted value. A failed read leaves the nickname absent.
    pub async fn load(&self) -> Nickname {
        let mut guard = self.state.lock().await;
        match self.store.get(&self.key).await {
            Ok(value) => {
                guard.current = Nickname::from(value);
                guard.diverged = false;
                debug!(key = %self.key, absent = guard.current.is_absent(), "loaded nickname");
            }
            Err(err) => {
                warn!(key = %self.key, "failed to load nickname: {err}");
                guard.current = Nickname::Absent;
                guard.diverged = true;
            }
        }
        guard.phase = LoadPhase::Loaded;
        guard.current.clone()
    }

    /// Mirrors the bound text field. Storage is untouched.
    pub async fn edit(&self, text: impl Into<String>) {
        self.state.lock().await.current = Nickname::Present(text.into());
    }

    pub async fn save_current(&self) -> SaveOutcome {
        let candidate = self.state.lock().await.current.clone();
        self.save(candidate).await
    }

    pub async fn save(&self, candidate: Nickname) -> SaveOutcome {
        let mut guard = self.state.lock().await;
        let Nickname::Present(value) = &candidate else {
            return Self::reject_empty();
        };
        if value.is_empty() {
            return Self::reject_empty();
        }

        let result = self.store.set(&self.key, value).await;
        guard.current = candidate;
        match result {
            Ok(()) => {
                guard.diverged = false;
                info!(key = %self.key, "saved nickname");
                SaveOutcome::Saved
            }
            Err(err) => {
                guard.diverged = true;
                warn!(key = %self.key, "failed to save nickname: {err}");
                SaveOutcome::Failed(err)
            }
        }
    }

    pub async fn remove(&self) -> RemoveOutcome {
        let mut guard = self.state.lock().await;
        match self.store.delete(&self.key).await {
            Ok(()) => {
                guard.current = Nickname::Absent;
                guard.diverged = false;
                info!(key = %self.key, "removed nickname");
                RemoveOutcome::Removed
            }
            Err(err) => {
                guard.diverged = true;
                warn!(key = %self.key, "failed to remove nickname: {err}");
                RemoveOutcome::Failed(err)
            }
        }
    }

    pub async fn current(&self) -> Nickname {
        self.state.lock().await.current.clone()
    }

    pub async fn heading(&self) -> Heading {
        self.state.lock().await.current.heading()
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.lock().await.phase
    }

    /// True while the last failed mutation left memory and storage apart.
    pub async fn is_diverged(&self) -> bool {
        self.state.lock().await.diverged
    }

    pub async fn snapshot(&self) -> NicknameSnapshot {
        let guard = self.state.lock().await;
        NicknameSnapshot {
            nickname: guard.current.clone(),
            phase: guard.phase,
            diverged: guard.diverged,
        }
    }

    fn reject_empty() -> SaveOutcome {
        debug!("rejected empty nickname");
        SaveOutcome::NeedsConfirmation(ConfirmationPrompt::empty_nickname())
    }
}

#[cfg(test)]
#[path = "tests/nickname_controller_tests.rs"]
mod tests;
