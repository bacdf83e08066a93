//! Chat sessions and the session-list state machine.
//!
//! The store owns exactly one active session plus the archived ones. Archived
//! sessions are kept most-recently-archived first and never share an id with
//! the active session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VisitaError};
use crate::types::{next_id, Message, Sender};

/// Label shown for a session before the user has written anything.
pub const PLACEHOLDER_LABEL: &str = "Novo Chat";

// =============================================================================
// Session
// =============================================================================

/// A single conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Preview text: the most recent user message, or the placeholder.
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub owner_name: Option<String>,
}

impl Session {
    /// Create an empty session bound to `owner_name`.
    pub fn new(owner_name: Option<String>) -> Self {
        Self {
            id: next_id(),
            label: PLACEHOLDER_LABEL.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            owner_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, message: Message) {
        if message.sender == Sender::User {
            self.label = message.text.clone();
        }
        self.messages.push(message);
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Owner of the active session and the archived sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    active: Session,
    archived: Vec<Session>,
    known_name: Option<String>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionStore {
    /// Create a store with a fresh active session.
    ///
    /// `known_name` is the identity rehydrated at startup, if any.
    pub fn new(known_name: Option<String>) -> Self {
        Self {
            active: Session::new(known_name.clone()),
            archived: Vec::new(),
            known_name,
        }
    }

    pub fn active(&self) -> &Session {
        &self.active
    }

    /// Archived sessions, most recently archived first.
    pub fn archived(&self) -> &[Session] {
        &self.archived
    }

    pub fn known_name(&self) -> Option<&str> {
        self.known_name.as_deref()
    }

    /// All sessions in presentation order: `[active, ...archived]`.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> + Clone {
        std::iter::once(&self.active).chain(self.archived.iter())
    }

    /// Look up a session (active or archived) by id.
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions().find(|s| s.id == id)
    }

    fn is_archived(&self, id: &str) -> bool {
        self.archived.iter().any(|s| s.id == id)
    }

    /// Start a new conversation.
    ///
    /// The outgoing session is archived only if it holds messages; the new
    /// session inherits the currently known name.
    pub fn create_session(&mut self) {
        let fresh = Session::new(self.known_name.clone());
        let outgoing = std::mem::replace(&mut self.active, fresh);
        self.retire(outgoing);
        debug!(session_id = %self.active.id, "Created session");
    }

    /// Make the archived session `target_id` the active one.
    ///
    /// Switching to the current active session is a no-op. An unknown id
    /// leaves the store untouched.
    pub fn switch_to(&mut self, target_id: &str) -> Result<()> {
        if self.active.id == target_id {
            return Ok(());
        }
        let pos = self
            .archived
            .iter()
            .position(|s| s.id == target_id)
            .ok_or_else(|| VisitaError::SessionNotFound(target_id.to_string()))?;

        let target = self.archived.remove(pos);
        let outgoing = std::mem::replace(&mut self.active, target);
        self.retire(outgoing);
        debug!(session_id = %self.active.id, "Switched session");
        Ok(())
    }

    /// Remove an archived session. The active session is never deleted here.
    ///
    /// Returns `true` if a session was removed.
    pub fn delete_archived(&mut self, target_id: &str) -> bool {
        let before = self.archived.len();
        self.archived.retain(|s| s.id != target_id);
        let removed = self.archived.len() != before;
        if removed {
            debug!(session_id = %target_id, "Deleted archived session");
        }
        removed
    }

    /// Append a message to the session `session_id`, active or archived.
    ///
    /// User messages also replace the session label. Returns `false` and
    /// leaves everything untouched when no session matches.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        let session = if self.active.id == session_id {
            Some(&mut self.active)
        } else {
            self.archived.iter_mut().find(|s| s.id == session_id)
        };
        match session {
            Some(session) => {
                session.push(message);
                true
            }
            None => false,
        }
    }

    /// Record the user's detected name and bind it to the active session.
    pub fn set_known_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.active.owner_name = Some(name.clone());
        self.known_name = Some(name);
    }

    fn retire(&mut self, outgoing: Session) {
        if outgoing.is_empty() || self.is_archived(&outgoing.id) {
            debug!(session_id = %outgoing.id, "Discarded session");
            return;
        }
        self.archived.insert(0, outgoing);
    }
}
