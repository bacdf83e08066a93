//! Chat orchestrator: central coordinator for sessions, the assistant and
//! visit scheduling.
//!
//! Owns the session store. Store access is a short critical section that is
//! never held across an `.await`; the only suspension points are the
//! assistant and directory calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use visita_core::config::ChatConfig;
use visita_core::{Message, Session, SessionStore, VisitaError};
use visita_schedule::{
    annotate, AppointmentRecord, LedgerScanner, SchedulingError, SchedulingValidator,
    TechnicianAvailability, TechnicianDirectory,
};

use crate::assistant::{Assistant, AssistantQuery, ContextEntry};
use crate::error::ChatError;
use crate::identity::IdentityExtractor;
use crate::profile::ProfileStore;

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Top-level session controller.
pub struct ChatOrchestrator {
    store: Mutex<SessionStore>,
    assistant: Arc<dyn Assistant>,
    directory: Arc<dyn TechnicianDirectory>,
    profile: ProfileStore,
    busy: AtomicBool,
    max_message_length: usize,
}

impl ChatOrchestrator {
    /// Create an orchestrator, rehydrating the remembered user name.
    pub fn new(
        assistant: Arc<dyn Assistant>,
        directory: Arc<dyn TechnicianDirectory>,
        profile: ProfileStore,
        config: &ChatConfig,
    ) -> Self {
        let known_name = profile.load_name();
        if let Some(ref name) = known_name {
            info!(user_name = %name, "Rehydrated user name");
        }
        Self {
            store: Mutex::new(SessionStore::new(known_name)),
            assistant,
            directory,
            profile,
            busy: AtomicBool::new(false),
            max_message_length: config.max_message_length,
        }
    }

    /// Whether a submitted message is still waiting for the assistant.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    // -------------------------------------------------------------------------
    // Messaging
    // -------------------------------------------------------------------------

    /// Handle a message typed by the user.
    ///
    /// Returns the assistant message that was appended: the answer, or an
    /// apology when the assistant failed. The answer lands in the session
    /// that sent the message even if another session became active while
    /// waiting. Only input errors and a concurrent submit are returned as
    /// `Err`.
    pub async fn submit(&self, text: &str) -> Result<Message, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if text.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }
        let _busy = BusyGuard::acquire(&self.busy).ok_or(ChatError::Busy)?;

        let detected = IdentityExtractor::extract(text);
        if let Some(ref name) = detected {
            if let Err(e) = self.profile.save_name(name) {
                warn!(error = %e, "Failed to persist user name");
            }
        }

        let (session_id, query) = {
            let mut store = self.store()?;
            if let Some(name) = detected {
                info!(user_name = %name, "Detected user name");
                store.set_known_name(name);
            }
            let active = store.active();
            let session_id = active.id.clone();
            let context = active.messages.iter().map(ContextEntry::from).collect();
            let user_name = store.known_name().map(str::to_string);

            store.append_message(&session_id, Message::user(text));
            let query = AssistantQuery {
                message: text.to_string(),
                context,
                user_name,
            };
            (session_id, query)
        };
        debug!(session_id = %session_id, context = query.context.len(), "Asking assistant");

        let reply = match self.assistant.ask(query).await {
            Ok(reply) => Message::assistant(reply.text).with_citations(reply.citations),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Assistant unavailable");
                Message::assistant(e.chat_text())
            }
        };

        let mut store = self.store()?;
        if !store.append_message(&session_id, reply.clone()) {
            debug!(session_id = %session_id, "Session deleted before reply arrived");
        }
        Ok(reply)
    }

    // -------------------------------------------------------------------------
    // Scheduling
    // -------------------------------------------------------------------------

    /// Propose a visit. On success the ledger text is already in the active
    /// session; on failure the error text is appended there instead.
    pub fn schedule(
        &self,
        technician_id: Option<u32>,
        date: &str,
    ) -> Result<AppointmentRecord, ChatError> {
        let mut store = self.store()?;
        let result = SchedulingValidator::propose(&mut store, technician_id, date);
        Self::report_scheduling(&mut store, result)
    }

    /// Like [`schedule`](Self::schedule) with an explicit clock.
    pub fn schedule_at(
        &self,
        technician_id: Option<u32>,
        date: &str,
        now: NaiveDateTime,
    ) -> Result<AppointmentRecord, ChatError> {
        let mut store = self.store()?;
        let result = SchedulingValidator::propose_at(&mut store, technician_id, date, now);
        Self::report_scheduling(&mut store, result)
    }

    fn report_scheduling(
        store: &mut SessionStore,
        result: Result<AppointmentRecord, SchedulingError>,
    ) -> Result<AppointmentRecord, ChatError> {
        result.map_err(|e| {
            let err = ChatError::from(e);
            let session_id = store.active().id.clone();
            store.append_message(&session_id, Message::assistant(err.chat_text()));
            err
        })
    }

    /// List technicians annotated with availability at `proposed`.
    pub async fn technicians(
        &self,
        proposed: &str,
    ) -> Result<Vec<TechnicianAvailability>, ChatError> {
        match self.directory.list().await {
            Ok(technicians) => Ok(annotate(technicians, proposed)),
            Err(e) => {
                warn!(error = %e, "Technician directory unavailable");
                let err = ChatError::from(e);
                let mut store = self.store()?;
                let session_id = store.active().id.clone();
                store.append_message(&session_id, Message::assistant(err.chat_text()));
                Err(err)
            }
        }
    }

    /// Every appointment currently recorded in the transcript.
    pub fn appointments(&self) -> Result<Vec<AppointmentRecord>, ChatError> {
        let store = self.store()?;
        Ok(LedgerScanner::scan(store.sessions()).collect())
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Start a new conversation and return it.
    pub fn create_session(&self) -> Result<Session, ChatError> {
        let mut store = self.store()?;
        store.create_session();
        Ok(store.active().clone())
    }

    /// Make `session_id` the active session and return it.
    pub fn switch_to(&self, session_id: &str) -> Result<Session, ChatError> {
        let mut store = self.store()?;
        store.switch_to(session_id)?;
        Ok(store.active().clone())
    }

    /// Delete an archived session. The active session cannot be deleted.
    pub fn delete_archived(&self, session_id: &str) -> Result<(), ChatError> {
        let mut store = self.store()?;
        if store.active().id == session_id {
            return Err(VisitaError::ActiveSession(session_id.to_string()).into());
        }
        if !store.delete_archived(session_id) {
            return Err(VisitaError::SessionNotFound(session_id.to_string()).into());
        }
        Ok(())
    }

    /// All sessions as `[active, ...archived]`.
    pub fn sessions(&self) -> Result<Vec<Session>, ChatError> {
        let store = self.store()?;
        Ok(store.sessions().cloned().collect())
    }

    pub fn active_session(&self) -> Result<Session, ChatError> {
        Ok(self.store()?.active().clone())
    }

    pub fn known_name(&self) -> Result<Option<String>, ChatError> {
        Ok(self.store()?.known_name().map(str::to_string))
    }

    fn store(&self) -> Result<MutexGuard<'_, SessionStore>, ChatError> {
        self.store
            .lock()
            .map_err(|e| ChatError::StatePoisoned(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
