//! State machine shared by both dialogs
//!
//! [`DialogCore`] owns the tagged [`DialogState`], the debounce gate and the
//! collaborators. The folder and entry dialogs only decide which paths to
//! build and which commit request to send.
//!
//! The state lock is never held across an `.await`: collaborator calls run
//! with the lock released and their results are re-checked on return.

use crate::collaborator::{
    CollaboratorError, CommitRequest, Translator, ValidationRequest, ValidationVerdict, Validator,
};
use crate::config::DialogConfig;
use crate::error::{ConfirmBlocker, DialogError, SessionError};
use crate::gate::ValidationGate;
use crate::messages::{DefaultTranslator, DialogMessages, Message};
use crate::state::{DialogState, Phase, RenameSession, SessionId};
use parking_lot::Mutex;
use pathedit_rules::{validate_syntax, NameContext, SyntaxError};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Result of a confirm call that reached the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Candidate equalled the original; session closed without a commit
    Unchanged,
    /// Change applied; session closed
    Committed(CommitRequest),
    /// Committer failed; session back in editing with the error shown
    Failed(SessionError),
    /// Session was cancelled while the commit was in flight; result ignored
    Abandoned,
}

impl ConfirmOutcome {
    /// Check if the host record changed
    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<DialogState>,
    pub(crate) gate: ValidationGate,
}

/// A commit that passed the confirm checks
pub(crate) enum CommitStart {
    Unchanged,
    Started { ticket: u64, request: CommitRequest },
}

pub(crate) struct DialogCore {
    pub(crate) id: SessionId,
    pub(crate) kind: &'static str,
    pub(crate) context: NameContext,
    pub(crate) messages: &'static DialogMessages,
    pub(crate) validator: Option<Arc<dyn Validator>>,
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) config: DialogConfig,
    shared: Arc<Shared>,
}

impl DialogCore {
    pub(crate) fn new(
        kind: &'static str,
        context: NameContext,
        messages: &'static DialogMessages,
    ) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            context,
            messages,
            validator: None,
            translator: Arc::new(DefaultTranslator),
            config: DialogConfig::default(),
            shared: Arc::new(Shared {
                state: Mutex::new(DialogState::Closed),
                gate: ValidationGate::new(),
            }),
        }
    }

    pub(crate) fn render(&self, message: Message, args: &[(&str, String)]) -> String {
        message.render(self.translator.as_ref(), args)
    }

    pub(crate) fn snapshot(&self) -> DialogState {
        self.shared.state.lock().clone()
    }

    pub(crate) fn phase(&self) -> Phase {
        self.shared.state.lock().phase()
    }

    pub(crate) fn can_confirm(&self) -> bool {
        self.shared.state.lock().can_confirm()
    }

    pub(crate) fn can_cancel(&self) -> bool {
        self.shared
            .state
            .lock()
            .can_cancel(self.config.allow_cancel_while_committing)
    }

    pub(crate) fn candidate(&self) -> Option<String> {
        self.shared
            .state
            .lock()
            .session()
            .map(|s| s.candidate_value().to_string())
    }

    pub(crate) fn has_changed(&self) -> bool {
        self.shared
            .state
            .lock()
            .session()
            .is_some_and(|s| !s.is_unchanged())
    }

    pub(crate) fn validation_error(&self) -> Option<SessionError> {
        self.shared
            .state
            .lock()
            .session()
            .and_then(|s| s.validation_error().cloned())
    }

    /// Text for the status line under the input
    pub(crate) fn status_text(&self) -> Option<String> {
        let state = self.shared.state.lock();
        match &*state {
            DialogState::Validating { session, .. } if session.validation_error().is_none() => {
                Some(self.render(self.messages.validating, &[]))
            }
            DialogState::Committing { .. } => Some(self.render(self.messages.committing, &[])),
            _ => None,
        }
    }

    pub(crate) fn open(&self, original: &str) -> Result<(), DialogError> {
        let mut state = self.shared.state.lock();
        if state.is_open() {
            return Err(DialogError::AlreadyOpen);
        }
        *state = DialogState::Editing(RenameSession::new(original));
        info!(session = %self.id, dialog = self.kind, original, "dialog opened");
        Ok(())
    }

    pub(crate) fn cancel(&self) -> Result<(), DialogError> {
        let mut state = self.shared.state.lock();
        match &*state {
            DialogState::Closed => return Err(DialogError::NotOpen),
            DialogState::Committing { .. } if !self.config.allow_cancel_while_committing => {
                return Err(DialogError::CommitInFlight);
            }
            DialogState::Committing { target, .. } => {
                warn!(
                    session = %self.id,
                    dialog = self.kind,
                    new_path = target.new_path(),
                    "cancelled with a commit in flight, its result will be ignored"
                );
            }
            _ => {}
        }
        self.shared.gate.cancel();
        *state = DialogState::Closed;
        info!(session = %self.id, dialog = self.kind, "dialog cancelled");
        Ok(())
    }

    /// Record a new candidate and run the checks it triggers
    ///
    /// Syntax is checked immediately. If it passes and a validator is set,
    /// a check for `request` is debounced.
    pub(crate) fn edit(
        &self,
        candidate: &str,
        request: ValidationRequest,
    ) -> Result<(), DialogError> {
        let mut guard = self.shared.state.lock();
        let mut session = take_editable(&mut guard)?;

        session.set_candidate(candidate);
        debug!(session = %self.id, dialog = self.kind, candidate, "candidate changed");

        if let Some(kind) = validate_syntax(candidate, self.context) {
            self.shared.gate.cancel();
            session.set_error(Some(self.syntax_error(kind)));
            *guard = DialogState::Editing(session);
            return Ok(());
        }

        if session.is_unchanged() {
            self.shared.gate.cancel();
            *guard = DialogState::Editing(session);
            return Ok(());
        }

        match self.check_context() {
            Some(ctx) => {
                let sequence = self.shared.gate.issue();
                *guard = DialogState::Validating {
                    session,
                    request: sequence,
                    input_locked: false,
                };
                debug!(
                    session = %self.id,
                    dialog = self.kind,
                    sequence,
                    window_ms = self.config.debounce_ms,
                    "validation scheduled"
                );
                let candidate = candidate.to_string();
                self.shared.gate.schedule(self.config.debounce(), move || async move {
                    ctx.run(sequence, candidate, request).await;
                });
            }
            None => {
                self.shared.gate.cancel();
                *guard = DialogState::Editing(session);
            }
        }
        Ok(())
    }

    /// Validate the current candidate without debouncing
    ///
    /// Input is locked until the validator answers. Returns the candidate
    /// checked and the error left on the session, or `NotOpen` if the session
    /// was cancelled meanwhile.
    pub(crate) async fn check_now(
        &self,
        request: impl FnOnce(&str) -> ValidationRequest,
    ) -> Result<(String, Option<SessionError>), DialogError> {
        let (sequence, candidate, request, ctx) = {
            let mut guard = self.shared.state.lock();
            let mut session = take_editable(&mut guard)?;
            self.shared.gate.cancel();

            let candidate = session.candidate_value().to_string();
            if session.is_unchanged() {
                session.set_error(None);
                *guard = DialogState::Editing(session);
                return Ok((candidate, None));
            }

            if let Some(kind) = validate_syntax(&candidate, self.context) {
                let err = self.syntax_error(kind);
                session.set_error(Some(err.clone()));
                *guard = DialogState::Editing(session);
                return Ok((candidate, Some(err)));
            }

            let Some(ctx) = self.check_context() else {
                session.set_error(None);
                *guard = DialogState::Editing(session);
                return Ok((candidate, None));
            };

            let sequence = self.shared.gate.issue();
            *guard = DialogState::Validating {
                session,
                request: sequence,
                input_locked: true,
            };
            debug!(session = %self.id, dialog = self.kind, sequence, "immediate validation, input locked");
            let request = request(&candidate);
            (sequence, candidate, request, ctx)
        };

        let _unlock = UnlockOnDrop {
            shared: &self.shared,
            sequence,
        };
        let error = ctx.interpret(ctx.validator.validate(request).await);
        if !ctx.apply(&self.shared, sequence, &candidate, error.clone()) {
            return Err(DialogError::NotOpen);
        }
        Ok((candidate, error))
    }

    /// Move from editing to committing
    ///
    /// An unchanged candidate closes the session instead. `target` runs
    /// before the session's error is cleared.
    pub(crate) fn begin_commit(
        &self,
        target: impl FnOnce(&RenameSession) -> CommitRequest,
    ) -> Result<CommitStart, DialogError> {
        let mut guard = self.shared.state.lock();
        let mut session = match guard.take() {
            DialogState::Editing(session) => session,
            other => {
                let err = match other {
                    DialogState::Closed => DialogError::NotOpen,
                    DialogState::Committing { .. } => DialogError::CommitInFlight,
                    _ => DialogError::ConfirmDisabled(ConfirmBlocker::Validating),
                };
                *guard = other;
                return Err(err);
            }
        };

        if session.is_unchanged() {
            self.shared.gate.cancel();
            info!(session = %self.id, dialog = self.kind, "unchanged, closed without commit");
            return Ok(CommitStart::Unchanged);
        }
        if let Some(blocker) = session.confirm_blocker() {
            *guard = DialogState::Editing(session);
            return Err(DialogError::ConfirmDisabled(blocker));
        }

        let request = target(&session);
        session.set_error(None);

        self.shared.gate.cancel();
        let ticket = self.shared.gate.issue();
        info!(
            session = %self.id,
            dialog = self.kind,
            new_path = request.new_path(),
            "commit started"
        );
        *guard = DialogState::Committing {
            session,
            target: request.clone(),
        };
        Ok(CommitStart::Started { ticket, request })
    }

    /// Apply a committer result
    pub(crate) fn finish_commit(
        &self,
        ticket: u64,
        result: Result<(), CollaboratorError>,
    ) -> ConfirmOutcome {
        let mut guard = self.shared.state.lock();
        let (mut session, target) = match guard.take() {
            DialogState::Committing { session, target } if self.shared.gate.is_current(ticket) => {
                (session, target)
            }
            other => {
                *guard = other;
                warn!(
                    session = %self.id,
                    dialog = self.kind,
                    ok = result.is_ok(),
                    "commit finished after cancel, result ignored"
                );
                return ConfirmOutcome::Abandoned;
            }
        };

        match result {
            Ok(()) => {
                info!(
                    session = %self.id,
                    dialog = self.kind,
                    new_path = target.new_path(),
                    "commit succeeded"
                );
                *guard = DialogState::Closed;
                ConfirmOutcome::Committed(target)
            }
            Err(err) => {
                let message = if err.message().is_empty() {
                    self.render(self.messages.commit_failed, &[])
                } else {
                    err.message().to_string()
                };
                warn!(
                    session = %self.id,
                    dialog = self.kind,
                    error = %message,
                    "commit failed"
                );
                let error = SessionError::CommitFailed(message);
                session.set_error(Some(error.clone()));
                *guard = DialogState::Editing(session);
                ConfirmOutcome::Failed(error)
            }
        }
    }

    /// Store an error on the open session if its candidate is still `candidate`
    ///
    /// A pending validator check for the same candidate is dropped.
    pub(crate) fn set_error_for(&self, candidate: &str, error: SessionError) -> bool {
        let mut guard = self.shared.state.lock();
        let matches = guard
            .session()
            .is_some_and(|s| s.candidate_value() == candidate);
        if !matches {
            return false;
        }
        let Ok(mut session) = take_editable(&mut guard) else {
            return false;
        };
        self.shared.gate.cancel();
        session.set_error(Some(error));
        *guard = DialogState::Editing(session);
        true
    }

    /// Make `candidate` the baseline if it is still what the session holds
    pub(crate) fn rebase_to(&self, candidate: &str) -> bool {
        let mut guard = self.shared.state.lock();
        match &mut *guard {
            DialogState::Editing(session) if session.candidate_value() == candidate => {
                session.rebase();
                debug!(session = %self.id, dialog = self.kind, candidate, "baseline moved");
                true
            }
            _ => false,
        }
    }

    fn syntax_error(&self, kind: SyntaxError) -> SessionError {
        SessionError::syntax(kind, self.render(self.messages.for_syntax(kind), &[]))
    }

    fn check_context(&self) -> Option<CheckContext> {
        let validator = self.validator.as_ref()?;
        Some(CheckContext {
            id: self.id,
            kind: self.kind,
            shared: Arc::downgrade(&self.shared),
            validator: Arc::clone(validator),
            translator: Arc::clone(&self.translator),
            messages: self.messages,
        })
    }
}

/// Take the open session out of `state` for editing
///
/// Leaves `state` untouched when it is closed, committing, or awaiting an
/// immediate check.
fn take_editable(state: &mut DialogState) -> Result<RenameSession, DialogError> {
    if state.is_input_locked() {
        return Err(match state {
            DialogState::Committing { .. } => DialogError::CommitInFlight,
            _ => DialogError::ValidationInFlight,
        });
    }
    match state.take() {
        DialogState::Editing(session) | DialogState::Validating { session, .. } => Ok(session),
        _ => Err(DialogError::NotOpen),
    }
}

impl fmt::Debug for DialogCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogCore")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &*self.shared.state.lock())
            .field("has_validator", &self.validator.is_some())
            .field("config", &self.config)
            .finish()
    }
}

/// Returns an immediate check's session to editing if its future is dropped
/// before the validator answers
struct UnlockOnDrop<'a> {
    shared: &'a Shared,
    sequence: u64,
}

impl Drop for UnlockOnDrop<'_> {
    fn drop(&mut self) {
        let mut guard = self.shared.state.lock();
        let pending = matches!(
            &*guard,
            DialogState::Validating { request, input_locked: true, .. } if *request == self.sequence
        );
        if pending {
            if let DialogState::Validating { session, .. } = guard.take() {
                *guard = DialogState::Editing(session);
            }
        }
    }
}

/// What a validation task needs once the dialog has moved on
struct CheckContext {
    id: SessionId,
    kind: &'static str,
    shared: Weak<Shared>,
    validator: Arc<dyn Validator>,
    translator: Arc<dyn Translator>,
    messages: &'static DialogMessages,
}

impl CheckContext {
    async fn run(self, sequence: u64, candidate: String, request: ValidationRequest) {
        debug!(session = %self.id, dialog = self.kind, sequence, "validator called");
        let error = self.interpret(self.validator.validate(request).await);
        match self.shared.upgrade() {
            Some(shared) => {
                self.apply(&shared, sequence, &candidate, error);
            }
            None => {
                debug!(session = %self.id, dialog = self.kind, sequence, "dialog dropped, result ignored");
            }
        }
    }

    fn interpret(
        &self,
        outcome: Result<Option<ValidationVerdict>, CollaboratorError>,
    ) -> Option<SessionError> {
        match outcome {
            Ok(verdict) => verdict
                .as_ref()
                .and_then(ValidationVerdict::rejection)
                .map(|message| SessionError::ValidatorRejected(message.to_string())),
            Err(err) => {
                let message = if err.message().is_empty() {
                    self.messages
                        .validation_failed
                        .render(self.translator.as_ref(), &[])
                } else {
                    err.message().to_string()
                };
                warn!(session = %self.id, dialog = self.kind, error = %message, "validator failed");
                Some(SessionError::ValidatorFailed(message))
            }
        }
    }

    fn apply(
        &self,
        shared: &Shared,
        sequence: u64,
        candidate: &str,
        error: Option<SessionError>,
    ) -> bool {
        let mut guard = shared.state.lock();
        let current = matches!(
            &*guard,
            DialogState::Validating { session, request, .. }
                if *request == sequence && session.candidate_value() == candidate
        ) && shared.gate.is_current(sequence);

        if !current {
            warn!(
                session = %self.id,
                dialog = self.kind,
                sequence,
                latest = shared.gate.latest(),
                "stale validation result discarded"
            );
            return false;
        }

        if let DialogState::Validating { mut session, .. } = guard.take() {
            debug!(
                session = %self.id,
                dialog = self.kind,
                sequence,
                rejected = error.is_some(),
                "validation applied"
            );
            session.set_error(error);
            *guard = DialogState::Editing(session);
        }
        true
    }
}
