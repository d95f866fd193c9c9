use crate::constants::ACTIVE_DECAY_MS;
use crate::ids::ActiveToken;
use crate::payload::IndexKey;
use indexmap::IndexSet;
use log::{debug, trace};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Previewing,
    Active,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSelection {
    pub preview_keys: IndexSet<IndexKey>,
    pub active_keys: IndexSet<IndexKey>,
    pub active_token: Option<ActiveToken>,
}

/// Handed out by every click. The host either fires `on_decay(&token)` when
/// `deadline` passes or polls `tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecayTicket {
    pub token: ActiveToken,
    pub deadline: Instant,
}

/// Hover/click state machine with a token-guarded decay.
///
/// Events are never queued: every call overwrites the relevant part of the
/// selection, so the latest event wins.
#[derive(Debug)]
pub struct SelectionController {
    selection: HighlightSelection,
    decay: Duration,
    pending: Vec<DecayTicket>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(Duration::from_millis(ACTIVE_DECAY_MS))
    }
}

impl SelectionController {
    pub fn new(decay: Duration) -> Self {
        Self {
            selection: HighlightSelection::default(),
            decay,
            pending: Vec::new(),
        }
    }

    pub fn set_decay(&mut self, decay: Duration) {
        self.decay = decay;
    }

    /// Records the hovered keys. `None` or an empty slice is a hover-out.
    ///
    /// The keys are kept even while an active highlight is showing; they only
    /// become visible once it decays.
    pub fn on_hover(&mut self, keys: Option<&[IndexKey]>) {
        self.selection.preview_keys = keys.unwrap_or_default().iter().copied().collect();
    }

    /// Starts a new click episode. Returns `None` when `keys` is empty, which
    /// clears the active highlight instead.
    pub fn on_click(&mut self, keys: &[IndexKey], now: Instant) -> Option<DecayTicket> {
        self.selection.preview_keys.clear();

        if keys.is_empty() {
            self.clear_active();
            return None;
        }

        let token = ActiveToken::mint();
        self.selection.active_keys = keys.iter().copied().collect();
        self.selection.active_token = Some(token.clone());

        let ticket = DecayTicket {
            token,
            deadline: now + self.decay,
        };
        self.pending.push(ticket.clone());
        debug!(
            "Activated {} keys under token {}",
            self.selection.active_keys.len(),
            ticket.token
        );
        Some(ticket)
    }

    /// Clears the active highlight if `token` still names the current click
    /// episode. Returns whether anything was cleared.
    pub fn on_decay(&mut self, token: &ActiveToken) -> bool {
        self.pending.retain(|ticket| &ticket.token != token);

        if self.selection.active_token.as_ref() != Some(token) {
            trace!("Ignoring stale decay for token {}", token);
            return false;
        }

        debug!("Active highlight decayed (token {})", token);
        self.clear_active();
        true
    }

    /// Fires every scheduled decay whose deadline is at or before `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let (due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|ticket| ticket.deadline <= now);
        self.pending = pending;

        let mut cleared = false;
        for ticket in due {
            cleared |= self.on_decay(&ticket.token);
        }
        cleared
    }

    /// Earliest pending deadline, for hosts that schedule a repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|ticket| ticket.deadline).min()
    }

    /// Back to `Idle`. Outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.selection = HighlightSelection::default();
        self.pending.clear();
    }

    pub fn state(&self) -> SelectionState {
        if self.is_active() {
            SelectionState::Active
        } else if !self.selection.preview_keys.is_empty() {
            SelectionState::Previewing
        } else {
            SelectionState::Idle
        }
    }

    pub fn selection(&self) -> &HighlightSelection {
        &self.selection
    }

    /// Keys under the pointer. Kept during a click so they surface once it
    /// decays; the drawing side hides them while an active rectangle shows.
    pub fn preview_keys(&self) -> Vec<IndexKey> {
        self.selection.preview_keys.iter().copied().collect()
    }

    pub fn visible_active_keys(&self) -> Vec<IndexKey> {
        self.selection.active_keys.iter().copied().collect()
    }

    fn is_active(&self) -> bool {
        self.selection.active_token.is_some() && !self.selection.active_keys.is_empty()
    }

    fn clear_active(&mut self) {
        self.selection.active_keys.clear();
        self.selection.active_token = None;
    }
}
