//! Fetch coordination.
//!
//! A session runs at most one collection fetch and one single-record
//! fetch that can still change its state. Each kind owns a slot holding a
//! generation counter and the cancellation token of the latest fetch.
//! Issuing a fetch cancels the previous token of that kind and bumps the
//! generation; a completed fetch is applied only if its ticket still
//! matches the slot.

use tokio_util::sync::CancellationToken;

/// The two independent kinds of fetch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FetchKind {
    /// Collection page (`get_first`).
    Batch,
    /// Single record (`get_record`).
    Record,
}

/// Identity of one issued fetch.
#[derive(Clone, Debug)]
pub struct Ticket {
    kind: FetchKind,
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token to hand to the adapter.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct FetchSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

impl FetchSlot {
    fn supersede(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    fn issue(&mut self, kind: FetchKind) -> Ticket {
        self.supersede();
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        Ticket {
            kind,
            generation: self.generation,
            token,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && !ticket.token.is_cancelled()
    }
}

/// Owns the batch and record slots of one session.
#[derive(Debug, Default)]
pub(crate) struct FetchCoordinator {
    batch: FetchSlot,
    record: FetchSlot,
}

impl FetchCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, kind: FetchKind) -> &mut FetchSlot {
        match kind {
            FetchKind::Batch => &mut self.batch,
            FetchKind::Record => &mut self.record,
        }
    }

    fn slot(&self, kind: FetchKind) -> &FetchSlot {
        match kind {
            FetchKind::Batch => &self.batch,
            FetchKind::Record => &self.record,
        }
    }

    /// Cancel the outstanding fetch of `kind` and issue a new ticket.
    pub(crate) fn issue(&mut self, kind: FetchKind) -> Ticket {
        self.slot_mut(kind).issue(kind)
    }

    /// Cancel the outstanding fetch of `kind` without issuing a new one.
    pub(crate) fn supersede(&mut self, kind: FetchKind) {
        self.slot_mut(kind).supersede();
    }

    pub(crate) fn supersede_all(&mut self) {
        self.batch.supersede();
        self.record.supersede();
    }

    /// Check whether `ticket` is still the latest, uncancelled fetch of its kind.
    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.slot(ticket.kind).is_current(ticket)
    }

    /// Mark a current fetch as settled.
    pub(crate) fn settle(&mut self, ticket: &Ticket) {
        let slot = self.slot_mut(ticket.kind);
        if slot.is_current(ticket) {
            slot.token = None;
        }
    }

    /// Check whether a fetch of `kind` has been issued and not yet settled.
    pub(crate) fn in_flight(&self, kind: FetchKind) -> bool {
        self.slot(kind).token.is_some()
    }
}
