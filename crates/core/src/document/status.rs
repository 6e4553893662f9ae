//! Document lifecycle statuses and the posting state machine.
//!
//! Posting is driven by explicit status transitions, never inferred from
//! field edits: a document entering a postable status posts, one leaving
//! a postable status reverses, and an edit while postable reposts.

use serde::{Deserialize, Serialize};

use super::DocumentKind;

/// Lifecycle status shared across document kinds.
///
/// Not every status applies to every kind; `is_postable` encodes the
/// per-kind gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being drafted; never posted.
    Draft,
    /// Bill awaiting approval; already a liability.
    Pending,
    /// Bill approved for payment.
    Approved,
    /// Invoice sent to the customer.
    Sent,
    /// Invoice fully paid.
    Paid,
    /// Payment executed.
    Completed,
    /// Cancelled; never posted.
    Void,
}

impl DocumentStatus {
    /// Whether a document of `kind` in this status carries ledger effects.
    #[must_use]
    pub const fn is_postable(self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Bill => matches!(self, Self::Pending | Self::Approved),
            DocumentKind::Invoice => matches!(self, Self::Sent | Self::Paid),
            DocumentKind::Payment => matches!(self, Self::Completed),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Completed => "completed",
            Self::Void => "void",
        };
        f.write_str(name)
    }
}

/// What the posting engine should do when a document is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingAction {
    /// First entry into a postable status: create journal entries.
    Post,
    /// Already posted and still postable: reverse old entries, post anew.
    Repost,
    /// Left a postable status: reverse existing entries.
    Reverse,
    /// Never posted and still not postable: nothing to do.
    NoChange,
}

impl PostingAction {
    /// Picks the action from the stored and incoming posting states.
    ///
    /// `was_posted` is whether journal entries currently exist for the
    /// document; `now_postable` is the gate on the incoming status.
    #[must_use]
    pub const fn for_transition(was_posted: bool, now_postable: bool) -> Self {
        match (was_posted, now_postable) {
            (false, true) => Self::Post,
            (true, true) => Self::Repost,
            (true, false) => Self::Reverse,
            (false, false) => Self::NoChange,
        }
    }
}
