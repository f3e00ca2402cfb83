//! Journal aggregate and the posting state machine.
//!
//! A journal is created in draft state, validated, and posted exactly once.
//! `Draft` vs `Posted` is a tagged variant: the posting transition consumes
//! the draft value, and no operation mutates a posted journal. Posted history
//! is neutralized only by a reversal journal linked via `reversal_of`.

use chrono::{DateTime, NaiveDate, Utc};
use folio_shared::types::{BookId, JournalId, UserId};
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Document type of a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Manually keyed journal.
    Manual,
    /// Sales invoice.
    Invoice,
    /// Purchase bill.
    Bill,
    /// Payment in or out.
    Payment,
    /// Bank feed entry.
    Bank,
    /// Adjustment, including reversals.
    Adjustment,
}

impl DocType {
    /// Document-number prefix for this type.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Manual => "JNL",
            Self::Invoice => "INV",
            Self::Bill => "BIL",
            Self::Payment => "PAY",
            Self::Bank => "BNK",
            Self::Adjustment => "ADJ",
        }
    }
}

/// Posting state of a journal.
///
/// The `Posted` variant records who authorized posting and when. There is no
/// transition out of `Posted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JournalState {
    /// Editable draft; balances untouched.
    Draft,
    /// Immutable posted history.
    Posted {
        /// When the journal was posted.
        posted_at: DateTime<Utc>,
        /// Who authorized posting.
        posted_by: UserId,
    },
}

/// A dated, balanced group of ledger lines representing one financial event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Book this journal belongs to.
    pub book_id: BookId,
    /// Document type.
    pub doc_type: DocType,
    /// Human reference, sequential per book.
    pub doc_no: Option<String>,
    /// Document date.
    pub doc_date: NaiveDate,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Free-text narration.
    pub narration: Option<String>,
    /// Draft or posted.
    #[serde(flatten)]
    pub state: JournalState,
    /// User who created the journal.
    pub created_by: UserId,
    /// Journal this one reverses, if any.
    pub reversal_of: Option<JournalId>,
    /// When the journal was created.
    pub created_at: DateTime<Utc>,
}

impl Journal {
    /// Returns true if the journal has been posted.
    #[must_use]
    pub const fn is_posted(&self) -> bool {
        matches!(self.state, JournalState::Posted { .. })
    }

    /// Returns true if the journal is still a draft.
    #[must_use]
    pub const fn is_draft(&self) -> bool {
        matches!(self.state, JournalState::Draft)
    }

    /// Returns the posting timestamp, if posted.
    #[must_use]
    pub const fn posted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            JournalState::Posted { posted_at, .. } => Some(posted_at),
            JournalState::Draft => None,
        }
    }

    /// Returns who authorized posting, if posted.
    #[must_use]
    pub const fn posted_by(&self) -> Option<UserId> {
        match self.state {
            JournalState::Posted { posted_by, .. } => Some(posted_by),
            JournalState::Draft => None,
        }
    }

    /// Transitions a draft into posted state, consuming the draft.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted` if the journal is already posted; the posting
    /// transition is one-way and happens at most once.
    pub fn post(self, posted_at: DateTime<Utc>, posted_by: UserId) -> Result<Self, LedgerError> {
        match self.state {
            JournalState::Draft => Ok(Self {
                state: JournalState::Posted {
                    posted_at,
                    posted_by,
                },
                ..self
            }),
            JournalState::Posted { .. } => Err(LedgerError::AlreadyPosted(self.id)),
        }
    }

    /// Fails with `AlreadyPosted` unless the journal is a draft.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyPosted` if the journal is posted.
    pub fn require_draft(&self) -> Result<(), LedgerError> {
        match self.state {
            JournalState::Draft => Ok(()),
            JournalState::Posted { .. } => Err(LedgerError::AlreadyPosted(self.id)),
        }
    }

    /// Fails with `NotPosted` unless the journal is posted.
    ///
    /// # Errors
    ///
    /// Returns `NotPosted` if the journal is a draft.
    pub fn require_posted(&self) -> Result<(), LedgerError> {
        match self.state {
            JournalState::Posted { .. } => Ok(()),
            JournalState::Draft => Err(LedgerError::NotPosted(self.id)),
        }
    }
}
