//! Journal lifecycle operations: create, post, reverse, draft maintenance.
//!
//! The engine owns every mutation of journals and account balances. Drafts
//! are cheap and concurrent; posting serializes per book so concurrent
//! postings cannot interleave their balance deltas.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use folio_core::ledger::{
    CreateJournalInput, DocType, Journal, JournalState, LedgerEntry, LedgerError, LineInput,
    UpdateJournalInput, balance_deltas, check_postable, reversal_doc_no, reversing_lines,
    validate_entries, validate_lines,
};
use folio_shared::types::{AccountId, BookId, JournalId, LedgerEntryId, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::store::{JournalFilter, LedgerStore, PostingUpdate};

/// Journal engine over a storage port.
///
/// Posting and reversal take a per-book lock held across
/// read-validate-commit; creating drafts does not contend.
pub struct JournalEngine {
    store: Arc<dyn LedgerStore>,
    book_locks: DashMap<BookId, Arc<Mutex<()>>>,
}

impl JournalEngine {
    /// Creates an engine over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            book_locks: DashMap::new(),
        }
    }

    /// Creates a draft journal with its entries.
    ///
    /// Accounts are resolved first, then the line rules run. The draft is
    /// persisted atomically with its entries and touches no balances.
    ///
    /// # Errors
    ///
    /// - `UnknownAccount` / `AccountInactive` / `AccountNotPostable` if a
    ///   line references an account that does not resolve in the book
    /// - `InsufficientLines`, `ZeroAmount`, `InvalidFxRate`, `Unbalanced`
    ///   from the line rules
    /// - `Storage` if persistence fails (nothing is written)
    pub async fn create_journal(
        &self,
        input: CreateJournalInput,
    ) -> Result<(Journal, Vec<LedgerEntry>), LedgerError> {
        for line in &input.lines {
            self.check_account(input.book_id, line.account_id).await?;
        }
        validate_lines(&input.lines)?;

        let doc_no = self
            .store
            .allocate_doc_no(input.book_id, input.doc_type)
            .await?;
        let journal = Journal {
            id: JournalId::new(),
            book_id: input.book_id,
            doc_type: input.doc_type,
            doc_no: Some(doc_no),
            doc_date: input.doc_date,
            currency: input.currency,
            narration: input.narration,
            state: JournalState::Draft,
            created_by: input.created_by,
            reversal_of: None,
            created_at: Utc::now(),
        };
        let entries = build_entries(journal.id, input.lines);
        self.store
            .insert_journal(journal.clone(), entries.clone())
            .await?;

        info!(
            book_id = %journal.book_id,
            journal_id = %journal.id,
            doc_no = journal.doc_no.as_deref().unwrap_or(""),
            "Journal created"
        );
        Ok((journal, entries))
    }

    /// Posts a draft journal, applying its balance deltas.
    ///
    /// Re-resolves accounts and re-runs the line rules under the book lock,
    /// then commits the state transition and all deltas as one store
    /// operation. A partially posted journal is never observable.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the journal does not exist
    /// - `AlreadyPosted` if it was posted before (posting is one-way)
    /// - the same account and line-rule errors as `create_journal`
    /// - `Storage` if the commit fails (nothing is written)
    pub async fn post_journal(
        &self,
        journal_id: JournalId,
        posted_by: UserId,
    ) -> Result<(Journal, Vec<LedgerEntry>), LedgerError> {
        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;

        let _guard = self.lock_book(journal.book_id).await;

        // State may have moved while we waited for the lock.
        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;
        journal.require_draft()?;

        let entries = self.store.journal_entries(journal_id).await?;
        for entry in &entries {
            self.check_account(journal.book_id, entry.account_id)
                .await?;
        }
        validate_entries(&entries)?;

        let posted = self
            .store
            .commit_posting(PostingUpdate {
                journal_id,
                posted_at: Utc::now(),
                posted_by,
                deltas: balance_deltas(&entries),
            })
            .await?;

        info!(
            book_id = %posted.book_id,
            journal_id = %posted.id,
            "Journal posted"
        );
        Ok((posted, entries))
    }

    /// Reverses a posted journal with a new, auto-posted adjustment journal.
    ///
    /// The reversal carries sign-flipped lines, the original's document
    /// date, a derived `REV-` document number, and `reversal_of` linking
    /// back. The original journal is untouched.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the original does not exist
    /// - `NotPosted` if the original is still a draft
    /// - the same account and line-rule errors as `create_journal`
    /// - `Storage` if persistence fails
    pub async fn reverse_journal(
        &self,
        original_id: JournalId,
        reason: &str,
        created_by: UserId,
    ) -> Result<(Journal, Vec<LedgerEntry>), LedgerError> {
        let original = self
            .store
            .journal(original_id)
            .await?
            .ok_or(LedgerError::NotFound(original_id))?;
        original.require_posted()?;
        let original_entries = self.store.journal_entries(original_id).await?;

        let lines = reversing_lines(&original_entries);
        for line in &lines {
            self.check_account(original.book_id, line.account_id).await?;
        }
        validate_lines(&lines)?;

        let journal = Journal {
            id: JournalId::new(),
            book_id: original.book_id,
            doc_type: DocType::Adjustment,
            doc_no: original.doc_no.as_deref().map(reversal_doc_no),
            doc_date: original.doc_date,
            currency: original.currency.clone(),
            narration: Some(format!(
                "Reversal of journal {}. Reason: {}",
                original.id, reason
            )),
            state: JournalState::Draft,
            created_by,
            reversal_of: Some(original.id),
            created_at: Utc::now(),
        };
        let entries = build_entries(journal.id, lines);
        self.store
            .insert_journal(journal.clone(), entries.clone())
            .await?;

        info!(
            book_id = %journal.book_id,
            journal_id = %journal.id,
            reversal_of = %original.id,
            "Reversal journal created"
        );
        self.post_journal(journal.id, created_by).await
    }

    /// Edits a draft journal's header fields and/or replaces its lines.
    ///
    /// Replacement lines go through the full rule set; line numbers are
    /// reassigned by input order.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the journal does not exist
    /// - `AlreadyPosted` if it is no longer a draft
    /// - the same account and line-rule errors as `create_journal` when
    ///   lines are replaced
    /// - `Storage` if persistence fails
    pub async fn update_draft(
        &self,
        journal_id: JournalId,
        input: UpdateJournalInput,
    ) -> Result<(Journal, Vec<LedgerEntry>), LedgerError> {
        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;

        let _guard = self.lock_book(journal.book_id).await;

        let mut journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;
        journal.require_draft()?;

        if let Some(doc_date) = input.doc_date {
            journal.doc_date = doc_date;
        }
        if let Some(currency) = input.currency {
            journal.currency = currency;
        }
        if let Some(narration) = input.narration {
            journal.narration = narration;
        }

        let entries = if let Some(lines) = input.lines {
            for line in &lines {
                self.check_account(journal.book_id, line.account_id).await?;
            }
            validate_lines(&lines)?;
            build_entries(journal.id, lines)
        } else {
            self.store.journal_entries(journal_id).await?
        };

        self.store
            .update_draft(journal.clone(), entries.clone())
            .await?;

        info!(
            book_id = %journal.book_id,
            journal_id = %journal.id,
            "Draft journal updated"
        );
        Ok((journal, entries))
    }

    /// Deletes a draft journal and its entries.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the journal does not exist
    /// - `AlreadyPosted` if it is no longer a draft
    /// - `Storage` if persistence fails
    pub async fn delete_draft(&self, journal_id: JournalId) -> Result<(), LedgerError> {
        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;

        let _guard = self.lock_book(journal.book_id).await;

        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;
        journal.require_draft()?;

        self.store.delete_draft(journal_id).await?;

        info!(
            book_id = %journal.book_id,
            journal_id = %journal.id,
            "Draft journal deleted"
        );
        Ok(())
    }

    /// Looks up a journal with its entries.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal does not exist, or `Storage` on
    /// backend failure.
    pub async fn journal(
        &self,
        journal_id: JournalId,
    ) -> Result<(Journal, Vec<LedgerEntry>), LedgerError> {
        let journal = self
            .store
            .journal(journal_id)
            .await?
            .ok_or(LedgerError::NotFound(journal_id))?;
        let entries = self.store.journal_entries(journal_id).await?;
        Ok((journal, entries))
    }

    /// Lists a book's journals, document date descending.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn journals(
        &self,
        book_id: BookId,
        filter: JournalFilter,
    ) -> Result<Vec<Journal>, LedgerError> {
        Ok(self.store.journals(book_id, filter).await?)
    }

    async fn lock_book(&self, book_id: BookId) -> OwnedMutexGuard<()> {
        let lock = self.book_locks.entry(book_id).or_default().clone();
        lock.lock_owned().await
    }

    async fn check_account(
        &self,
        book_id: BookId,
        account_id: AccountId,
    ) -> Result<(), LedgerError> {
        let account = self
            .store
            .account(account_id)
            .await?
            .filter(|account| account.book_id == book_id)
            .ok_or(LedgerError::UnknownAccount(account_id))?;
        check_postable(&account)
    }
}

fn build_entries(journal_id: JournalId, lines: Vec<LineInput>) -> Vec<LedgerEntry> {
    let created_at = Utc::now();
    lines
        .into_iter()
        .zip(1u32..)
        .map(|(line, line_no)| LedgerEntry {
            id: LedgerEntryId::new(),
            journal_id,
            line_no,
            account_id: line.account_id,
            contact_id: line.contact_id,
            description: line.description,
            amount_dc: line.amount_dc,
            amount_txn: line.amount_txn,
            fx_rate: line.fx_rate,
            created_at,
        })
        .collect()
}
