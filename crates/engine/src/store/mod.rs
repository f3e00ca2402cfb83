//! Storage port for the posting engine.
//!
//! `LedgerStore` is the seam between the engine and persistence. One
//! call is one atomic unit: an implementation either applies the whole
//! operation or leaves the store unchanged, so readers never observe a
//! partially written journal.

pub mod memory;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use folio_core::ledger::{Account, AccountType, DocType, Journal, LedgerEntry, LedgerError};
use folio_core::reports::ReportError;
use folio_shared::types::{AccountId, BookId, JournalId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found.
    #[error("Not found: {entity} with id {id}")]
    NotFound {
        /// Entity kind, e.g. `"journal"`.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// The operation conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend itself failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a `Conflict` error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a `Backend` error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<StoreError> for ReportError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub kind: Option<AccountType>,
    /// Filter by postability.
    pub is_postable: Option<bool>,
    /// Include deactivated accounts.
    pub include_inactive: bool,
}

/// Posting status, for journal listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalStatus {
    /// Draft journals only.
    Draft,
    /// Posted journals only.
    Posted,
}

/// Filter options for listing journals.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Filter by posting status.
    pub status: Option<JournalStatus>,
    /// Filter by document type.
    pub doc_type: Option<DocType>,
    /// Filter by document date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by document date range end.
    pub date_to: Option<NaiveDate>,
}

/// Query over posted journal lines.
#[derive(Debug, Clone, Default)]
pub struct LineQuery {
    /// Restrict to one account.
    pub account_id: Option<AccountId>,
    /// Keep lines whose journal was posted on or before this date.
    pub posted_on_or_before: Option<NaiveDate>,
    /// Keep lines with document date on or after this date.
    pub doc_date_from: Option<NaiveDate>,
    /// Keep lines with document date on or before this date.
    pub doc_date_to: Option<NaiveDate>,
}

/// A posted journal line joined with its journal header.
#[derive(Debug, Clone)]
pub struct PostedLine {
    /// Journal the line belongs to.
    pub journal_id: JournalId,
    /// Journal document number.
    pub doc_no: Option<String>,
    /// Journal document date.
    pub doc_date: NaiveDate,
    /// When the journal was posted.
    pub posted_at: DateTime<Utc>,
    /// Account the line posts to.
    pub account_id: AccountId,
    /// 1-based line number within the journal.
    pub line_no: u32,
    /// Line description.
    pub description: Option<String>,
    /// Signed amount (positive = debit).
    pub amount_dc: Decimal,
}

/// One atomic posting commit.
#[derive(Debug, Clone)]
pub struct PostingUpdate {
    /// Journal to mark posted.
    pub journal_id: JournalId,
    /// Posting timestamp.
    pub posted_at: DateTime<Utc>,
    /// User authorizing the posting.
    pub posted_by: UserId,
    /// Signed balance change per account.
    pub deltas: HashMap<AccountId, Decimal>,
}

/// Storage port for accounts, journals, and posted lines.
///
/// Lookups return `Ok(None)` for missing entities; the engine decides
/// what missing means. Mutations fail without side effects.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // ========== Accounts ==========

    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the code is already taken within the book.
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError>;

    /// Looks up an account by id.
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Looks up an account by code within a book.
    async fn account_by_code(
        &self,
        book_id: BookId,
        code: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Lists a book's accounts ordered by code.
    async fn accounts(
        &self,
        book_id: BookId,
        filter: AccountFilter,
    ) -> Result<Vec<Account>, StoreError>;

    /// Replaces a stored account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist, or `Conflict`
    /// if the new code collides within the book.
    async fn update_account(&self, account: Account) -> Result<Account, StoreError>;

    /// Removes an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    async fn delete_account(&self, book_id: BookId, id: AccountId) -> Result<(), StoreError>;

    /// Returns true if any journal line references the account.
    async fn account_has_entries(&self, id: AccountId) -> Result<bool, StoreError>;

    // ========== Journals ==========

    /// Allocates the next document number for a book.
    ///
    /// Numbers come from one gap-free sequence per book; the prefix
    /// reflects the document type.
    async fn allocate_doc_no(
        &self,
        book_id: BookId,
        doc_type: DocType,
    ) -> Result<String, StoreError>;

    /// Inserts a journal with its entries as one unit.
    async fn insert_journal(
        &self,
        journal: Journal,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError>;

    /// Looks up a journal by id.
    async fn journal(&self, id: JournalId) -> Result<Option<Journal>, StoreError>;

    /// Returns a journal's entries in line order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal does not exist.
    async fn journal_entries(&self, id: JournalId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Lists a book's journals, document date descending.
    async fn journals(
        &self,
        book_id: BookId,
        filter: JournalFilter,
    ) -> Result<Vec<Journal>, StoreError>;

    /// Replaces a draft journal and its entries as one unit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal does not exist, or `Conflict`
    /// if the stored journal is no longer a draft.
    async fn update_draft(
        &self,
        journal: Journal,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError>;

    /// Removes a draft journal and its entries.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal does not exist, or `Conflict`
    /// if the stored journal is no longer a draft.
    async fn delete_draft(&self, id: JournalId) -> Result<(), StoreError>;

    /// Atomically marks a journal posted and applies its balance deltas.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the journal is missing, or `Conflict` if it
    /// is not a draft or a delta references a missing account. On error
    /// nothing changes.
    async fn commit_posting(&self, update: PostingUpdate) -> Result<Journal, StoreError>;

    // ========== Posted lines ==========

    /// Returns posted journal lines matching the query.
    async fn posted_lines(
        &self,
        book_id: BookId,
        query: LineQuery,
    ) -> Result<Vec<PostedLine>, StoreError>;
}
