//! In-memory storage adapter.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use folio_core::ledger::{Account, DocType, Journal, LedgerEntry};
use folio_shared::types::{AccountId, BookId, JournalId};

use super::{
    AccountFilter, JournalFilter, JournalStatus, LedgerStore, LineQuery, PostedLine,
    PostingUpdate, StoreError,
};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    journals: HashMap<JournalId, Journal>,
    entries: HashMap<JournalId, Vec<LedgerEntry>>,
    doc_sequences: HashMap<BookId, u64>,
}

/// In-memory `LedgerStore` for tests and the demo binary.
///
/// One lock guards all state, so every trait call is trivially atomic:
/// checks run before the first mutation and a failed call changes
/// nothing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::backend("state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::backend("state lock poisoned"))
    }
}

fn code_taken(inner: &Inner, book_id: BookId, code: &str, exclude: Option<AccountId>) -> bool {
    inner.accounts.values().any(|account| {
        account.book_id == book_id && account.code == code && Some(account.id) != exclude
    })
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.write()?;
        if code_taken(&inner, account.book_id, &account.code, None) {
            return Err(StoreError::conflict(format!(
                "account code {} already exists in book",
                account.code
            )));
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn account_by_code(
        &self,
        book_id: BookId,
        code: &str,
    ) -> Result<Option<Account>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .accounts
            .values()
            .find(|account| account.book_id == book_id && account.code == code)
            .cloned())
    }

    async fn accounts(
        &self,
        book_id: BookId,
        filter: AccountFilter,
    ) -> Result<Vec<Account>, StoreError> {
        let inner = self.read()?;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|account| account.book_id == book_id)
            .filter(|account| filter.kind.is_none_or(|kind| account.kind == kind))
            .filter(|account| {
                filter
                    .is_postable
                    .is_none_or(|postable| account.is_postable == postable)
            })
            .filter(|account| filter.include_inactive || account.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn update_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.write()?;
        if !inner.accounts.contains_key(&account.id) {
            return Err(StoreError::not_found("account", account.id));
        }
        if code_taken(&inner, account.book_id, &account.code, Some(account.id)) {
            return Err(StoreError::conflict(format!(
                "account code {} already exists in book",
                account.code
            )));
        }
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete_account(&self, book_id: BookId, id: AccountId) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let exists = inner
            .accounts
            .get(&id)
            .is_some_and(|account| account.book_id == book_id);
        if !exists {
            return Err(StoreError::not_found("account", id));
        }
        inner.accounts.remove(&id);
        Ok(())
    }

    async fn account_has_entries(&self, id: AccountId) -> Result<bool, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .entries
            .values()
            .flatten()
            .any(|entry| entry.account_id == id))
    }

    async fn allocate_doc_no(
        &self,
        book_id: BookId,
        doc_type: DocType,
    ) -> Result<String, StoreError> {
        let mut inner = self.write()?;
        let seq = inner.doc_sequences.entry(book_id).or_insert(0);
        *seq += 1;
        Ok(format!("{}-{:06}", doc_type.prefix(), seq))
    }

    async fn insert_journal(
        &self,
        journal: Journal,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.journals.contains_key(&journal.id) {
            return Err(StoreError::conflict(format!(
                "journal {} already exists",
                journal.id
            )));
        }
        inner.entries.insert(journal.id, entries);
        inner.journals.insert(journal.id, journal);
        Ok(())
    }

    async fn journal(&self, id: JournalId) -> Result<Option<Journal>, StoreError> {
        let inner = self.read()?;
        Ok(inner.journals.get(&id).cloned())
    }

    async fn journal_entries(&self, id: JournalId) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self.read()?;
        if !inner.journals.contains_key(&id) {
            return Err(StoreError::not_found("journal", id));
        }
        Ok(inner.entries.get(&id).cloned().unwrap_or_default())
    }

    async fn journals(
        &self,
        book_id: BookId,
        filter: JournalFilter,
    ) -> Result<Vec<Journal>, StoreError> {
        let inner = self.read()?;
        let mut journals: Vec<Journal> = inner
            .journals
            .values()
            .filter(|journal| journal.book_id == book_id)
            .filter(|journal| {
                filter.status.is_none_or(|status| match status {
                    JournalStatus::Draft => journal.is_draft(),
                    JournalStatus::Posted => journal.is_posted(),
                })
            })
            .filter(|journal| {
                filter
                    .doc_type
                    .is_none_or(|doc_type| journal.doc_type == doc_type)
            })
            .filter(|journal| filter.date_from.is_none_or(|from| journal.doc_date >= from))
            .filter(|journal| filter.date_to.is_none_or(|to| journal.doc_date <= to))
            .cloned()
            .collect();
        journals.sort_by(|a, b| {
            b.doc_date
                .cmp(&a.doc_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(journals)
    }

    async fn update_draft(
        &self,
        journal: Journal,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let stored = inner
            .journals
            .get(&journal.id)
            .ok_or_else(|| StoreError::not_found("journal", journal.id))?;
        if !stored.is_draft() {
            return Err(StoreError::conflict(format!(
                "journal {} is not a draft",
                journal.id
            )));
        }
        inner.entries.insert(journal.id, entries);
        inner.journals.insert(journal.id, journal);
        Ok(())
    }

    async fn delete_draft(&self, id: JournalId) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let stored = inner
            .journals
            .get(&id)
            .ok_or_else(|| StoreError::not_found("journal", id))?;
        if !stored.is_draft() {
            return Err(StoreError::conflict(format!("journal {id} is not a draft")));
        }
        inner.journals.remove(&id);
        inner.entries.remove(&id);
        Ok(())
    }

    async fn commit_posting(&self, update: PostingUpdate) -> Result<Journal, StoreError> {
        let mut inner = self.write()?;
        let journal = inner
            .journals
            .get(&update.journal_id)
            .ok_or_else(|| StoreError::not_found("journal", update.journal_id))?;
        let posted = journal
            .clone()
            .post(update.posted_at, update.posted_by)
            .map_err(|err| StoreError::conflict(err.to_string()))?;
        for account_id in update.deltas.keys() {
            if !inner.accounts.contains_key(account_id) {
                return Err(StoreError::conflict(format!(
                    "balance delta references missing account {account_id}"
                )));
            }
        }

        // Commit point: nothing below can fail.
        for (account_id, delta) in &update.deltas {
            if let Some(account) = inner.accounts.get_mut(account_id) {
                account.balance += *delta;
            }
        }
        inner.journals.insert(posted.id, posted.clone());
        Ok(posted)
    }

    async fn posted_lines(
        &self,
        book_id: BookId,
        query: LineQuery,
    ) -> Result<Vec<PostedLine>, StoreError> {
        let inner = self.read()?;
        let mut lines = Vec::new();
        for journal in inner.journals.values() {
            if journal.book_id != book_id {
                continue;
            }
            let Some(posted_at) = journal.posted_at() else {
                continue;
            };
            if query
                .posted_on_or_before
                .is_some_and(|cutoff| posted_at.date_naive() > cutoff)
            {
                continue;
            }
            if query
                .doc_date_from
                .is_some_and(|from| journal.doc_date < from)
            {
                continue;
            }
            if query.doc_date_to.is_some_and(|to| journal.doc_date > to) {
                continue;
            }
            let Some(entries) = inner.entries.get(&journal.id) else {
                continue;
            };
            for entry in entries {
                if query
                    .account_id
                    .is_some_and(|account| entry.account_id != account)
                {
                    continue;
                }
                lines.push(PostedLine {
                    journal_id: journal.id,
                    doc_no: journal.doc_no.clone(),
                    doc_date: journal.doc_date,
                    posted_at,
                    account_id: entry.account_id,
                    line_no: entry.line_no,
                    description: entry.description.clone(),
                    amount_dc: entry.amount_dc,
                });
            }
        }
        Ok(lines)
    }
}
