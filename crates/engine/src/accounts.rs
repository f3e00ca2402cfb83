//! Chart-of-accounts registry over the storage port.

use std::sync::Arc;

use folio_core::ledger::{Account, AccountType};
use folio_shared::types::{AccountId, BookId};
use thiserror::Error;
use tracing::info;

use crate::store::{AccountFilter, LedgerStore, StoreError};

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Account code already exists in the book.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Parent account belongs to a different book.
    #[error("Parent account {0} belongs to a different book")]
    ParentWrongBook(AccountId),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Cannot change account type once the account has entries.
    #[error("Cannot change type of account {0}: it has ledger entries")]
    KindChangeWithEntries(AccountId),

    /// Cannot remove an account that has entries.
    #[error("Cannot remove account {0}: it has ledger entries")]
    HasEntries(AccountId),

    /// Storage-layer failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Input for registering an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Book the account belongs to.
    pub book_id: BookId,
    /// Account code (unique within the book).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub kind: AccountType,
    /// Parent account for hierarchy, if any.
    pub parent_id: Option<AccountId>,
    /// Whether journal lines may post to the account directly.
    pub is_postable: bool,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    /// Account code.
    pub code: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Account type (only while the account has no entries).
    pub kind: Option<AccountType>,
    /// Parent account (`Some(None)` clears it).
    pub parent_id: Option<Option<AccountId>>,
    /// Whether direct posting is allowed.
    pub is_postable: Option<bool>,
}

/// Chart-of-accounts registry.
///
/// Owns account lifecycle outside of posting; balances are written only
/// by the journal engine.
pub struct AccountRegistry {
    store: Arc<dyn LedgerStore>,
}

impl AccountRegistry {
    /// Creates a registry over the given store.
    #[must_use]
    pub const fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Registers a new account.
    ///
    /// New accounts start active with a zero balance; the normal balance
    /// side is derived from the account type.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the code already exists in the book
    /// - the parent account does not exist or belongs to another book
    /// - the storage layer fails
    pub async fn register(&self, input: NewAccount) -> Result<Account, RegistryError> {
        let existing = self
            .store
            .account_by_code(input.book_id, &input.code)
            .await?;
        if existing.is_some() {
            return Err(RegistryError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            self.check_parent(input.book_id, parent_id).await?;
        }

        let mut account = Account::new(input.book_id, input.code, input.name, input.kind);
        account.parent_id = input.parent_id;
        account.is_postable = input.is_postable;
        let account = self.store.insert_account(account).await?;

        info!(
            book_id = %account.book_id,
            account_id = %account.id,
            code = %account.code,
            "Account registered"
        );
        Ok(account)
    }

    /// Looks up an account by id within a book.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in the book, or
    /// `Storage` on backend failure.
    pub async fn account(&self, book_id: BookId, id: AccountId) -> Result<Account, RegistryError> {
        self.store
            .account(id)
            .await?
            .filter(|account| account.book_id == book_id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Looks up an account by code within a book.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn account_by_code(
        &self,
        book_id: BookId,
        code: &str,
    ) -> Result<Option<Account>, RegistryError> {
        Ok(self.store.account_by_code(book_id, code).await?)
    }

    /// Lists a book's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn accounts(
        &self,
        book_id: BookId,
        filter: AccountFilter,
    ) -> Result<Vec<Account>, RegistryError> {
        Ok(self.store.accounts(book_id, filter).await?)
    }

    /// Updates an account.
    ///
    /// Changing the type is refused once the account has entries; changing
    /// the type also re-derives the normal balance side. A new code is
    /// re-checked for uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the account does not exist in the book
    /// - the type change is refused
    /// - the new code collides or the new parent is invalid
    /// - the storage layer fails
    pub async fn update(
        &self,
        book_id: BookId,
        id: AccountId,
        input: UpdateAccount,
    ) -> Result<Account, RegistryError> {
        let mut account = self.account(book_id, id).await?;

        if let Some(kind) = input.kind
            && kind != account.kind
            && self.store.account_has_entries(id).await?
        {
            return Err(RegistryError::KindChangeWithEntries(id));
        }

        if let Some(code) = &input.code
            && *code != account.code
        {
            let existing = self.store.account_by_code(book_id, code).await?;
            if existing.is_some_and(|other| other.id != id) {
                return Err(RegistryError::DuplicateCode(code.clone()));
            }
        }

        if let Some(Some(parent_id)) = input.parent_id {
            self.check_parent(book_id, parent_id).await?;
        }

        if let Some(code) = input.code {
            account.code = code;
        }
        if let Some(name) = input.name {
            account.name = name;
        }
        if let Some(kind) = input.kind {
            account.kind = kind;
            account.normal_balance = kind.normal_balance();
        }
        if let Some(parent_id) = input.parent_id {
            account.parent_id = parent_id;
        }
        if let Some(is_postable) = input.is_postable {
            account.is_postable = is_postable;
        }

        let account = self.store.update_account(account).await?;
        info!(
            book_id = %account.book_id,
            account_id = %account.id,
            "Account updated"
        );
        Ok(account)
    }

    /// Deactivates an account, keeping its posted history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in the book, or
    /// `Storage` on backend failure.
    pub async fn deactivate(
        &self,
        book_id: BookId,
        id: AccountId,
    ) -> Result<Account, RegistryError> {
        self.set_active(book_id, id, false).await
    }

    /// Reactivates a previously deactivated account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in the book, or
    /// `Storage` on backend failure.
    pub async fn reactivate(
        &self,
        book_id: BookId,
        id: AccountId,
    ) -> Result<Account, RegistryError> {
        self.set_active(book_id, id, true).await
    }

    /// Removes an account that was never posted to.
    ///
    /// Accounts with ledger entries cannot be removed; deactivate them
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the account does not exist in the book
    /// - the account has ledger entries
    /// - the storage layer fails
    pub async fn remove(&self, book_id: BookId, id: AccountId) -> Result<(), RegistryError> {
        let account = self.account(book_id, id).await?;
        if self.store.account_has_entries(id).await? {
            return Err(RegistryError::HasEntries(id));
        }
        self.store.delete_account(book_id, id).await?;
        info!(
            book_id = %book_id,
            account_id = %id,
            code = %account.code,
            "Account removed"
        );
        Ok(())
    }

    async fn set_active(
        &self,
        book_id: BookId,
        id: AccountId,
        is_active: bool,
    ) -> Result<Account, RegistryError> {
        let mut account = self.account(book_id, id).await?;
        account.is_active = is_active;
        let account = self.store.update_account(account).await?;
        info!(
            book_id = %book_id,
            account_id = %id,
            is_active,
            "Account active flag changed"
        );
        Ok(account)
    }

    async fn check_parent(
        &self,
        book_id: BookId,
        parent_id: AccountId,
    ) -> Result<(), RegistryError> {
        let parent = self.store.account(parent_id).await?;
        match parent {
            None => Err(RegistryError::ParentNotFound(parent_id)),
            Some(parent) if parent.book_id != book_id => {
                Err(RegistryError::ParentWrongBook(parent_id))
            }
            _ => Ok(()),
        }
    }
}
