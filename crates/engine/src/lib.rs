//! Posting engine and storage port for Folio.
//!
//! This crate provides:
//! - `LedgerStore`, the async storage port, with an in-memory adapter
//! - `JournalEngine` for the create/post/reverse lifecycle
//! - `AccountRegistry` for chart-of-accounts maintenance
//! - `BalanceAggregator` for reports over posted history

pub mod accounts;
pub mod journal;
pub mod reports;
pub mod store;

pub use accounts::{AccountRegistry, NewAccount, RegistryError, UpdateAccount};
pub use journal::JournalEngine;
pub use reports::BalanceAggregator;
pub use store::{
    AccountFilter, JournalFilter, JournalStatus, LedgerStore, LineQuery, MemoryStore, PostedLine,
    PostingUpdate, StoreError,
};
