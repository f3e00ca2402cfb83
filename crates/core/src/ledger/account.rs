//! Account domain types and the account-type algebra.
//!
//! Account balances are kept as signed running totals in the book's base
//! currency: positive means net debit, negative means net credit. The normal
//! balance of an account is derived from its type, never stored free-form.

use chrono::{DateTime, Utc};
use folio_shared::types::{AccountId, BookId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an account's natural balance is a debit or a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Natural balance is a debit (assets, expenses).
    Debit,
    /// Natural balance is a credit (liabilities, equity, revenue).
    Credit,
}

/// Account classification used across the chart of accounts.
///
/// Contra types offset the category they are named after and carry the
/// opposite normal balance (e.g. accumulated depreciation is a credit-normal
/// `ContraAsset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset expected to convert to cash within one cycle.
    CurrentAsset,
    /// Long-lived asset (property, equipment, intangibles).
    NonCurrentAsset,
    /// Asset without a current/non-current designation.
    Asset,
    /// Obligation due within one cycle.
    CurrentLiability,
    /// Long-term obligation.
    NonCurrentLiability,
    /// Liability without a current/non-current designation.
    Liability,
    /// Owner's equity.
    Equity,
    /// Accumulated earnings carried forward.
    RetainedEarnings,
    /// Operating revenue.
    Revenue,
    /// Other income.
    Income,
    /// Expense from primary operations.
    OperatingExpense,
    /// Expense outside primary operations (interest, one-offs).
    NonOperatingExpense,
    /// Expense without an operating designation.
    Expense,
    /// Offset against an asset (e.g. accumulated depreciation).
    ContraAsset,
    /// Offset against a liability (e.g. discount on notes payable).
    ContraLiability,
    /// Offset against income (e.g. sales returns).
    ContraIncome,
    /// Offset against an expense (e.g. purchase discounts).
    ContraExpense,
}

impl AccountType {
    /// Derives the normal balance from the account type.
    ///
    /// Asset and expense kinds are debit-normal; liability, equity, and
    /// revenue kinds are credit-normal. Contra kinds take the opposite of the
    /// category they offset.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::CurrentAsset
            | Self::NonCurrentAsset
            | Self::Asset
            | Self::OperatingExpense
            | Self::NonOperatingExpense
            | Self::Expense
            | Self::ContraLiability
            | Self::ContraIncome => NormalBalance::Debit,
            Self::CurrentLiability
            | Self::NonCurrentLiability
            | Self::Liability
            | Self::Equity
            | Self::RetainedEarnings
            | Self::Revenue
            | Self::Income
            | Self::ContraAsset
            | Self::ContraExpense => NormalBalance::Credit,
        }
    }

    /// Returns true for debit-normal account types.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self.normal_balance(), NormalBalance::Debit)
    }
}

/// An account in a book's chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Book this account belongs to.
    pub book_id: BookId,
    /// Short human-readable code, unique within the book.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    #[serde(rename = "type")]
    pub kind: AccountType,
    /// Natural balance side, derived from `kind`.
    pub normal_balance: NormalBalance,
    /// Whether journal lines may post directly to this account.
    /// Non-postable accounts are structural/summary nodes.
    pub is_postable: bool,
    /// Parent account for hierarchy.
    pub parent_id: Option<AccountId>,
    /// Inactive accounts reject new postings but keep their history.
    pub is_active: bool,
    /// Signed running total of posted lines (positive = net debit).
    pub balance: Decimal,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates an account with a zero opening balance.
    ///
    /// `normal_balance` is derived from `kind`; callers never choose it.
    #[must_use]
    pub fn new(
        book_id: BookId,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: AccountType,
    ) -> Self {
        Self {
            id: AccountId::new(),
            book_id,
            code: code.into(),
            name: name.into(),
            kind,
            normal_balance: kind.normal_balance(),
            is_postable: true,
            parent_id: None,
            is_active: true,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Returns the balance in the account's natural sign convention:
    /// positive for a debit-normal account in net debit, positive for a
    /// credit-normal account in net credit.
    #[must_use]
    pub fn natural_balance(&self) -> Decimal {
        match self.normal_balance {
            NormalBalance::Debit => self.balance,
            NormalBalance::Credit => -self.balance,
        }
    }
}
