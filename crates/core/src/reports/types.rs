//! Report data types.

use chrono::NaiveDate;
use folio_shared::types::{AccountId, BookId, JournalId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::account::AccountType;

/// An account's signed net balance at a report cutoff.
///
/// Built by the caller from posted entries only; positive means net
/// debit. This is the input row for every balance-shaped report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub kind: AccountType,
    /// Signed net balance (positive = net debit).
    pub balance: Decimal,
}

/// One account row in a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Net debit balance, zero if the account is net credit.
    pub debit_balance: Decimal,
    /// Net credit balance, zero if the account is net debit.
    pub credit_balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total of the debit column.
    pub total_debit: Decimal,
    /// Total of the credit column.
    pub total_credit: Decimal,
    /// Whether debits equal credits within the rounding tolerance.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Book the report covers.
    pub book_id: BookId,
    /// Posting cutoff date.
    pub as_of: NaiveDate,
    /// Account rows, zero balances dropped.
    pub rows: Vec<TrialBalanceRow>,
    /// Column totals.
    pub totals: TrialBalanceTotals,
}

/// One account line in a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Display amount in the section's sign convention.
    pub amount: Decimal,
}

/// A titled group of account lines with a subtotal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section subtotal.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<ReportLine>,
}

/// Balance sheet report.
///
/// Liability and equity amounts are sign-flipped so that a normal
/// credit balance displays positive; contra accounts then show negative
/// inside their section and reduce its subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// Book the report covers.
    pub book_id: BookId,
    /// Posting cutoff date.
    pub as_of: NaiveDate,
    /// Current assets.
    pub current_assets: ReportSection,
    /// Non-current assets, including asset contra accounts.
    pub non_current_assets: ReportSection,
    /// Current liabilities, including liability contra accounts.
    pub current_liabilities: ReportSection,
    /// Non-current liabilities.
    pub non_current_liabilities: ReportSection,
    /// Equity, including retained earnings.
    pub equity: ReportSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Book the report covers.
    pub book_id: BookId,
    /// Period start date (inclusive).
    pub period_start: NaiveDate,
    /// Period end date (inclusive).
    pub period_end: NaiveDate,
    /// Revenue, sign-flipped positive.
    pub revenue: ReportSection,
    /// Operating expenses, natural positive.
    pub operating_expenses: ReportSection,
    /// Non-operating expenses, natural positive.
    pub non_operating_expenses: ReportSection,
    /// Operating plus non-operating expenses.
    pub total_expenses: Decimal,
    /// Revenue minus total expenses.
    pub net_income: Decimal,
}

/// A posted line feeding the account activity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Journal the line belongs to.
    pub journal_id: JournalId,
    /// Journal document number.
    pub doc_no: Option<String>,
    /// Journal document date.
    pub doc_date: NaiveDate,
    /// 1-based line number within the journal.
    pub line_no: u32,
    /// Line description.
    pub description: Option<String>,
    /// Signed amount (positive = debit).
    pub amount_dc: Decimal,
}

/// One statement line in an account activity report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLine {
    /// Journal the line belongs to.
    pub journal_id: JournalId,
    /// Journal document number.
    pub doc_no: Option<String>,
    /// Journal document date.
    pub doc_date: NaiveDate,
    /// Line description.
    pub description: Option<String>,
    /// Debit amount, zero for credit lines.
    pub debit: Decimal,
    /// Credit amount, zero for debit lines.
    pub credit: Decimal,
    /// Signed balance after this line.
    pub running_balance: Decimal,
}

/// Per-account statement over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountActivityReport {
    /// Report type identifier.
    pub report_type: String,
    /// Book the report covers.
    pub book_id: BookId,
    /// Account the statement is for.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Period start date (inclusive).
    pub period_start: NaiveDate,
    /// Period end date (inclusive).
    pub period_end: NaiveDate,
    /// Signed balance from posted activity before the period.
    pub opening_balance: Decimal,
    /// Statement lines in document-date order.
    pub lines: Vec<ActivityLine>,
    /// Signed balance after the last line.
    pub closing_balance: Decimal,
}
