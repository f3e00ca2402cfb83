//! Report generation service.
//!
//! Pure functions over pre-aggregated balances. Given the same inputs
//! the same report comes back, so any historical date can be
//! regenerated exactly.

use chrono::NaiveDate;
use folio_shared::types::BookId;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountActivityReport, AccountBalance, ActivityEntry, ActivityLine, BalanceSheetReport,
    IncomeStatementReport, ReportLine, ReportSection, TrialBalanceReport, TrialBalanceRow,
    TrialBalanceTotals,
};
use crate::ledger::account::{Account, AccountType};
use crate::ledger::balance::debit_credit_columns;
use crate::ledger::validation::within_tolerance;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance report from account balances.
    ///
    /// Splits each signed net into a debit or credit column and checks
    /// that the columns agree. Zero-balance accounts are dropped.
    #[must_use]
    pub fn generate_trial_balance(
        book_id: BookId,
        as_of: NaiveDate,
        balances: Vec<AccountBalance>,
    ) -> TrialBalanceReport {
        let mut rows = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for balance in balances {
            if balance.balance.is_zero() {
                continue;
            }
            let (debit_balance, credit_balance) = debit_credit_columns(balance.balance);
            total_debit += debit_balance;
            total_credit += credit_balance;
            rows.push(TrialBalanceRow {
                account_id: balance.account_id,
                code: balance.code,
                name: balance.name,
                debit_balance,
                credit_balance,
            });
        }

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            book_id,
            as_of,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: within_tolerance(total_debit - total_credit),
            },
        }
    }

    /// Generates a balance sheet report from account balances.
    ///
    /// Asset amounts display as stored; liability and equity amounts
    /// are sign-flipped positive. The accounting equation is reported
    /// through `is_balanced` rather than enforced, since an unclosed
    /// period legitimately carries net income outside equity.
    #[must_use]
    pub fn generate_balance_sheet(
        book_id: BookId,
        as_of: NaiveDate,
        balances: Vec<AccountBalance>,
    ) -> BalanceSheetReport {
        let mut current_assets = ReportSection::default();
        let mut non_current_assets = ReportSection::default();
        let mut current_liabilities = ReportSection::default();
        let mut non_current_liabilities = ReportSection::default();
        let mut equity = ReportSection::default();

        for balance in balances {
            if balance.balance.is_zero() {
                continue;
            }
            let natural = balance.balance;
            match balance.kind {
                AccountType::CurrentAsset | AccountType::Asset => {
                    Self::add_line(&mut current_assets, balance, natural);
                }
                AccountType::NonCurrentAsset | AccountType::ContraAsset => {
                    Self::add_line(&mut non_current_assets, balance, natural);
                }
                AccountType::CurrentLiability
                | AccountType::Liability
                | AccountType::ContraLiability => {
                    Self::add_line(&mut current_liabilities, balance, -natural);
                }
                AccountType::NonCurrentLiability => {
                    Self::add_line(&mut non_current_liabilities, balance, -natural);
                }
                AccountType::Equity | AccountType::RetainedEarnings => {
                    Self::add_line(&mut equity, balance, -natural);
                }
                AccountType::Revenue
                | AccountType::Income
                | AccountType::ContraIncome
                | AccountType::OperatingExpense
                | AccountType::NonOperatingExpense
                | AccountType::Expense
                | AccountType::ContraExpense => {}
            }
        }

        let total_assets = current_assets.total + non_current_assets.total;
        let total_liabilities = current_liabilities.total + non_current_liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            book_id,
            as_of,
            current_assets,
            non_current_assets,
            current_liabilities,
            non_current_liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: within_tolerance(total_assets - liabilities_and_equity),
        }
    }

    /// Generates an income statement report from account balances.
    ///
    /// The balances must be aggregated over the period's journals only.
    /// Revenue displays sign-flipped positive; expenses display natural
    /// positive with operating and non-operating subtotals.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `period_start` is after
    /// `period_end`.
    pub fn generate_income_statement(
        book_id: BookId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        balances: Vec<AccountBalance>,
    ) -> Result<IncomeStatementReport, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let mut revenue = ReportSection::default();
        let mut operating_expenses = ReportSection::default();
        let mut non_operating_expenses = ReportSection::default();

        for balance in balances {
            if balance.balance.is_zero() {
                continue;
            }
            let natural = balance.balance;
            match balance.kind {
                AccountType::Revenue | AccountType::Income | AccountType::ContraIncome => {
                    Self::add_line(&mut revenue, balance, -natural);
                }
                AccountType::OperatingExpense
                | AccountType::Expense
                | AccountType::ContraExpense => {
                    Self::add_line(&mut operating_expenses, balance, natural);
                }
                AccountType::NonOperatingExpense => {
                    Self::add_line(&mut non_operating_expenses, balance, natural);
                }
                AccountType::CurrentAsset
                | AccountType::NonCurrentAsset
                | AccountType::Asset
                | AccountType::CurrentLiability
                | AccountType::NonCurrentLiability
                | AccountType::Liability
                | AccountType::Equity
                | AccountType::RetainedEarnings
                | AccountType::ContraAsset
                | AccountType::ContraLiability => {}
            }
        }

        let total_expenses = operating_expenses.total + non_operating_expenses.total;
        let net_income = revenue.total - total_expenses;

        Ok(IncomeStatementReport {
            report_type: "income_statement".to_string(),
            book_id,
            period_start,
            period_end,
            revenue,
            operating_expenses,
            non_operating_expenses,
            total_expenses,
            net_income,
        })
    }

    /// Generates a per-account statement with a running balance.
    ///
    /// Lines are ordered by document date, then journal, then line
    /// number, so the same history always renders the same statement.
    /// The running balance starts from `opening_balance` and applies
    /// each signed amount in turn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `period_start` is after
    /// `period_end`.
    pub fn generate_account_activity(
        book_id: BookId,
        account: &Account,
        period_start: NaiveDate,
        period_end: NaiveDate,
        opening_balance: Decimal,
        mut entries: Vec<ActivityEntry>,
    ) -> Result<AccountActivityReport, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        entries.sort_by_key(|entry| {
            (
                entry.doc_date,
                entry.journal_id.into_inner(),
                entry.line_no,
            )
        });

        let mut running_balance = opening_balance;
        let lines: Vec<ActivityLine> = entries
            .into_iter()
            .map(|entry| {
                running_balance += entry.amount_dc;
                let (debit, credit) = debit_credit_columns(entry.amount_dc);
                ActivityLine {
                    journal_id: entry.journal_id,
                    doc_no: entry.doc_no,
                    doc_date: entry.doc_date,
                    description: entry.description,
                    debit,
                    credit,
                    running_balance,
                }
            })
            .collect();

        Ok(AccountActivityReport {
            report_type: "account_activity".to_string(),
            book_id,
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            period_start,
            period_end,
            opening_balance,
            lines,
            closing_balance: running_balance,
        })
    }

    fn add_line(section: &mut ReportSection, balance: AccountBalance, amount: Decimal) {
        section.total += amount;
        section.accounts.push(ReportLine {
            account_id: balance.account_id,
            code: balance.code,
            name: balance.name,
            amount,
        });
    }
}
