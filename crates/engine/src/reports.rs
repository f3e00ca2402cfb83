//! Report aggregation over posted history.
//!
//! The aggregator derives every figure from posted journal lines, never
//! from the running account balances, so an `as_of` cutoff in the past
//! reproduces the ledger exactly as it stood then. Read-only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use folio_core::ledger::Account;
use folio_core::reports::{
    AccountActivityReport, AccountBalance, ActivityEntry, BalanceSheetReport,
    IncomeStatementReport, ReportError, ReportService, TrialBalanceReport,
};
use folio_shared::types::{AccountId, BookId};
use rust_decimal::Decimal;

use crate::store::{AccountFilter, LedgerStore, LineQuery};

/// Read-only report aggregator over a storage port.
pub struct BalanceAggregator {
    store: Arc<dyn LedgerStore>,
}

impl BalanceAggregator {
    /// Creates an aggregator over the given store.
    #[must_use]
    pub const fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Generates a trial balance as of a date.
    ///
    /// Sums signed amounts of lines whose journal was posted on or
    /// before `as_of`. Deactivated accounts keep their history, so they
    /// appear whenever their net is nonzero.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn trial_balance(
        &self,
        book_id: BookId,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let balances = self.balances_as_of(book_id, as_of).await?;
        Ok(ReportService::generate_trial_balance(book_id, as_of, balances))
    }

    /// Generates a balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn balance_sheet(
        &self,
        book_id: BookId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let balances = self.balances_as_of(book_id, as_of).await?;
        Ok(ReportService::generate_balance_sheet(book_id, as_of, balances))
    }

    /// Generates an income statement for a document-date period.
    ///
    /// Only posted journals with `doc_date` inside `[period_start,
    /// period_end]` contribute.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the period is inverted, or `Storage`
    /// on backend failure.
    pub async fn income_statement(
        &self,
        book_id: BookId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let lines = self
            .store
            .posted_lines(
                book_id,
                LineQuery {
                    doc_date_from: Some(period_start),
                    doc_date_to: Some(period_end),
                    ..LineQuery::default()
                },
            )
            .await?;
        let nets = fold_nets(lines.iter().map(|line| (line.account_id, line.amount_dc)));
        let accounts = self.all_accounts(book_id).await?;
        let balances = join_balances(accounts, &nets);

        ReportService::generate_income_statement(book_id, period_start, period_end, balances)
    }

    /// Generates a per-account statement for a document-date period.
    ///
    /// The opening balance is the account's posted activity before
    /// `period_start`; each line then carries a running balance.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if the account does not resolve in the
    /// book, `InvalidDateRange` if the period is inverted, or `Storage`
    /// on backend failure.
    pub async fn account_activity(
        &self,
        book_id: BookId,
        account_id: AccountId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<AccountActivityReport, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let account = self
            .store
            .account(account_id)
            .await?
            .filter(|account| account.book_id == book_id)
            .ok_or(ReportError::UnknownAccount(account_id))?;

        let opening_balance = match period_start.pred_opt() {
            Some(day_before) => {
                let prior = self
                    .store
                    .posted_lines(
                        book_id,
                        LineQuery {
                            account_id: Some(account_id),
                            doc_date_to: Some(day_before),
                            ..LineQuery::default()
                        },
                    )
                    .await?;
                prior.iter().map(|line| line.amount_dc).sum()
            }
            None => Decimal::ZERO,
        };

        let lines = self
            .store
            .posted_lines(
                book_id,
                LineQuery {
                    account_id: Some(account_id),
                    doc_date_from: Some(period_start),
                    doc_date_to: Some(period_end),
                    ..LineQuery::default()
                },
            )
            .await?;
        let entries = lines
            .into_iter()
            .map(|line| ActivityEntry {
                journal_id: line.journal_id,
                doc_no: line.doc_no,
                doc_date: line.doc_date,
                line_no: line.line_no,
                description: line.description,
                amount_dc: line.amount_dc,
            })
            .collect();

        ReportService::generate_account_activity(
            book_id,
            &account,
            period_start,
            period_end,
            opening_balance,
            entries,
        )
    }

    async fn balances_as_of(
        &self,
        book_id: BookId,
        as_of: NaiveDate,
    ) -> Result<Vec<AccountBalance>, ReportError> {
        let lines = self
            .store
            .posted_lines(
                book_id,
                LineQuery {
                    posted_on_or_before: Some(as_of),
                    ..LineQuery::default()
                },
            )
            .await?;
        let nets = fold_nets(lines.iter().map(|line| (line.account_id, line.amount_dc)));
        let accounts = self.all_accounts(book_id).await?;
        Ok(join_balances(accounts, &nets))
    }

    async fn all_accounts(&self, book_id: BookId) -> Result<Vec<Account>, ReportError> {
        Ok(self
            .store
            .accounts(
                book_id,
                AccountFilter {
                    include_inactive: true,
                    ..AccountFilter::default()
                },
            )
            .await?)
    }
}

fn fold_nets<I>(amounts: I) -> HashMap<AccountId, Decimal>
where
    I: Iterator<Item = (AccountId, Decimal)>,
{
    let mut nets: HashMap<AccountId, Decimal> = HashMap::new();
    for (account_id, amount) in amounts {
        *nets.entry(account_id).or_default() += amount;
    }
    nets
}

fn join_balances(
    accounts: Vec<Account>,
    nets: &HashMap<AccountId, Decimal>,
) -> Vec<AccountBalance> {
    accounts
        .into_iter()
        .map(|account| AccountBalance {
            account_id: account.id,
            code: account.code,
            name: account.name,
            kind: account.kind,
            balance: nets.get(&account.id).copied().unwrap_or_default(),
        })
        .collect()
}
