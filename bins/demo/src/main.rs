//! Folio ledger walkthrough.
//!
//! Seeds a chart of accounts into the in-memory store, records and posts a
//! month of activity, reverses a duplicate invoice, closes the period to
//! retained earnings, and prints every report.
//!
//! Usage: cargo run --bin demo

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_core::ledger::{
    AccountType, CreateJournalInput, DocType, Journal, LedgerEntry, LineInput,
};
use folio_core::reports::{
    AccountActivityReport, BalanceSheetReport, IncomeStatementReport, ReportSection,
    TrialBalanceReport,
};
use folio_engine::{
    AccountRegistry, BalanceAggregator, JournalEngine, JournalFilter, JournalStatus, MemoryStore,
    NewAccount,
};
use folio_shared::AppConfig;
use folio_shared::types::{AccountId, BookId, UserId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    init_tracing(&config);

    let store = Arc::new(MemoryStore::new());
    let engine = JournalEngine::new(store.clone());
    let registry = AccountRegistry::new(store.clone());
    let aggregator = BalanceAggregator::new(store);

    let book_id = BookId::new();
    let accountant = UserId::new();
    let currency = config.ledger.base_currency.clone();
    info!(%book_id, %currency, "Demo book opened");

    println!("Seeding chart of accounts...");
    let chart = seed_chart(&registry, book_id).await?;

    println!("Recording March activity...");
    let duplicate = record_march_activity(&engine, &chart, book_id, accountant, &currency).await?;

    println!("Reversing the duplicate invoice...");
    let (reversal, _) = engine
        .reverse_journal(
            duplicate.id,
            "Duplicate capture of the March 5 cash sale",
            accountant,
        )
        .await?;
    println!(
        "  {} reverses {}",
        reversal.doc_no.as_deref().unwrap_or("-"),
        duplicate.doc_no.as_deref().unwrap_or("-")
    );

    let march_start = day(1);
    let march_end = day(31);

    let trial_balance = aggregator.trial_balance(book_id, march_end).await?;
    print_trial_balance(&trial_balance);

    let income = aggregator
        .income_statement(book_id, march_start, march_end)
        .await?;
    print_income_statement(&income);

    println!("\nClosing the period to retained earnings...");
    close_period(&engine, &income, chart.retained_earnings, accountant, &currency).await?;

    let balance_sheet = aggregator.balance_sheet(book_id, march_end).await?;
    print_balance_sheet(&balance_sheet);

    let cash_activity = aggregator
        .account_activity(book_id, chart.cash, march_start, march_end)
        .await?;
    print_account_activity(&cash_activity);

    let all = engine.journals(book_id, JournalFilter::default()).await?;
    let drafts = engine
        .journals(
            book_id,
            JournalFilter {
                status: Some(JournalStatus::Draft),
                ..JournalFilter::default()
            },
        )
        .await?;
    println!("\n{} journals on file, {} still in draft.", all.len(), drafts.len());

    println!("Walkthrough complete!");
    Ok(())
}

/// Initializes tracing with an env-filter default and the configured format.
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "folio=info".into());
    if config.log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Account handles the walkthrough posts against.
struct Chart {
    cash: AccountId,
    receivable: AccountId,
    equipment: AccountId,
    payable: AccountId,
    owner_capital: AccountId,
    retained_earnings: AccountId,
    sales: AccountId,
    supplies_expense: AccountId,
}

/// Seeds a small chart with a non-postable header over the current assets.
async fn seed_chart(registry: &AccountRegistry, book_id: BookId) -> anyhow::Result<Chart> {
    let header = registry
        .register(NewAccount {
            book_id,
            code: "1000".to_string(),
            name: "Current Assets".to_string(),
            kind: AccountType::CurrentAsset,
            parent_id: None,
            is_postable: false,
        })
        .await?;
    println!("  1000 Current Assets (header)");

    let cash = register(
        registry,
        book_id,
        "1010",
        "Cash",
        AccountType::CurrentAsset,
        Some(header.id),
    )
    .await?;
    let receivable = register(
        registry,
        book_id,
        "1100",
        "Accounts Receivable",
        AccountType::CurrentAsset,
        Some(header.id),
    )
    .await?;
    let equipment = register(
        registry,
        book_id,
        "1500",
        "Office Equipment",
        AccountType::NonCurrentAsset,
        None,
    )
    .await?;
    let payable = register(
        registry,
        book_id,
        "2000",
        "Accounts Payable",
        AccountType::CurrentLiability,
        None,
    )
    .await?;
    let owner_capital = register(
        registry,
        book_id,
        "3000",
        "Owner Capital",
        AccountType::Equity,
        None,
    )
    .await?;
    let retained_earnings = register(
        registry,
        book_id,
        "3900",
        "Retained Earnings",
        AccountType::RetainedEarnings,
        None,
    )
    .await?;
    let sales = register(
        registry,
        book_id,
        "4000",
        "Sales Revenue",
        AccountType::Revenue,
        None,
    )
    .await?;
    let supplies_expense = register(
        registry,
        book_id,
        "6000",
        "Office Supplies Expense",
        AccountType::OperatingExpense,
        None,
    )
    .await?;

    Ok(Chart {
        cash,
        receivable,
        equipment,
        payable,
        owner_capital,
        retained_earnings,
        sales,
        supplies_expense,
    })
}

/// Registers one postable account and echoes it.
async fn register(
    registry: &AccountRegistry,
    book_id: BookId,
    code: &str,
    name: &str,
    kind: AccountType,
    parent_id: Option<AccountId>,
) -> anyhow::Result<AccountId> {
    let account = registry
        .register(NewAccount {
            book_id,
            code: code.to_string(),
            name: name.to_string(),
            kind,
            parent_id,
            is_postable: true,
        })
        .await?;
    println!("  {} {}", account.code, account.name);
    Ok(account.id)
}

/// Posts the month's journals and leaves one adjustment in draft.
///
/// Returns the posted duplicate invoice so the caller can reverse it.
async fn record_march_activity(
    engine: &JournalEngine,
    chart: &Chart,
    book_id: BookId,
    accountant: UserId,
    currency: &str,
) -> anyhow::Result<Journal> {
    let entry = |doc_date: NaiveDate,
                 doc_type: DocType,
                 narration: &str,
                 debit: AccountId,
                 credit: AccountId,
                 amount: Decimal| CreateJournalInput {
        book_id,
        doc_type,
        doc_date,
        currency: currency.to_string(),
        narration: Some(narration.to_string()),
        lines: vec![LineInput::new(debit, amount), LineInput::new(credit, -amount)],
        created_by: accountant,
    };

    let inputs = vec![
        entry(
            day(1),
            DocType::Manual,
            "Owner capital contribution",
            chart.cash,
            chart.owner_capital,
            dec!(5000.00),
        ),
        entry(
            day(5),
            DocType::Invoice,
            "Cash sale",
            chart.cash,
            chart.sales,
            dec!(1200.00),
        ),
        entry(
            day(9),
            DocType::Bill,
            "Office supplies on account",
            chart.supplies_expense,
            chart.payable,
            dec!(350.00),
        ),
        entry(
            day(12),
            DocType::Payment,
            "Office equipment purchase",
            chart.equipment,
            chart.cash,
            dec!(2000.00),
        ),
        entry(
            day(15),
            DocType::Payment,
            "Partial payment of supplier bill",
            chart.payable,
            chart.cash,
            dec!(175.00),
        ),
    ];
    for input in inputs {
        let (draft, _) = engine.create_journal(input).await?;
        let (posted, entries) = engine.post_journal(draft.id, accountant).await?;
        print_posted(&posted, &entries);
    }

    // The same cash sale keyed in twice; the second posting gets reversed.
    let (dup_draft, _) = engine
        .create_journal(entry(
            day(18),
            DocType::Invoice,
            "Cash sale",
            chart.cash,
            chart.sales,
            dec!(1200.00),
        ))
        .await?;
    let (duplicate, dup_entries) = engine.post_journal(dup_draft.id, accountant).await?;
    print_posted(&duplicate, &dup_entries);

    let (consulting_draft, _) = engine
        .create_journal(entry(
            day(20),
            DocType::Invoice,
            "Consulting services invoiced",
            chart.receivable,
            chart.sales,
            dec!(800.00),
        ))
        .await?;
    let (consulting, consulting_entries) =
        engine.post_journal(consulting_draft.id, accountant).await?;
    print_posted(&consulting, &consulting_entries);

    let (pending, _) = engine
        .create_journal(entry(
            day(25),
            DocType::Adjustment,
            "Pending correction",
            chart.supplies_expense,
            chart.cash,
            dec!(15.00),
        ))
        .await?;
    println!(
        "  {} Pending correction (left in draft)",
        pending.doc_no.as_deref().unwrap_or("-")
    );

    Ok(duplicate)
}

/// Closes revenue and expense balances into retained earnings.
async fn close_period(
    engine: &JournalEngine,
    income: &IncomeStatementReport,
    retained_earnings: AccountId,
    accountant: UserId,
    currency: &str,
) -> anyhow::Result<()> {
    let mut lines = Vec::new();
    for line in &income.revenue.accounts {
        lines.push(LineInput::new(line.account_id, line.amount));
    }
    for line in income
        .operating_expenses
        .accounts
        .iter()
        .chain(&income.non_operating_expenses.accounts)
    {
        lines.push(LineInput::new(line.account_id, -line.amount));
    }
    lines.push(LineInput::new(retained_earnings, -income.net_income));

    let (draft, _) = engine
        .create_journal(CreateJournalInput {
            book_id: income.book_id,
            doc_type: DocType::Adjustment,
            doc_date: income.period_end,
            currency: currency.to_string(),
            narration: Some(format!(
                "Close period {} to {}",
                income.period_start, income.period_end
            )),
            lines,
            created_by: accountant,
        })
        .await?;
    let (posted, _) = engine.post_journal(draft.id, accountant).await?;
    println!(
        "  {} closes net income {} to retained earnings",
        posted.doc_no.as_deref().unwrap_or("-"),
        income.net_income
    );
    Ok(())
}

/// A March 2025 date for the walkthrough timeline.
fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).expect("valid walkthrough date")
}

fn print_posted(journal: &Journal, entries: &[LedgerEntry]) {
    let debits: Decimal = entries
        .iter()
        .map(|entry| entry.amount_dc.max(Decimal::ZERO))
        .sum();
    println!(
        "  {} {} ({} {})",
        journal.doc_no.as_deref().unwrap_or("-"),
        journal.narration.as_deref().unwrap_or(""),
        debits,
        journal.currency
    );
}

fn print_trial_balance(report: &TrialBalanceReport) {
    println!("\nTrial Balance as of {}", report.as_of);
    println!(
        "  {:<6} {:<26} {:>12} {:>12}",
        "Code", "Account", "Debit", "Credit"
    );
    for row in &report.rows {
        println!(
            "  {:<6} {:<26} {:>12} {:>12}",
            row.code, row.name, row.debit_balance, row.credit_balance
        );
    }
    println!(
        "  {:<33} {:>12} {:>12}",
        "Totals", report.totals.total_debit, report.totals.total_credit
    );
    println!("  Balanced: {}", report.totals.is_balanced);
}

fn print_section(title: &str, section: &ReportSection) {
    if section.accounts.is_empty() {
        return;
    }
    println!("  {title}");
    for line in &section.accounts {
        println!("    {:<6} {:<24} {:>12}", line.code, line.name, line.amount);
    }
    println!("    {:<31} {:>12}", "Subtotal", section.total);
}

fn print_income_statement(report: &IncomeStatementReport) {
    println!(
        "\nIncome Statement {} to {}",
        report.period_start, report.period_end
    );
    print_section("Revenue", &report.revenue);
    print_section("Operating expenses", &report.operating_expenses);
    print_section("Non-operating expenses", &report.non_operating_expenses);
    println!("  {:<33} {:>12}", "Total expenses", report.total_expenses);
    println!("  {:<33} {:>12}", "Net income", report.net_income);
}

fn print_balance_sheet(report: &BalanceSheetReport) {
    println!("\nBalance Sheet as of {}", report.as_of);
    print_section("Current assets", &report.current_assets);
    print_section("Non-current assets", &report.non_current_assets);
    print_section("Current liabilities", &report.current_liabilities);
    print_section("Non-current liabilities", &report.non_current_liabilities);
    print_section("Equity", &report.equity);
    println!("  {:<33} {:>12}", "Total assets", report.total_assets);
    println!(
        "  {:<33} {:>12}",
        "Liabilities and equity", report.liabilities_and_equity
    );
    println!("  Balanced: {}", report.is_balanced);
}

fn print_account_activity(report: &AccountActivityReport) {
    println!(
        "\nAccount Activity {} {} ({} to {})",
        report.code, report.name, report.period_start, report.period_end
    );
    println!(
        "  {:<10} {:<11} {:<28} {:>10} {:>10} {:>12}",
        "Date", "Doc", "Description", "Debit", "Credit", "Balance"
    );
    println!("  {:<73} {:>12}", "Opening balance", report.opening_balance);
    for line in &report.lines {
        println!(
            "  {:<10} {:<11} {:<28} {:>10} {:>10} {:>12}",
            line.doc_date.to_string(),
            line.doc_no.as_deref().unwrap_or("-"),
            line.description.as_deref().unwrap_or(""),
            line.debit,
            line.credit,
            line.running_balance
        );
    }
    println!("  {:<73} {:>12}", "Closing balance", report.closing_balance);
}
