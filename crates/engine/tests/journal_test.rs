//! Integration tests for the journal engine against the in-memory store.
//!
//! Covers the full create/post/reverse lifecycle, the validation rules at
//! both creation and posting time, and draft maintenance.

use std::sync::Arc;

use chrono::NaiveDate;
use folio_core::ledger::{
    AccountType, CreateJournalInput, DocType, LedgerError, LineInput, UpdateJournalInput,
};
use folio_engine::{
    AccountRegistry, JournalEngine, JournalFilter, JournalStatus, LedgerStore, MemoryStore,
    NewAccount,
};
use folio_shared::types::{AccountId, BookId, JournalId, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct TestLedger {
    store: Arc<MemoryStore>,
    engine: JournalEngine,
    registry: AccountRegistry,
    book_id: BookId,
    user_id: UserId,
    cash: AccountId,
    revenue: AccountId,
}

async fn setup() -> TestLedger {
    let store = Arc::new(MemoryStore::new());
    let engine = JournalEngine::new(store.clone());
    let registry = AccountRegistry::new(store.clone());
    let book_id = BookId::new();
    let user_id = UserId::new();

    let cash =
        register_account(&registry, book_id, "1000", "Cash", AccountType::CurrentAsset).await;
    let revenue =
        register_account(&registry, book_id, "4000", "Sales Revenue", AccountType::Revenue).await;

    TestLedger {
        store,
        engine,
        registry,
        book_id,
        user_id,
        cash,
        revenue,
    }
}

async fn register_account(
    registry: &AccountRegistry,
    book_id: BookId,
    code: &str,
    name: &str,
    kind: AccountType,
) -> AccountId {
    registry
        .register(NewAccount {
            book_id,
            code: code.to_string(),
            name: name.to_string(),
            kind,
            parent_id: None,
            is_postable: true,
        })
        .await
        .expect("register account")
        .id
}

fn day(year: i32, month: u32, dayofm: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dayofm).expect("valid date")
}

fn journal_input(ledger: &TestLedger, lines: Vec<LineInput>) -> CreateJournalInput {
    CreateJournalInput {
        book_id: ledger.book_id,
        doc_type: DocType::Manual,
        doc_date: day(2025, 3, 14),
        currency: "USD".to_string(),
        narration: Some("Cash sale".to_string()),
        lines,
        created_by: ledger.user_id,
    }
}

fn cash_sale_lines(ledger: &TestLedger, amount: Decimal) -> Vec<LineInput> {
    vec![
        LineInput::new(ledger.cash, amount),
        LineInput::new(ledger.revenue, -amount),
    ]
}

async fn balance_of(store: &MemoryStore, account_id: AccountId) -> Decimal {
    store
        .account(account_id)
        .await
        .expect("account lookup")
        .expect("account exists")
        .balance
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_journal_leaves_balances_untouched() {
    let ledger = setup().await;

    let (journal, entries) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    assert!(journal.is_draft());
    assert_eq!(journal.doc_no.as_deref(), Some("JNL-000001"));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].line_no, 1);
    assert_eq!(entries[1].line_no, 2);
    assert_eq!(entries[0].amount_dc, dec!(100.00));
    assert_eq!(entries[1].amount_dc, dec!(-100.00));

    assert_eq!(balance_of(&ledger.store, ledger.cash).await, Decimal::ZERO);
    assert_eq!(balance_of(&ledger.store, ledger.revenue).await, Decimal::ZERO);
}

#[tokio::test]
async fn test_create_rejects_single_line() {
    let ledger = setup().await;

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![LineInput::new(ledger.cash, dec!(100.00))],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::InsufficientLines)));
}

#[tokio::test]
async fn test_create_rejects_zero_amount_line() {
    let ledger = setup().await;

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![
                LineInput::new(ledger.cash, dec!(100.00)),
                LineInput::new(ledger.revenue, Decimal::ZERO),
                LineInput::new(ledger.revenue, dec!(-100.00)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::ZeroAmount { line: 2 })));
}

#[tokio::test]
async fn test_create_rejects_unbalanced_lines_reporting_sum() {
    let ledger = setup().await;

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![
                LineInput::new(ledger.cash, dec!(100.00)),
                LineInput::new(ledger.revenue, dec!(-99.00)),
            ],
        ))
        .await;

    match result {
        Err(LedgerError::Unbalanced { sum }) => assert_eq!(sum, dec!(1.00)),
        other => panic!("expected Unbalanced, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_rejects_unknown_account() {
    let ledger = setup().await;
    let ghost = AccountId::new();

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![
                LineInput::new(ghost, dec!(100.00)),
                LineInput::new(ledger.revenue, dec!(-100.00)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::UnknownAccount(id)) if id == ghost));
}

#[tokio::test]
async fn test_create_rejects_account_from_another_book() {
    let ledger = setup().await;
    let other_book = BookId::new();
    let foreign_cash =
        register_account(&ledger.registry, other_book, "1000", "Cash", AccountType::CurrentAsset)
            .await;

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![
                LineInput::new(foreign_cash, dec!(100.00)),
                LineInput::new(ledger.revenue, dec!(-100.00)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::UnknownAccount(id)) if id == foreign_cash));
}

#[tokio::test]
async fn test_create_rejects_inactive_account() {
    let ledger = setup().await;
    ledger
        .registry
        .deactivate(ledger.book_id, ledger.cash)
        .await
        .expect("deactivate cash");

    let result = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await;

    assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == ledger.cash));
}

#[tokio::test]
async fn test_create_rejects_non_postable_account() {
    let ledger = setup().await;
    let header = ledger
        .registry
        .register(NewAccount {
            book_id: ledger.book_id,
            code: "1999".to_string(),
            name: "Assets (header)".to_string(),
            kind: AccountType::Asset,
            parent_id: None,
            is_postable: false,
        })
        .await
        .expect("register header account");

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![
                LineInput::new(header.id, dec!(100.00)),
                LineInput::new(ledger.revenue, dec!(-100.00)),
            ],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::AccountNotPostable(id)) if id == header.id));
}

#[tokio::test]
async fn test_create_rejects_non_positive_fx_rate() {
    let ledger = setup().await;
    let mut bad_line = LineInput::new(ledger.cash, dec!(100.00));
    bad_line.amount_txn = Some(dec!(90.00));
    bad_line.fx_rate = Some(Decimal::ZERO);

    let result = ledger
        .engine
        .create_journal(journal_input(
            &ledger,
            vec![bad_line, LineInput::new(ledger.revenue, dec!(-100.00))],
        ))
        .await;

    assert!(matches!(result, Err(LedgerError::InvalidFxRate { line: 1 })));
}

#[tokio::test]
async fn test_doc_numbers_run_sequentially_per_book() {
    let ledger = setup().await;

    let mut first = journal_input(&ledger, cash_sale_lines(&ledger, dec!(10.00)));
    first.doc_type = DocType::Invoice;
    let (first, _) = ledger.engine.create_journal(first).await.expect("create first");
    let (second, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(20.00))))
        .await
        .expect("create second");

    assert_eq!(first.doc_no.as_deref(), Some("INV-000001"));
    assert_eq!(second.doc_no.as_deref(), Some("JNL-000002"));
}

// ============================================================================
// Posting
// ============================================================================

#[tokio::test]
async fn test_post_journal_applies_balance_deltas() {
    let ledger = setup().await;
    let (journal, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    let (posted, entries) = ledger
        .engine
        .post_journal(journal.id, ledger.user_id)
        .await
        .expect("post journal");

    assert!(posted.is_posted());
    assert_eq!(posted.posted_by(), Some(ledger.user_id));
    assert_eq!(entries.len(), 2);
    assert_eq!(balance_of(&ledger.store, ledger.cash).await, dec!(100.00));
    assert_eq!(balance_of(&ledger.store, ledger.revenue).await, dec!(-100.00));
}

#[tokio::test]
async fn test_post_missing_journal_fails() {
    let ledger = setup().await;
    let ghost = JournalId::new();

    let result = ledger.engine.post_journal(ghost, ledger.user_id).await;

    assert!(matches!(result, Err(LedgerError::NotFound(id)) if id == ghost));
}

#[tokio::test]
async fn test_post_twice_is_rejected_without_double_counting() {
    let ledger = setup().await;
    let (journal, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    ledger
        .engine
        .post_journal(journal.id, ledger.user_id)
        .await
        .expect("first post");
    let second = ledger.engine.post_journal(journal.id, ledger.user_id).await;

    assert!(matches!(second, Err(LedgerError::AlreadyPosted(id)) if id == journal.id));
    assert_eq!(balance_of(&ledger.store, ledger.cash).await, dec!(100.00));
    assert_eq!(balance_of(&ledger.store, ledger.revenue).await, dec!(-100.00));
}

#[tokio::test]
async fn test_post_revalidates_account_state() {
    let ledger = setup().await;
    let (journal, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    // Account state changed between creation and posting.
    ledger
        .registry
        .deactivate(ledger.book_id, ledger.cash)
        .await
        .expect("deactivate cash");

    let result = ledger.engine.post_journal(journal.id, ledger.user_id).await;

    assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == ledger.cash));
    assert_eq!(balance_of(&ledger.store, ledger.cash).await, Decimal::ZERO);
    assert_eq!(balance_of(&ledger.store, ledger.revenue).await, Decimal::ZERO);
}

// ============================================================================
// Reversal
// ============================================================================

#[tokio::test]
async fn test_reverse_journal_cancels_the_original_exactly() {
    let ledger = setup().await;
    let mut input = journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00)));
    input.lines[0].description = Some("Cash received".to_string());
    let (journal, _) = ledger.engine.create_journal(input).await.expect("create journal");
    let (posted, _) = ledger
        .engine
        .post_journal(journal.id, ledger.user_id)
        .await
        .expect("post journal");
    let original_posted_at = posted.posted_at().expect("posted timestamp");

    let (reversal, entries) = ledger
        .engine
        .reverse_journal(posted.id, "Duplicate entry", ledger.user_id)
        .await
        .expect("reverse journal");

    assert!(reversal.is_posted());
    assert_eq!(reversal.doc_type, DocType::Adjustment);
    assert_eq!(reversal.doc_no.as_deref(), Some("REV-000001"));
    assert_eq!(reversal.reversal_of, Some(posted.id));
    assert!(
        reversal
            .narration
            .as_deref()
            .expect("narration")
            .contains("Duplicate entry")
    );
    assert_eq!(entries[0].amount_dc, dec!(-100.00));
    assert_eq!(entries[1].amount_dc, dec!(100.00));
    assert_eq!(entries[0].description.as_deref(), Some("Reversal: Cash received"));

    assert_eq!(balance_of(&ledger.store, ledger.cash).await, Decimal::ZERO);
    assert_eq!(balance_of(&ledger.store, ledger.revenue).await, Decimal::ZERO);

    // The original journal is untouched.
    let (original, _) = ledger.engine.journal(posted.id).await.expect("fetch original");
    assert!(original.is_posted());
    assert_eq!(original.posted_at(), Some(original_posted_at));
    assert_eq!(original.reversal_of, None);
}

#[tokio::test]
async fn test_reverse_flips_transaction_currency_amounts() {
    let ledger = setup().await;
    let mut input = journal_input(&ledger, cash_sale_lines(&ledger, dec!(110.00)));
    input.lines[0].amount_txn = Some(dec!(100.00));
    input.lines[0].fx_rate = Some(dec!(1.10));
    let (journal, _) = ledger.engine.create_journal(input).await.expect("create journal");
    ledger
        .engine
        .post_journal(journal.id, ledger.user_id)
        .await
        .expect("post journal");

    let (_, entries) = ledger
        .engine
        .reverse_journal(journal.id, "FX correction", ledger.user_id)
        .await
        .expect("reverse journal");

    assert_eq!(entries[0].amount_dc, dec!(-110.00));
    assert_eq!(entries[0].amount_txn, Some(dec!(-100.00)));
    assert_eq!(entries[0].fx_rate, Some(dec!(1.10)));
}

#[tokio::test]
async fn test_reverse_requires_a_posted_journal() {
    let ledger = setup().await;
    let (draft, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    let result = ledger
        .engine
        .reverse_journal(draft.id, "Too early", ledger.user_id)
        .await;
    assert!(matches!(result, Err(LedgerError::NotPosted(id)) if id == draft.id));

    let ghost = JournalId::new();
    let result = ledger.engine.reverse_journal(ghost, "Missing", ledger.user_id).await;
    assert!(matches!(result, Err(LedgerError::NotFound(id)) if id == ghost));
}

// ============================================================================
// Draft maintenance
// ============================================================================

#[tokio::test]
async fn test_update_draft_replaces_lines_and_revalidates() {
    let ledger = setup().await;
    let (draft, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    let unbalanced = UpdateJournalInput {
        lines: Some(vec![
            LineInput::new(ledger.cash, dec!(200.00)),
            LineInput::new(ledger.revenue, dec!(-100.00)),
        ]),
        ..UpdateJournalInput::default()
    };
    let result = ledger.engine.update_draft(draft.id, unbalanced).await;
    assert!(matches!(result, Err(LedgerError::Unbalanced { .. })));

    let (updated, entries) = ledger
        .engine
        .update_draft(
            draft.id,
            UpdateJournalInput {
                narration: Some(Some("Corrected".to_string())),
                lines: Some(cash_sale_lines(&ledger, dec!(200.00))),
                ..UpdateJournalInput::default()
            },
        )
        .await
        .expect("update draft");

    assert_eq!(updated.narration.as_deref(), Some("Corrected"));
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].line_no, 1);
    assert_eq!(entries[0].amount_dc, dec!(200.00));

    ledger
        .engine
        .post_journal(draft.id, ledger.user_id)
        .await
        .expect("post updated journal");
    assert_eq!(balance_of(&ledger.store, ledger.cash).await, dec!(200.00));
}

#[tokio::test]
async fn test_posted_journals_cannot_be_edited_or_deleted() {
    let ledger = setup().await;
    let (journal, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");
    ledger
        .engine
        .post_journal(journal.id, ledger.user_id)
        .await
        .expect("post journal");

    let update = ledger
        .engine
        .update_draft(journal.id, UpdateJournalInput::default())
        .await;
    assert!(matches!(update, Err(LedgerError::AlreadyPosted(id)) if id == journal.id));

    let delete = ledger.engine.delete_draft(journal.id).await;
    assert!(matches!(delete, Err(LedgerError::AlreadyPosted(id)) if id == journal.id));
}

#[tokio::test]
async fn test_delete_draft_removes_journal_and_entries() {
    let ledger = setup().await;
    let (draft, _) = ledger
        .engine
        .create_journal(journal_input(&ledger, cash_sale_lines(&ledger, dec!(100.00))))
        .await
        .expect("create journal");

    ledger.engine.delete_draft(draft.id).await.expect("delete draft");

    let result = ledger.engine.journal(draft.id).await;
    assert!(matches!(result, Err(LedgerError::NotFound(id)) if id == draft.id));
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_journals_list_filters_and_orders_by_doc_date() {
    let ledger = setup().await;

    let mut march = journal_input(&ledger, cash_sale_lines(&ledger, dec!(10.00)));
    march.doc_date = day(2025, 3, 1);
    let (march, _) = ledger.engine.create_journal(march).await.expect("create march");

    let mut january = journal_input(&ledger, cash_sale_lines(&ledger, dec!(20.00)));
    january.doc_date = day(2025, 1, 15);
    january.doc_type = DocType::Payment;
    let (january, _) = ledger.engine.create_journal(january).await.expect("create january");

    ledger
        .engine
        .post_journal(march.id, ledger.user_id)
        .await
        .expect("post march");

    let all = ledger
        .engine
        .journals(ledger.book_id, JournalFilter::default())
        .await
        .expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, march.id);
    assert_eq!(all[1].id, january.id);

    let drafts = ledger
        .engine
        .journals(
            ledger.book_id,
            JournalFilter {
                status: Some(JournalStatus::Draft),
                ..JournalFilter::default()
            },
        )
        .await
        .expect("list drafts");
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, january.id);

    let payments = ledger
        .engine
        .journals(
            ledger.book_id,
            JournalFilter {
                doc_type: Some(DocType::Payment),
                ..JournalFilter::default()
            },
        )
        .await
        .expect("list payments");
    assert_eq!(payments.len(), 1);

    let february_on = ledger
        .engine
        .journals(
            ledger.book_id,
            JournalFilter {
                date_from: Some(day(2025, 2, 1)),
                ..JournalFilter::default()
            },
        )
        .await
        .expect("list from february");
    assert_eq!(february_on.len(), 1);
    assert_eq!(february_on[0].id, march.id);
}
