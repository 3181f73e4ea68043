//! Ledger properties over the in-memory store: conservation, non-negativity,
//! audit completeness and concurrency safety.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use ledger_engine::{
    AccountId, AuthenticatedUser, InMemoryLedgerRepository, LedgerError, LedgerRepository,
    PositiveAmount, Role, TransferCommand, TransferEngine,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn user(id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: id,
        role: Role::User,
    }
}

fn cmd(from: AccountId, to: AccountId, amount: &str) -> TransferCommand {
    TransferCommand {
        from_account_id: from,
        to_account_id: to,
        amount: dec(amount),
    }
}

// ============================================================================
// Example scenarios
// ============================================================================

#[tokio::test]
async fn scenario_owner_transfer_moves_funds() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("100.00")).await.unwrap();
    let b = repo.open_account(2, dec("10.00")).await.unwrap();
    let engine = TransferEngine::new(repo.clone());

    let entry = engine
        .transfer_funds(&user(1), cmd(a.id, b.id, "40.00"))
        .await
        .unwrap();

    assert_eq!(repo.get_account(a.id).await.unwrap().balance, dec("60.00"));
    assert_eq!(repo.get_account(b.id).await.unwrap().balance, dec("50.00"));
    assert_eq!(
        (entry.from_account_id, entry.to_account_id, entry.amount),
        (a.id, b.id, dec("40.00"))
    );
    assert_eq!(repo.all_transactions().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_insufficient_funds_has_no_effect() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("10.00")).await.unwrap();
    let b = repo.open_account(2, dec("0")).await.unwrap();
    let engine = TransferEngine::new(repo.clone());

    let result = engine
        .transfer_funds(&user(1), cmd(a.id, b.id, "40.00"))
        .await;

    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    assert_eq!(repo.get_account(a.id).await.unwrap().balance, dec("10.00"));
    assert_eq!(repo.get_account(b.id).await.unwrap().balance, Decimal::ZERO);
    assert!(repo.all_transactions().unwrap().is_empty());
}

#[tokio::test]
async fn scenario_other_users_account_is_denied() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("100.00")).await.unwrap();
    let b = repo.open_account(2, dec("0")).await.unwrap();
    let engine = TransferEngine::new(repo.clone());

    let result = engine.transfer_funds(&user(2), cmd(a.id, b.id, "5")).await;

    assert_eq!(result, Err(LedgerError::PermissionDenied));
    assert_eq!(repo.total_balance().unwrap(), dec("100.00"));
}

#[tokio::test]
async fn scenario_missing_destination_leaves_source_unchanged() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("100.00")).await.unwrap();
    let engine = TransferEngine::new(repo.clone());

    let result = engine.transfer_funds(&user(1), cmd(a.id, 999, "5")).await;

    assert_eq!(result, Err(LedgerError::AccountNotFound(999)));
    assert_eq!(repo.get_account(a.id).await.unwrap().balance, dec("100.00"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_drains_allow_exactly_one_winner() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("100")).await.unwrap();
    let b = repo.open_account(2, dec("0")).await.unwrap();
    let engine = Arc::new(TransferEngine::new(repo.clone()));
    let (from, to) = (a.id, b.id);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.transfer_funds(&user(1), cmd(from, to, "100")).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert_eq!(e, LedgerError::InsufficientFunds),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(repo.get_account(a.id).await.unwrap().balance, Decimal::ZERO);
    assert_eq!(repo.get_account(b.id).await.unwrap().balance, dec("100"));
    assert_eq!(repo.all_transactions().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_direction_transfers_complete() {
    let repo = Arc::new(InMemoryLedgerRepository::new());
    let a = repo.open_account(1, dec("500")).await.unwrap();
    let b = repo.open_account(1, dec("500")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..200 {
        let repo = repo.clone();
        let (from, to) = if i % 2 == 0 { (a.id, b.id) } else { (b.id, a.id) };
        handles.push(tokio::spawn(async move {
            repo.transfer(from, to, PositiveAmount::parse("1").unwrap())
                .await
        }));
    }
    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().is_ok());
    }

    assert_eq!(repo.total_balance().unwrap(), dec("1000"));
    assert_eq!(repo.get_account(a.id).await.unwrap().balance, dec("500"));
    assert_eq!(repo.all_transactions().unwrap().len(), 200);
}

// ============================================================================
// Conservation property
// ============================================================================

fn run_transfers(
    initial: &[i64],
    ops: &[(usize, usize, i64)],
) -> Result<(), TestCaseError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    rt.block_on(async {
        let repo = InMemoryLedgerRepository::new();
        let mut ids = Vec::new();
        let mut initial_by_id = HashMap::new();
        for (owner, cents) in initial.iter().enumerate() {
            let balance = Decimal::new(*cents, 2);
            let account = repo.open_account(owner as i64, balance).await.unwrap();
            initial_by_id.insert(account.id, balance);
            ids.push(account.id);
        }
        let total_before = repo.total_balance().unwrap();

        let mut committed = 0;
        for (from, to, cents) in ops {
            let (from, to) = (ids[from % ids.len()], ids[to % ids.len()]);
            let amount = PositiveAmount::new(Decimal::new(*cents, 2)).unwrap();
            match repo.transfer(from, to, amount).await {
                Ok(_) => committed += 1,
                Err(LedgerError::InsufficientFunds) | Err(LedgerError::Validation(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        // Conservation
        prop_assert_eq!(repo.total_balance().unwrap(), total_before);

        // Audit completeness: replaying the log from the opening balances
        // reproduces every current balance
        let log = repo.all_transactions().unwrap();
        prop_assert_eq!(log.len(), committed);
        let mut replayed = initial_by_id.clone();
        for entry in &log {
            prop_assert!(entry.amount > Decimal::ZERO);
            *replayed.entry(entry.from_account_id).or_default() -= entry.amount;
            *replayed.entry(entry.to_account_id).or_default() += entry.amount;
        }
        for id in &ids {
            let balance = repo.get_account(*id).await.unwrap().balance;
            prop_assert!(balance >= Decimal::ZERO);
            prop_assert_eq!(Some(&balance), replayed.get(id));
        }
        Ok::<(), TestCaseError>(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transfers_conserve_value_and_never_overdraw(
        initial in prop::collection::vec(0i64..10_000, 2..6),
        ops in prop::collection::vec((0usize..6, 0usize..6, 1i64..5_000), 0..40),
    ) {
        run_transfers(&initial, &ops)?;
    }
}
