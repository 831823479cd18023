//! End-to-end settlement scenarios against the in-memory store.

use std::sync::Arc;
use std::thread;

use vesta_ledger::BalanceChange;
use vesta_staking::StakingError;
use vesta_store::MemoryStore;
use vesta_types::{Address, Amount, TxId, WalletId};
use vesta_wallet::{
    FeePolicy, LinearFeePolicy, ManualClock, SettlementConfig, WalletError, WalletService,
    ZeroFeePolicy,
};

const UNBONDING_PERIOD: u64 = 86_400;

fn service_with<F: FeePolicy>(
    fee_policy: F,
) -> (WalletService<MemoryStore, F, ManualClock>, ManualClock) {
    let clock = ManualClock::new(1_000_000, 10);
    let service = WalletService::new(
        MemoryStore::new(),
        fee_policy,
        clock.clone(),
        SettlementConfig {
            unbonding_period_secs: UNBONDING_PERIOD,
        },
    );
    (service, clock)
}

fn setup_wallet<F: FeePolicy>(
    service: &WalletService<MemoryStore, F, ManualClock>,
    name: &str,
    funds: u128,
) -> (WalletId, Address) {
    let wallet = WalletId::new(name);
    let address = Address::Transfer(format!("vst_{name}"));
    service.register_address(&wallet, &address).unwrap();
    if funds > 0 {
        service
            .credit_incoming(
                &wallet,
                &Address::Transfer("vst_faucet".into()),
                Amount::new(funds),
                TxId::digest([name.as_bytes(), b"funding".as_slice()]),
            )
            .unwrap();
    }
    (wallet, address)
}

fn staking_address(tag: u8) -> Address {
    let mut body = String::with_capacity(40);
    for _ in 0..20 {
        body.push_str(&format!("{tag:02x}"));
    }
    format!("0x{body}").parse().unwrap()
}

#[test]
fn send_produces_exactly_two_sender_records() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, _) = setup_wallet(&service, "alice", 10_000);
    let (bob, bob_addr) = setup_wallet(&service, "bob", 0);

    service.send(&alice, &bob_addr, Amount::new(1_000)).unwrap();

    assert_eq!(service.balance(&alice).unwrap(), Amount::new(9_000));
    assert_eq!(service.balance(&bob).unwrap(), Amount::new(1_000));

    // Sender: funding credit, then the two settlement legs.
    let history = service.transactions(&alice).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history[1].balance_change,
        BalanceChange::Outgoing(Amount::new(10_000))
    );
    assert_eq!(history[1].address, bob_addr);
    assert_eq!(
        history[2].balance_change,
        BalanceChange::Incoming(Amount::new(9_000))
    );
    // Both legs settle under one transaction id.
    assert_eq!(history[1].transaction_id, history[2].transaction_id);

    // Receiver: exactly one incoming record for the paid amount.
    let history = service.transactions(&bob).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].balance_change,
        BalanceChange::Incoming(Amount::new(1_000))
    );
}

#[test]
fn send_charges_fee_on_top_of_amount() {
    let (service, _) = service_with(LinearFeePolicy::new(Amount::new(100), Amount::new(10)));
    let (alice, _) = setup_wallet(&service, "alice", 10_000);
    let (bob, bob_addr) = setup_wallet(&service, "bob", 0);

    // One input, two outputs: fee = 100 + 10 * 3 = 130.
    service.send(&alice, &bob_addr, Amount::new(1_000)).unwrap();

    assert_eq!(service.balance(&alice).unwrap(), Amount::new(8_870));
    assert_eq!(service.balance(&bob).unwrap(), Amount::new(1_000));
}

#[test]
fn insufficient_balance_leaves_no_trace() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, _) = setup_wallet(&service, "alice", 500);
    let (bob, bob_addr) = setup_wallet(&service, "bob", 0);

    let err = service.send(&alice, &bob_addr, Amount::new(501)).unwrap_err();
    assert!(matches!(err, WalletError::InsufficientBalance));
    assert_eq!(err.to_string(), "Insufficient balance");

    assert_eq!(service.balance(&alice).unwrap(), Amount::new(500));
    assert_eq!(service.balance(&bob).unwrap(), Amount::ZERO);
    assert_eq!(service.transactions(&alice).unwrap().len(), 1);
    assert!(service.transactions(&bob).unwrap().is_empty());
    assert_eq!(service.unspent_outputs(&alice).unwrap().len(), 1);
}

#[test]
fn send_to_staking_address_bonds_the_amount() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, _) = setup_wallet(&service, "alice", 10_000);
    let staking = staking_address(0xaa);

    service.send(&alice, &staking, Amount::new(4_000)).unwrap();

    assert_eq!(service.balance(&alice).unwrap(), Amount::new(6_000));
    let state = service.staking_state(&staking).unwrap();
    assert_eq!(state.bonded, Amount::new(4_000));
    assert_eq!(state.unbonded, Amount::ZERO);
    assert_eq!(state.nonce, 1);
}

#[test]
fn deposit_stake_bonds_referenced_outputs_minus_fee() {
    let (service, _) = service_with(LinearFeePolicy::new(Amount::new(50), Amount::new(10)));
    let (alice, _) = setup_wallet(&service, "alice", 3_000);
    let staking = staking_address(0xbb);

    let outputs = service.unspent_outputs(&alice).unwrap();
    let refs: Vec<(TxId, u32)> = outputs.iter().map(|o| (o.id, o.index)).collect();
    service.deposit_stake(&alice, &staking, &refs).unwrap();

    // One input, zero outputs: fee = 50 + 10 * 1 = 60.
    assert_eq!(service.balance(&alice).unwrap(), Amount::ZERO);
    let state = service.staking_state(&staking).unwrap();
    assert_eq!(state.bonded, Amount::new(2_940));
    assert!(service.unspent_outputs(&alice).unwrap().is_empty());
}

#[test]
fn deposit_stake_rejects_spent_reference() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, _) = setup_wallet(&service, "alice", 3_000);
    let staking = staking_address(0xbb);

    let outputs = service.unspent_outputs(&alice).unwrap();
    let refs: Vec<(TxId, u32)> = outputs.iter().map(|o| (o.id, o.index)).collect();
    service.deposit_stake(&alice, &staking, &refs).unwrap();

    let err = service.deposit_stake(&alice, &staking, &refs).unwrap_err();
    assert!(matches!(err, WalletError::InvalidInput(_)));
    // The failed deposit changed nothing.
    assert_eq!(
        service.staking_state(&staking).unwrap().bonded,
        Amount::new(3_000)
    );
}

#[test]
fn staking_round_trip_bond_unbond_withdraw() {
    let (service, clock) = service_with(ZeroFeePolicy);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 10_000);
    let staking = staking_address(0xcc);

    service.send(&alice, &staking, Amount::new(5_000)).unwrap();
    service
        .unbond_stake(&alice, &staking, Amount::new(2_000))
        .unwrap();

    let state = service.staking_state(&staking).unwrap();
    assert_eq!(state.bonded, Amount::new(3_000));
    assert_eq!(state.unbonded, Amount::new(2_000));
    assert_eq!(state.nonce, 2);

    // Maturity has not been reached yet.
    let err = service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Staking(StakingError::NotMatured { .. })
    ));
    assert_eq!(service.balance(&alice).unwrap(), Amount::new(5_000));

    clock.advance_secs(UNBONDING_PERIOD + 1);
    let withdrawn = service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap();
    assert_eq!(withdrawn, Amount::new(2_000));
    assert_eq!(service.balance(&alice).unwrap(), Amount::new(7_000));

    let state = service.staking_state(&staking).unwrap();
    assert_eq!(state.bonded, Amount::new(3_000));
    assert_eq!(state.unbonded, Amount::ZERO);
    assert_eq!(state.nonce, 3);

    // The credit is a fresh spendable output; it can fund a later send.
    let (bob, bob_addr) = setup_wallet(&service, "bob", 0);
    service.send(&alice, &bob_addr, Amount::new(7_000)).unwrap();
    assert_eq!(service.balance(&bob).unwrap(), Amount::new(7_000));
    assert_eq!(service.balance(&alice).unwrap(), Amount::ZERO);
}

#[test]
fn repeated_unbond_restarts_maturity() {
    let (service, clock) = service_with(ZeroFeePolicy);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 10_000);
    let staking = staking_address(0xdd);

    service.send(&alice, &staking, Amount::new(6_000)).unwrap();
    service
        .unbond_stake(&alice, &staking, Amount::new(1_000))
        .unwrap();

    clock.advance_secs(UNBONDING_PERIOD - 10);
    // A second unbond pushes unbonded_from forward for the whole pool.
    service
        .unbond_stake(&alice, &staking, Amount::new(1_000))
        .unwrap();

    clock.advance_secs(100);
    let err = service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Staking(StakingError::NotMatured { .. })
    ));

    clock.advance_secs(UNBONDING_PERIOD);
    let withdrawn = service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap();
    assert_eq!(withdrawn, Amount::new(2_000));
}

#[test]
fn withdraw_with_nothing_unbonded_is_a_noop() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 1_000);
    let staking = staking_address(0xee);

    service.send(&alice, &staking, Amount::new(500)).unwrap();
    let before = service.staking_state(&staking).unwrap();

    let withdrawn = service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap();
    assert_eq!(withdrawn, Amount::ZERO);

    // No-op: nonce and balances are untouched.
    let after = service.staking_state(&staking).unwrap();
    assert_eq!(after.nonce, before.nonce);
    assert_eq!(service.balance(&alice).unwrap(), Amount::new(500));
}

#[test]
fn unbond_more_than_bonded_is_rejected() {
    let (service, _) = service_with(ZeroFeePolicy);
    let (alice, _) = setup_wallet(&service, "alice", 1_000);
    let staking = staking_address(0xef);

    service.send(&alice, &staking, Amount::new(400)).unwrap();
    let err = service
        .unbond_stake(&alice, &staking, Amount::new(401))
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Staking(StakingError::InsufficientBondedAmount { .. })
    ));
    assert_eq!(
        service.staking_state(&staking).unwrap().bonded,
        Amount::new(400)
    );
}

#[test]
fn nonce_increments_once_per_mutating_operation() {
    let (service, clock) = service_with(ZeroFeePolicy);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 10_000);
    let staking = staking_address(0xf0);

    service.send(&alice, &staking, Amount::new(1_000)).unwrap();
    assert_eq!(service.staking_state(&staking).unwrap().nonce, 1);

    service.send(&alice, &staking, Amount::new(1_000)).unwrap();
    assert_eq!(service.staking_state(&staking).unwrap().nonce, 2);

    service
        .unbond_stake(&alice, &staking, Amount::new(500))
        .unwrap();
    assert_eq!(service.staking_state(&staking).unwrap().nonce, 3);

    clock.advance_secs(UNBONDING_PERIOD + 1);
    service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap();
    assert_eq!(service.staking_state(&staking).unwrap().nonce, 4);
}

#[test]
fn balance_always_equals_history_sum() {
    let (service, clock) = service_with(ZeroFeePolicy);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 50_000);
    let (bob, bob_addr) = setup_wallet(&service, "bob", 0);
    let staking = staking_address(0xf1);

    service.send(&alice, &bob_addr, Amount::new(12_000)).unwrap();
    service.send(&bob, &alice_addr, Amount::new(3_000)).unwrap();
    service.send(&alice, &staking, Amount::new(9_000)).unwrap();
    service
        .unbond_stake(&alice, &staking, Amount::new(9_000))
        .unwrap();
    clock.advance_secs(UNBONDING_PERIOD + 1);
    service
        .withdraw_unbonded(&alice, &staking, &alice_addr)
        .unwrap();

    for wallet in [&alice, &bob] {
        let mut replayed = Amount::ZERO;
        for record in service.transactions(wallet).unwrap() {
            replayed = record.balance_change.apply_to(replayed).unwrap();
        }
        assert_eq!(service.balance(wallet).unwrap(), replayed);
    }
    assert_eq!(service.balance(&alice).unwrap(), Amount::new(41_000));
    assert_eq!(service.balance(&bob).unwrap(), Amount::new(9_000));
}

#[test]
fn concurrent_sends_conserve_total_value() {
    let (service, _) = service_with(ZeroFeePolicy);
    let service = Arc::new(service);
    let (alice, alice_addr) = setup_wallet(&service, "alice", 100_000);
    let (bob, bob_addr) = setup_wallet(&service, "bob", 100_000);

    let mut threads = Vec::new();
    for i in 0..8 {
        let service = Arc::clone(&service);
        let alice = alice.clone();
        let bob = bob.clone();
        let alice_addr = alice_addr.clone();
        let bob_addr = bob_addr.clone();
        threads.push(thread::spawn(move || {
            for _ in 0..20 {
                if i % 2 == 0 {
                    service.send(&alice, &bob_addr, Amount::new(10)).unwrap();
                } else {
                    service.send(&bob, &alice_addr, Amount::new(10)).unwrap();
                }
            }
        }));
    }
    for t in threads {
        t.join().unwrap();
    }

    let alice_balance = service.balance(&alice).unwrap();
    let bob_balance = service.balance(&bob).unwrap();
    assert_eq!(
        alice_balance.checked_add(bob_balance),
        Some(Amount::new(200_000))
    );
    // 4 threads moved 200 each way; the flows cancel out.
    assert_eq!(alice_balance, Amount::new(100_000));
}
