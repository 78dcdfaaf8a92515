#![allow(non_snake_case)]

use housebook_contract::{
    CallContext,
    Multiplier,
    SettlementContract,
    sled_ledger_store::SledLedgerStore,
    test_helpers::{
        RecordingTransferSink,
        alice,
        oracle,
        owner,
    },
};
use resolver::{
    client::ResolverClient,
    in_process_transport::InProcessTransport,
    transport::ResolveCall,
};
use std::sync::{
    Arc,
    Mutex,
};
use tempdir::TempDir;
use url::Url;

fn local_endpoints() -> Vec<Url> {
    vec![Url::parse("local://in-process").unwrap()]
}

fn sled_contract(temp_dir: &TempDir) -> SettlementContract<SledLedgerStore> {
    let store = SledLedgerStore::open(temp_dir.path()).unwrap();
    SettlementContract::new(store, owner(), oracle()).unwrap()
}

fn win_call(multiplier_hundredths: u32) -> ResolveCall {
    ResolveCall {
        game_id: "mines-1".to_string(),
        account: alice(),
        won: true,
        multiplier: Multiplier::from_hundredths(multiplier_hundredths),
    }
}

#[tokio::test]
async fn full_round__open_resolve_withdraw() {
    // given
    let temp_dir = TempDir::new("settlement_flow").unwrap();
    let mut contract = sled_contract(&temp_dir);
    contract
        .open_bet(
            &CallContext::with_deposit(alice(), 1_000_000, 10),
            "mines-1",
        )
        .unwrap();
    let contract = Arc::new(Mutex::new(contract));
    let client = ResolverClient::new(
        InProcessTransport::new(contract.clone(), oracle()),
        local_endpoints(),
    );

    // when
    let response = client.resolve_game(&win_call(250)).await;

    // then
    assert!(response.success, "resolve failed: {}", response.message);
    assert!(response.transaction_hash.is_some());
    {
        let contract = contract.lock().unwrap();
        let stats = contract.user_stats(&alice()).unwrap().unwrap();
        assert_eq!(stats.total_bet, 1_000_000);
        assert_eq!(stats.total_won, 2_500_000);
        assert_eq!(stats.withdrawable_balance, 2_500_000);
        assert!(contract.pending_bet(&alice()).unwrap().is_none());
    }

    // when
    let mut sink = RecordingTransferSink::default();
    contract
        .lock()
        .unwrap()
        .withdraw(&CallContext::new(alice(), 11), &mut sink)
        .unwrap();

    // then
    assert_eq!(sink.transfers, vec![(alice(), 2_500_000)]);
    let contract = contract.lock().unwrap();
    let stats = contract.user_stats(&alice()).unwrap().unwrap();
    assert_eq!(stats.withdrawable_balance, 0);
}

#[tokio::test]
async fn lost_round__forfeits_escrow_to_house() {
    // given
    let temp_dir = TempDir::new("settlement_flow_loss").unwrap();
    let mut contract = sled_contract(&temp_dir);
    contract
        .open_bet(&CallContext::with_deposit(alice(), 4_000, 10), "crash-7")
        .unwrap();
    let contract = Arc::new(Mutex::new(contract));
    let client = ResolverClient::new(
        InProcessTransport::new(contract.clone(), oracle()),
        local_endpoints(),
    );

    // when
    let response = client
        .resolve_game(&ResolveCall {
            game_id: "crash-7".to_string(),
            account: alice(),
            won: false,
            multiplier: Multiplier::from_hundredths(0),
        })
        .await;

    // then
    assert!(response.success);
    let contract = contract.lock().unwrap();
    assert_eq!(contract.contract_total_losses().unwrap(), 4_000);
    let stats = contract.user_stats(&alice()).unwrap().unwrap();
    assert_eq!(stats.total_lost, 4_000);
    assert_eq!(stats.withdrawable_balance, 0);
}

#[tokio::test]
async fn duplicate_resolve__is_benign_for_the_client() {
    // given
    let temp_dir = TempDir::new("settlement_flow_dup").unwrap();
    let mut contract = sled_contract(&temp_dir);
    contract
        .open_bet(&CallContext::with_deposit(alice(), 1_000, 10), "mines-1")
        .unwrap();
    let contract = Arc::new(Mutex::new(contract));
    let client = ResolverClient::new(
        InProcessTransport::new(contract.clone(), oracle()),
        local_endpoints(),
    );

    // when
    let first = client.resolve_game(&win_call(200)).await;
    let second = client.resolve_game(&win_call(200)).await;

    // then: the retry lands on an already-settled bet and must not
    // double-apply or be reported as an error
    assert!(first.success);
    assert!(second.success);
    assert!(second.transaction_hash.is_none());
    let contract = contract.lock().unwrap();
    let stats = contract.user_stats(&alice()).unwrap().unwrap();
    assert_eq!(stats.total_won, 2_000);
}

#[tokio::test]
async fn ledger__survives_process_restart() {
    // given
    let temp_dir = TempDir::new("settlement_flow_restart").unwrap();
    {
        let mut contract = sled_contract(&temp_dir);
        contract
            .open_bet(&CallContext::with_deposit(alice(), 1_000, 10), "mines-1")
            .unwrap();
        contract
            .resolve_for(
                &CallContext::new(oracle(), 11),
                &alice(),
                housebook_contract::Outcome::Won(Multiplier::from_hundredths(
                    150,
                )),
            )
            .unwrap();
    }

    // when: a fresh contract over the same database
    let contract = sled_contract(&temp_dir);

    // then
    let stats = contract.user_stats(&alice()).unwrap().unwrap();
    assert_eq!(stats.total_won, 1_500);
    assert_eq!(stats.withdrawable_balance, 1_500);
    assert_eq!(contract.oracle_account().unwrap(), oracle());
}
