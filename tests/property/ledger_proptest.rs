//! Property tests for the credit ledger
//!
//! Random purchase sequences against a fresh store must conserve the total
//! balance, never overdraw, and charge each tier at most once per buyer.

use std::collections::HashSet;

use boosty::backend::error::BackendError;
use proptest::prelude::*;

use crate::common::{balance, create_test_tier, create_test_user, TestDatabase};

#[derive(Debug, Clone)]
struct Scenario {
    balances: Vec<i64>,
    prices: Vec<i64>,
    attempts: Vec<(usize, usize)>,
}

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (
        prop::collection::vec(0i64..200, 2..4),
        prop::collection::vec(0i64..120, 1..4),
    )
        .prop_flat_map(|(balances, prices)| {
            let accounts = balances.len();
            let tiers = prices.len();
            let attempts = prop::collection::vec((0..accounts, 0..tiers), 1..12);
            (Just(balances), Just(prices), attempts)
        })
        .prop_map(|(balances, prices, attempts)| Scenario {
            balances,
            prices,
            attempts,
        })
}

async fn run(scenario: Scenario) -> Result<(), TestCaseError> {
    let db = TestDatabase::new().await;
    let state = db.state();

    let mut accounts = Vec::new();
    for (i, credits) in scenario.balances.iter().enumerate() {
        accounts.push(create_test_user(db.pool(), &state.keys, &format!("acct{i}"), *credits).await);
    }
    // Tiers are spread over the accounts, so some purchases are self-purchases
    let mut tiers = Vec::new();
    for (i, price) in scenario.prices.iter().enumerate() {
        let creator = &accounts[i % accounts.len()];
        tiers.push(create_test_tier(db.pool(), creator.id, *price).await);
    }

    let total: i64 = scenario.balances.iter().sum();
    let mut owned = HashSet::new();

    for (buyer, tier) in scenario.attempts {
        let buyer_id = accounts[buyer].id;
        let tier = &tiers[tier];
        let before = balance(db.pool(), buyer_id).await;

        match state.engine.purchase(buyer_id, tier.id).await {
            Ok(profile) => {
                prop_assert!(owned.insert((buyer, tier.id)), "tier charged twice");
                let expected = if tier.creator_id == buyer_id { before } else { before - tier.price };
                prop_assert_eq!(profile.credits, expected);
            }
            Err(BackendError::AlreadyPurchased) => {
                prop_assert!(owned.contains(&(buyer, tier.id)));
            }
            Err(BackendError::InsufficientFunds { balance, price }) => {
                prop_assert_eq!(balance, before);
                prop_assert!(balance < price);
            }
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }

        let mut sum = 0;
        for account in &accounts {
            let credits = balance(db.pool(), account.id).await;
            prop_assert!(credits >= 0);
            sum += credits;
        }
        prop_assert_eq!(sum, total);
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_purchases_conserve_credits(scenario in scenario_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(scenario))?;
    }
}
