//! Transaction fee currencies.

use {
    super::{DOT, NATIVE, STABLE, views},
    crate::{
        domain::{AccountId, AssetId, MockCapMath, fee::AcceptedCurrency},
        infra::MockChainReading,
    },
    maplit::hashmap,
    mockall::predicate::eq,
    std::sync::{Arc, Mutex},
};

#[tokio::test]
async fn native_and_listed_assets_are_accepted() {
    let listed = hashmap! {
        DOT => true,
        STABLE => false,
    };
    let mut chain = MockChainReading::new();
    // Asking the chain about the native asset would panic.
    chain
        .expect_accepted_currency()
        .returning(move |asset| Ok(listed[&asset]));
    let (views, _blocks) = views(chain, MockCapMath::new());

    let ids = [NATIVE, DOT, STABLE];
    assert!(
        views
            .accepted_currencies(&ids)
            .iter()
            .all(|query| query.is_loading)
    );

    let accepted = views
        .load_accepted_currencies(&ids)
        .await
        .into_iter()
        .map(|query| query.value.unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        accepted,
        vec![
            AcceptedCurrency {
                id: NATIVE,
                accepted: true,
            },
            AcceptedCurrency {
                id: DOT,
                accepted: true,
            },
            AcceptedCurrency {
                id: STABLE,
                accepted: false,
            },
        ]
    );
}

#[tokio::test]
async fn account_currency_follows_changes() {
    let alice = AccountId::from("alice");
    let picked: Arc<Mutex<Option<AssetId>>> = Default::default();
    let mut chain = MockChainReading::new();
    chain
        .expect_account_currency()
        .with(eq(alice.clone()))
        .times(2)
        .returning({
            let picked = picked.clone();
            move |_| Ok(*picked.lock().unwrap())
        });
    let (views, _blocks) = views(chain, MockCapMath::new());

    // Accounts that never picked a currency pay with the native asset.
    assert_eq!(views.load_account_currency(&alice).await.value, Some(NATIVE));

    *picked.lock().unwrap() = Some(DOT);
    // Cached until told otherwise.
    assert_eq!(views.account_currency(&alice).value, Some(NATIVE));

    views.currency_changed(&alice);
    let query = views.account_currency(&alice);
    assert!(query.is_stale);
    assert_eq!(views.load_account_currency(&alice).await.value, Some(DOT));
}
