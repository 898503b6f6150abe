use {
    super::Views,
    crate::{
        domain::{AccountId, AssetId, fee::AcceptedCurrency},
        infra::Query,
    },
};

impl Views {
    /// Whether each of `ids` can pay transaction fees, in the same order.
    pub fn accepted_currencies(&self, ids: &[AssetId]) -> Vec<Query<AcceptedCurrency>> {
        ids.iter()
            .map(|id| self.accepted_currencies.get(*id))
            .collect()
    }

    pub async fn load_accepted_currencies(&self, ids: &[AssetId]) -> Vec<Query<AcceptedCurrency>> {
        futures::future::join_all(ids.iter().map(|id| self.accepted_currencies.fetch(*id))).await
    }

    /// The asset `account` pays transaction fees with.
    pub fn account_currency(&self, account: &AccountId) -> Query<AssetId> {
        self.account_currencies.get(account.clone())
    }

    pub async fn load_account_currency(&self, account: &AccountId) -> Query<AssetId> {
        self.account_currencies.fetch(account.clone()).await
    }

    /// Has to be called after `account` switched its fee currency so that the
    /// next read picks up the new one.
    pub fn currency_changed(&self, account: &AccountId) {
        tracing::debug!(%account, "fee currency changed");
        self.account_currencies.invalidate(account);
    }
}
