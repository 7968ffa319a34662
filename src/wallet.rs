use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::types::{
    null_as_default, path_data, require_id, to_body, Consumer, JsonObject, Money, ProcessIdent,
    ProcessReply,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Wallet {
    #[serde(flatten)]
    pub ident: ProcessIdent,
    #[serde(deserialize_with = "null_as_default")]
    pub owners: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub balance: Money,
}

/// Entry of a wallet or user transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Transaction {
    #[serde(flatten)]
    pub reply: ProcessReply,
    #[serde(deserialize_with = "null_as_default")]
    pub author_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_funds: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_funds: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub fees: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_wallet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_wallet_id: String,
    /// PAYIN, PAYOUT or TRANSFER.
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub transaction_type: String,
    /// REGULAR, REFUND or REPUDIATION.
    #[serde(deserialize_with = "null_as_default")]
    pub nature: String,
}

impl MangoPay {
    /// Wallet owned by `owners`, not yet created on MangoPay.
    pub fn new_wallet(
        &self,
        owners: &[&dyn Consumer],
        currency: &str,
        description: &str,
    ) -> Result<Wallet> {
        if owners.is_empty() {
            return Err(Error::EmptyId("new wallet: no owner"));
        }
        let owners = owners
            .iter()
            .map(|o| require_id(*o, "new wallet").map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        Ok(Wallet {
            owners,
            currency: currency.to_string(),
            description: description.to_string(),
            ..Default::default()
        })
    }

    pub fn wallet(&self, id: &str) -> Result<Wallet> {
        self.request(Action::FetchWallet, path_data(&[("Id", id)]))
    }

    pub async fn async_wallet(&self, id: &str) -> Result<Wallet> {
        self.async_request(Action::FetchWallet, path_data(&[("Id", id)]))
            .await
    }

    pub fn wallet_transactions(&self, wallet_id: &str) -> Result<Vec<Transaction>> {
        self.list(Action::FetchWalletTransactions, path_data(&[("Id", wallet_id)]))
    }

    pub async fn async_wallet_transactions(&self, wallet_id: &str) -> Result<Vec<Transaction>> {
        self.async_list(Action::FetchWalletTransactions, path_data(&[("Id", wallet_id)]))
            .await
    }
}

impl Wallet {
    /// Creates the wallet, or updates its description and tag once created.
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let (action, data) = self.save_request()?;
        *self = mango.request(action, data)?;
        Ok(())
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let (action, data) = self.save_request()?;
        *self = mango.async_request(action, data).await?;
        Ok(())
    }

    pub fn transactions(&self, mango: &MangoPay) -> Result<Vec<Transaction>> {
        mango.wallet_transactions(&self.ident.id)
    }

    pub async fn async_transactions(&self, mango: &MangoPay) -> Result<Vec<Transaction>> {
        mango.async_wallet_transactions(&self.ident.id).await
    }

    fn save_request(&self) -> Result<(Action, JsonObject)> {
        if self.ident.id.is_empty() {
            let data = to_body(self, &["Id", "CreationDate", "Balance"])?;
            return Ok((Action::CreateWallet, data));
        }
        let mut data = JsonObject::new();
        data.insert("Id".into(), self.ident.id.clone().into());
        data.insert("Description".into(), self.description.clone().into());
        data.insert("Tag".into(), self.ident.tag.clone().into());
        Ok((Action::EditWallet, data))
    }
}
