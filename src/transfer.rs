use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::refund::{refund_request, Refund};
use crate::types::{
    null_as_default, path_data, require_id, to_body, Consumer, JsonObject, Money, ProcessReply,
};

/// Wallet to wallet money movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Transfer {
    #[serde(flatten)]
    pub reply: ProcessReply,
    #[serde(deserialize_with = "null_as_default")]
    pub author_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_funds: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub fees: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_wallet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_wallet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub credited_funds: Money,
}

/// Fields not allowed when creating a transfer.
const TRANSFER_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "Status",
    "ResultCode",
    "ResultMessage",
    "ExecutionDate",
    "CreditedFunds",
    "CreditedUserId",
];

impl MangoPay {
    pub fn new_transfer<C: Consumer + ?Sized>(
        &self,
        author: &C,
        amount: Money,
        fees: Money,
        from_wallet_id: &str,
        to_wallet_id: &str,
    ) -> Result<Transfer> {
        let author_id = require_id(author, "new transfer")?;
        Ok(Transfer {
            author_id: author_id.to_string(),
            debited_funds: amount,
            fees,
            debited_wallet_id: from_wallet_id.to_string(),
            credited_wallet_id: to_wallet_id.to_string(),
            ..Default::default()
        })
    }

    pub fn transfer(&self, id: &str) -> Result<Transfer> {
        self.request(Action::FetchTransfer, path_data(&[("Id", id)]))
    }

    pub async fn async_transfer(&self, id: &str) -> Result<Transfer> {
        self.async_request(Action::FetchTransfer, path_data(&[("Id", id)]))
            .await
    }
}

impl Transfer {
    /// Sends the transfer. A transfer rejected by MangoPay (status
    /// `FAILED`) is returned as `Error::TransactionFailed`.
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango.request(Action::CreateTransfer, data)?;
        self.check()
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango.async_request(Action::CreateTransfer, data).await?;
        self.check()
    }

    /// Refunds the whole transfer on behalf of `author`.
    pub fn refund<C: Consumer + ?Sized>(&self, mango: &MangoPay, author: &C) -> Result<Refund> {
        let data = self.refund_request(author)?;
        let refund: Refund = mango.request(Action::CreateTransferRefund, data)?;
        refund.check()
    }

    pub async fn async_refund<C: Consumer + ?Sized>(
        &self,
        mango: &MangoPay,
        author: &C,
    ) -> Result<Refund> {
        let data = self.refund_request(author)?;
        let refund: Refund = mango
            .async_request(Action::CreateTransferRefund, data)
            .await?;
        refund.check()
    }

    fn save_request(&self) -> Result<JsonObject> {
        to_body(self, TRANSFER_READ_ONLY)
    }

    fn refund_request<C: Consumer + ?Sized>(&self, author: &C) -> Result<JsonObject> {
        let author_id = require_id(author, "transfer refund")?;
        refund_request("TransferId", &self.reply.ident.id, author_id, None)
    }

    fn check(&self) -> Result<()> {
        if self.reply.is_failed() {
            return Err(Error::TransactionFailed {
                kind: "transfer",
                id: self.reply.ident.id.clone(),
                message: self.reply.result_message.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::user::LegalUser;

    #[test]
    fn transfer_body_keeps_only_writable_fields() {
        let mango =
            MangoPay::new(Config::new("acme", "secret", Environment::Sandbox)).unwrap();
        let mut author = LegalUser::default();
        author.ident.id = "u1".into();
        let transfer = mango
            .new_transfer(&author, Money::new("EUR", 1000), Money::new("EUR", 10), "w1", "w2")
            .unwrap();
        let body = transfer.save_request().unwrap();
        assert_eq!(body["AuthorId"], "u1");
        assert_eq!(body["DebitedWalletId"], "w1");
        assert_eq!(body["CreditedWalletId"], "w2");
        assert_eq!(body["Fees"]["Amount"], 10);
        for field in TRANSFER_READ_ONLY {
            assert!(!body.contains_key(*field), "{} leaked", field);
        }
    }

    #[test]
    fn empty_author_is_rejected() {
        let mango =
            MangoPay::new(Config::new("acme", "secret", Environment::Sandbox)).unwrap();
        let err = mango
            .new_transfer(&LegalUser::default(), Money::default(), Money::default(), "w1", "w2")
            .unwrap_err();
        assert_eq!(err.to_string(), "new transfer: empty user ID");
    }
}
