use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::types::{
    null_as_default, path_data, require_id, to_body, Consumer, JsonObject, Money, ProcessReply,
};

/// Bank wire from a wallet to one of the author's bank accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PayOut {
    #[serde(flatten)]
    pub reply: ProcessReply,
    #[serde(deserialize_with = "null_as_default")]
    pub author_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_funds: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub fees: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_wallet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bank_account_id: String,
    /// Reference shown on the bank statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_wire_ref: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_type: String,
}

const PAYOUT_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "Status",
    "ResultCode",
    "ResultMessage",
    "ExecutionDate",
    "PaymentType",
];

impl MangoPay {
    pub fn new_pay_out<C: Consumer + ?Sized>(
        &self,
        author: &C,
        wallet_id: &str,
        bank_account_id: &str,
        amount: Money,
        fees: Money,
    ) -> Result<PayOut> {
        let author_id = require_id(author, "new payOut")?;
        Ok(PayOut {
            author_id: author_id.to_string(),
            debited_wallet_id: wallet_id.to_string(),
            bank_account_id: bank_account_id.to_string(),
            debited_funds: amount,
            fees,
            ..Default::default()
        })
    }

    pub fn pay_out(&self, id: &str) -> Result<PayOut> {
        self.request(Action::FetchPayOut, path_data(&[("Id", id)]))
    }

    pub async fn async_pay_out(&self, id: &str) -> Result<PayOut> {
        self.async_request(Action::FetchPayOut, path_data(&[("Id", id)]))
            .await
    }
}

impl PayOut {
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango.request(Action::CreatePayOut, data)?;
        self.check()
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango.async_request(Action::CreatePayOut, data).await?;
        self.check()
    }

    fn save_request(&self) -> Result<JsonObject> {
        to_body(self, PAYOUT_READ_ONLY)
    }

    fn check(&self) -> Result<()> {
        if self.reply.is_failed() {
            return Err(Error::TransactionFailed {
                kind: "payOut",
                id: self.reply.ident.id.clone(),
                message: self.reply.result_message.clone(),
            });
        }
        Ok(())
    }
}
