use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::types::{null_as_default, path_data, JsonObject, Money, ProcessReply};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Refund {
    #[serde(flatten)]
    pub reply: ProcessReply,
    #[serde(deserialize_with = "null_as_default")]
    pub initial_transaction_id: String,
    /// PAYIN or TRANSFER.
    #[serde(deserialize_with = "null_as_default")]
    pub initial_transaction_type: String,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_reason: Option<RefundReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct RefundReason {
    #[serde(deserialize_with = "null_as_default")]
    pub refused_reason_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub refused_reason_type: String,
}

impl Refund {
    pub(crate) fn check(self) -> Result<Self> {
        if self.reply.is_failed() {
            return Err(Error::TransactionFailed {
                kind: "refund",
                id: self.reply.ident.id,
                message: self.reply.result_message,
            });
        }
        Ok(self)
    }
}

/// Body of a refund request for `initial_id`, keyed by `id_key`.
///
/// `amounts` turns it into a partial refund of debited funds and fees.
pub(crate) fn refund_request(
    id_key: &str,
    initial_id: &str,
    author_id: &str,
    amounts: Option<(&Money, &Money)>,
) -> Result<JsonObject> {
    let mut data = path_data(&[(id_key, initial_id), ("AuthorId", author_id)]);
    if let Some((debited, fees)) = amounts {
        data.insert("DebitedFunds".into(), serde_json::to_value(debited)?);
        data.insert("Fees".into(), serde_json::to_value(fees)?);
    }
    Ok(data)
}

impl MangoPay {
    pub fn refund(&self, id: &str) -> Result<Refund> {
        self.request(Action::FetchRefund, path_data(&[("Id", id)]))
    }

    pub async fn async_refund(&self, id: &str) -> Result<Refund> {
        self.async_request(Action::FetchRefund, path_data(&[("Id", id)]))
            .await
    }
}
