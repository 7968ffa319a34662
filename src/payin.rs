//! Card pay-ins: web (hosted payment page), direct (registered card) and
//! pre-authorized (captures a pre-authorization).
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::refund::{refund_request, Refund};
use crate::types::{
    null_as_default, path_data, require_id, to_body, Consumer, JsonObject, Money, ProcessReply,
};

/// Any pay-in, as returned by `GET /payins/{Id}`. Fields that do not apply
/// to the pay-in's kind are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PayIn {
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
    pub credited_wallet_id: String,
    /// CARD, PREAUTHORIZED, BANK_WIRE...
    #[serde(deserialize_with = "null_as_default")]
    pub payment_type: String,
    /// WEB or DIRECT.
    #[serde(deserialize_with = "null_as_default")]
    pub execution_type: String,
    #[serde(rename = "RedirectURL")]
    pub redirect_url: Option<String>,
    #[serde(rename = "ReturnURL")]
    pub return_url: Option<String>,
    pub card_id: Option<String>,
    #[serde(rename = "SecureModeRedirectURL")]
    pub secure_mode_redirect_url: Option<String>,
    #[serde(rename = "PreauthorizationId")]
    pub pre_authorization_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardWebPayIn {
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
    pub credited_wallet_id: String,
    #[serde(rename = "ReturnURL", deserialize_with = "null_as_default")]
    pub return_url: String,
    /// Language of the payment page, e.g. `FR`.
    #[serde(deserialize_with = "null_as_default")]
    pub culture: String,
    /// CB_VISA_MASTERCARD, MAESTRO, DINERS...
    #[serde(deserialize_with = "null_as_default")]
    pub card_type: String,
    #[serde(rename = "RedirectURL", deserialize_with = "null_as_default")]
    pub redirect_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secure_mode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardDirectPayIn {
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
    pub credited_wallet_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secure_mode: String,
    #[serde(rename = "SecureModeReturnURL", deserialize_with = "null_as_default")]
    pub secure_mode_return_url: String,
    #[serde(rename = "SecureModeRedirectURL", deserialize_with = "null_as_default")]
    pub secure_mode_redirect_url: String,
    pub secure_mode_needed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PreAuthorizedPayIn {
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
    pub credited_wallet_id: String,
    #[serde(rename = "PreauthorizationId", deserialize_with = "null_as_default")]
    pub pre_authorization_id: String,
}

const PAYIN_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "Status",
    "ResultCode",
    "ResultMessage",
    "ExecutionDate",
    "CreditedUserId",
    "RedirectURL",
    "SecureModeRedirectURL",
    "SecureModeNeeded",
];

fn failed(reply: &ProcessReply) -> Result<()> {
    if reply.is_failed() {
        return Err(Error::TransactionFailed {
            kind: "payIn",
            id: reply.ident.id.clone(),
            message: reply.result_message.clone(),
        });
    }
    Ok(())
}

/// Declares the blocking and async `save` of a pay-in kind.
macro_rules! payin_save {
    ($kind:ty, $action:expr) => {
        impl $kind {
            /// Creates the pay-in. A pay-in rejected by MangoPay (status
            /// `FAILED`) is returned as `Error::TransactionFailed`.
            pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
                let data = to_body(self, PAYIN_READ_ONLY)?;
                *self = mango.request($action, data)?;
                failed(&self.reply)
            }

            pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
                let data = to_body(self, PAYIN_READ_ONLY)?;
                *self = mango.async_request($action, data).await?;
                failed(&self.reply)
            }
        }
    };
}

payin_save!(CardWebPayIn, Action::CreateWebPayIn);
payin_save!(CardDirectPayIn, Action::CreateDirectPayIn);
payin_save!(PreAuthorizedPayIn, Action::CreatePreAuthorizedPayIn);

impl MangoPay {
    /// Pay-in through MangoPay's hosted payment page. After `save`, send
    /// the customer to `redirect_url`.
    pub fn new_web_pay_in<C: Consumer + ?Sized>(
        &self,
        author: &C,
        wallet_id: &str,
        amount: Money,
        fees: Money,
        return_url: &str,
    ) -> Result<CardWebPayIn> {
        let author_id = require_id(author, "new web payIn")?;
        let return_url = url::Url::parse(return_url)?;
        Ok(CardWebPayIn {
            author_id: author_id.to_string(),
            credited_wallet_id: wallet_id.to_string(),
            debited_funds: amount,
            fees,
            return_url: return_url.to_string(),
            culture: "EN".to_string(),
            card_type: "CB_VISA_MASTERCARD".to_string(),
            secure_mode: "DEFAULT".to_string(),
            ..Default::default()
        })
    }

    /// Pay-in from a registered card.
    pub fn new_direct_pay_in<C: Consumer + ?Sized>(
        &self,
        author: &C,
        wallet_id: &str,
        card_id: &str,
        amount: Money,
        fees: Money,
        return_url: &str,
    ) -> Result<CardDirectPayIn> {
        let author_id = require_id(author, "new direct payIn")?;
        let return_url = url::Url::parse(return_url)?;
        Ok(CardDirectPayIn {
            author_id: author_id.to_string(),
            credited_wallet_id: wallet_id.to_string(),
            card_id: card_id.to_string(),
            debited_funds: amount,
            fees,
            secure_mode: "DEFAULT".to_string(),
            secure_mode_return_url: return_url.to_string(),
            ..Default::default()
        })
    }

    /// Captures funds held by a validated pre-authorization.
    pub fn new_pre_authorized_pay_in<C: Consumer + ?Sized>(
        &self,
        author: &C,
        wallet_id: &str,
        pre_authorization_id: &str,
        amount: Money,
        fees: Money,
    ) -> Result<PreAuthorizedPayIn> {
        let author_id = require_id(author, "new preauthorized payIn")?;
        Ok(PreAuthorizedPayIn {
            author_id: author_id.to_string(),
            credited_wallet_id: wallet_id.to_string(),
            pre_authorization_id: pre_authorization_id.to_string(),
            debited_funds: amount,
            fees,
            ..Default::default()
        })
    }

    pub fn pay_in(&self, id: &str) -> Result<PayIn> {
        self.request(Action::FetchPayIn, path_data(&[("Id", id)]))
    }

    pub async fn async_pay_in(&self, id: &str) -> Result<PayIn> {
        self.async_request(Action::FetchPayIn, path_data(&[("Id", id)]))
            .await
    }
}

impl PayIn {
    /// Refunds the pay-in; `amounts` (debited funds, fees) makes it partial.
    pub fn refund<C: Consumer + ?Sized>(
        &self,
        mango: &MangoPay,
        author: &C,
        amounts: Option<(&Money, &Money)>,
    ) -> Result<Refund> {
        let data = self.refund_request(author, amounts)?;
        let refund: Refund = mango.request(Action::CreatePayInRefund, data)?;
        refund.check()
    }

    pub async fn async_refund<C: Consumer + ?Sized>(
        &self,
        mango: &MangoPay,
        author: &C,
        amounts: Option<(&Money, &Money)>,
    ) -> Result<Refund> {
        let data = self.refund_request(author, amounts)?;
        let refund: Refund = mango.async_request(Action::CreatePayInRefund, data).await?;
        refund.check()
    }

    fn refund_request<C: Consumer + ?Sized>(
        &self,
        author: &C,
        amounts: Option<(&Money, &Money)>,
    ) -> Result<JsonObject> {
        let author_id = require_id(author, "payIn refund")?;
        refund_request("PayInId", &self.reply.ident.id, author_id, amounts)
    }
}
