use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::types::{
    null_as_default, path_data, require_id, to_body, Consumer, JsonObject, Money, ProcessReply,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Waiting,
    Canceled,
    Expired,
    Validated,
}

/// Funds held on a card for up to 7 days, captured later with a
/// pre-authorized pay-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PreAuthorization {
    #[serde(flatten)]
    pub reply: ProcessReply,
    #[serde(deserialize_with = "null_as_default")]
    pub author_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub debited_funds: Money,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub execution_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub secure_mode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_id: String,
    pub secure_mode_needed: bool,
    #[serde(rename = "SecureModeRedirectURL", deserialize_with = "null_as_default")]
    pub secure_mode_redirect_url: String,
    #[serde(rename = "SecureModeReturnURL", deserialize_with = "null_as_default")]
    pub secure_mode_return_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pay_in_id: String,
    pub expiration_date: Option<i64>,
}

/// Fields not allowed when creating a pre-authorization.
const PREAUTHORIZATION_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "ExecutionDate",
    "Status",
    "PaymentStatus",
    "ResultCode",
    "ResultMessage",
    "ExecutionType",
    "SecureModeNeeded",
    "SecureModeRedirectURL",
    "ExpirationDate",
    "PayInId",
];

impl fmt::Display for PreAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl MangoPay {
    /// Prepares a pre-authorization of `amount` on `card_id`. Nothing is
    /// sent until [`PreAuthorization::save`].
    pub fn new_pre_authorization<C: Consumer + ?Sized>(
        &self,
        author: &C,
        amount: Money,
        secure_mode: &str,
        card_id: &str,
        return_url: &str,
    ) -> Result<PreAuthorization> {
        let author_id = require_id(author, "new preauthorization")?;
        let return_url = url::Url::parse(return_url)?;
        Ok(PreAuthorization {
            author_id: author_id.to_string(),
            debited_funds: amount,
            secure_mode: secure_mode.to_string(),
            card_id: card_id.to_string(),
            secure_mode_return_url: return_url.to_string(),
            ..Default::default()
        })
    }

    pub fn pre_authorization(&self, id: &str) -> Result<PreAuthorization> {
        self.request(Action::FetchPreAuthorization, path_data(&[("Id", id)]))
    }

    pub async fn async_pre_authorization(&self, id: &str) -> Result<PreAuthorization> {
        self.async_request(Action::FetchPreAuthorization, path_data(&[("Id", id)]))
            .await
    }
}

impl PreAuthorization {
    /// Sends the pre-authorization and refreshes `self` with MangoPay's
    /// answer. When 3-D Secure is required, `secure_mode_needed` is set and
    /// the card holder must visit `secure_mode_redirect_url`.
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango.request(Action::CreatePreAuthorization, data)?;
        self.check()
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.save_request()?;
        *self = mango
            .async_request(Action::CreatePreAuthorization, data)
            .await?;
        self.check()
    }

    /// Releases the held funds.
    pub fn cancel(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.cancel_request();
        *self = mango.request(Action::CancelPreAuthorization, data)?;
        Ok(())
    }

    pub async fn async_cancel(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.cancel_request();
        *self = mango
            .async_request(Action::CancelPreAuthorization, data)
            .await?;
        Ok(())
    }

    fn save_request(&self) -> Result<JsonObject> {
        to_body(self, PREAUTHORIZATION_READ_ONLY)
    }

    fn cancel_request(&self) -> JsonObject {
        let mut data = path_data(&[("Id", self.reply.ident.id.as_str())]);
        data.insert(
            "PaymentStatus".into(),
            serde_json::json!(PaymentStatus::Canceled),
        );
        data
    }

    fn check(&self) -> Result<()> {
        if self.reply.is_failed() {
            return Err(Error::PreAuthorizationFailed {
                id: self.reply.ident.id.clone(),
                message: self.reply.result_message.clone(),
            });
        }
        Ok(())
    }
}
