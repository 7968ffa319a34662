//! Card registration and registered cards.
//!
//! Registering a card takes three steps: create a [`CardRegistration`],
//! post the card details to its tokenization URL
//! ([`CardRegistration::register_card_data`]), then hand the returned data
//! back to MangoPay ([`CardRegistration::send_registration_data`]), which
//! fills in `card_id`.
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::{Error, Result};
use crate::types::{null_as_default, path_data, require_id, to_body, Consumer, JsonObject};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardRegistration {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creation_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub access_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub preregistration_data: String,
    #[serde(rename = "CardRegistrationURL", deserialize_with = "null_as_default")]
    pub card_registration_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub registration_data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result_message: String,
    /// CREATED, VALIDATED or ERROR.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Card {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creation_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    /// MMYY.
    #[serde(deserialize_with = "null_as_default")]
    pub expiration_date: String,
    /// Masked number, e.g. `497010XXXXXX4406`.
    #[serde(deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub card_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bank_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// UNKNOWN, VALID or INVALID.
    #[serde(deserialize_with = "null_as_default")]
    pub validity: String,
    pub active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub fingerprint: String,
}

impl MangoPay {
    pub fn new_card_registration<C: Consumer + ?Sized>(
        &self,
        user: &C,
        currency: &str,
    ) -> Result<CardRegistration> {
        let user_id = require_id(user, "new card registration")?;
        Ok(CardRegistration {
            user_id: user_id.to_string(),
            currency: currency.to_string(),
            card_type: "CB_VISA_MASTERCARD".to_string(),
            ..Default::default()
        })
    }

    pub fn card_registration(&self, id: &str) -> Result<CardRegistration> {
        self.request(Action::FetchCardRegistration, path_data(&[("Id", id)]))
    }

    pub async fn async_card_registration(&self, id: &str) -> Result<CardRegistration> {
        self.async_request(Action::FetchCardRegistration, path_data(&[("Id", id)]))
            .await
    }

    pub fn card(&self, id: &str) -> Result<Card> {
        self.request(Action::FetchCard, path_data(&[("Id", id)]))
    }

    pub async fn async_card(&self, id: &str) -> Result<Card> {
        self.async_request(Action::FetchCard, path_data(&[("Id", id)]))
            .await
    }
}

impl CardRegistration {
    /// Creates the registration; MangoPay answers with the access key,
    /// preregistration data and tokenization URL.
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.create_request()?;
        *self = mango.request(Action::CreateCardRegistration, data)?;
        Ok(())
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.create_request()?;
        *self = mango
            .async_request(Action::CreateCardRegistration, data)
            .await?;
        Ok(())
    }

    /// Posts the card details to the tokenization server and returns its
    /// raw answer (`data=...`), to be passed to `send_registration_data`.
    ///
    /// `expiration` is `MMYY`.
    pub fn register_card_data(
        &self,
        mango: &MangoPay,
        number: &str,
        expiration: &str,
        cvx: &str,
    ) -> Result<String> {
        let url = self.tokenization_url()?;
        let form = self.tokenization_form(number, expiration, cvx);
        mango.post_form(url, &form)
    }

    pub async fn async_register_card_data(
        &self,
        mango: &MangoPay,
        number: &str,
        expiration: &str,
        cvx: &str,
    ) -> Result<String> {
        let url = self.tokenization_url()?;
        let form = self.tokenization_form(number, expiration, cvx);
        mango.async_post_form(url, &form).await
    }

    /// Completes the registration; on success `card_id` holds the new card.
    pub fn send_registration_data(&mut self, mango: &MangoPay, data: &str) -> Result<()> {
        let request = self.registration_data_request(data);
        *self = mango.request(Action::SendCardRegistrationData, request)?;
        self.check()
    }

    pub async fn async_send_registration_data(
        &mut self,
        mango: &MangoPay,
        data: &str,
    ) -> Result<()> {
        let request = self.registration_data_request(data);
        *self = mango
            .async_request(Action::SendCardRegistrationData, request)
            .await?;
        self.check()
    }

    fn create_request(&self) -> Result<JsonObject> {
        let mut data = to_body(self, &[])?;
        data.retain(|k, _| matches!(k.as_str(), "Tag" | "UserId" | "Currency" | "CardType"));
        Ok(data)
    }

    fn tokenization_url(&self) -> Result<&str> {
        if self.card_registration_url.is_empty() {
            return Err(Error::Config(format!(
                "card registration {:?} has no tokenization URL, save it first",
                self.id
            )));
        }
        Ok(&self.card_registration_url)
    }

    fn tokenization_form<'a>(
        &'a self,
        number: &'a str,
        expiration: &'a str,
        cvx: &'a str,
    ) -> Vec<(&'static str, &'a str)> {
        vec![
            ("data", self.preregistration_data.as_str()),
            ("accessKeyRef", self.access_key.as_str()),
            ("cardNumber", number),
            ("cardExpirationDate", expiration),
            ("cardCvx", cvx),
        ]
    }

    fn registration_data_request(&self, data: &str) -> JsonObject {
        path_data(&[("Id", self.id.as_str()), ("RegistrationData", data)])
    }

    fn check(&self) -> Result<()> {
        if self.status == "ERROR" {
            return Err(Error::TransactionFailed {
                kind: "card registration",
                id: self.id.clone(),
                message: self.result_message.clone(),
            });
        }
        Ok(())
    }
}

impl Card {
    /// Deactivates the card. MangoPay cannot reactivate it afterwards.
    pub fn deactivate(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.deactivate_request();
        *self = mango.request(Action::DeactivateCard, data)?;
        Ok(())
    }

    pub async fn async_deactivate(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.deactivate_request();
        *self = mango.async_request(Action::DeactivateCard, data).await?;
        Ok(())
    }

    fn deactivate_request(&self) -> JsonObject {
        let mut data = path_data(&[("Id", self.id.as_str())]);
        data.insert("Active".into(), false.into());
        data
    }
}
