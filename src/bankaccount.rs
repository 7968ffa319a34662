use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::Result;
use crate::types::{
    null_as_default, path_data, require_id, to_body, Address, Consumer, JsonObject,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BankAccountType {
    #[default]
    Iban,
    Gb,
    Us,
    Ca,
    Other,
}

impl BankAccountType {
    /// Segment of the creation URL, e.g. `iban`.
    pub fn path_segment(self) -> &'static str {
        match self {
            BankAccountType::Iban => "iban",
            BankAccountType::Gb => "gb",
            BankAccountType::Us => "us",
            BankAccountType::Ca => "ca",
            BankAccountType::Other => "other",
        }
    }
}

/// Bank account a user's pay-outs are wired to. Only the fields of its
/// `account_type` are filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct BankAccount {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creation_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub account_type: BankAccountType,
    #[serde(deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner_address: Address,
    pub active: bool,
    #[serde(rename = "IBAN", skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_code: Option<String>,
    #[serde(rename = "ABA", skip_serializing_if = "Option::is_none")]
    pub aba: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

const BANK_ACCOUNT_READ_ONLY: &[&str] = &["Id", "CreationDate", "Active", "Type"];

impl MangoPay {
    pub fn new_iban_bank_account<C: Consumer + ?Sized>(
        &self,
        owner: &C,
        owner_name: &str,
        owner_address: Address,
        iban: &str,
        bic: Option<&str>,
    ) -> Result<BankAccount> {
        let user_id = require_id(owner, "new bank account")?;
        Ok(BankAccount {
            user_id: user_id.to_string(),
            account_type: BankAccountType::Iban,
            owner_name: owner_name.to_string(),
            owner_address,
            iban: Some(iban.to_string()),
            bic: bic.map(str::to_string),
            ..Default::default()
        })
    }

    pub fn bank_account<C: Consumer + ?Sized>(&self, owner: &C, id: &str) -> Result<BankAccount> {
        let user_id = require_id(owner, "unable to fetch bank account")?;
        self.request(
            Action::FetchBankAccount,
            path_data(&[("UserId", user_id), ("Id", id)]),
        )
    }

    pub async fn async_bank_account<C: Consumer + ?Sized>(
        &self,
        owner: &C,
        id: &str,
    ) -> Result<BankAccount> {
        let user_id = require_id(owner, "unable to fetch bank account")?;
        self.async_request(
            Action::FetchBankAccount,
            path_data(&[("UserId", user_id), ("Id", id)]),
        )
        .await
    }
}

impl BankAccount {
    pub fn save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.create_request()?;
        *self = mango.request(Action::CreateBankAccount, data)?;
        Ok(())
    }

    pub async fn async_save(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.create_request()?;
        *self = mango
            .async_request(Action::CreateBankAccount, data)
            .await?;
        Ok(())
    }

    /// Deactivates the account; it can no longer receive pay-outs.
    pub fn deactivate(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.deactivate_request();
        *self = mango.request(Action::DeactivateBankAccount, data)?;
        Ok(())
    }

    pub async fn async_deactivate(&mut self, mango: &MangoPay) -> Result<()> {
        let data = self.deactivate_request();
        *self = mango
            .async_request(Action::DeactivateBankAccount, data)
            .await?;
        Ok(())
    }

    fn create_request(&self) -> Result<JsonObject> {
        let mut data = to_body(self, BANK_ACCOUNT_READ_ONLY)?;
        data.insert(
            "Type".into(),
            self.account_type.path_segment().to_string().into(),
        );
        Ok(data)
    }

    fn deactivate_request(&self) -> JsonObject {
        let mut data = path_data(&[("UserId", self.user_id.as_str()), ("Id", self.id.as_str())]);
        data.insert("Active".into(), false.into());
        data
    }
}
