use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::bankaccount::BankAccount;
use crate::card::Card;
use crate::client::MangoPay;
use crate::error::Result;
use crate::types::{
    null_as_default, path_data, require_id, to_body, Address, Consumer, PersonType, ProcessIdent,
};
use crate::wallet::{Transaction, Wallet};

/// Fields common to natural and legal users, as served by `/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub person_type: PersonType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(default)]
    pub creation_date: i64,
}

pub type UserList = Vec<User>;

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "
Person type             : {}
Email                   : {}
Id                      : {}
Tag                     : {}
CreationDate            : {}",
            self.person_type, self.email, self.id, self.tag, self.creation_date
        )
    }
}

impl Consumer for User {
    fn consumer_id(&self) -> &str {
        &self.id
    }

    fn person_type(&self) -> PersonType {
        self.person_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct NaturalUser {
    #[serde(flatten)]
    pub ident: ProcessIdent,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: Address,
    /// Unix timestamp.
    pub birthday: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nationality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_of_residence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_range: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_of_identity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_of_address: Option<String>,
    #[serde(rename = "KYCLevel", skip_serializing_if = "Option::is_none")]
    pub kyc_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalPersonType {
    #[default]
    Business,
    Organization,
    Soletrader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct LegalUser {
    #[serde(flatten)]
    pub ident: ProcessIdent,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub legal_person_type: LegalPersonType,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headquarters_address: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_address: Address,
    pub legal_representative_birthday: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_nationality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legal_representative_country_of_residence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_of_registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shareholder_declaration: Option<String>,
    #[serde(rename = "KYCLevel", skip_serializing_if = "Option::is_none")]
    pub kyc_level: Option<String>,
}

/// Never accepted in create or edit bodies.
const USER_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "PersonType",
    "KYCLevel",
    "ProofOfIdentity",
    "ProofOfAddress",
    "Statute",
    "ProofOfRegistration",
    "ShareholderDeclaration",
];

impl Consumer for NaturalUser {
    fn consumer_id(&self) -> &str {
        &self.ident.id
    }

    fn person_type(&self) -> PersonType {
        PersonType::Natural
    }
}

impl Consumer for LegalUser {
    fn consumer_id(&self) -> &str {
        &self.ident.id
    }

    fn person_type(&self) -> PersonType {
        PersonType::Legal
    }
}

impl NaturalUser {
    /// Creates the user when it has no id yet, edits it otherwise.
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

    fn save_request(&self) -> Result<(Action, crate::JsonObject)> {
        let mut data = to_body(self, USER_READ_ONLY)?;
        if self.ident.id.is_empty() {
            return Ok((Action::CreateNaturalUser, data));
        }
        data.insert("Id".into(), self.ident.id.clone().into());
        Ok((Action::EditNaturalUser, data))
    }
}

impl LegalUser {
    /// Creates the user when it has no id yet, edits it otherwise.
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

    fn save_request(&self) -> Result<(Action, crate::JsonObject)> {
        let mut data = to_body(self, USER_READ_ONLY)?;
        if self.ident.id.is_empty() {
            return Ok((Action::CreateLegalUser, data));
        }
        data.insert("Id".into(), self.ident.id.clone().into());
        Ok((Action::EditLegalUser, data))
    }
}

impl MangoPay {
    /// Natural user ready to be saved.
    pub fn new_natural_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        birthday: i64,
        nationality: &str,
        country_of_residence: &str,
    ) -> NaturalUser {
        NaturalUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            birthday,
            nationality: nationality.to_string(),
            country_of_residence: country_of_residence.to_string(),
            ..Default::default()
        }
    }

    /// Legal user ready to be saved; the representative's details still
    /// have to be filled in.
    pub fn new_legal_user(
        &self,
        name: &str,
        email: &str,
        legal_person_type: LegalPersonType,
    ) -> LegalUser {
        LegalUser {
            name: name.to_string(),
            email: email.to_string(),
            legal_person_type,
            ..Default::default()
        }
    }

    /// Every registered user, either natural or legal.
    pub fn users(&self) -> Result<UserList> {
        self.list(Action::AllUsers, Default::default())
    }

    pub async fn async_users(&self) -> Result<UserList> {
        self.async_list(Action::AllUsers, Default::default()).await
    }

    /// Fetches a natural or legal user by id.
    pub fn user(&self, id: &str) -> Result<User> {
        self.request(Action::FetchUser, path_data(&[("Id", id)]))
    }

    pub async fn async_user(&self, id: &str) -> Result<User> {
        self.async_request(Action::FetchUser, path_data(&[("Id", id)]))
            .await
    }

    pub fn natural_user(&self, id: &str) -> Result<NaturalUser> {
        self.request(Action::FetchNaturalUser, path_data(&[("Id", id)]))
    }

    pub async fn async_natural_user(&self, id: &str) -> Result<NaturalUser> {
        self.async_request(Action::FetchNaturalUser, path_data(&[("Id", id)]))
            .await
    }

    pub fn legal_user(&self, id: &str) -> Result<LegalUser> {
        self.request(Action::FetchLegalUser, path_data(&[("Id", id)]))
    }

    pub async fn async_legal_user(&self, id: &str) -> Result<LegalUser> {
        self.async_request(Action::FetchLegalUser, path_data(&[("Id", id)]))
            .await
    }

    pub fn wallets<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<Wallet>> {
        let id = require_id(user, "unable to list wallets")?;
        self.list(Action::FetchUserWallets, path_data(&[("Id", id)]))
    }

    pub async fn async_wallets<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<Wallet>> {
        let id = require_id(user, "unable to list wallets")?;
        self.async_list(Action::FetchUserWallets, path_data(&[("Id", id)]))
            .await
    }

    /// Every transaction (transfers, pay-ins, pay-outs, refunds) of a user.
    pub fn transactions<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<Transaction>> {
        let id = require_id(user, "unable to list transactions")?;
        self.list(Action::FetchUserTransfers, path_data(&[("Id", id)]))
    }

    pub async fn async_transactions<C: Consumer + ?Sized>(
        &self,
        user: &C,
    ) -> Result<Vec<Transaction>> {
        let id = require_id(user, "unable to list transactions")?;
        self.async_list(Action::FetchUserTransfers, path_data(&[("Id", id)]))
            .await
    }

    pub fn cards<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<Card>> {
        let id = require_id(user, "unable to list cards")?;
        self.list(Action::FetchUserCards, path_data(&[("Id", id)]))
    }

    pub async fn async_cards<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<Card>> {
        let id = require_id(user, "unable to list cards")?;
        self.async_list(Action::FetchUserCards, path_data(&[("Id", id)]))
            .await
    }

    pub fn bank_accounts<C: Consumer + ?Sized>(&self, user: &C) -> Result<Vec<BankAccount>> {
        let id = require_id(user, "unable to list bank accounts")?;
        self.list(Action::FetchUserBankAccounts, path_data(&[("Id", id)]))
    }

    pub async fn async_bank_accounts<C: Consumer + ?Sized>(
        &self,
        user: &C,
    ) -> Result<Vec<BankAccount>> {
        let id = require_id(user, "unable to list bank accounts")?;
        self.async_list(Action::FetchUserBankAccounts, path_data(&[("Id", id)]))
            .await
    }
}
