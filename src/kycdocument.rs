//! Know-your-customer documents: proofs a user uploads page by page and
//! then submits for validation.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::Action;
use crate::client::MangoPay;
use crate::error::Result;
use crate::types::{null_as_default, path_data, require_id, to_body, Consumer, JsonObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycDocumentType {
    #[default]
    IdentityProof,
    RegistrationProof,
    ArticlesOfAssociation,
    ShareholderDeclaration,
    AddressProof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycDocumentStatus {
    #[default]
    Created,
    ValidationAsked,
    Validated,
    Refused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct KycDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creation_date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: KycDocumentStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub refused_reason_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub refused_reason_type: String,
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub document_type: KycDocumentType,
}

pub type KycDocumentList = Vec<KycDocument>;

const CREATE_READ_ONLY: &[&str] = &[
    "Id",
    "CreationDate",
    "Status",
    "RefusedReasonMessage",
    "RefusedReasonType",
];
const PAGE_READ_ONLY: &[&str] = &[
    "CreationDate",
    "Status",
    "RefusedReasonMessage",
    "RefusedReasonType",
    "Type",
];
const SUBMIT_READ_ONLY: &[&str] = &[
    "CreationDate",
    "RefusedReasonMessage",
    "RefusedReasonType",
    "Type",
];

impl MangoPay {
    /// Creates an empty KYC document of `kind` for `user`.
    pub fn new_kyc_document<C: Consumer + ?Sized>(
        &self,
        user: &C,
        kind: KycDocumentType,
    ) -> Result<KycDocument> {
        let data = new_kyc_document_request(user, kind)?;
        self.request(Action::CreateUserKycDocument, data.clone())
            .map_err(|err| {
                error!(
                    "unable to create KYC document, request data: {}",
                    Value::Object(data)
                );
                err
            })
    }

    pub async fn async_new_kyc_document<C: Consumer + ?Sized>(
        &self,
        user: &C,
        kind: KycDocumentType,
    ) -> Result<KycDocument> {
        let data = new_kyc_document_request(user, kind)?;
        self.async_request(Action::CreateUserKycDocument, data.clone())
            .await
            .map_err(|err| {
                error!(
                    "unable to create KYC document, request data: {}",
                    Value::Object(data)
                );
                err
            })
    }

    pub fn kyc_documents<C: Consumer + ?Sized>(&self, user: &C) -> Result<KycDocumentList> {
        let id = require_id(user, "unable to get KYC documents list")?;
        self.list(Action::ListUserKycDocuments, path_data(&[("UserId", id)]))
    }

    pub async fn async_kyc_documents<C: Consumer + ?Sized>(
        &self,
        user: &C,
    ) -> Result<KycDocumentList> {
        let id = require_id(user, "unable to get KYC documents list")?;
        self.async_list(Action::ListUserKycDocuments, path_data(&[("UserId", id)]))
            .await
    }

    pub fn kyc_document(&self, id: &str) -> Result<KycDocument> {
        self.request(Action::ViewKycDocument, path_data(&[("Id", id)]))
    }

    pub async fn async_kyc_document(&self, id: &str) -> Result<KycDocument> {
        self.async_request(Action::ViewKycDocument, path_data(&[("Id", id)]))
            .await
    }
}

fn new_kyc_document_request<C: Consumer + ?Sized>(
    user: &C,
    kind: KycDocumentType,
) -> Result<JsonObject> {
    let id = require_id(user, "unable to create KYC document")?;
    let doc = KycDocument {
        user_id: id.to_string(),
        document_type: kind,
        ..Default::default()
    };
    to_body(&doc, CREATE_READ_ONLY)
}

impl KycDocument {
    /// Uploads one page; `page_data` is the base64 encoded file.
    pub fn add_page(&self, mango: &MangoPay, page_data: &str) -> Result<()> {
        let data = self.page_request(page_data)?;
        mango.request::<Value>(Action::CreateUserKycDocumentPage, data)?;
        Ok(())
    }

    pub async fn async_add_page(&self, mango: &MangoPay, page_data: &str) -> Result<()> {
        let data = self.page_request(page_data)?;
        mango
            .async_request::<Value>(Action::CreateUserKycDocumentPage, data)
            .await?;
        Ok(())
    }

    /// Uploads one page from the raw file content (PDF, JPEG, PNG...).
    pub fn add_page_bytes(&self, mango: &MangoPay, page: &[u8]) -> Result<()> {
        self.add_page(mango, &STANDARD.encode(page))
    }

    pub async fn async_add_page_bytes(&self, mango: &MangoPay, page: &[u8]) -> Result<()> {
        self.async_add_page(mango, &STANDARD.encode(page)).await
    }

    /// Moves the document to `status`, usually `ValidationAsked` once every
    /// page is uploaded.
    pub fn submit(&mut self, mango: &MangoPay, status: KycDocumentStatus) -> Result<()> {
        self.status = status;
        let data = to_body(self, SUBMIT_READ_ONLY)?;
        *self = mango.request(Action::SubmitUserKycDocument, data)?;
        Ok(())
    }

    pub async fn async_submit(&mut self, mango: &MangoPay, status: KycDocumentStatus) -> Result<()> {
        self.status = status;
        let data = to_body(self, SUBMIT_READ_ONLY)?;
        *self = mango
            .async_request(Action::SubmitUserKycDocument, data)
            .await?;
        Ok(())
    }

    fn page_request(&self, page_data: &str) -> Result<JsonObject> {
        let mut data = to_body(self, PAGE_READ_ONLY)?;
        data.insert("File".into(), Value::String(page_data.to_string()));
        Ok(data)
    }
}
