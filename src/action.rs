//! Catalogue of MangoPay endpoints.
use reqwest::Method;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::JsonObject;

/// One REST operation of the MangoPay API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Events,
    AllUsers,

    CreateNaturalUser,
    EditNaturalUser,
    FetchNaturalUser,

    CreateLegalUser,
    EditLegalUser,
    FetchLegalUser,

    FetchUser,
    FetchUserTransfers,
    FetchUserWallets,
    FetchUserCards,
    FetchUserBankAccounts,

    CreateWallet,
    EditWallet,
    FetchWallet,
    FetchWalletTransactions,

    CreateTransfer,
    FetchTransfer,

    FetchPayIn,
    CreateWebPayIn,
    CreateDirectPayIn,
    CreatePreAuthorizedPayIn,

    CreateCardRegistration,
    FetchCardRegistration,
    SendCardRegistrationData,

    FetchCard,
    DeactivateCard,

    CreateTransferRefund,
    CreatePayInRefund,
    FetchRefund,

    CreateBankAccount,
    FetchBankAccount,
    DeactivateBankAccount,

    CreatePayOut,
    FetchPayOut,

    CreateUserKycDocument,
    SubmitUserKycDocument,
    ViewKycDocument,
    CreateUserKycDocumentPage,
    ListUserKycDocuments,

    CreatePreAuthorization,
    FetchPreAuthorization,
    CancelPreAuthorization,
}

/// HTTP verb, URL template and required path parameters of an action.
///
/// Templates use `{{Name}}` placeholders; each name listed in
/// `path_values` must be present in the request data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub path_values: &'static [&'static str],
}

const NONE: &[&str] = &[];
const ID: &[&str] = &["Id"];
const USER_ID: &[&str] = &["UserId"];
const USER_ID_AND_ID: &[&str] = &["UserId", "Id"];

impl Action {
    pub const ALL: [Action; 44] = [
        Action::Events,
        Action::AllUsers,
        Action::CreateNaturalUser,
        Action::EditNaturalUser,
        Action::FetchNaturalUser,
        Action::CreateLegalUser,
        Action::EditLegalUser,
        Action::FetchLegalUser,
        Action::FetchUser,
        Action::FetchUserTransfers,
        Action::FetchUserWallets,
        Action::FetchUserCards,
        Action::FetchUserBankAccounts,
        Action::CreateWallet,
        Action::EditWallet,
        Action::FetchWallet,
        Action::FetchWalletTransactions,
        Action::CreateTransfer,
        Action::FetchTransfer,
        Action::FetchPayIn,
        Action::CreateWebPayIn,
        Action::CreateDirectPayIn,
        Action::CreatePreAuthorizedPayIn,
        Action::CreateCardRegistration,
        Action::FetchCardRegistration,
        Action::SendCardRegistrationData,
        Action::FetchCard,
        Action::DeactivateCard,
        Action::CreateTransferRefund,
        Action::CreatePayInRefund,
        Action::FetchRefund,
        Action::CreateBankAccount,
        Action::FetchBankAccount,
        Action::DeactivateBankAccount,
        Action::CreatePayOut,
        Action::FetchPayOut,
        Action::CreateUserKycDocument,
        Action::SubmitUserKycDocument,
        Action::ViewKycDocument,
        Action::CreateUserKycDocumentPage,
        Action::ListUserKycDocuments,
        Action::CreatePreAuthorization,
        Action::FetchPreAuthorization,
        Action::CancelPreAuthorization,
    ];

    pub fn endpoint(self) -> Endpoint {
        use Action::*;
        let (method, path, path_values) = match self {
            Events => (Method::GET, "/events", NONE),
            AllUsers => (Method::GET, "/users", NONE),

            CreateNaturalUser => (Method::POST, "/users/natural", NONE),
            EditNaturalUser => (Method::PUT, "/users/natural/{{Id}}", ID),
            FetchNaturalUser => (Method::GET, "/users/natural/{{Id}}", ID),

            CreateLegalUser => (Method::POST, "/users/legal", NONE),
            EditLegalUser => (Method::PUT, "/users/legal/{{Id}}", ID),
            FetchLegalUser => (Method::GET, "/users/legal/{{Id}}", ID),

            FetchUser => (Method::GET, "/users/{{Id}}", ID),
            FetchUserTransfers => (Method::GET, "/users/{{Id}}/transactions", ID),
            FetchUserWallets => (Method::GET, "/users/{{Id}}/wallets", ID),
            FetchUserCards => (Method::GET, "/users/{{Id}}/cards", ID),
            FetchUserBankAccounts => (Method::GET, "/users/{{Id}}/bankaccounts", ID),

            CreateWallet => (Method::POST, "/wallets", NONE),
            EditWallet => (Method::PUT, "/wallets/{{Id}}", ID),
            FetchWallet => (Method::GET, "/wallets/{{Id}}", ID),
            FetchWalletTransactions => (Method::GET, "/wallets/{{Id}}/transactions", ID),

            CreateTransfer => (Method::POST, "/transfers", NONE),
            FetchTransfer => (Method::GET, "/transfers/{{Id}}", ID),

            FetchPayIn => (Method::GET, "/payins/{{Id}}", ID),
            CreateWebPayIn => (Method::POST, "/payins/card/web", NONE),
            CreateDirectPayIn => (Method::POST, "/payins/card/direct", NONE),
            CreatePreAuthorizedPayIn => (Method::POST, "/payins/preauthorized/direct", NONE),

            CreateCardRegistration => (Method::POST, "/cardregistrations", NONE),
            FetchCardRegistration => (Method::GET, "/cardregistrations/{{Id}}", ID),
            SendCardRegistrationData => (Method::PUT, "/CardRegistrations/{{Id}}", ID),

            FetchCard => (Method::GET, "/cards/{{Id}}", ID),
            DeactivateCard => (Method::PUT, "/cards/{{Id}}", ID),

            CreateTransferRefund => (
                Method::POST,
                "/transfers/{{TransferId}}/refunds",
                &["TransferId"] as &[&str],
            ),
            CreatePayInRefund => (
                Method::POST,
                "/payins/{{PayInId}}/refunds",
                &["PayInId"] as &[&str],
            ),
            FetchRefund => (Method::GET, "/refunds/{{Id}}", ID),

            CreateBankAccount => (
                Method::POST,
                "/users/{{UserId}}/bankaccounts/{{Type}}",
                &["UserId", "Type"] as &[&str],
            ),
            FetchBankAccount => (
                Method::GET,
                "/users/{{UserId}}/bankaccounts/{{Id}}",
                USER_ID_AND_ID,
            ),
            DeactivateBankAccount => (
                Method::PUT,
                "/users/{{UserId}}/bankaccounts/{{Id}}",
                USER_ID_AND_ID,
            ),

            CreatePayOut => (Method::POST, "/payouts/bankwire", NONE),
            FetchPayOut => (Method::GET, "/payouts/{{Id}}", ID),

            CreateUserKycDocument => (
                Method::POST,
                "/users/{{UserId}}/kyc/documents/",
                USER_ID,
            ),
            SubmitUserKycDocument => (
                Method::PUT,
                "/users/{{UserId}}/kyc/documents/{{Id}}",
                USER_ID_AND_ID,
            ),
            ViewKycDocument => (Method::GET, "/kyc/documents/{{Id}}", ID),
            CreateUserKycDocumentPage => (
                Method::POST,
                "/users/{{UserId}}/kyc/documents/{{Id}}/pages",
                USER_ID_AND_ID,
            ),
            ListUserKycDocuments => (
                Method::GET,
                "/users/{{UserId}}/kyc/documents/",
                USER_ID,
            ),

            CreatePreAuthorization => (Method::POST, "/preauthorizations/card/direct", NONE),
            FetchPreAuthorization => (Method::GET, "/preauthorizations/{{Id}}", ID),
            CancelPreAuthorization => (Method::PUT, "/preauthorizations/{{Id}}", ID),
        };
        Endpoint {
            method,
            path,
            path_values,
        }
    }

    /// Whether the action answers with a JSON array.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Action::Events
                | Action::AllUsers
                | Action::FetchUserTransfers
                | Action::FetchUserWallets
                | Action::FetchUserCards
                | Action::FetchUserBankAccounts
                | Action::FetchWalletTransactions
                | Action::ListUserKycDocuments
        )
    }
}

impl Endpoint {
    /// Fills the path template from `data`, removing every consumed key so
    /// that path parameters never end up in the request body. An empty
    /// string counts as missing.
    pub fn resolve(&self, action: Action, data: &mut JsonObject) -> Result<String> {
        let mut path = self.path.to_string();
        for key in self.path_values {
            let value = match data.remove(*key) {
                Some(Value::String(s)) if !s.is_empty() => s,
                Some(Value::Number(n)) => n.to_string(),
                _ => return Err(Error::MissingPathValue { action, key }),
            };
            path = path.replace(&format!("{{{{{}}}}}", key), &value);
        }
        Ok(path)
    }
}
