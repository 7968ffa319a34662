//! End-to-end tests against a wiremock stand-in for the MangoPay API.
//!
//! Every mock is mounted under `/v2.01/acme`, the API root of client id
//! `acme`.
use justpaymango::kycdocument::{KycDocumentStatus, KycDocumentType};
use justpaymango::preauthorization::PaymentStatus;
use justpaymango::user::NaturalUser;
use justpaymango::{Config, Environment, Error, MangoPay, Money, PersonType};
use serde_json::{json, Value};
use wiremock::matchers::{
    body_json, body_partial_json, body_string, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `Basic base64("acme:secret")`.
const AUTHORIZATION: &str = "Basic YWNtZTpzZWNyZXQ=";

fn client(server: &MockServer) -> MangoPay {
    let config = Config::new("acme", "secret", Environment::Sandbox).with_base_url(server.uri());
    MangoPay::new(config).unwrap()
}

fn natural_user(id: &str) -> NaturalUser {
    let mut user = NaturalUser::default();
    user.ident.id = id.to_string();
    user
}

fn user_json(id: usize) -> Value {
    json!({
        "PersonType": if id % 2 == 0 { "NATURAL" } else { "LEGAL" },
        "Email": format!("user{}@acme.test", id),
        "Id": id.to_string(),
        "Tag": null,
        "CreationDate": 1400000000
    })
}

// ── users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_user_sends_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/users/7"))
        .and(header("authorization", AUTHORIZATION))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).async_user("7").await.unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.person_type, PersonType::Legal);
    assert_eq!(user.email, "user7@acme.test");
    assert_eq!(user.tag, "");
}

#[tokio::test]
async fn users_walks_every_page() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (0..100).map(user_json).collect();
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/users"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![user_json(100)]))
        .expect(1)
        .mount(&server)
        .await;

    let users = client(&server).async_users().await.unwrap();
    assert_eq!(users.len(), 101);
    assert_eq!(users[0].person_type, PersonType::Natural);
    assert_eq!(users[100].id, "100");
}

#[tokio::test]
async fn api_errors_carry_mangopay_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "Message": "The ressource does not exist",
            "Type": "ressource_not_found",
            "Id": "err-1",
            "Errors": {"RessourceNotFound": "Cannot found the ressource User with the id=404"}
        })))
        .mount(&server)
        .await;

    match client(&server).async_user("404").await.unwrap_err() {
        Error::Api(err) => {
            assert_eq!(err.status, 404);
            assert_eq!(err.message(), Some("The ressource does not exist"));
            assert!(err.field_errors().unwrap().contains_key("RessourceNotFound"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn natural_user_save_creates_then_edits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/users/natural"))
        .and(body_partial_json(json!({"FirstName": "Ada", "LastName": "Lovelace"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "u1",
            "CreationDate": 1400000000,
            "PersonType": "NATURAL",
            "FirstName": "Ada",
            "LastName": "Lovelace",
            "Email": "ada@acme.test",
            "Birthday": 0,
            "Nationality": "GB",
            "CountryOfResidence": "FR",
            "Address": null,
            "KYCLevel": "LIGHT"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2.01/acme/users/natural/u1"))
        .and(body_partial_json(json!({"Email": "countess@acme.test"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "u1",
            "FirstName": "Ada",
            "LastName": "Lovelace",
            "Email": "countess@acme.test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mango = client(&server);
    let mut user = mango.new_natural_user("Ada", "Lovelace", "ada@acme.test", 0, "GB", "FR");
    user.async_save(&mango).await.unwrap();
    assert_eq!(user.ident.id, "u1");
    assert_eq!(user.kyc_level.as_deref(), Some("LIGHT"));

    user.email = "countess@acme.test".into();
    user.async_save(&mango).await.unwrap();
    assert_eq!(user.email, "countess@acme.test");
}

// ── KYC documents ───────────────────────────────────────────────────

#[tokio::test]
async fn kyc_document_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/users/u1/kyc/documents/"))
        .and(body_json(json!({"Tag": "", "Type": "IDENTITY_PROOF"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "d1",
            "CreationDate": 1400000000,
            "Tag": null,
            "UserId": "u1",
            "Type": "IDENTITY_PROOF",
            "Status": "CREATED",
            "RefusedReasonType": null,
            "RefusedReasonMessage": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/users/u1/kyc/documents/d1/pages"))
        .and(body_json(json!({"Tag": "", "File": "cGFnZSBvbmU="})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2.01/acme/users/u1/kyc/documents/d1"))
        .and(body_json(json!({"Tag": "", "Status": "VALIDATION_ASKED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "d1",
            "CreationDate": 1400000000,
            "UserId": "u1",
            "Type": "IDENTITY_PROOF",
            "Status": "VALIDATION_ASKED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mango = client(&server);
    let mut doc = mango
        .async_new_kyc_document(&natural_user("u1"), KycDocumentType::IdentityProof)
        .await
        .unwrap();
    assert_eq!(doc.id, "d1");
    assert_eq!(doc.status, KycDocumentStatus::Created);

    doc.async_add_page_bytes(&mango, b"page one").await.unwrap();
    doc.async_submit(&mango, KycDocumentStatus::ValidationAsked)
        .await
        .unwrap();
    assert_eq!(doc.status, KycDocumentStatus::ValidationAsked);
}

#[tokio::test]
async fn kyc_documents_require_a_user_id() {
    let server = MockServer::start().await;
    let mango = client(&server);
    let err = mango
        .async_kyc_documents(&NaturalUser::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to get KYC documents list: empty user ID"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn kyc_documents_and_single_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/users/u1/kyc/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": "d1", "UserId": "u1", "Type": "IDENTITY_PROOF", "Status": "VALIDATED"},
            {"Id": "d2", "UserId": "u1", "Type": "ADDRESS_PROOF", "Status": "REFUSED",
             "RefusedReasonType": "DOCUMENT_UNREADABLE"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/kyc/documents/d2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"Id": "d2", "UserId": "u1", "Type": "ADDRESS_PROOF", "Status": "REFUSED"}
        )))
        .mount(&server)
        .await;

    let mango = client(&server);
    let docs = mango.async_kyc_documents(&natural_user("u1")).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1].document_type, KycDocumentType::AddressProof);
    assert_eq!(docs[1].refused_reason_type, "DOCUMENT_UNREADABLE");

    let doc = mango.async_kyc_document("d2").await.unwrap();
    assert_eq!(doc.status, KycDocumentStatus::Refused);
}

// ── pre-authorizations ──────────────────────────────────────────────

fn pre_authorization_json(status: &str, payment_status: &str) -> Value {
    json!({
        "Id": "pa1",
        "Tag": null,
        "CreationDate": 1400000000,
        "AuthorId": "u1",
        "DebitedFunds": {"Currency": "EUR", "Amount": 5000},
        "Status": status,
        "PaymentStatus": payment_status,
        "ResultCode": if status == "FAILED" { "101105" } else { "000000" },
        "ResultMessage": if status == "FAILED" { "Card expired" } else { "Success" },
        "ExecutionType": "DIRECT",
        "SecureMode": "DEFAULT",
        "CardId": "c1",
        "SecureModeNeeded": false,
        "SecureModeRedirectURL": null,
        "SecureModeReturnURL": "https://shop.test/return",
        "ExpirationDate": 1400600000,
        "PayInId": null
    })
}

#[tokio::test]
async fn pre_authorization_save_and_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/preauthorizations/card/direct"))
        .and(body_json(json!({
            "Tag": "",
            "AuthorId": "u1",
            "DebitedFunds": {"Currency": "EUR", "Amount": 5000},
            "SecureMode": "DEFAULT",
            "CardId": "c1",
            "SecureModeReturnURL": "https://shop.test/return"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pre_authorization_json("SUCCEEDED", "WAITING")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2.01/acme/preauthorizations/pa1"))
        .and(body_json(json!({"PaymentStatus": "CANCELED"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pre_authorization_json("SUCCEEDED", "CANCELED")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mango = client(&server);
    let mut pa = mango
        .new_pre_authorization(
            &natural_user("u1"),
            Money::new("EUR", 5000),
            "DEFAULT",
            "c1",
            "https://shop.test/return",
        )
        .unwrap();
    pa.async_save(&mango).await.unwrap();
    assert_eq!(pa.reply.ident.id, "pa1");
    assert_eq!(pa.payment_status, PaymentStatus::Waiting);
    assert_eq!(pa.expiration_date, Some(1400600000));

    pa.async_cancel(&mango).await.unwrap();
    assert_eq!(pa.payment_status, PaymentStatus::Canceled);
}

#[tokio::test]
async fn failed_pre_authorization_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/preauthorizations/card/direct"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(pre_authorization_json("FAILED", "WAITING")),
        )
        .mount(&server)
        .await;

    let mango = client(&server);
    let mut pa = mango
        .new_pre_authorization(
            &natural_user("u1"),
            Money::new("EUR", 5000),
            "DEFAULT",
            "c1",
            "https://shop.test/return",
        )
        .unwrap();
    let err = pa.async_save(&mango).await.unwrap_err();
    assert_eq!(err.to_string(), "preAuthorization pa1 failed: Card expired");
    assert_eq!(pa.reply.result_code, "101105");
}

// ── events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn events_forward_filters() {
    use chrono::{TimeZone, Utc};
    use justpaymango::event::EventFilter;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.01/acme/events"))
        .and(query_param("EventType", "PAYIN_NORMAL_SUCCEEDED"))
        .and(query_param("AfterDate", "1400000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ResourceId": "p1", "EventType": "PAYIN_NORMAL_SUCCEEDED", "Date": 1400000100}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = EventFilter::default()
        .event_type("PAYIN_NORMAL_SUCCEEDED")
        .after(Utc.timestamp_opt(1400000000, 0).unwrap());
    let events = client(&server).async_events(&filter).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].resource_id, "p1");
}

// ── blocking API ────────────────────────────────────────────────────

#[test]
fn blocking_calls_share_the_endpoint_table() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/v2.01/acme/users/u1/wallets"))
            .and(header("authorization", AUTHORIZATION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "Id": "w1",
                "Owners": ["u1"],
                "Description": "main",
                "Currency": "EUR",
                "Balance": {"Currency": "EUR", "Amount": 1200},
                "Tag": null,
                "CreationDate": 1400000000
            }])))
            .mount(&server),
    );
    rt.block_on(
        Mock::given(method("PUT"))
            .and(path("/v2.01/acme/wallets/w1"))
            .and(body_json(json!({"Description": "savings", "Tag": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Id": "w1",
                "Owners": ["u1"],
                "Description": "savings",
                "Currency": "EUR",
                "Balance": {"Currency": "EUR", "Amount": 1200}
            })))
            .expect(1)
            .mount(&server),
    );

    let mango = client(&server);
    let mut wallets = mango.wallets(&natural_user("u1")).unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].balance, Money::new("EUR", 1200));

    let wallet = &mut wallets[0];
    wallet.description = "savings".into();
    wallet.save(&mango).unwrap();
    assert_eq!(wallet.description, "savings");
}

// ── rejected transactions ───────────────────────────────────────────

fn failed_json(id: &str, message: &str) -> Value {
    json!({
        "Id": id,
        "CreationDate": 1400000000,
        "Status": "FAILED",
        "ResultCode": "001001",
        "ResultMessage": message,
        "AuthorId": "u1",
        "DebitedFunds": {"Currency": "EUR", "Amount": 1000},
        "Fees": {"Currency": "EUR", "Amount": 0}
    })
}

async fn mount_failed(server: &MockServer, route: &str, id: &str, message: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v2.01/acme{}", route)))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed_json(id, message)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn failed_transfer_is_reported() {
    let server = MockServer::start().await;
    mount_failed(&server, "/transfers", "t1", "Insufficient balance").await;

    let mango = client(&server);
    let mut transfer = mango
        .new_transfer(
            &natural_user("u1"),
            Money::new("EUR", 1000),
            Money::new("EUR", 0),
            "w1",
            "w2",
        )
        .unwrap();
    let err = transfer.async_save(&mango).await.unwrap_err();
    assert!(matches!(err, Error::TransactionFailed { kind: "transfer", .. }));
    assert_eq!(err.to_string(), "transfer t1 failed: Insufficient balance");
    assert_eq!(transfer.reply.ident.id, "t1");
}

#[tokio::test]
async fn failed_pay_ins_are_reported() {
    let server = MockServer::start().await;
    mount_failed(&server, "/payins/card/web", "p1", "Transaction refused").await;
    mount_failed(&server, "/payins/card/direct", "p2", "Card expired").await;
    mount_failed(&server, "/payins/preauthorized/direct", "p3", "Pre-authorization expired").await;

    let mango = client(&server);
    let author = natural_user("u1");

    let mut web = mango
        .new_web_pay_in(
            &author,
            "w1",
            Money::new("EUR", 1000),
            Money::new("EUR", 0),
            "https://shop.test/return",
        )
        .unwrap();
    let err = web.async_save(&mango).await.unwrap_err();
    assert_eq!(err.to_string(), "payIn p1 failed: Transaction refused");

    let mut direct = mango
        .new_direct_pay_in(
            &author,
            "w1",
            "c1",
            Money::new("EUR", 1000),
            Money::new("EUR", 0),
            "https://shop.test/return",
        )
        .unwrap();
    let err = direct.async_save(&mango).await.unwrap_err();
    assert_eq!(err.to_string(), "payIn p2 failed: Card expired");

    let mut captured = mango
        .new_pre_authorized_pay_in(
            &author,
            "w1",
            "pa1",
            Money::new("EUR", 1000),
            Money::new("EUR", 0),
        )
        .unwrap();
    let err = captured.async_save(&mango).await.unwrap_err();
    assert!(matches!(err, Error::TransactionFailed { kind: "payIn", .. }));
    assert_eq!(err.to_string(), "payIn p3 failed: Pre-authorization expired");
}

#[tokio::test]
async fn failed_pay_out_is_reported() {
    let server = MockServer::start().await;
    mount_failed(&server, "/payouts/bankwire", "po1", "Bank account inactive").await;

    let mango = client(&server);
    let mut payout = mango
        .new_pay_out(
            &natural_user("u1"),
            "w1",
            "b1",
            Money::new("EUR", 1000),
            Money::new("EUR", 0),
        )
        .unwrap();
    let err = payout.async_save(&mango).await.unwrap_err();
    assert_eq!(err.to_string(), "payOut po1 failed: Bank account inactive");
}

// ── card registration ───────────────────────────────────────────────

fn saved_registration(server: &MockServer) -> justpaymango::card::CardRegistration {
    justpaymango::card::CardRegistration {
        id: "cr1".into(),
        user_id: "u1".into(),
        currency: "EUR".into(),
        access_key: "key".into(),
        preregistration_data: "pre".into(),
        card_registration_url: format!("{}/tokenize", server.uri()),
        status: "CREATED".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn card_registration_posts_form_then_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenize"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(
            "data=pre&accessKeyRef=key&cardNumber=4970100000000154&cardExpirationDate=1229&cardCvx=123",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("data=token42"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v2.01/acme/CardRegistrations/cr1"))
        .and(body_json(json!({"RegistrationData": "data=token42"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "cr1",
            "UserId": "u1",
            "Currency": "EUR",
            "CardType": "CB_VISA_MASTERCARD",
            "RegistrationData": "data=token42",
            "CardId": "c9",
            "Status": "VALIDATED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mango = client(&server);
    let mut registration = saved_registration(&server);
    let data = registration
        .async_register_card_data(&mango, "4970100000000154", "1229", "123")
        .await
        .unwrap();
    assert_eq!(data, "data=token42");

    registration
        .async_send_registration_data(&mango, &data)
        .await
        .unwrap();
    assert_eq!(registration.card_id, "c9");
    assert_eq!(registration.status, "VALIDATED");
}

#[tokio::test]
async fn tokenization_rejection_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tokenize"))
        .respond_with(ResponseTemplate::new(403).set_body_string("errorCode=09101"))
        .mount(&server)
        .await;

    let mango = client(&server);
    let registration = saved_registration(&server);
    match registration
        .async_register_card_data(&mango, "4970100000000154", "1229", "123")
        .await
        .unwrap_err()
    {
        Error::Api(err) => {
            assert_eq!(err.status, 403);
            assert_eq!(err.body, "errorCode=09101");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

// ── bank accounts ───────────────────────────────────────────────────

#[tokio::test]
async fn iban_bank_account_save_uses_path_values() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.01/acme/users/u1/bankaccounts/iban"))
        .and(body_partial_json(json!({
            "OwnerName": "Ada Lovelace",
            "IBAN": "FR7630004000031234567890143",
            "BIC": "BNPAFRPP"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "b1",
            "UserId": "u1",
            "Type": "IBAN",
            "OwnerName": "Ada Lovelace",
            "OwnerAddress": {"City": "Paris", "Country": "FR"},
            "Active": true,
            "IBAN": "FR7630004000031234567890143",
            "BIC": "BNPAFRPP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mango = client(&server);
    let address = justpaymango::types::Address {
        city: "Paris".into(),
        country: "FR".into(),
        ..Default::default()
    };
    let mut account = mango
        .new_iban_bank_account(
            &natural_user("u1"),
            "Ada Lovelace",
            address,
            "FR7630004000031234567890143",
            Some("BNPAFRPP"),
        )
        .unwrap();
    account.async_save(&mango).await.unwrap();
    assert_eq!(account.id, "b1");
    assert!(account.active);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let body = body.as_object().unwrap();
    assert!(!body.contains_key("Type"));
    assert!(!body.contains_key("UserId"));
    assert!(!body.contains_key("Id"));
    assert_eq!(body["OwnerAddress"]["City"], "Paris");
}
