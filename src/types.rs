use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Loosely typed JSON document, used for request bodies and path values.
pub type JsonObject = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    pub currency: String,
    /// Amount in the currency's minor unit (cents for EUR).
    pub amount: i64,
}

impl Money {
    pub fn new(currency: impl Into<String>, amount: i64) -> Self {
        Money {
            currency: currency.into(),
            amount,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Identity shared by every persisted MangoPay object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessIdent {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub creation_date: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    #[default]
    Created,
    Succeeded,
    Failed,
}

/// Outcome of a money movement (transfer, pay-in, pay-out, refund...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProcessReply {
    #[serde(flatten)]
    pub ident: ProcessIdent,
    #[serde(deserialize_with = "null_as_default")]
    pub result_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: TransactionStatus,
    pub execution_date: Option<i64>,
}

impl ProcessReply {
    pub fn is_failed(&self) -> bool {
        self.status == TransactionStatus::Failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonType {
    Natural,
    Legal,
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonType::Natural => write!(f, "NATURAL"),
            PersonType::Legal => write!(f, "LEGAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    #[serde(deserialize_with = "null_as_default")]
    pub address_line1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address_line2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code.
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
}

/// Anything that owns money on MangoPay: natural and legal users.
pub trait Consumer {
    fn consumer_id(&self) -> &str;
    fn person_type(&self) -> PersonType;
}

/// Returns the user id of `consumer`, or `EmptyId` naming `context`.
pub(crate) fn require_id<'a, C: Consumer + ?Sized>(
    consumer: &'a C,
    context: &'static str,
) -> Result<&'a str> {
    match consumer.consumer_id() {
        "" => Err(Error::EmptyId(context)),
        id => Ok(id),
    }
}

/// MangoPay sends `null` for unset strings; read those as the default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serializes `value` and removes the server-managed `strip` fields.
pub fn to_body<T: Serialize>(value: &T, strip: &[&str]) -> Result<JsonObject> {
    let mut data = match serde_json::to_value(value)? {
        Value::Object(map) => map,
        other => {
            let mut map = JsonObject::new();
            map.insert("Value".to_string(), other);
            map
        }
    };
    for field in strip {
        data.remove(*field);
    }
    Ok(data)
}

/// Builds the path values of a lookup, e.g. `[("Id", id)]`.
pub(crate) fn path_data(pairs: &[(&str, &str)]) -> JsonObject {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}
