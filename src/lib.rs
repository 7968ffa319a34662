//! Client library for the MangoPay payment API.
//!
//! Every remote operation is described by an [`action::Action`] (HTTP verb,
//! URL template and path parameters). Entities are plain serde structs; the
//! [`MangoPay`] handle sends them either blocking or async.
pub mod action;
pub mod bankaccount;
pub mod card;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod kycdocument;
pub mod logger;
pub mod payin;
pub mod payout;
pub mod preauthorization;
pub mod refund;
pub mod transfer;
pub mod types;
pub mod user;
pub mod wallet;

pub use action::Action;
pub use client::{MangoPay, Pagination};
pub use config::{Config, Environment};
pub use error::{ApiError, Error, Result};
pub use types::{Consumer, JsonObject, Money, PersonType, ProcessIdent, ProcessReply, TransactionStatus};
