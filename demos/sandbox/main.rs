//! Walks a MangoPay sandbox account: lists every user, then the KYC
//! documents of the first `DEMO_USER_LIMIT` of them.
//!
//! Needs `MANGOPAY_CLIENT_ID` and `MANGOPAY_PASSPHRASE`, from the
//! environment or a `.env` file in the working directory.
use std::{env as stdenv, process::exit};

use justpaymango::{logger::setup_logger, MangoPay};
use log::{error, info, warn};

const DEFAULT_USER_LIMIT: usize = 5;

/// `DEMO_USER_LIMIT`, read after `.env` has been loaded.
fn user_limit() -> usize {
    match stdenv::var("DEMO_USER_LIMIT") {
        Ok(val) => val.trim().parse().unwrap_or_else(|_| {
            warn!("DEMO_USER_LIMIT={:?} is not a number, using {}", val, DEFAULT_USER_LIMIT);
            DEFAULT_USER_LIMIT
        }),
        Err(_) => DEFAULT_USER_LIMIT,
    }
}

#[tokio::main]
async fn main() {
    setup_logger();

    // Loads `.env` as well.
    let mango = match MangoPay::from_env() {
        Ok(mango) => mango,
        Err(err) => {
            error!("{}", err);
            exit(1);
        }
    };
    let limit = user_limit();
    info!("talking to {}", mango.config().api_root());

    let users = match mango.async_users().await {
        Ok(users) => users,
        Err(err) => {
            error!("unable to list users: {}", err);
            exit(1);
        }
    };
    info!("{} users", users.len());

    for user in users.iter().take(limit) {
        println!("{}", user);
        match mango.async_kyc_documents(user).await {
            Ok(docs) if docs.is_empty() => info!("user {} has no KYC document", user.id),
            Ok(docs) => {
                for doc in docs {
                    info!(
                        "user {} document {} {:?} {:?}",
                        user.id, doc.id, doc.document_type, doc.status
                    );
                }
            }
            Err(err) => warn!("user {}: {}", user.id, err),
        }
    }
}
