//! # SQLite Database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interaction are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool,
//! or create an atomic transaction as the need arises and call through to the functions without any other changes.
//!
//! Statements ending in `RETURNING` are read with `fetch_all`. SQLite only commits an autocommit write once the
//! statement has been stepped to completion, and `fetch_one` stops after the first row.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod bids;
pub mod events;
pub mod users;
pub mod vendors;

const SQLITE_DB_URL: &str = "sqlite://data/emp_store.db";

pub fn db_url() -> String {
    let result = env::var("EMP_DATABASE_URL").unwrap_or_else(|_| {
        info!("EMP_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}
