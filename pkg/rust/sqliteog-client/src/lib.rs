// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Client driver for SQLiteOG.
//!
//! Makes a database hosted by a SQLiteOG server look like a local handle,
//! including SQL functions implemented in the calling process.
//!
//! # Example
//!
//! ```ignore
//! let driver = Driver::new().with_function("square", |args| {
//!     let n: i64 = args[0].parse().unwrap_or_default();
//!     vec![(n * n).to_string()]
//! });
//!
//! let conn = driver.open("localhost:9091/app").await?;
//! let mut rows = conn.query("SELECT square(?)", &[NamedValue::new(1, 4)]).await?;
//! while let Some(row) = rows.next()? {
//!     println!("{:?}", row);
//! }
//! conn.close().await?;
//! ```

pub mod blocking;
mod callback;
mod connection;
mod driver;
mod dsn;
pub mod error;
mod rows;
mod statement;
mod value;

pub use connection::{Connection, StatementOutcome};
pub use driver::{Connector, Driver, Function};
pub use dsn::{Dsn, DsnError, DsnParseError};
pub use rows::{ExecResult, Rows, ScanType};
pub use sqliteog_type::{Error, Result};
pub use statement::Statement;
pub use value::{NamedValue, ParamError, Value, named_values_to_params};
