// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Messages and service definition of the `SqliteOG` gRPC protocol.
//!
//! The message types are plain prost structs and the service plumbing is
//! written out by hand, so the workspace builds without `protoc`.

mod message;
pub mod sqlite_og_client;
pub mod sqlite_og_server;

pub use message::*;
pub use sqlite_og_client::SqliteOgClient;
pub use sqlite_og_server::{SqliteOg, SqliteOgServer};

/// Service name, also the first segment of every method path.
pub const SERVICE_NAME: &str = "SqliteOG";

/// Metadata key carrying the connection identifier on the callback stream.
pub const CNX_ID_METADATA: &str = "cnx_id";
