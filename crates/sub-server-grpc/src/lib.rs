// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! gRPC server subsystem for SQLiteOG.
//!
//! Hosts the connection registry and serves the `SqliteOG` service: unary
//! statement calls, plus one bidirectional callback stream per connection
//! through which the engine asks the client to evaluate its functions.
//!
//! # Example
//!
//! ```ignore
//! let config = GrpcConfig::default().bind_addr("127.0.0.1:9091").data_dir("/var/lib/sqliteog");
//! let mut server = GrpcServer::new(config);
//! server.start().await?;
//! // ...
//! server.shutdown().await?;
//! ```

mod callback;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
mod service;
mod stats;
pub mod subsystem;

pub use config::GrpcConfig;
pub use dispatch::Dispatcher;
pub use registry::{ConnectionId, ConnectionRecord, ConnectionRegistry};
pub use service::SqliteOgService;
pub use subsystem::GrpcServer;
