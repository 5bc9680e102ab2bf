// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

//! Shared error and diagnostic types for SQLiteOG.
//!
//! Every crate in the workspace reports failures as an [`Error`] wrapping a
//! [`Diagnostic`]. Diagnostics carry a stable code which the server maps onto
//! gRPC status codes and the client surfaces to callers.

pub mod error;

pub use error::{Diagnostic, Error, IntoDiagnostic, diagnostic};

pub type Result<T> = std::result::Result<T, Error>;
