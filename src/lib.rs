// SPDX-License-Identifier: MIT

//! Fitcrew: computational core of a social fitness tracker.
//!
//! This crate implements the streak/statistics engine, ranking aggregation,
//! and feed pagination over an abstract document store. Authentication,
//! file storage, and the HTTP/UI surface are external collaborators; they
//! talk to this crate through [`session::SessionContext`] and the
//! [`db::DocumentStore`] contract.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod services;
pub mod session;
pub mod stats;
pub mod time_utils;

pub use config::Config;
pub use db::Datastore;
pub use error::{AppError, Result};
pub use session::{SessionContext, SessionUser};
