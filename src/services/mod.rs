// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod session;

pub use session::{Session, SessionResolver, SessionState};
