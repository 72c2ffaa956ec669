// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod client;
pub mod gallery;
pub mod profile;
pub mod role;
pub mod sale;

pub use client::{ClientInput, ClientRecord};
pub use gallery::{Gallery, GalleryImage, GalleryInput};
pub use profile::Profile;
pub use role::Role;
pub use sale::{Sale, SaleInput, SaleStatus};
