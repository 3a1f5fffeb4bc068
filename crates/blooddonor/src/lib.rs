//! `blooddonor` - a local blood donor registry
//!
//! Donors, user accounts, the login session and blood camp requests are kept
//! as JSON collections in a key-value store. [`LocalStore`] is the entry
//! point; the [`pages`] module holds one controller per front-end page.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod account;
pub mod admin;
pub mod camp;
pub mod cli;
pub mod config;
pub mod donor;
pub mod error;
pub mod logging;
pub mod mail;
pub mod pages;
pub mod registry;
pub mod storage;

pub use account::{Accounts, Session, User};
pub use admin::AdminList;
pub use camp::{CampRequest, CampRequests, CampStatus, CampSubmission, Decision};
pub use config::Config;
pub use donor::{BloodGroup, Donor, DonorDirectory, DonorRegistration};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use mail::MailLink;
pub use registry::LocalStore;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageKey};
