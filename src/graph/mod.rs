//! Microsoft Graph REST client and resource readers

pub mod calendar;
pub mod chats;
mod client;
mod error;
pub mod mail;
pub mod models;
pub mod people;
pub mod teams;

pub use client::{GraphClient, MAX_PAGES, Page, Paged};
pub use error::{GraphError, error_message};
