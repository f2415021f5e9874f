//! A personal link page: a searchable grid of saved links kept in one JSON
//! file, and the small HTTP server that serves and overwrites that file.
//!
//! [`server`] is the HTTP side. Everything else models the page itself:
//! [`store::LinkStore`] holds the list, [`form::FormController`] adds, edits
//! and deletes records, [`render`] turns the list into markup and
//! [`app::App`] dispatches named UI actions across all of them.

#[macro_use]
extern crate serde_derive;

pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod gate;
pub mod models;
pub mod render;
pub mod search;
pub mod server;
pub mod store;
