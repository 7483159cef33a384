//! Web server for the folio publication archive.
//!
//! This crate puts an HTTP front end on the [`folio`] library:
//! - HTML pages for the recent feed, article details, uploads and search
//! - A JSON API for listing, fetching, searching and uploading articles
//! - Browsing and in-browser viewing of the curated issues tree
//!
//! The router is built by [`server::create_router`] around an already opened
//! [`Folio`], which makes it easy to drive from tests:
//!
//! ```no_run
//! use folio::{Config, Folio};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let folio = Folio::builder().with_config(Config::default()).build().await?;
//! foliod::server::serve(folio, foliod::server::shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use folio::{article::Article, database::SearchFilter, Folio};
use tracing::{debug, info, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod error;
pub mod server;

use crate::error::*;
