//! Database instruction implementations for article management.
//!
//! Each instruction is a small value describing one operation. Executing it
//! against a [`Database`] runs the SQL on the connection thread and hands back
//! a typed result, so handlers compose operations without touching SQL.

use super::*;

/// Insertion of new articles
pub mod add;
/// Listing, lookup and search
pub mod query;
/// Single fetches that count a view
pub mod view;

pub use self::{add::Add, query::*, view::RecordView};

/// An operation that can be run against a [`Database`].
#[async_trait]
pub trait DatabaseInstruction {
  /// What the operation produces
  type Output;

  /// Runs the operation.
  async fn execute(&self, db: &Database) -> Result<Self::Output>;
}
