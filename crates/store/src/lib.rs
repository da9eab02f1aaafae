//! Environment-overlay configuration store.
//!
//! This crate provides [`Store`], a small insertion-ordered mapping of
//! string configuration keys to string values, persisted as a flat JSON
//! object and overlaid by a read-only environment source that wins
//! precedence on every read. Typed reads go through [`Store::get_as`] with
//! an explicit [`Coerce`] kind.
//!
//! ```no_run
//! use envstore::{Coerce, Coerced, Store};
//!
//! # fn main() -> envstore::Result<()> {
//! let mut store = Store::open("app.json")?;
//! store.set("retries", 3)?;
//!
//! // Environment variables win over loaded/assigned entries.
//! let retries = store.get_as("RETRIES", 0, &Coerce::Number)?;
//! assert_eq!(retries, Coerced::Number(3.0));
//! # Ok(())
//! # }
//! ```

mod coerce;
mod env;
mod error;
mod store;

pub use coerce::{Coerce, Coerced};
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::{Result, StoreError};
pub use store::{MergeSource, Store};
