//! Reconciliation and diagnostic engine for a secondhand-listing tracker.
//!
//! Import batches scraped from the marketplace are merged into the local
//! record store ([`import`]), active listings are classified into
//! diagnostic states ([`domain::diagnostic`]), and sold/active records
//! roll up into portfolio statistics ([`domain::stats`]). All I/O lives at
//! the [`store`] boundary; the engine itself is pure computation.

pub mod config;
pub mod domain;
pub mod errors;
pub mod import;
pub mod spreadsheets;
pub mod store;

#[cfg(test)]
mod tests;
