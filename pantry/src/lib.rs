//! # Pantry - Embedded JSON Document Store
//!
//! Pantry is a small embedded document store that keeps named collections of
//! JSON documents in memory and writes every change through to one
//! `<collection>.json` file per collection.
//!
//! ## Key Features
//!
//! - **Embedded**: an in-process library, no server
//! - **Write-through**: every insert, update and delete rewrites the
//!   affected collection file atomically
//! - **Managed fields**: documents get an `id`, `createdAt` and `updatedAt`
//! - **Own JSON codec**: a lenient decoder that never fails on bad input
//! - **Configurable durability**: fail-open or fail-closed on write errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pantry::doc;
//! use pantry::pantry::Pantry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Pantry::builder().data_dir("data").open()?;
//!
//! let id = db.insert("orders", doc! { customer: "Ann", total: 42.5 })?;
//! db.update("orders", &id, doc! { status: "DELIVERED" })?;
//!
//! let order = db.find_by_id("orders", &id)?;
//! assert!(order.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## On-disk Format
//!
//! Each collection file holds a single line of JSON mapping document IDs to
//! documents, ordered by ID:
//!
//! ```text
//! {"1":{"id":1,"name":"Margherita Pizza","price":16.99,"createdAt":1700000000000,"updatedAt":1700000000000}}
//! ```
//!
//! A data directory belongs to one process at a time.

pub mod codec;
pub mod collection;
pub mod common;
pub mod errors;
pub mod pantry;
pub mod pantry_builder;
pub mod pantry_config;
pub mod store;
