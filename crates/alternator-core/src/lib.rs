//! # Alternator
//!
//! A single-node, in-process DynamoDB-style table engine.
//!
//! Tables are declared with a hash key and an optional range key. Items are
//! maps of explicitly typed attribute values; a put replaces any item stored
//! at the same key, reads are strongly consistent, and queries return every
//! item under one hash key, optionally filtered by a range key condition, in
//! ascending range key order.
//!
//! ## Quick Start
//!
//! ```
//! use alternator_core::api::{AlternatorDB, Condition};
//! use alternator_core::types::{Item, ScalarType};
//!
//! let db = AlternatorDB::new();
//! db.create_table("mapper.TestClassWithRangeHashKey")
//!     .hash_key("hashCode", ScalarType::String)
//!     .range_key("rangeCode", ScalarType::String)
//!     .execute()
//!     .unwrap();
//!
//! for range in ["range2c", "range2d", "range2e"] {
//!     db.put_item(
//!         "mapper.TestClassWithRangeHashKey",
//!         Item::new().with("hashCode", "hash2").with("rangeCode", range),
//!     )
//!     .unwrap();
//! }
//!
//! let items = db
//!     .query("mapper.TestClassWithRangeHashKey")
//!     .hash_key("hash2")
//!     .range_condition(Condition::between("range2c", "range2d"))
//!     .execute()
//!     .unwrap();
//! assert_eq!(items.len(), 2);
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod consistency;
pub mod encoding;
pub mod error;
pub mod persist;
pub mod store;
pub mod types;
