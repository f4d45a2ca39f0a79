//! Order-preserving key encodings.
//!
//! Every encoded key compares under `memcmp` exactly as the values it encodes
//! compare under their scalar type's natural ordering, so the item store can
//! keep items in a plain ordered map and answer range conditions with a
//! single contiguous scan.

pub mod binary;
pub mod composite;
pub mod number;
pub mod string;
