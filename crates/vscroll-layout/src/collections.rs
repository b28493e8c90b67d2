//! Hash map used for index pages and recycler slot lookup.
//!
//! Keys are page numbers and node handles, so the fast non-cryptographic
//! Fx hasher is used unless the `std-hash` feature asks for std's SipHash.

#[cfg(not(feature = "std-hash"))]
pub mod map {
    /// Map keyed by page number or node handle.
    pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
}

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;
}
