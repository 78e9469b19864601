//! Fast hash collections used across the engine.
//! Keys are short block identifiers and names, where FxHash outperforms SipHash.

pub use rustc_hash::{FxHashMap, FxHashSet};
