//! LOCC category tree: outline structure, containment lookup, and stratified
//! sampling of volume ids.
//!
//! Category strings combine class letters with a numeric span
//! (`QH359-425`). The tree resolves any such string to the most specific known
//! node, or the nearest ancestor whose span encloses it.

pub mod label;
pub mod node;
pub mod range;
pub mod sample;
pub mod tree;

pub use label::{validate_category_string, CategoryLabel, Step};
pub use node::{CategoryNode, ChildKey, FallbackPolicy};
pub use range::Range;
pub use tree::{BuildReport, CategoryTree, LoadReport, VolumeRecord};
