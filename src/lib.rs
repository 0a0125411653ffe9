// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # locc-sampler
//!
//! Stratified random sampling of library volumes organised by Library of
//! Congress Classification (LOCC) call numbers.
//!
//! ## Architecture
//!
//! - **Category tree** (`category`): trie over class letters and numeric spans
//!   with containment-aware lookup and CDF-weighted recursive sampling
//! - **Sources** (`outline`, `volume`): outline entries and volume call-number
//!   listings that feed the tree
//! - **Facade** (`engine`): an explicitly constructed, read-only `Sampler`
//!
//! ## Library usage
//!
//! ```no_run
//! use locc_sampler::category::{CategoryTree, VolumeRecord};
//! use locc_sampler::outline::BUILTIN_QH;
//!
//! let mut tree = CategoryTree::from_outline(BUILTIN_QH);
//! tree.load_ids([
//!     VolumeRecord::new("QH81", "uc2.ark:/13960/t57d2rr1p"),
//!     VolumeRecord::new("QH360", "mdp.39015012345678"),
//! ]);
//! assert_eq!(tree.count("QH").unwrap(), 2);
//! let picked = tree.sample("QH", 1).unwrap();
//! ```

pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod outline;
pub mod volume;
