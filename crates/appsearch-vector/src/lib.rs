//! appsearch-vector
//!
//! Offline embedding backfill for the catalog store and the normalized vector
//! index the retrieval engine scores against.

pub mod backfill;
pub mod index;

pub use backfill::{build_index, rebuild_store_file, BuildOptions, BuildReport};
pub use index::{l2_normalize, LoadReport, VectorIndex};
