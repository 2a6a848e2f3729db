#![deny(unused_imports)]
#![deny(unused_variables)]

pub mod config;
pub mod digest;
pub mod error;
pub mod store;
pub mod traits;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use traits::{ContentHasher, Embedder};
pub use types::{CatalogEntry, CatalogStore, QueryRequest, ScoredResult, StoreMeta};
