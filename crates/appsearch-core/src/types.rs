//! Domain types shared by the index builder, the retrieval engine and the
//! serving layer.
//!
//! Field names mirror the persisted `apps.json` document exactly so stores
//! produced by other tools round-trip without loss. Keys this crate does not
//! know about are kept in `extra` and written back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type EntryId = String;

/// One searchable catalog item.
///
/// - `search_text`: canonical text the embedding derives from
/// - `embedding`: derived vector; `None` and `[]` both mean "not embedded"
/// - `content_hash`: digest of `search_text` at the time `embedding` was made
/// - `embedding_model`: model identifier, kept for auditing only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), category: category.into(), ..Self::default() }
    }

    /// Non-empty `search_text`, if any.
    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref().filter(|s| !s.is_empty())
    }

    /// Non-empty embedding, if any.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref().filter(|v| !v.is_empty())
    }

    /// Lower-cased `name`, `aliases` and `features` joined by single spaces.
    pub fn keyword_blob(&self) -> String {
        let aliases = self.aliases.join(" ");
        let features = self.features.join(" ");
        [self.name.as_str(), aliases.as_str(), features.as_str()].join(" ").to_lowercase()
    }
}

/// Store-level metadata. Only `last_updated` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole persisted document: `{ "meta": {...}, "apps": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStore {
    pub meta: StoreMeta,
    pub apps: Vec<CatalogEntry>,
}

pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// A ranked hit with every component of its fused score.
///
/// All four scores are bounded: `semantic_score` in [-1, 1], the others and
/// `final_score` in [0, 1] for non-negative similarities.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub app: CatalogEntry,
    pub semantic_score: f32,
    pub keyword_score: f32,
    pub category_boost: f32,
    pub final_score: f32,
}
