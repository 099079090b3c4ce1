use serde::{Deserialize, Serialize};

/// One saved link and everything known about it.
///
/// `name` is the backend-assigned identity: unique, stable for the life of
/// the record, never reused after deletion. All lookups and merges key on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Not required to be unique; duplicates are permitted.
    pub url: String,
    /// Seconds since epoch. Records without one sort as epoch 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Present only once a rank has been established for this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<LinkScore>,
    /// Preview metadata, populated lazily and independently of the rest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

/// Established rank for a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkScore {
    pub id: String,
    /// May go negative after repeated demotions.
    pub value: i64,
}

/// One row of the backend's score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub id: String,
    pub value: i64,
}

/// Preview metadata merged into a record. Every field is optional because
/// results arrive partial; merging never clears a previously known field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Raw OpenGraph data as returned by a preview fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenGraph {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub object_type: Option<String>,
    pub locale: Option<String>,
}

impl OpenGraph {
    /// The subset of OpenGraph fields the record model keeps.
    pub fn into_enrichment(self) -> Enrichment {
        Enrichment {
            image_url: self.image,
            title: self.title,
            description: self.description,
        }
    }
}

/// Inbound preview notification, delivered asynchronously zero or more
/// times per requested URL. Keyed strictly by `url`, never by request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewReady {
    pub url: String,
    pub graph: Enrichment,
    pub resolved_at: i64,
}

/// Persisted snapshot of sort mode plus manual ordering. Reconciled against
/// the live record set on every load; see `ModeController::reconcile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    pub mode: SortMode,
    pub order: Vec<String>,
}

/// The three interchangeable sort policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Case-insensitive alphabetic by title.
    #[default]
    Normal,
    /// Newest first.
    Date,
    /// Highest score first.
    Score,
}

/// User-supplied fields for creating a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkProperties {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// What the backend returns for a single stored link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDetails {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl LinkDetails {
    /// Builds the in-memory record for a freshly read link.
    pub fn into_record(self, name: &str, score: Option<LinkScore>) -> LinkRecord {
        LinkRecord {
            name: name.to_string(),
            title: self.title,
            desc: self.desc,
            url: self.url,
            created_at: self.created_at,
            score,
            enrichment: None,
        }
    }
}
