use serde::Serialize;

/// Experimental paradigm of a row, parsed once from the lowercase task code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Generation,
    PairedChoice,
    Position,
    Other(String),
}

impl TaskKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "gen" => Self::Generation,
            "pc" => Self::PairedChoice,
            "ps" => Self::Position,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Generation => "gen",
            Self::PairedChoice => "pc",
            Self::Position => "ps",
            Self::Other(code) => code,
        }
    }
}

/// One spreadsheet row after column resolution and coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// 1-based spreadsheet row number, header included.
    pub source_row: usize,
    pub session: String,
    pub city: String,
    pub task: TaskKind,
    pub trial: i64,
    pub event_id: Option<i64>,
    pub correct: i64,
    pub media_city: String,
    pub choices: Option<[Option<i64>; 3]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    pub trial: i64,
    pub event_id: Option<i64>,
    pub correct: i64,
    #[serde(rename = "mediaType")]
    pub media_type: MediaType,
    #[serde(rename = "mediaCity")]
    pub media_city: String,
    pub choices: Vec<Option<i64>>,
    pub assets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub session: String,
    pub city: String,
    pub task: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub session: String,
    pub city: String,
    pub task: String,
    pub count: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunManifest {
    pub generated: Vec<ManifestEntry>,
    pub created_at: Option<String>,
}
