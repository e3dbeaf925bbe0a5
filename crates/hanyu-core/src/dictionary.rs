/// Read-only character dictionary
pub trait Dictionary: Send + Sync {
    /// Look up a single character
    fn lookup(&self, character: char) -> Option<CharacterInfo>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

/// Structural analysis of one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterInfo {
    pub character: char,
    pub radical: String,
    /// Ideographic description sequence, e.g. `⿰亻尔`
    pub decomposition: String,
    pub etymology: Option<Etymology>,
    pub definition: Option<String>,
    pub readings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Etymology {
    /// `pictographic`, `ideographic`, `pictophonetic`
    pub kind: Option<String>,
    pub hint: Option<String>,
    pub phonetic: Option<String>,
    pub semantic: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub language: String,
    pub entry_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
