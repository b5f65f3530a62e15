use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Icon used when an article's category is unknown.
pub const DEFAULT_CATEGORY_ICON: &str = "📰";

/// Category shown on digest cards when the article carries none.
pub const DEFAULT_CATEGORY_NAME: &str = "General";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Category {
        Category {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// The fixed category list offered by the desk front end.
pub fn desk_categories() -> Vec<Category> {
    [
        ("General", "📰"),
        ("Politics", "🏛️"),
        ("Sports", "⚽"),
        ("Business", "💼"),
        ("Technology", "💻"),
        ("Education", "📚"),
        ("Entertainment", "🎬"),
        ("International", "🌍"),
        ("Health", "🏥"),
    ]
    .into_iter()
    .map(|(name, icon)| Category::new(name, icon))
    .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Only filled in by the digest endpoint.
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
}

impl Article {
    /// Description, falling back to the full content when the feed gave none.
    pub fn body_text(&self) -> &str {
        present(&self.description)
            .or_else(|| present(&self.content))
            .unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
}

/// Returns the value when it is set and not blank. The news service sends
/// empty strings for missing urls and images.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 3] = [
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Long,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryLength::Short => "Short",
            SummaryLength::Medium => "Medium",
            SummaryLength::Long => "Long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(format!("unknown summary length: {other}")),
        }
    }
}

// =============================================================================
// Wire payloads
// =============================================================================

/// Body of both `/fetch-news` and `/api/fetch-and-summarize`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FetchNewsRequest {
    pub categories: Vec<String>,
    pub max_articles: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FetchNewsResponse {
    pub articles: Vec<Article>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub k: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub text: String,
    pub summary_length: SummaryLength,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Response of `/api/fetch-and-summarize`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Digest {
    #[serde(default)]
    pub results: Vec<Article>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}
