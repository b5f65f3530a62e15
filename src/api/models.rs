//! Form payloads posted by the served pages.
//!
//! Forms arrive as raw key/value pairs because checkbox groups repeat the
//! `category` key once per checked box.

use crate::controller::{DeskEvent, DigestEvent, Event};
use crate::data_models::SummaryLength;

pub type FormPairs = Vec<(String, String)>;

fn values<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn first<'a>(pairs: &'a [(String, String)], key: &'a str) -> Option<&'a str> {
    values(pairs, key).next()
}

fn number(pairs: &[(String, String)], key: &str) -> Option<i64> {
    first(pairs, key).and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Default, PartialEq)]
pub struct FetchForm {
    pub categories: Vec<String>,
    pub max_articles: Option<i64>,
}

impl FetchForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            categories: values(pairs, "category").map(str::to_string).collect(),
            max_articles: number(pairs, "max_articles"),
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        let mut events = vec![DeskEvent::SelectCategories(self.categories).into()];
        if let Some(max) = self.max_articles {
            events.push(DeskEvent::SetMaxArticles(max).into());
        }
        events.push(DeskEvent::FetchClicked.into());
        events
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct SearchForm {
    pub query: String,
    pub k: Option<i64>,
}

impl SearchForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            query: first(pairs, "query").unwrap_or_default().to_string(),
            k: number(pairs, "k"),
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        let mut events = vec![DeskEvent::SetQuery(self.query).into()];
        if let Some(k) = self.k {
            events.push(DeskEvent::SetResultCount(k).into());
        }
        events.push(DeskEvent::SearchClicked.into());
        events
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct SummarizeForm {
    pub text: String,
    pub summary_length: Option<SummaryLength>,
}

impl SummarizeForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            text: first(pairs, "text").unwrap_or_default().to_string(),
            summary_length: first(pairs, "summary_length").and_then(|v| v.parse().ok()),
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        let mut events = vec![DeskEvent::SetText(self.text).into()];
        if let Some(length) = self.summary_length {
            events.push(DeskEvent::SetSummaryLength(length).into());
        }
        events.push(DeskEvent::SummarizeClicked.into());
        events
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct DigestForm {
    pub categories: Vec<String>,
    /// Unparseable input is kept as 0 so it fails the range check.
    pub article_count: i64,
}

impl DigestForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            categories: values(pairs, "category").map(str::to_string).collect(),
            article_count: number(pairs, "article_count").unwrap_or(0),
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        vec![
            DigestEvent::SelectCategories(self.categories).into(),
            DigestEvent::SetArticleCount(self.article_count).into(),
            DigestEvent::FetchClicked.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> FormPairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fetch_form_collects_repeated_categories() {
        let form = FetchForm::from_pairs(&pairs(&[
            ("category", "Sports"),
            ("category", "Health"),
            ("max_articles", "7"),
        ]));
        assert_eq!(form.categories, vec!["Sports", "Health"]);
        assert_eq!(form.max_articles, Some(7));
        assert_eq!(form.into_events().len(), 3);
    }

    #[test]
    fn test_digest_form_bad_count() {
        let form = DigestForm::from_pairs(&pairs(&[("article_count", "lots")]));
        assert_eq!(form.article_count, 0);
        assert!(form.categories.is_empty());
    }

    #[test]
    fn test_summarize_form_length() {
        let form = SummarizeForm::from_pairs(&pairs(&[("text", "abc"), ("summary_length", "short")]));
        assert_eq!(form.summary_length, Some(SummaryLength::Short));
        assert_eq!(
            form.into_events().last(),
            Some(&Event::Desk(DeskEvent::SummarizeClicked))
        );
    }
}
