//! Markup for the two pages. Everything here is a pure function of its
//! arguments; the controller stores the produced fragments in the page.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::data_models::{
    Article, Category, DEFAULT_CATEGORY_ICON, DEFAULT_CATEGORY_NAME, SearchResult, SummaryLength,
    present,
};
use crate::page::{ButtonState, DeskPage, DigestPage, LoadState};
use crate::state::CategorySelection;

pub const DESCRIPTION_LIMIT: usize = 150;

pub mod messages {
    pub const NO_ARTICLES: &str = "No articles found";
    pub const NO_RESULTS: &str = "No results found";
    pub const NO_DIGEST_ARTICLES: &str = "No articles found for the selected categories.";
    pub const FETCH_FAILED: &str = "Failed to fetch news. Please try again.";
    pub const SEARCH_FAILED: &str = "Search failed. Please try again.";
    pub const SUMMARIZE_FAILED: &str = "Summarization failed. Please try again.";
    pub const DIGEST_FAILED: &str = "Failed to fetch and summarize articles. Please try again.";
    pub const CATEGORIES_FAILED: &str = "Failed to load categories. Please refresh the page.";
}

const IMAGE_FALLBACK: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 width=%22100%22 height=%22100%22%3E%3Crect fill=%22%23667eea33%22 width=%22100%22 height=%22100%22/%3E%3C/svg%3E";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Cuts `text` to `length` characters and appends `...` when it was longer.
pub fn truncate(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Renders a feed timestamp as `M/D/YYYY`. Missing values become `N/A`,
/// values in no recognized format are shown as sent.
pub fn format_published(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return "N/A".to_string();
    };
    match parse_published(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}

fn parse_published(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|d| d.date_naive())
        .ok()
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|d| d.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

pub fn category_icon<'a>(categories: &'a [Category], name: Option<&str>) -> &'a str {
    name.and_then(|name| categories.iter().find(|c| c.name == name))
        .map(|c| c.icon.as_str())
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

pub fn empty_state(message: &str) -> String {
    format!(r#"<div class="empty-state">{}</div>"#, escape(message))
}

pub fn error_message(message: &str) -> String {
    format!(r#"<div class="error-message">{}</div>"#, escape(message))
}

// =============================================================================
// Desk fragments
// =============================================================================

pub fn news_card(article: &Article, categories: &[Category]) -> String {
    let category = article.category.as_deref().unwrap_or("");
    let icon = category_icon(categories, article.category.as_deref());
    let title = escape(&article.title);
    let image = match present(&article.image) {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="news-card-image" onerror="this.src='{}'">"#,
            escape(src),
            title,
            IMAGE_FALLBACK
        ),
        None => r#"<div class="news-card-image"></div>"#.to_string(),
    };
    let url = present(&article.url).unwrap_or("#");

    format!(
        r#"<div class="news-card">{image}<div class="news-card-content"><span class="news-card-category">{icon} {category}</span><h3 class="news-card-title">{title}</h3><div class="news-card-meta"><span>📰 {source}</span><span>📅 {published}</span></div><p class="news-card-description">{description}</p><a href="{url}" target="_blank" class="news-card-link">Read More →</a></div></div>"#,
        category = escape(category),
        source = escape(&article.source),
        published = escape(&format_published(article.published.as_deref())),
        description = escape(&truncate(article.body_text(), DESCRIPTION_LIMIT)),
        url = escape(url),
    )
}

pub fn news_grid(articles: &[Article], categories: &[Category]) -> String {
    if articles.is_empty() {
        return empty_state(messages::NO_ARTICLES);
    }
    articles
        .iter()
        .map(|article| news_card(article, categories))
        .collect()
}

pub fn search_result_card(result: &SearchResult) -> String {
    let link = match present(&result.url) {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" class="news-card-link">Read Full Article →</a>"#,
            escape(url)
        ),
        None => String::new(),
    };
    format!(
        r#"<div class="search-result-card"><h3 class="search-result-title">{}</h3><p class="search-result-snippet">{}</p><div class="search-result-meta"><span>📰 {}</span>{}</div></div>"#,
        escape(&result.title),
        escape(&result.snippet),
        escape(&result.source),
        link
    )
}

pub fn search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return empty_state(messages::NO_RESULTS);
    }
    results.iter().map(search_result_card).collect()
}

// =============================================================================
// Digest fragments
// =============================================================================

pub fn digest_card(article: &Article) -> String {
    let url = present(&article.url).unwrap_or("#");
    format!(
        r#"<div class="article-card"><div class="article-header"><h3 class="article-title">{title}</h3><span class="article-category">{category}</span></div><div class="article-meta"><span class="article-source">📡 {source}</span><span class="article-date">📅 {published}</span></div><p class="article-summary">{summary}</p><a href="{url}" target="_blank" class="article-link">Read full article →</a></div>"#,
        title = escape(&article.title),
        category = escape(present(&article.category).unwrap_or(DEFAULT_CATEGORY_NAME)),
        source = escape(&article.source),
        published = escape(&format_published(article.published.as_deref())),
        summary = escape(article.summary.as_deref().unwrap_or("")),
        url = escape(url),
    )
}

pub fn digest_articles(articles: &[Article]) -> String {
    if articles.is_empty() {
        return format!(
            r#"<p class="empty-state">{}</p>"#,
            escape(messages::NO_DIGEST_ARTICLES)
        );
    }
    articles.iter().map(digest_card).collect()
}

// =============================================================================
// Category grids
// =============================================================================

/// Desk grid: a checkbox with a label per category.
pub fn desk_category_grid(selection: &CategorySelection) -> String {
    let mut out = String::new();
    for category in selection.known() {
        let name = escape(&category.name);
        let checked = if selection.is_selected(&category.name) {
            " checked"
        } else {
            ""
        };
        let _ = write!(
            out,
            r#"<div class="category-item"><input type="checkbox" id="cat-{name}" name="category" value="{name}"{checked}><label for="cat-{name}"><span class="category-icon">{icon}</span><span class="category-name">{name}</span></label></div>"#,
            icon = escape(&category.icon),
        );
    }
    out
}

/// Digest grid: the whole tile is clickable and marked when picked.
pub fn digest_category_grid(selection: &CategorySelection) -> String {
    let mut out = String::new();
    for category in selection.known() {
        let name = escape(&category.name);
        let (class, checked) = if selection.is_selected(&category.name) {
            ("category-item selected", " checked")
        } else {
            ("category-item", "")
        };
        let _ = write!(
            out,
            r#"<label class="{class}"><input type="checkbox" id="cat-{name}" name="category" value="{name}"{checked}><span class="icon">{icon}</span><span class="name">{name}</span></label>"#,
            icon = escape(&category.icon),
        );
    }
    out
}

// =============================================================================
// Pages
// =============================================================================

fn action_button(id: &str, label: &str, state: ButtonState) -> String {
    if state.is_loading() {
        format!(
            r#"<button type="submit" id="{id}" class="action-btn" disabled><span class="btn-text" style="display: none">{label}</span><span class="loader" style="display: inline-block"></span></button>"#
        )
    } else {
        format!(
            r#"<button type="submit" id="{id}" class="action-btn"><span class="btn-text">{label}</span><span class="loader" style="display: none"></span></button>"#
        )
    }
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<nav class="tabs"><a class="tab-btn" href="/">Desk</a><a class="tab-btn" href="/digest">Digest</a></nav>
{body}
</body>
</html>
"#,
        title = escape(title)
    )
}

pub fn desk_page(page: &DeskPage) -> String {
    let selection = &page.selection;
    let mut body = String::new();

    if let Some(alert) = &page.alert {
        let _ = write!(body, r#"<div class="alert" role="alert">{}</div>"#, escape(alert));
    }

    let _ = write!(
        body,
        r#"<section id="news-tab" class="tab-content active"><form method="post" action="/ui/fetch-news"><div id="category-grid" class="category-grid">{grid}</div><label for="max-articles">Articles: <span id="article-count">{count}</span></label><input type="range" id="max-articles" name="max_articles" min="{min}" max="{max}" value="{count}">{button}</form><div id="news-grid" class="news-grid">{news}</div></section>"#,
        grid = desk_category_grid(&selection.categories),
        count = selection.max_articles.value(),
        min = selection.max_articles.min,
        max = selection.max_articles.max,
        button = action_button("fetch-btn", "Fetch News", page.fetch_button),
        news = page.news_grid,
    );

    let _ = write!(
        body,
        r#"<section id="search-tab" class="tab-content active"><form method="post" action="/ui/search"><input type="text" id="search-query" name="query" value="{query}" placeholder="Search articles"><label for="search-results-count">Results: <span id="search-count">{k}</span></label><input type="range" id="search-results-count" name="k" min="{min}" max="{max}" value="{k}">{button}</form><div id="search-results" class="search-results">{results}</div></section>"#,
        query = escape(&selection.query),
        k = selection.result_count.value(),
        min = selection.result_count.min,
        max = selection.result_count.max,
        button = action_button("search-btn", "Search", page.search_button),
        results = page.search_results,
    );

    let mut lengths = String::new();
    for length in SummaryLength::ALL {
        let checked = if length == selection.summary_length {
            " checked"
        } else {
            ""
        };
        let _ = write!(
            lengths,
            r#"<label><input type="radio" name="summary_length" value="{}"{checked}> {}</label>"#,
            length.as_str(),
            length.label()
        );
    }
    let panel_display = if page.summary.visible { "block" } else { "none" };
    let _ = write!(
        body,
        r#"<section id="summarize-tab" class="tab-content active"><form method="post" action="/ui/summarize"><textarea id="text-input" name="text" rows="8">{text}</textarea><div class="summary-lengths">{lengths}</div>{button}</form><div id="summary-result" class="summary-result" style="display: {panel_display}"><p id="summary-text">{summary}</p></div></section>"#,
        text = escape(&selection.text),
        button = action_button("summarize-btn", "Summarize", page.summarize_button),
        summary = escape(&page.summary.text),
    );

    page_shell("News Desk", &body)
}

pub fn digest_page(page: &DigestPage) -> String {
    let selection = &page.selection;
    let (label, spinner, disabled) = if page.fetch_button.is_loading() {
        ("Fetching...", "inline-block", " disabled")
    } else {
        ("Fetch &amp; Summarize", "none", "")
    };
    let grid = match page.categories {
        LoadState::Loading => r#"<p class="loading">Loading categories...</p>"#.to_string(),
        _ => digest_category_grid(&selection.categories),
    };
    let results_display = if page.results_visible { "block" } else { "none" };
    let count = page
        .count_display
        .map(|c| c.to_string())
        .unwrap_or_default();
    let (min, max) = crate::state::DIGEST_MAX_ARTICLES;

    let body = format!(
        r#"<section class="digest"><form method="post" action="/ui/digest"><div id="categoriesContainer" class="categories">{grid}</div><label for="articleCount">Number of articles</label><input type="number" id="articleCount" name="article_count" min="{min}" max="{max}" value="{value}"><button type="submit" id="fetchBtn" class="fetch-btn"{disabled}><span class="btn-text">{label}</span><span class="spinner" style="display: {spinner}"></span></button></form></section><section id="resultsSection" class="results" style="display: {results_display}"><h2>Results (<span id="articleCountDisplay">{count}</span>)</h2><div id="articlesContainer">{articles}</div></section>"#,
        value = selection.article_count,
        articles = page.articles,
    );

    page_shell("News Digest", &body)
}

/// Plain-text rendition of a fragment, used by the command line.
pub fn to_text(fragment: &str, width: usize) -> Result<String, html2text::Error> {
    html2text::from_read(fragment.as_bytes(), width)
}
