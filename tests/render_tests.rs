use newsdesk::data_models::{Article, Category, SearchResult, desk_categories};
use newsdesk::page::{ButtonState, DeskPage, DigestPage, LoadState};
use newsdesk::render::{self, messages};
use newsdesk::state::CategorySelection;
use scraper::{Html, Selector};

mod test_helpers {
    use super::*;

    pub fn article(title: &str, category: &str) -> Article {
        Article {
            title: title.to_string(),
            description: Some(format!("About {title}")),
            url: Some(format!("https://news.example/{title}")),
            source: "Example Wire".to_string(),
            category: Some(category.to_string()),
            published: Some("2024-03-05T10:00:00Z".to_string()),
            ..Default::default()
        }
    }

    pub fn select<'a>(doc: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).collect()
    }

    pub fn text(element: &scraper::ElementRef<'_>) -> String {
        element.text().collect::<String>()
    }
}

use test_helpers::*;

#[cfg(test)]
mod news_grid_tests {
    use super::*;

    #[test]
    fn test_one_card_per_article() {
        let articles = vec![
            article("a", "Technology"),
            article("b", "Technology"),
            article("c", "Technology"),
        ];
        let doc = Html::parse_fragment(&render::news_grid(&articles, &desk_categories()));

        assert_eq!(select(&doc, ".news-card").len(), 3);
        for tag in select(&doc, ".news-card-category") {
            assert_eq!(text(&tag), "💻 Technology");
        }
        assert!(select(&doc, ".empty-state").is_empty());
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let html = render::news_grid(&[], &desk_categories());
        let doc = Html::parse_fragment(&html);
        let placeholders = select(&doc, ".empty-state");

        assert_eq!(placeholders.len(), 1);
        assert_eq!(text(&placeholders[0]), messages::NO_ARTICLES);
        assert!(select(&doc, ".news-card").is_empty());
    }

    #[test]
    fn test_long_description_is_truncated() {
        let mut long = article("long", "Sports");
        long.description = Some("x".repeat(200));
        let doc = Html::parse_fragment(&render::news_card(&long, &desk_categories()));
        let description = text(&select(&doc, ".news-card-description")[0]);

        assert_eq!(description, format!("{}...", "x".repeat(150)));
    }

    #[test]
    fn test_description_falls_back_to_content() {
        let mut a = article("content", "Sports");
        a.description = None;
        a.content = Some("Full body".to_string());
        let doc = Html::parse_fragment(&render::news_card(&a, &desk_categories()));

        assert_eq!(text(&select(&doc, ".news-card-description")[0]), "Full body");
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let a = article("plain", "Health");
        let doc = Html::parse_fragment(&render::news_card(&a, &desk_categories()));
        assert!(select(&doc, "img").is_empty());
        assert_eq!(select(&doc, "div.news-card-image").len(), 1);

        let mut with_image = article("pic", "Health");
        with_image.image = Some("https://img.example/pic.jpg".to_string());
        let doc = Html::parse_fragment(&render::news_card(&with_image, &desk_categories()));
        let images = select(&doc, "img.news-card-image");
        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0].value().attr("src"),
            Some("https://img.example/pic.jpg")
        );
        assert!(images[0].value().attr("onerror").is_some());
    }

    #[test]
    fn test_unknown_category_gets_default_icon() {
        let a = article("odd", "Weather");
        let doc = Html::parse_fragment(&render::news_card(&a, &desk_categories()));
        assert_eq!(text(&select(&doc, ".news-card-category")[0]), "📰 Weather");
    }

    #[test]
    fn test_card_meta_and_link() {
        let a = article("meta", "Business");
        let doc = Html::parse_fragment(&render::news_card(&a, &desk_categories()));
        let meta = text(&select(&doc, ".news-card-meta")[0]);

        assert!(meta.contains("Example Wire"));
        assert!(meta.contains("3/5/2024"));
        assert_eq!(
            select(&doc, "a.news-card-link")[0].value().attr("href"),
            Some("https://news.example/meta")
        );
    }

    #[test]
    fn test_markup_in_titles_is_escaped() {
        let a = article("<script>alert(1)</script>", "Business");
        let doc = Html::parse_fragment(&render::news_card(&a, &desk_categories()));

        assert!(select(&doc, "script").is_empty());
        assert_eq!(
            text(&select(&doc, ".news-card-title")[0]),
            "<script>alert(1)</script>"
        );
    }
}

#[cfg(test)]
mod search_results_tests {
    use super::*;

    #[test]
    fn test_link_only_when_url_present() {
        let results = vec![
            SearchResult {
                title: "with".into(),
                snippet: "s".into(),
                source: "src".into(),
                url: Some("https://news.example/with".into()),
                published: None,
            },
            SearchResult {
                title: "without".into(),
                snippet: "s".into(),
                source: "src".into(),
                url: Some("".into()),
                published: None,
            },
        ];
        let doc = Html::parse_fragment(&render::search_results(&results));

        let cards = select(&doc, ".search-result-card");
        assert_eq!(cards.len(), 2);
        assert_eq!(select(&doc, ".search-result-card a").len(), 1);
    }

    #[test]
    fn test_empty_results_placeholder() {
        let doc = Html::parse_fragment(&render::search_results(&[]));
        let placeholders = select(&doc, ".empty-state");
        assert_eq!(placeholders.len(), 1);
        assert_eq!(text(&placeholders[0]), messages::NO_RESULTS);
    }
}

#[cfg(test)]
mod digest_tests {
    use super::*;

    #[test]
    fn test_digest_card_defaults() {
        let a = Article {
            title: "t".into(),
            source: "s".into(),
            summary: Some("short summary".into()),
            ..Default::default()
        };
        let doc = Html::parse_fragment(&render::digest_card(&a));

        assert_eq!(text(&select(&doc, ".article-category")[0]), "General");
        assert_eq!(text(&select(&doc, ".article-date")[0]), "📅 N/A");
        assert_eq!(text(&select(&doc, ".article-summary")[0]), "short summary");
    }

    #[test]
    fn test_empty_digest_placeholder() {
        let doc = Html::parse_fragment(&render::digest_articles(&[]));
        assert_eq!(
            text(&select(&doc, ".empty-state")[0]),
            messages::NO_DIGEST_ARTICLES
        );
    }

    #[test]
    fn test_digest_page_loading_button() {
        let page = DigestPage {
            fetch_button: ButtonState::Loading,
            categories: LoadState::Loaded,
            ..Default::default()
        };
        let doc = Html::parse_document(&render::digest_page(&page));
        let button = select(&doc, "#fetchBtn")[0];

        assert!(button.value().attr("disabled").is_some());
        assert_eq!(text(&select(&doc, "#fetchBtn .btn-text")[0]), "Fetching...");
    }

    #[test]
    fn test_digest_grid_marks_selected() {
        let mut selection = CategorySelection::new(vec![
            Category::new("Sports", "⚽"),
            Category::new("Health", "🏥"),
        ]);
        selection.toggle("Health", true);
        let doc = Html::parse_fragment(&render::digest_category_grid(&selection));

        let selected = select(&doc, ".category-item.selected");
        assert_eq!(selected.len(), 1);
        assert!(text(&selected[0]).contains("Health"));
        assert_eq!(select(&doc, "input[checked]").len(), 1);
    }
}

#[cfg(test)]
mod desk_page_tests {
    use super::*;

    #[test]
    fn test_loading_button_shows_spinner() {
        let page = DeskPage {
            search_button: ButtonState::Loading,
            ..Default::default()
        };
        let doc = Html::parse_document(&render::desk_page(&page));

        assert!(select(&doc, "#search-btn")[0].value().attr("disabled").is_some());
        assert!(select(&doc, "#fetch-btn")[0].value().attr("disabled").is_none());
        assert_eq!(
            select(&doc, "#search-btn .loader")[0].value().attr("style"),
            Some("display: inline-block")
        );
    }

    #[test]
    fn test_all_categories_checked_by_default() {
        let doc = Html::parse_document(&render::desk_page(&DeskPage::default()));
        assert_eq!(select(&doc, "#category-grid input[checked]").len(), 9);
        assert_eq!(
            select(&doc, "#summary-result")[0].value().attr("style"),
            Some("display: none")
        );
    }

    #[test]
    fn test_alert_is_rendered() {
        let page = DeskPage {
            alert: Some("Please enter a search query".into()),
            ..Default::default()
        };
        let doc = Html::parse_document(&render::desk_page(&page));
        assert_eq!(
            text(&select(&doc, ".alert")[0]),
            "Please enter a search query"
        );
    }
}

#[test]
fn test_text_rendition() {
    let html = render::news_grid(&[article("Headline", "Technology")], &desk_categories());
    let text = render::to_text(&html, 80).unwrap();
    assert!(text.contains("Headline"));
    assert!(!text.contains("<div"));
}
