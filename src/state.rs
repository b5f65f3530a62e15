use crate::data_models::{Category, SummaryLength, desk_categories};

/// A ranged integer input. Values outside the range are clamped on set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    value: i64,
    pub min: i64,
    pub max: i64,
}

impl Slider {
    pub fn new(value: i64, min: i64, max: i64) -> Slider {
        let mut slider = Slider { value: min, min, max };
        slider.set(value);
        slider
    }

    pub fn set(&mut self, value: i64) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// The known categories and the ones currently picked, in pick order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySelection {
    known: Vec<Category>,
    selected: Vec<String>,
}

impl CategorySelection {
    pub fn new(known: Vec<Category>) -> Self {
        Self {
            known,
            selected: Vec::new(),
        }
    }

    pub fn all_selected(known: Vec<Category>) -> Self {
        let selected = known.iter().map(|c| c.name.clone()).collect();
        Self { known, selected }
    }

    pub fn known(&self) -> &[Category] {
        &self.known
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.iter().any(|c| c.name == name)
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    /// Checks or unchecks one category. Returns false for names outside the
    /// known set, which are ignored.
    pub fn toggle(&mut self, name: &str, checked: bool) -> bool {
        if !self.is_known(name) {
            return false;
        }
        if checked {
            if !self.is_selected(name) {
                self.selected.push(name.to_string());
            }
        } else {
            self.selected.retain(|s| s != name);
        }
        true
    }

    /// Replaces the whole selection, dropping unknown names and duplicates.
    pub fn replace<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selected.clear();
        for name in names {
            self.toggle(name.as_ref(), true);
        }
    }

    /// Swaps in a new known set, keeping only the picks that still exist.
    pub fn set_known(&mut self, known: Vec<Category>) {
        self.known = known;
        let known = &self.known;
        self.selected.retain(|s| known.iter().any(|c| &c.name == s));
    }
}

pub const DESK_MAX_ARTICLES: (i64, i64, i64) = (10, 1, 50);
pub const DESK_RESULT_COUNT: (i64, i64, i64) = (5, 1, 20);
pub const DIGEST_MAX_ARTICLES: (i64, i64) = (1, 50);
pub const DIGEST_DEFAULT_ARTICLES: i64 = 10;

/// Inputs of the desk page.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskSelection {
    pub categories: CategorySelection,
    pub max_articles: Slider,
    pub result_count: Slider,
    pub query: String,
    pub text: String,
    pub summary_length: SummaryLength,
}

impl Default for DeskSelection {
    fn default() -> Self {
        let (value, min, max) = DESK_MAX_ARTICLES;
        let (k, k_min, k_max) = DESK_RESULT_COUNT;
        Self {
            categories: CategorySelection::all_selected(desk_categories()),
            max_articles: Slider::new(value, min, max),
            result_count: Slider::new(k, k_min, k_max),
            query: String::new(),
            text: String::new(),
            summary_length: SummaryLength::default(),
        }
    }
}

/// Inputs of the digest page. The article count is a free number field and
/// is range checked at submit time instead of clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSelection {
    pub categories: CategorySelection,
    pub article_count: i64,
}

impl Default for DigestSelection {
    fn default() -> Self {
        Self {
            categories: CategorySelection::default(),
            article_count: DIGEST_DEFAULT_ARTICLES,
        }
    }
}
