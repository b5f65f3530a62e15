//! What the two pages currently show. The controller owns one [`Page`] and
//! publishes a clone after every event it handles.

use crate::state::{DeskSelection, DigestSelection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonState {
    #[default]
    Idle,
    Loading,
}

impl ButtonState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ButtonState::Loading)
    }
}

/// Progress of the digest category list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPanel {
    pub visible: bool,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeskPage {
    pub selection: DeskSelection,
    pub fetch_button: ButtonState,
    pub search_button: ButtonState,
    pub summarize_button: ButtonState,
    /// Markup of the news container.
    pub news_grid: String,
    /// Markup of the search results container.
    pub search_results: String,
    pub summary: SummaryPanel,
    /// A blocking message for the user, replaced by the next one.
    pub alert: Option<String>,
    /// Error behind the most recent failed request, if the last one failed.
    pub last_failure: Option<String>,
}

impl DeskPage {
    pub fn is_settled(&self) -> bool {
        !self.fetch_button.is_loading()
            && !self.search_button.is_loading()
            && !self.summarize_button.is_loading()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigestPage {
    pub selection: DigestSelection,
    pub categories: LoadState,
    pub fetch_button: ButtonState,
    pub results_visible: bool,
    pub count_display: Option<usize>,
    /// Markup of the articles container.
    pub articles: String,
    /// Message currently shown in place of the articles.
    pub error: Option<String>,
    pub last_failure: Option<String>,
}

impl DigestPage {
    pub fn is_settled(&self) -> bool {
        !self.fetch_button.is_loading() && self.categories != LoadState::Loading
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub desk: DeskPage,
    pub digest: DigestPage,
}

impl Page {
    /// True when no request started from either page is still pending.
    pub fn is_settled(&self) -> bool {
        self.desk.is_settled() && self.digest.is_settled()
    }
}
