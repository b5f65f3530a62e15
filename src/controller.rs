//! The page controller.
//!
//! One task owns the [`Page`] and handles messages one at a time: user
//! events sent through a [`ControllerHandle`], and completions posted back by
//! the request tasks it spawns. Requests are never cancelled and their
//! completions are applied in the order they arrive. After every message the
//! new page is published on a watch channel.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::client::{DeskApi, DigestApi};
use crate::data_models::{
    Article, Category, Digest, FetchNewsRequest, SearchRequest, SearchResult, SummarizeRequest,
    SummaryLength,
};
use crate::error::{ClientError, ControllerClosed, ValidationError};
use crate::page::{ButtonState, DeskPage, LoadState, Page};
use crate::render::{self, messages};
use crate::state::DIGEST_MAX_ARTICLES;

#[derive(Debug, Clone, PartialEq)]
pub enum DeskEvent {
    ToggleCategory { name: String, checked: bool },
    SelectCategories(Vec<String>),
    SetMaxArticles(i64),
    SetResultCount(i64),
    SetQuery(String),
    SetText(String),
    SetSummaryLength(SummaryLength),
    /// Clears the alert, but only if it still reads as given.
    DismissAlert(String),
    FetchClicked,
    SearchClicked,
    SummarizeClicked,
}

/// Events other than `Opened` that arrive while the category list is loading
/// are held and replayed once it has loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum DigestEvent {
    /// The page was shown; loads the category list unless it already is.
    Opened,
    ToggleCategory { name: String, checked: bool },
    SelectCategories(Vec<String>),
    SetArticleCount(i64),
    FetchClicked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Desk(DeskEvent),
    Digest(DigestEvent),
}

impl From<DeskEvent> for Event {
    fn from(event: DeskEvent) -> Self {
        Event::Desk(event)
    }
}

impl From<DigestEvent> for Event {
    fn from(event: DigestEvent) -> Self {
        Event::Digest(event)
    }
}

enum Completion {
    News(Result<Vec<Article>, ClientError>),
    Search(Result<Vec<SearchResult>, ClientError>),
    Summary(Result<String, ClientError>),
    Digest(Result<Digest, ClientError>),
    Categories(Result<Vec<Category>, ClientError>),
}

enum Message {
    Ui(Event),
    Completed(Completion),
    /// Acknowledged once every message queued before it has been handled.
    Barrier(oneshot::Sender<()>),
}

pub struct Controller {
    desk_api: Arc<dyn DeskApi>,
    digest_api: Arc<dyn DigestApi>,
    page: Page,
    deferred_digest: Vec<DigestEvent>,
    inbox: mpsc::UnboundedReceiver<Message>,
    outbox: mpsc::WeakUnboundedSender<Message>,
    view_tx: watch::Sender<Page>,
}

impl Controller {
    /// Starts the controller loop on the current tokio runtime. The loop
    /// stops once every handle is dropped and no request is in flight.
    pub fn spawn(desk_api: Arc<dyn DeskApi>, digest_api: Arc<dyn DigestApi>) -> ControllerHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let page = Page::default();
        let (view_tx, view_rx) = watch::channel(page.clone());

        let controller = Controller {
            desk_api,
            digest_api,
            page,
            deferred_digest: Vec::new(),
            inbox: rx,
            outbox: tx.downgrade(),
            view_tx,
        };
        tokio::spawn(controller.run());

        ControllerHandle { tx, view: view_rx }
    }

    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            match message {
                Message::Ui(Event::Desk(event)) => self.handle_desk(event),
                Message::Ui(Event::Digest(event)) => self.handle_digest(event),
                Message::Completed(completion) => self.complete(completion),
                Message::Barrier(ack) => {
                    let _ = ack.send(());
                    continue;
                }
            }
            self.view_tx.send_replace(self.page.clone());
        }
        log::debug!("controller loop stopped");
    }

    fn spawn_request<F>(&self, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let Some(outbox) = self.outbox.upgrade() else {
            log::warn!("dropping request, controller is shutting down");
            return;
        };
        tokio::spawn(async move {
            let completion = request.await;
            let _ = outbox.send(Message::Completed(completion));
        });
    }

    // =========================================================================
    // Desk
    // =========================================================================

    fn handle_desk(&mut self, event: DeskEvent) {
        match event {
            DeskEvent::FetchClicked => self.desk_fetch(),
            DeskEvent::SearchClicked => self.desk_search(),
            DeskEvent::SummarizeClicked => self.desk_summarize(),
            input => apply_desk_input(&mut self.page.desk, input),
        }
    }

    fn desk_fetch(&mut self) {
        let desk = &mut self.page.desk;
        if desk.fetch_button.is_loading() {
            log::debug!("fetch already in progress");
            return;
        }
        desk.alert = None;

        let categories = desk.selection.categories.selected().to_vec();
        if categories.is_empty() {
            desk.alert = Some(ValidationError::NoCategories.to_string());
            return;
        }

        desk.fetch_button = ButtonState::Loading;
        desk.news_grid.clear();

        let request = FetchNewsRequest {
            categories,
            max_articles: desk.selection.max_articles.value() as u32,
        };
        log::info!(
            "fetching up to {} articles for {:?}",
            request.max_articles,
            request.categories
        );
        let api = self.desk_api.clone();
        self.spawn_request(async move { Completion::News(api.fetch_news(&request).await) });
    }

    fn desk_search(&mut self) {
        let desk = &mut self.page.desk;
        if desk.search_button.is_loading() {
            log::debug!("search already in progress");
            return;
        }
        desk.alert = None;

        let query = desk.selection.query.trim().to_string();
        if query.is_empty() {
            desk.alert = Some(ValidationError::EmptyQuery.to_string());
            return;
        }

        desk.search_button = ButtonState::Loading;
        desk.search_results.clear();

        let request = SearchRequest {
            query,
            k: desk.selection.result_count.value() as u32,
        };
        log::info!("searching {:?} (k={})", request.query, request.k);
        let api = self.desk_api.clone();
        self.spawn_request(async move { Completion::Search(api.search(&request).await) });
    }

    fn desk_summarize(&mut self) {
        let desk = &mut self.page.desk;
        if desk.summarize_button.is_loading() {
            log::debug!("summary already in progress");
            return;
        }
        desk.alert = None;

        let text = desk.selection.text.trim().to_string();
        if text.is_empty() {
            desk.alert = Some(ValidationError::EmptyText.to_string());
            return;
        }

        desk.summarize_button = ButtonState::Loading;
        desk.summary.visible = false;

        let request = SummarizeRequest {
            text,
            summary_length: desk.selection.summary_length,
        };
        log::info!(
            "summarizing {} chars ({})",
            request.text.chars().count(),
            request.summary_length
        );
        let api = self.desk_api.clone();
        self.spawn_request(async move { Completion::Summary(api.summarize(&request).await) });
    }

    // =========================================================================
    // Digest
    // =========================================================================

    fn handle_digest(&mut self, event: DigestEvent) {
        if event != DigestEvent::Opened && self.page.digest.categories == LoadState::Loading {
            log::debug!("holding {event:?} until categories are loaded");
            self.deferred_digest.push(event);
            return;
        }
        match event {
            DigestEvent::Opened => self.digest_load_categories(),
            DigestEvent::FetchClicked => self.digest_fetch(),
            DigestEvent::ToggleCategory { name, checked } => {
                if !self.page.digest.selection.categories.toggle(&name, checked) {
                    log::warn!("ignoring unknown category {name:?}");
                }
            }
            DigestEvent::SelectCategories(names) => {
                self.page.digest.selection.categories.replace(&names)
            }
            DigestEvent::SetArticleCount(count) => {
                self.page.digest.selection.article_count = count
            }
        }
    }

    fn digest_load_categories(&mut self) {
        let digest = &mut self.page.digest;
        if matches!(digest.categories, LoadState::Loading | LoadState::Loaded) {
            return;
        }
        digest.categories = LoadState::Loading;
        let api = self.digest_api.clone();
        self.spawn_request(async move { Completion::Categories(api.categories().await) });
    }

    fn digest_fetch(&mut self) {
        if self.page.digest.fetch_button.is_loading() {
            log::debug!("digest already in progress");
            return;
        }

        let selection = &self.page.digest.selection;
        let categories = selection.categories.selected().to_vec();
        let count = selection.article_count;
        let (min, max) = DIGEST_MAX_ARTICLES;

        if categories.is_empty() {
            self.digest_error(&ValidationError::NoDigestCategories.to_string());
            return;
        }
        if count < min || count > max {
            self.digest_error(&ValidationError::OutOfRange { min, max }.to_string());
            return;
        }

        self.page.digest.fetch_button = ButtonState::Loading;
        self.page.digest.error = None;

        let request = FetchNewsRequest {
            categories,
            max_articles: count as u32,
        };
        log::info!(
            "fetching digest of {} articles for {:?}",
            request.max_articles,
            request.categories
        );
        let api = self.digest_api.clone();
        self.spawn_request(async move {
            Completion::Digest(api.fetch_and_summarize(&request).await)
        });
    }

    fn digest_error(&mut self, message: &str) {
        let digest = &mut self.page.digest;
        digest.results_visible = true;
        digest.articles = render::error_message(message);
        digest.error = Some(message.to_string());
    }

    // =========================================================================
    // Completions
    // =========================================================================

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::News(result) => {
                let desk = &mut self.page.desk;
                desk.fetch_button = ButtonState::Idle;
                match result {
                    Ok(articles) => {
                        desk.news_grid =
                            render::news_grid(&articles, desk.selection.categories.known());
                        desk.last_failure = None;
                    }
                    Err(e) => {
                        log::error!("error fetching news: {e}");
                        desk.news_grid = render::empty_state(messages::FETCH_FAILED);
                        desk.last_failure = Some(e.to_string());
                    }
                }
            }
            Completion::Search(result) => {
                let desk = &mut self.page.desk;
                desk.search_button = ButtonState::Idle;
                match result {
                    Ok(results) => {
                        desk.search_results = render::search_results(&results);
                        desk.last_failure = None;
                    }
                    Err(e) => {
                        log::error!("error searching: {e}");
                        desk.search_results = render::empty_state(messages::SEARCH_FAILED);
                        desk.last_failure = Some(e.to_string());
                    }
                }
            }
            Completion::Summary(result) => {
                let desk = &mut self.page.desk;
                desk.summarize_button = ButtonState::Idle;
                match result {
                    Ok(summary) => {
                        desk.summary.text = summary;
                        desk.summary.visible = true;
                        desk.last_failure = None;
                    }
                    Err(e) => {
                        log::error!("error summarizing: {e}");
                        desk.alert = Some(messages::SUMMARIZE_FAILED.to_string());
                        desk.last_failure = Some(e.to_string());
                    }
                }
            }
            Completion::Digest(result) => {
                self.page.digest.fetch_button = ButtonState::Idle;
                match result {
                    Ok(digest) => {
                        let page = &mut self.page.digest;
                        page.results_visible = true;
                        page.count_display = Some(digest.count);
                        page.articles = render::digest_articles(&digest.results);
                        page.error = None;
                        page.last_failure = None;
                    }
                    Err(e) => {
                        log::error!("error fetching digest: {e}");
                        self.digest_error(messages::DIGEST_FAILED);
                        self.page.digest.last_failure = Some(e.to_string());
                    }
                }
            }
            Completion::Categories(result) => match result {
                Ok(categories) => {
                    log::info!("loaded {} categories", categories.len());
                    let digest = &mut self.page.digest;
                    digest.selection.categories.set_known(categories);
                    digest.categories = LoadState::Loaded;
                    for event in std::mem::take(&mut self.deferred_digest) {
                        self.handle_digest(event);
                    }
                }
                Err(e) => {
                    log::error!("error loading categories: {e}");
                    if !self.deferred_digest.is_empty() {
                        log::warn!(
                            "dropping {} digest events held for the category list",
                            self.deferred_digest.len()
                        );
                        self.deferred_digest.clear();
                    }
                    self.page.digest.categories = LoadState::Failed;
                    self.digest_error(messages::CATEGORIES_FAILED);
                    self.page.digest.last_failure = Some(e.to_string());
                }
            },
        }
    }
}

fn apply_desk_input(desk: &mut DeskPage, event: DeskEvent) {
    let selection = &mut desk.selection;
    match event {
        DeskEvent::ToggleCategory { name, checked } => {
            if !selection.categories.toggle(&name, checked) {
                log::warn!("ignoring unknown category {name:?}");
            }
        }
        DeskEvent::SelectCategories(names) => selection.categories.replace(&names),
        DeskEvent::SetMaxArticles(value) => selection.max_articles.set(value),
        DeskEvent::SetResultCount(value) => selection.result_count.set(value),
        DeskEvent::SetQuery(query) => selection.query = query,
        DeskEvent::SetText(text) => selection.text = text,
        DeskEvent::SetSummaryLength(length) => selection.summary_length = length,
        DeskEvent::DismissAlert(shown) => {
            if desk.alert.as_deref() == Some(shown.as_str()) {
                desk.alert = None;
            }
        }
        DeskEvent::FetchClicked | DeskEvent::SearchClicked | DeskEvent::SummarizeClicked => {}
    }
}

/// Sends events to a running [`Controller`] and observes its page.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<Message>,
    view: watch::Receiver<Page>,
}

impl ControllerHandle {
    pub fn dispatch(&self, event: impl Into<Event>) -> Result<(), ControllerClosed> {
        self.tx
            .send(Message::Ui(event.into()))
            .map_err(|_| ControllerClosed)
    }

    /// The page as of the last handled message.
    pub fn snapshot(&self) -> Page {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Page> {
        self.view.clone()
    }

    /// Waits until every event dispatched so far has been handled.
    pub async fn flush(&self) -> Result<Page, ControllerClosed> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Message::Barrier(ack_tx))
            .map_err(|_| ControllerClosed)?;
        ack_rx.await.map_err(|_| ControllerClosed)?;
        Ok(self.snapshot())
    }

    /// Waits until every dispatched event has been handled and no request is
    /// pending.
    pub async fn settled(&self) -> Result<Page, ControllerClosed> {
        self.settled_by(Page::is_settled).await
    }

    /// Waits until every dispatched event has been handled and `done` holds
    /// for the page. Requests `done` does not look at may still be pending.
    pub async fn settled_by<F>(&self, done: F) -> Result<Page, ControllerClosed>
    where
        F: Fn(&Page) -> bool,
    {
        self.flush().await?;
        let mut view = self.view.clone();
        let page = view
            .wait_for(|page| done(page))
            .await
            .map_err(|_| ControllerClosed)?;
        Ok(page.clone())
    }

    /// Dispatches `events` in order and returns the settled page.
    pub async fn run<I, E>(&self, events: I) -> Result<Page, ControllerClosed>
    where
        I: IntoIterator<Item = E>,
        E: Into<Event>,
    {
        self.run_until(events, Page::is_settled).await
    }

    /// Dispatches `events` in order and waits for `done`, see
    /// [`ControllerHandle::settled_by`].
    pub async fn run_until<I, E, F>(&self, events: I, done: F) -> Result<Page, ControllerClosed>
    where
        I: IntoIterator<Item = E>,
        E: Into<Event>,
        F: Fn(&Page) -> bool,
    {
        for event in events {
            self.dispatch(event)?;
        }
        self.settled_by(done).await
    }
}
