use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};

use crate::controller::{ControllerHandle, DeskEvent, DigestEvent};
use crate::error::ControllerClosed;
use crate::page::Page;
use crate::render;

use super::models::{DigestForm, FetchForm, FormPairs, SearchForm, SummarizeForm};

type HandlerError = (StatusCode, String);

fn unavailable(e: ControllerClosed) -> HandlerError {
    (StatusCode::SERVICE_UNAVAILABLE, format!("Page error: {}", e))
}

// form handlers wait only for the action they triggered
fn digest_settled(page: &Page) -> bool {
    page.digest.is_settled()
}

pub async fn desk_page(
    State(controller): State<ControllerHandle>,
) -> Result<Html<String>, HandlerError> {
    let page = controller.flush().await.map_err(unavailable)?;
    let html = render::desk_page(&page.desk);

    // alerts are shown once, like a dismissed dialog
    if let Some(alert) = page.desk.alert {
        controller
            .dispatch(DeskEvent::DismissAlert(alert))
            .map_err(unavailable)?;
    }
    Ok(Html(html))
}

pub async fn digest_page(
    State(controller): State<ControllerHandle>,
) -> Result<Html<String>, HandlerError> {
    let page = controller
        .run_until([DigestEvent::Opened], digest_settled)
        .await
        .map_err(unavailable)?;
    Ok(Html(render::digest_page(&page.digest)))
}

pub async fn fetch_news_handler(
    State(controller): State<ControllerHandle>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, HandlerError> {
    let form = FetchForm::from_pairs(&pairs);
    controller
        .run_until(form.into_events(), |page: &Page| {
            !page.desk.fetch_button.is_loading()
        })
        .await
        .map_err(unavailable)?;
    Ok(Redirect::to("/"))
}

pub async fn search_handler(
    State(controller): State<ControllerHandle>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, HandlerError> {
    let form = SearchForm::from_pairs(&pairs);
    controller
        .run_until(form.into_events(), |page: &Page| {
            !page.desk.search_button.is_loading()
        })
        .await
        .map_err(unavailable)?;
    Ok(Redirect::to("/"))
}

pub async fn summarize_handler(
    State(controller): State<ControllerHandle>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, HandlerError> {
    let form = SummarizeForm::from_pairs(&pairs);
    controller
        .run_until(form.into_events(), |page: &Page| {
            !page.desk.summarize_button.is_loading()
        })
        .await
        .map_err(unavailable)?;
    Ok(Redirect::to("/"))
}

pub async fn digest_handler(
    State(controller): State<ControllerHandle>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, HandlerError> {
    let form = DigestForm::from_pairs(&pairs);
    controller
        .run_until(form.into_events(), digest_settled)
        .await
        .map_err(unavailable)?;
    Ok(Redirect::to("/digest"))
}
