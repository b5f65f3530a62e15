use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use newsdesk::api;
use newsdesk::cli::{Cli, Command, OutputFormat};
use newsdesk::client::{HttpDeskClient, HttpDigestClient};
use newsdesk::config::CONFIG;
use newsdesk::controller::{Controller, ControllerHandle, DeskEvent, DigestEvent, Event};
use newsdesk::render;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let api_url = cli.api_url.clone().unwrap_or_else(|| CONFIG.api_url.clone());
    let digest_url = cli
        .digest_url
        .clone()
        .unwrap_or_else(|| CONFIG.digest_url.clone());

    let http = reqwest::Client::new();
    let desk = HttpDeskClient::with_client(http.clone(), &api_url)?;
    let digest = HttpDigestClient::with_client(http, &digest_url)?;
    let controller = Controller::spawn(Arc::new(desk), Arc::new(digest));

    match cli.command {
        Command::Serve { bind, static_dir } => {
            let bind = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let static_dir = static_dir.unwrap_or_else(|| CONFIG.static_dir.clone());
            api::serve(controller, &bind, &static_dir).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fetch {
            categories,
            max_articles,
        } => {
            let mut events: Vec<Event> = Vec::new();
            if !categories.is_empty() {
                events.push(DeskEvent::SelectCategories(categories).into());
            }
            events.push(DeskEvent::SetMaxArticles(max_articles).into());
            events.push(DeskEvent::FetchClicked.into());
            let page = controller.run(events).await?;
            finish_desk(&page.desk, &page.desk.news_grid, cli.format)
        }
        Command::Search { query, k } => {
            let page = controller
                .run([
                    DeskEvent::SetQuery(query),
                    DeskEvent::SetResultCount(k),
                    DeskEvent::SearchClicked,
                ])
                .await?;
            finish_desk(&page.desk, &page.desk.search_results, cli.format)
        }
        Command::Summarize { text, length } => {
            let text = if text == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read text from stdin")?;
                buf
            } else {
                text
            };
            let page = controller
                .run([
                    DeskEvent::SetText(text),
                    DeskEvent::SetSummaryLength(length),
                    DeskEvent::SummarizeClicked,
                ])
                .await?;
            let fragment = if page.desk.summary.visible {
                format!(
                    r#"<p id="summary-text">{}</p>"#,
                    render::escape(&page.desk.summary.text)
                )
            } else {
                String::new()
            };
            finish_desk(&page.desk, &fragment, cli.format)
        }
        Command::Digest {
            categories,
            max_articles,
        } => {
            let page = open_digest(&controller).await?;
            if page.digest.last_failure.is_some() {
                return finish_digest(&page.digest, cli.format);
            }
            let page = controller
                .run([
                    DigestEvent::SelectCategories(categories),
                    DigestEvent::SetArticleCount(max_articles),
                    DigestEvent::FetchClicked,
                ])
                .await?;
            finish_digest(&page.digest, cli.format)
        }
        Command::Categories => {
            let page = open_digest(&controller).await?;
            if page.digest.last_failure.is_some() {
                return finish_digest(&page.digest, cli.format);
            }
            for category in page.digest.selection.categories.known() {
                println!("{} {}", category.icon, category.name);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn open_digest(controller: &ControllerHandle) -> anyhow::Result<newsdesk::page::Page> {
    Ok(controller.run([DigestEvent::Opened]).await?)
}

fn emit(fragment: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Html => println!("{fragment}"),
        OutputFormat::Text => print!("{}", render::to_text(fragment, 80)?),
    }
    Ok(())
}

fn finish_desk(
    page: &newsdesk::page::DeskPage,
    fragment: &str,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    if let Some(e) = &page.last_failure {
        match &page.alert {
            Some(alert) => eprintln!("{alert}"),
            None => emit(fragment, format)?,
        }
        eprintln!("{e}");
        return Ok(ExitCode::FAILURE);
    }
    if let Some(alert) = &page.alert {
        eprintln!("{alert}");
        return Ok(ExitCode::from(2));
    }
    if !fragment.is_empty() {
        emit(fragment, format)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn finish_digest(
    page: &newsdesk::page::DigestPage,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    emit(&page.articles, format)?;
    if let Some(e) = &page.last_failure {
        eprintln!("{e}");
        return Ok(ExitCode::FAILURE);
    }
    if let Some(message) = &page.error {
        eprintln!("{message}");
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
