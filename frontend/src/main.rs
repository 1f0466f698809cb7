//! Terminal search page: runs the search controller against a live
//! Elasticsearch and reads interactions from stdin.

use anyhow::Context;
use backend::db_utils::elasticsearch_utils::ElasticsearchClient;
use clap::Parser;
use common::search_query::CollectionMode;
use frontend::{
    components::search_renderer::TextRenderer,
    config::SearchPageConfig,
    data_definitions::user_event::{UserEvent, UserEventSender},
    pages::search_page::SearchController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Faceted search over Elasticsearch collections")]
struct Cli {
    /// Falls back to `ELASTICSEARCH_URL`, then to a local node.
    #[arg(long)]
    elasticsearch_url: Option<String>,

    /// Comma-separated faceted field names.
    #[arg(long, env = "SEARCH_FACETED_FIELDS", default_value = "")]
    faceted_fields: String,

    /// Comma-separated display field names; the first is the result title.
    #[arg(long, env = "SEARCH_DISPLAY_FIELDS", default_value = "title")]
    display_fields: String,

    /// Search the single named collection instead of all of them.
    #[arg(long, env = "SEARCH_SITE_COLLECTION")]
    site_collection: Option<String>,

    /// Initial query string, e.g. `?q=cats&topic[]=biology`.
    #[arg(default_value = "")]
    initial_url: String,
}

const HELP: &str = "commands: toggle <facet> <value> | page <n> | size <n> | q <text> | clear | quit";

fn parse_command(line: &str) -> Result<Option<UserEvent>, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let event = match command {
        "" => return Ok(None),
        "toggle" => {
            let (facet, value) = rest.split_once(' ').ok_or_else(|| HELP.to_string())?;
            UserEvent::FacetValueClicked { facet: facet.to_string(), value: value.trim().to_string() }
        }
        "page" => UserEvent::PageChanged { page: rest.parse().map_err(|_| format!("invalid page {rest:?}"))? },
        "size" => match rest.parse() {
            Ok(size) if size > 0 => UserEvent::PageSizeChanged { size },
            _ => return Err(format!("invalid size {rest:?}")),
        },
        "q" => UserEvent::QuerySubmitted { query_text: rest.to_string() },
        "clear" => UserEvent::ClearFilters,
        _ => return Err(HELP.to_string()),
    };
    Ok(Some(event))
}

async fn read_commands(events: UserEventSender, quit: oneshot::Sender<()>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim() == "quit" {
            break;
        }
        match parse_command(&line) {
            Ok(Some(event)) => {
                if !events.send(event) {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => eprintln!("{}", message),
        }
    }
    let _ = quit.send(());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let backend = match &cli.elasticsearch_url {
        Some(url) => ElasticsearchClient::new(url)?,
        None => ElasticsearchClient::from_env()?,
    };
    let collection_mode = match cli.site_collection {
        Some(site_collection_title) => CollectionMode::Single { site_collection_title },
        None => CollectionMode::Multi,
    };
    let config = SearchPageConfig::new(&cli.faceted_fields, &cli.display_fields, collection_mode);
    info!("Searching {} with {:?}", backend.base_url(), config);

    let renderer = TextRenderer::new(std::io::stdout());
    let mut controller = SearchController::new(config, backend, renderer, &cli.initial_url);
    if let Err(e) = controller.start().await {
        if controller.directory().is_none() {
            return Err(e).context("loading collection directory");
        }
        warn!("Initial search failed: {}", e);
    }
    eprintln!("{}", HELP);

    let (quit_tx, quit_rx) = oneshot::channel();
    let reader = tokio::spawn(read_commands(controller.event_sender(), quit_tx));
    controller
        .run(async {
            let _ = quit_rx.await;
        })
        .await;

    if let Err(e) = reader.await? {
        warn!("Command reader stopped: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("toggle topic marine biology").unwrap(),
            Some(UserEvent::FacetValueClicked { facet: "topic".into(), value: "marine biology".into() })
        );
        assert_eq!(parse_command("page 3").unwrap(), Some(UserEvent::PageChanged { page: 3 }));
        assert_eq!(parse_command("q  sea  ").unwrap(), Some(UserEvent::QuerySubmitted { query_text: "sea".into() }));
        assert_eq!(parse_command("clear").unwrap(), Some(UserEvent::ClearFilters));
        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("size 0").is_err());
        assert!(parse_command("toggle topic").is_err());
    }
}
