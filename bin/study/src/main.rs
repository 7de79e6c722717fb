//! Terminal study client: `study <deck-id>`
//!
//! Each input line is one key press (`space`, `enter`, `left`, `ctrl-r`, `?`,
//! a single character, or an empty line for enter).

mod api;
mod render;

use anyhow::Context as _;
use chrono::Utc;
use fd_study::{Control, Session, StudyController, parse_key};
use rand::{SeedableRng, rngs::StdRng};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::api::{ApiClient, ClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let deck_id = std::env::args()
        .nth(1)
        .context("usage: study <deck-id>")?
        .parse::<i64>()
        .context("deck id must be a number")?;

    let config = ClientConfig::from_env().context("AUTH_TOKEN must be set")?;
    let client = ApiClient::new(&config);

    let deck = client.fetch_deck(deck_id).await?;
    tracing::debug!(deck_id = deck.id, cards = deck.cards.len(), "Deck loaded");
    let session = Session::new(deck.id, deck.cards)?;

    let mut controller = StudyController::new(session, client, StdRng::from_entropy());
    controller.start(Utc::now());
    render::screen(&deck.title, controller.session(), false, Utc::now());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(press) = parse_key(&line) else {
            println!("Unknown key {line:?}, press ? for help");
            continue;
        };

        if controller.handle_key(press, Utc::now()).await == Control::Exit {
            break;
        }
        render::screen(
            &deck.title,
            controller.session(),
            controller.help_open(),
            Utc::now(),
        );
    }

    Ok(())
}
