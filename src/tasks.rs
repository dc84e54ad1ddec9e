// Background loads.
// Each request runs on the tokio runtime and reports back over a channel.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::api::{CharacterPage, Comment, Country, NewPost, Post};
use crate::error::Result;
use crate::services::{CharacterQuery, Services, WeatherQuery, WeatherReport};
use crate::state::Ticket;

/// Work a view asks for.
#[derive(Debug, Clone)]
pub enum LoadRequest {
    Posts,
    PostComments(u64),
    CreatePost(NewPost),
    UpdatePost(u64, NewPost),
    DeletePost(u64),
    Characters(CharacterQuery),
    Countries,
    Weather(WeatherQuery),
}

impl LoadRequest {
    fn name(&self) -> &'static str {
        match self {
            LoadRequest::Posts => "posts",
            LoadRequest::PostComments(_) => "post_comments",
            LoadRequest::CreatePost(_) => "create_post",
            LoadRequest::UpdatePost(..) => "update_post",
            LoadRequest::DeletePost(_) => "delete_post",
            LoadRequest::Characters(_) => "characters",
            LoadRequest::Countries => "countries",
            LoadRequest::Weather(_) => "weather",
        }
    }
}

/// Result of a [`LoadRequest`].
#[derive(Debug)]
pub enum LoadOutcome {
    Posts(Result<Vec<Post>>),
    PostComments(Result<Vec<Comment>>),
    PostCreated(Result<Post>),
    PostUpdated(Result<Post>),
    PostDeleted(u64, Result<()>),
    Characters(Result<CharacterPage>),
    Countries(Result<Vec<Country>>),
    Weather(Result<WeatherReport>),
}

impl LoadOutcome {
    fn is_err(&self) -> bool {
        match self {
            LoadOutcome::Posts(r) => r.is_err(),
            LoadOutcome::PostComments(r) => r.is_err(),
            LoadOutcome::PostCreated(r) => r.is_err(),
            LoadOutcome::PostUpdated(r) => r.is_err(),
            LoadOutcome::PostDeleted(_, r) => r.is_err(),
            LoadOutcome::Characters(r) => r.is_err(),
            LoadOutcome::Countries(r) => r.is_err(),
            LoadOutcome::Weather(r) => r.is_err(),
        }
    }
}

/// A finished load, tagged with the ticket it was started under.
#[derive(Debug)]
pub struct Loaded {
    pub ticket: Ticket,
    pub outcome: LoadOutcome,
}

/// Run a request to completion.
pub async fn execute(services: &Services, request: LoadRequest) -> LoadOutcome {
    match request {
        LoadRequest::Posts => LoadOutcome::Posts(services.posts.list_posts().await),
        LoadRequest::PostComments(id) => LoadOutcome::PostComments(services.posts.post_comments(id).await),
        LoadRequest::CreatePost(draft) => LoadOutcome::PostCreated(services.posts.create_post(&draft).await),
        LoadRequest::UpdatePost(id, draft) => {
            LoadOutcome::PostUpdated(services.posts.update_post(id, &draft).await)
        }
        LoadRequest::DeletePost(id) => LoadOutcome::PostDeleted(id, services.posts.delete_post(id).await),
        LoadRequest::Characters(query) => {
            LoadOutcome::Characters(services.characters.list_characters(&query).await)
        }
        LoadRequest::Countries => LoadOutcome::Countries(services.countries.all_countries().await),
        LoadRequest::Weather(query) => LoadOutcome::Weather(services.weather.current(&query).await),
    }
}

/// Start a request in the background. The outcome is sent even if the view
/// that asked for it is gone; the receiver decides whether it still matters.
pub fn spawn(services: Arc<Services>, ticket: Ticket, request: LoadRequest, tx: UnboundedSender<Loaded>) {
    let name = request.name();
    debug!(request = name, generation = ticket.generation, "spawning load");
    tokio::spawn(async move {
        let outcome = execute(&services, request).await;
        if outcome.is_err() {
            warn!(request = name, generation = ticket.generation, "load failed");
        }
        if tx.send(Loaded { ticket, outcome }).is_err() {
            debug!(request = name, "receiver closed, dropping outcome");
        }
    });
}
