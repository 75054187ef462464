// Use case: search_clients.

use crate::application::context::AppContext;
use crate::domain::entities::client::Client;
use crate::infrastructure::db::stores::client_store::ClientRepositoryError;
use tracing::{debug, error};

/// Finds clients by a fragment of their name.
pub struct SearchClientsUseCase;

/// The three distinguishable results of a name search.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The term was missing or blank, so every client is returned.
    All(Vec<Client>),
    /// At least one client matched the term.
    Matches(Vec<Client>),
    /// A non-blank term matched nobody.
    NoMatches,
}

impl SearchOutcome {
    pub fn into_clients(self) -> Vec<Client> {
        match self {
            SearchOutcome::All(clients) | SearchOutcome::Matches(clients) => clients,
            SearchOutcome::NoMatches => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum SearchClientsError {
    Storage(String),
}

impl SearchClientsUseCase {
    pub async fn execute(
        ctx: &AppContext,
        name: Option<&str>,
    ) -> Result<SearchOutcome, SearchClientsError> {
        let storage = |e: ClientRepositoryError| {
            error!(error = ?e, "client search failed");
            SearchClientsError::Storage(format!("{e:?}"))
        };

        // Step 1: A blank term behaves exactly like listing everything.
        let term = name.map(str::trim).unwrap_or_default();
        if term.is_empty() {
            let clients = ctx.repos.client.list().await.map_err(storage)?;
            return Ok(SearchOutcome::All(clients));
        }

        // Step 2: Substring match; an empty result is its own outcome.
        let clients = ctx
            .repos
            .client
            .search_by_name(term)
            .await
            .map_err(storage)?;
        if clients.is_empty() {
            debug!(term, "client search matched nothing");
            return Ok(SearchOutcome::NoMatches);
        }

        Ok(SearchOutcome::Matches(clients))
    }
}
