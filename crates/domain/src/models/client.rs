//! Client (hiring company) domain models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Minimal view of a client used to link imported jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
    /// Vincere company id this client was imported from.
    pub vincere_id: String,
}

/// Build the Vincere company id -> client id lookup.
///
/// Keys are trimmed. If two clients claim the same company id the first one
/// wins and the collision is logged.
pub fn build_client_lookup(clients: impl IntoIterator<Item = ClientRef>) -> HashMap<String, Uuid> {
    let mut lookup = HashMap::new();

    for client in clients {
        let key = client.vincere_id.trim().to_string();
        if key.is_empty() {
            continue;
        }

        if let Some(existing) = lookup.get(&key) {
            tracing::warn!(
                vincere_id = %key,
                kept_client_id = %existing,
                ignored_client_id = %client.id,
                "Duplicate Vincere company id on clients"
            );
            continue;
        }

        lookup.insert(key, client.id);
    }

    lookup
}
