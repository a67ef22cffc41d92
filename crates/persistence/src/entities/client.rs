//! Client entity (database row mapping).

use domain::models::ClientRef;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the clients table restricted to what job linking needs.
#[derive(Debug, Clone, FromRow)]
pub struct ClientRefEntity {
    pub id: Uuid,
    pub name: String,
    pub vincere_id: String,
}

impl From<ClientRefEntity> for ClientRef {
    fn from(entity: ClientRefEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            vincere_id: entity.vincere_id,
        }
    }
}
