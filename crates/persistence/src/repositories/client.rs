//! Client repository for database operations.

use sqlx::PgPool;

use crate::entities::ClientRefEntity;
use crate::metrics::QueryTimer;

/// Repository for the clients table. Read-only: clients are created by a
/// separate pipeline.
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    /// Creates a new ClientRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clients linked to a Vincere company, oldest first.
    pub async fn find_with_vincere_id(&self) -> Result<Vec<ClientRefEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_clients_with_vincere_id");
        let result = sqlx::query_as::<_, ClientRefEntity>(
            r#"
            SELECT id, name, vincere_id
            FROM clients
            WHERE vincere_id IS NOT NULL AND vincere_id <> ''
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
