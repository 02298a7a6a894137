//! Handlers for the structure API: the concrete surface of the department
//! store. Permission checks run through the same gateway the clients use;
//! the server is the authoritative side of that double check.

pub mod departments;
pub mod employees;

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::gateway::MutationGateway;
use crate::store::{PgStore, StoreOracle};

/// Gateway over the live database, one per request.
pub(crate) async fn pg_gateway() -> Result<MutationGateway<PgStore, StoreOracle<PgStore>>, ApiError>
{
    let pool = DatabaseManager::pool().await?;
    let store = PgStore::new(pool);
    Ok(MutationGateway::new(store.clone(), StoreOracle::new(store)))
}
