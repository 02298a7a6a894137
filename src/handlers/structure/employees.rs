use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::store::DepartmentStore;

use super::pg_gateway;

/// GET /api/structure/employees - identity list for the manager picker
pub async fn employees_list() -> Result<Json<Value>, ApiError> {
    let gateway = pg_gateway().await?;
    let employees = gateway.store().list_identities().await?;
    Ok(Json(json!({ "ok": true, "employees": employees })))
}
