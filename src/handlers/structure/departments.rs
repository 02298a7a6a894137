use axum::{extract::Path, response::Json, Extension};
use serde_json::{json, Value};

use crate::error::{ApiError, StructureError};
use crate::models::{DepartmentId, DepartmentInput, Identity};
use crate::store::DepartmentStore;

use super::pg_gateway;

/// GET /api/structure/departments - full flat list, manager email joined in
pub async fn departments_list() -> Result<Json<Value>, ApiError> {
    let gateway = pg_gateway().await?;
    let departments = gateway.store().list_departments().await?;
    Ok(Json(json!({ "ok": true, "departments": departments })))
}

/// POST /api/structure/departments - create one department
pub async fn department_create(
    Extension(acting): Extension<Identity>,
    Json(input): Json<DepartmentInput>,
) -> Result<Json<Value>, ApiError> {
    let gateway = pg_gateway().await?;
    let id = gateway.create_department(input, &acting).await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

/// PUT /api/structure/departments/:id - full-replace update
pub async fn department_update(
    Path(id): Path<String>,
    Extension(acting): Extension<Identity>,
    Json(input): Json<DepartmentInput>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_department_id(&id)?;
    let gateway = pg_gateway().await?;
    gateway.update_department(id, input, &acting).await?;
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/structure/departments/:id
pub async fn department_delete(
    Path(id): Path<String>,
    Extension(acting): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_department_id(&id)?;
    let gateway = pg_gateway().await?;
    gateway.delete_department(id, &acting).await?;
    Ok(Json(json!({ "ok": true })))
}

fn parse_department_id(raw: &str) -> Result<DepartmentId, StructureError> {
    raw.parse::<DepartmentId>()
        .map_err(|_| StructureError::InvalidId)
}
