//! Client-side store speaking the structure HTTP API. The session token is
//! ambient: it is attached to every request here rather than threaded
//! through the store trait's signatures.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Department, DepartmentId, DepartmentInput, Identity};
use crate::store::{DepartmentStore, StoreError};

#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DepartmentsEnvelope {
    departments: Vec<Department>,
}

#[derive(Debug, Deserialize)]
struct EmployeesEnvelope {
    employees: Vec<Identity>,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    id: DepartmentId,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Split server rejections from transport faults: any response carrying
    /// an `{ "error": code }` body is a rejection the caller can map back to
    /// an error kind; everything else is transport.
    async fn checked(&self, response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        match response.json::<ErrorEnvelope>().await {
            Ok(body) => Err(StoreError::Rejected { code: body.error }),
            Err(_) => Err(StoreError::Unavailable(format!(
                "server returned {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl DepartmentStore for HttpStore {
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let response = self
            .client
            .get(self.url("/api/structure/departments"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: DepartmentsEnvelope = self.checked(response).await?.json().await?;
        Ok(body.departments)
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let response = self
            .client
            .get(self.url("/api/structure/employees"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body: EmployeesEnvelope = self.checked(response).await?.json().await?;
        Ok(body.employees)
    }

    async fn create_department(&self, input: &DepartmentInput) -> Result<DepartmentId, StoreError> {
        let response = self
            .client
            .post(self.url("/api/structure/departments"))
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;
        let body: CreatedEnvelope = self.checked(response).await?.json().await?;
        Ok(body.id)
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        input: &DepartmentInput,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.url(&format!("/api/structure/departments/{}", id)))
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;
        self.checked(response).await?;
        Ok(())
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/structure/departments/{}", id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        self.checked(response).await?;
        Ok(())
    }
}
