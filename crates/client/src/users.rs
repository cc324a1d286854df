use serde::Serialize;
use serde_json::Value;

use crate::{ApiClient, ClientError};

/// Query-string filter for user listings.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<i64>,
}

pub struct UsersClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl UsersClient<'_> {
    pub async fn query(&self, filter: &UserQuery) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .get(self.api.endpoint("user"))
            .query(filter)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn get_by_id(&self, user_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .get(self.api.endpoint(&format!("user/{user_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    /// POST for a new record, PUT when the record carries its id.
    pub async fn save(&self, user: &Value) -> Result<Value, ClientError> {
        let req = match user.get("_id").and_then(Value::as_str) {
            Some(id) => self.api.http.put(self.api.endpoint(&format!("user/{id}"))),
            None => self.api.http.post(self.api.endpoint("user")),
        };
        let resp = req
            .json(user)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn remove(&self, user_id: &str) -> Result<(), ClientError> {
        let resp = self
            .api
            .http
            .delete(self.api.endpoint(&format!("user/{user_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status: status.as_u16(), body });
        }
        Ok(())
    }
}
