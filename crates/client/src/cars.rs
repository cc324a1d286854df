use serde::Serialize;
use serde_json::{json, Value};

use crate::{ApiClient, ClientError};

/// Query-string filter for car listings. Absent fields constrain nothing.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_idx: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<i32>,
}

pub struct CarsClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl CarsClient<'_> {
    pub async fn query(&self, filter: &CarQuery) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .get(self.api.endpoint("car"))
            .query(filter)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn get_by_id(&self, car_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .get(self.api.endpoint(&format!("car/{car_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    /// POST for a new record, PUT when the record carries its id.
    pub async fn save(&self, car: &Value) -> Result<Value, ClientError> {
        let req = match car.get("_id").and_then(Value::as_str) {
            Some(id) => self.api.http.put(self.api.endpoint(&format!("car/{id}"))),
            None => self.api.http.post(self.api.endpoint("car")),
        };
        let resp = req
            .json(car)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn remove(&self, car_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .delete(self.api.endpoint(&format!("car/{car_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn add_msg(&self, car_id: &str, txt: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .post(self.api.endpoint(&format!("car/{car_id}/msg")))
            .json(&json!({ "txt": txt }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn remove_msg(&self, car_id: &str, msg_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .delete(self.api.endpoint(&format!("car/{car_id}/msg/{msg_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }
}
