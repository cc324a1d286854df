use serde_json::{json, Value};

use crate::{ApiClient, ClientError};

pub struct ReviewsClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl ReviewsClient<'_> {
    pub async fn query(&self, by_user_id: Option<&str>) -> Result<Value, ClientError> {
        let mut req = self.api.http.get(self.api.endpoint("review"));
        if let Some(by_user_id) = by_user_id {
            req = req.query(&[("byUserId", by_user_id)]);
        }
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn add(&self, about_user_id: &str, txt: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .post(self.api.endpoint("review"))
            .json(&json!({ "aboutUserId": about_user_id, "txt": txt }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn remove(&self, review_id: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .delete(self.api.endpoint(&format!("review/{review_id}")))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }
}
