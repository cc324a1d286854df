use serde_json::{json, Value};

use crate::{ApiClient, ClientError};

pub struct AuthClient<'a> {
    pub(crate) api: &'a ApiClient,
}

impl AuthClient<'_> {
    /// On success the session cookie lands in the client's cookie store and
    /// rides along on subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .post(self.api.endpoint("auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        fullname: &str,
    ) -> Result<Value, ClientError> {
        let resp = self
            .api
            .http
            .post(self.api.endpoint("auth/signup"))
            .json(&json!({ "username": username, "password": password, "fullname": fullname }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        ApiClient::parse(resp).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let resp = self
            .api
            .http
            .post(self.api.endpoint("auth/logout"))
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
