use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub(crate) struct BaseClient {
    address: String,
    admin_key: Option<String>,
}

#[derive(Debug)]
pub enum APIError {
    Network,
    MalformedResponse,
    UnexpectedStatusCode(StatusCode),
}
pub type APIResponse<T> = Result<T, APIError>;

impl BaseClient {
    pub fn new(address: String) -> Self {
        Self {
            address,
            admin_key: None,
        }
    }

    pub fn set_admin_key(&mut self, admin_key: String) {
        self.admin_key = Some(admin_key);
    }

    fn get_client(&self, method: Method, path: String) -> RequestBuilder {
        let url = format!("{}/api/v1/{}", self.address, path);
        let builder = Client::new().request(method, &url);

        match &self.admin_key {
            Some(admin_key) => builder.header("x-admin-key", admin_key.clone()),
            None => builder,
        }
    }

    fn check_status_code(res: &Response, expected_status_code: StatusCode) -> Result<(), APIError> {
        let status = res.status();
        if status != expected_status_code {
            return Err(APIError::UnexpectedStatusCode(status));
        }
        Ok(())
    }

    async fn handle_api_response<T: for<'de> Deserialize<'de>>(
        res: Response,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        Self::check_status_code(&res, expected_status_code)?;
        res.json::<T>()
            .await
            .map_err(|_| APIError::MalformedResponse)
    }

    async fn send(&self, builder: RequestBuilder) -> APIResponse<Response> {
        builder.send().await.map_err(|_| APIError::Network)
    }

    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self.send(self.get_client(Method::GET, path)).await?;
        Self::handle_api_response(res, expected_status_code).await
    }

    /// For endpoints that do not respond with json. Returns the content type
    /// together with the body.
    pub async fn get_text(
        &self,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<(Option<String>, String)> {
        let res = self.send(self.get_client(Method::GET, path)).await?;
        Self::check_status_code(&res, expected_status_code)?;
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = res.text().await.map_err(|_| APIError::MalformedResponse)?;
        Ok((content_type, body))
    }

    pub async fn put<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .send(self.get_client(Method::PUT, path).json(&body))
            .await?;
        Self::handle_api_response(res, expected_status_code).await
    }

    pub async fn post<T: for<'de> Deserialize<'de>, S: Serialize>(
        &self,
        body: S,
        path: String,
        expected_status_code: StatusCode,
    ) -> APIResponse<T> {
        let res = self
            .send(self.get_client(Method::POST, path).json(&body))
            .await?;
        Self::handle_api_response(res, expected_status_code).await
    }
}
