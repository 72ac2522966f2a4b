//! HTTP transport shared by the Yahoo and SEC endpoints.

use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Which identity a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    /// Browser-like user agent for Yahoo Finance.
    Browser,
    /// Declared research agent with contact address for SEC EDGAR.
    Sec,
}

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    ///
    /// Cookies are kept for the lifetime of the transport so the Yahoo
    /// session cookie travels with the crumb.
    pub fn new(config: Arc<ClientConfig>) -> SdkResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json, text/html, */*"));

        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Join a path onto one of the configured base URLs.
    pub fn build_url(base: &Url, path: &str) -> SdkResult<Url> {
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    fn user_agent(&self, agent: Agent) -> &str {
        match agent {
            Agent::Browser => &self.config.user_agent,
            Agent::Sec => &self.config.sec_user_agent,
        }
    }

    fn request(&self, url: Url, agent: Agent) -> RequestBuilder {
        self.client
            .get(url)
            .header(header::USER_AGENT, self.user_agent(agent))
    }

    /// Execute a request with retries.
    async fn execute_with_retry(&self, request_builder: RequestBuilder) -> SdkResult<Response> {
        let retry_config = &self.config.retry_config;
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| SdkError::Config("Request cannot be cloned".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if attempts < retry_config.max_retries
                        && retry_config.should_retry_status(status)
                    {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(SdkError::from_response(status, &body));
                }
                Err(e) => {
                    if attempts < retry_config.max_retries && e.is_timeout() {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request timed out, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Execute a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, agent: Agent) -> SdkResult<T> {
        debug!(url = %url, "GET request");

        let response = self.execute_with_retry(self.request(url, agent)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request with query parameters.
    pub async fn get_json_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
        agent: Agent,
    ) -> SdkResult<T> {
        debug!(url = %url, "GET request with query");

        let response = self
            .execute_with_retry(self.request(url, agent).query(query))
            .await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a GET request and return the body as text.
    pub async fn get_text(&self, url: Url, agent: Agent) -> SdkResult<String> {
        debug!(url = %url, "GET request (text)");

        let response = self.execute_with_retry(self.request(url, agent)).await?;
        Ok(response.text().await?)
    }

    /// Visit a page only for the cookies it sets; the status is ignored.
    pub async fn visit(&self, url: Url) -> SdkResult<()> {
        debug!(url = %url, "Visiting for cookies");

        let response = self.request(url, Agent::Browser).send().await?;
        debug!(status = response.status().as_u16(), "Cookie page answered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    fn create_config(base_url: &str, retry_config: RetryConfig) -> Arc<ClientConfig> {
        let base = Url::parse(base_url).unwrap();
        Arc::new(ClientConfig {
            yahoo_base_url: base.clone(),
            yahoo_session_url: base.clone(),
            sec_www_url: base.clone(),
            sec_data_url: base,
            user_agent: "test-browser".to_string(),
            sec_user_agent: "Test Agent (test@example.com)".to_string(),
            timeout: Duration::from_secs(30),
            retry_config,
        })
    }

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_get_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test"))
            .and(header("user-agent", "test-browser"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "success".to_string(),
                value: 42,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();

        let result: TestResponse = transport.get_json(url(&server, "/api/test"), Agent::Browser).await.unwrap();
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_sec_user_agent_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "GOLF"))
            .and(header("user-agent", "Test Agent (test@example.com)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "sec".to_string(),
                value: 7,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();

        let result: TestResponse = transport
            .get_json_with_query(url(&server, "/search"), &[("q", "GOLF")], Agent::Sec)
            .await
            .unwrap();
        assert_eq!(result.message, "sec");
    }

    #[tokio::test]
    async fn test_retries_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retry(3))).unwrap();

        let body = transport.get_text(url(&server, "/flaky"), Agent::Browser).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(2)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retry(1))).unwrap();

        let result = transport.get_text(url(&server, "/down"), Agent::Browser).await;
        match result {
            Err(SdkError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "unavailable");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), fast_retry(3))).unwrap();

        let result: SdkResult<TestResponse> = transport.get_json(url(&server, "/missing"), Agent::Browser).await;
        assert!(matches!(result, Err(SdkError::Api { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_visit_ignores_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(404).insert_header("set-cookie", "A3=abc; Path=/"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri(), RetryConfig::no_retry())).unwrap();
        assert!(transport.visit(url(&server, "/")).await.is_ok());
    }

    #[test]
    fn test_build_url() {
        let base = Url::parse("http://localhost:8080/").unwrap();

        let url = HttpTransport::build_url(&base, "/v1/test/getcrumb").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/test/getcrumb");

        let url = HttpTransport::build_url(&base, "files/company_tickers.json").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/files/company_tickers.json");
    }
}
