use reqwest::{Client, StatusCode};

use crate::config;

/// Raw HTTP reply, before any status or body interpretation.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub trait ChannelApi {
    fn get_channel(&self)
        -> impl std::future::Future<Output = reqwest::Result<ApiReply>> + Send;

    fn get_feeds(
        &self,
        results: u32,
    ) -> impl std::future::Future<Output = reqwest::Result<ApiReply>> + Send;
}

pub struct ThingSpeakClient {
    http: Client,
    base_url: String,
    channel_id: String,
    api_key: Option<String>,
}

pub fn init_client(config: &config::Config) -> anyhow::Result<ThingSpeakClient> {
    let http = Client::builder()
        .timeout(config.request_timeout())
        .build()?;

    Ok(ThingSpeakClient {
        http,
        base_url: config.api_base_url.trim_end_matches('/').to_string(),
        channel_id: config.channel_id.clone(),
        api_key: config.api_key().map(str::to_string),
    })
}

impl ThingSpeakClient {
    async fn get(&self, path: &str, results: Option<u32>) -> reqwest::Result<ApiReply> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key)]);
        }
        if let Some(results) = results {
            request = request.query(&[("results", results)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(ApiReply {
            status,
            headers,
            body,
        })
    }
}

impl ChannelApi for ThingSpeakClient {
    async fn get_channel(&self) -> reqwest::Result<ApiReply> {
        let path = format!("/channels/{}.json", self.channel_id);
        self.get(&path, None).await
    }

    async fn get_feeds(&self, results: u32) -> reqwest::Result<ApiReply> {
        let path = format!("/channels/{}/feeds.json", self.channel_id);
        self.get(&path, Some(results)).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use envconfig::Envconfig;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(base_url: &str, api_key: Option<&str>) -> config::Config {
        let mut env = HashMap::from([
            ("CHANNEL_ID".to_string(), "2890599".to_string()),
            ("API_BASE_URL".to_string(), base_url.to_string()),
            ("REQUEST_TIMEOUT_SECS".to_string(), "2".to_string()),
        ]);
        if let Some(key) = api_key {
            env.insert("READ_API_KEY".to_string(), key.to_string());
        }
        config::Config::init_from_hashmap(&env).unwrap()
    }

    #[tokio::test]
    async fn feeds_request_carries_key_and_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels/2890599/feeds.json"))
            .and(query_param("api_key", "SECRET"))
            .and(query_param("results", "5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-request-id", "abc")
                    .set_body_string(r#"{"feeds": []}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = init_client(&config_for(&server.uri(), Some("SECRET"))).unwrap();
        let reply = client.get_feeds(5).await.unwrap();

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, r#"{"feeds": []}"#);
        assert!(reply
            .headers
            .iter()
            .any(|(name, value)| name == "x-request-id" && value == "abc"));
    }

    #[tokio::test]
    async fn public_channel_omits_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels/2890599.json"))
            .and(query_param_is_missing("api_key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name": "c"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = init_client(&config_for(&server.uri(), Some(""))).unwrap();
        let reply = client.get_channel().await.unwrap();

        assert_eq!(reply.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn error_status_is_returned_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/channels/2890599/feeds.json"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = init_client(&config_for(&server.uri(), None)).unwrap();
        let reply = client.get_feeds(5).await.unwrap();

        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(reply.body, "rate limited");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = init_client(&config_for(&uri, None)).unwrap();
        assert!(client.get_feeds(5).await.is_err());
    }
}
