//! HTTP implementation of [`MealLookup`] backed by `reqwest`.

use super::{parse_meal_names, LookupError, MealLookup};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// The public directory's filter-by-ingredient endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/filter.php";

/// Looks meals up with one `GET <base_url>?i=<ingredient>` per search.
#[derive(Debug, Clone)]
pub struct HttpMealLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMealLookup {
    /// Builds a lookup against `base_url`. Without a timeout the transport default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MealLookup for HttpMealLookup {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn search(&self, ingredient: &str) -> Result<Vec<String>, LookupError> {
        // `query` takes care of escaping the ingredient.
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("i", ingredient)])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let names = parse_meal_names(&body)?;
        debug!(count = names.len(), "Lookup finished");
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one HTTP response and hands back the request line it saw.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });

        (format!("http://{addr}/filter.php"), handle)
    }

    #[tokio::test]
    async fn test_search_escapes_ingredient_and_parses() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"meals":[{"strMeal":"Chicken Curry","idMeal":"2"}]}"#,
        )
        .await;

        let lookup = HttpMealLookup::new(url, Some(Duration::from_secs(5))).unwrap();
        let names = lookup.search("chicken breast").await.unwrap();
        assert_eq!(names, vec!["Chicken Curry"]);

        let request_line = server.await.unwrap();
        assert!(
            request_line.starts_with("GET /filter.php?i=chicken+breast ")
                || request_line.starts_with("GET /filter.php?i=chicken%20breast "),
            "unexpected request line: {request_line}"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;

        let lookup = HttpMealLookup::new(url, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(
            lookup.search("chicken").await,
            Err(LookupError::Status(503))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let lookup =
            HttpMealLookup::new(format!("http://{addr}/filter.php"), Some(Duration::from_secs(5)))
                .unwrap();
        assert!(matches!(
            lookup.search("chicken").await,
            Err(LookupError::Transport(_))
        ));
    }
}
