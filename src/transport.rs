//! HTTP seam between the pipeline and the network.

use anyhow::{anyhow, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::publish::WebhookMessage;

/// The two HTTP operations a backup run performs.
///
/// `ReqwestTransport` talks to the network; tests drive the pipeline with an
/// in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET `url` and return the whole body. Non-success statuses are errors.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// POST `message` to `url` as multipart/form-data.
    async fn post_multipart(&self, url: &str, message: &WebhookMessage) -> Result<()>;
}

/// Transport backed by a shared `reqwest::Client`
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        if resp.status().is_success() {
            let bytes = resp.bytes().await?;
            Ok(bytes.to_vec())
        } else {
            Err(anyhow!("HTTP {} - URL: {}", resp.status(), url))
        }
    }

    async fn post_multipart(&self, url: &str, message: &WebhookMessage) -> Result<()> {
        let file = Part::bytes(message.file_bytes.clone())
            .file_name(message.file_name.clone())
            .mime_str(message.content_type)?;

        let form = Form::new()
            .part(message.file_field, file)
            .text(message.text_field, message.content.clone());

        let resp = self.client.post(url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one request on a local port with `status` and `body`.
    /// The handle yields the raw request bytes.
    async fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (url, handle)
    }

    /// Read headers plus a Content-Length or chunked body
    async fn read_request(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return request;
            }
            request.extend_from_slice(&chunk[..n]);

            let Some(end) = find(&request, b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());

            let done = match length {
                Some(length) => request.len() >= end + 4 + length,
                None if head.contains("transfer-encoding: chunked") => request.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if done {
                return request;
            }
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn message() -> WebhookMessage {
        WebhookMessage {
            file_field: "file",
            file_name: "tile_backup_2025-10-19T08-05-09-123Z.png".to_string(),
            content_type: "image/png",
            file_bytes: vec![0x89, b'P', b'N', b'G'],
            text_field: "content",
            content: "Backup created at <t:1760861109:F>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_bytes_returns_body() {
        let (url, server) = serve_once("200 OK", b"tile-bytes").await;

        let bytes = ReqwestTransport::new()
            .get_bytes(&format!("{}/1520/865.png", url))
            .await
            .unwrap();
        assert_eq!(bytes, b"tile-bytes");

        let request = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(request.starts_with("GET /1520/865.png HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_get_bytes_not_found_is_error() {
        let (url, server) = serve_once("404 Not Found", b"").await;

        let err = ReqwestTransport::new()
            .get_bytes(&format!("{}/1/2.png", url))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_post_multipart_body() {
        let (url, server) = serve_once("204 No Content", b"").await;

        ReqwestTransport::new()
            .post_multipart(&url, &message())
            .await
            .unwrap();

        let request = String::from_utf8_lossy(&server.await.unwrap()).to_ascii_lowercase();
        assert!(request.starts_with("post / http/1.1\r\n"));
        assert!(request.contains("content-type: multipart/form-data; boundary="));

        let parts: Vec<&str> = request
            .split("content-disposition: form-data; ")
            .skip(1)
            .collect();
        assert_eq!(parts.len(), 2);

        let file = parts
            .iter()
            .find(|p| p.starts_with("name=\"file\""))
            .expect("file part");
        assert!(file.starts_with(
            "name=\"file\"; filename=\"tile_backup_2025-10-19t08-05-09-123z.png\"\r\ncontent-type: image/png\r\n"
        ));

        let text = parts
            .iter()
            .find(|p| p.starts_with("name=\"content\""))
            .expect("text part");
        assert!(text.starts_with("name=\"content\"\r\n\r\nbackup created at <t:1760861109:f>\r\n"));
    }

    #[tokio::test]
    async fn test_post_multipart_rejected_is_error() {
        let (url, server) = serve_once("400 Bad Request", b"{\"message\":\"bad\"}").await;

        let err = ReqwestTransport::new()
            .post_multipart(&url, &message())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 400 Bad Request");
        server.await.unwrap();
    }
}
