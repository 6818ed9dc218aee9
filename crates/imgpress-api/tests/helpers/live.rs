//! A server on a real socket, driven with hand-written HTTP so a test can decide
//! when each part of the body arrives.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use imgpress_api::AppState;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const BOUNDARY: &str = "imgpress-test-boundary";

pub struct LiveApp {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl LiveApp {
    pub fn upload_files(&self) -> Vec<String> {
        super::list_files(self.state.uploads.base_path())
    }

    pub fn compressed_files(&self) -> Vec<String> {
        super::list_files(self.state.compressed().base_path())
    }

    /// Open a connection and send the request head for a multipart `POST /compress`
    /// announcing `content_length` body bytes.
    pub async fn start_compress(&self, content_length: usize) -> TcpStream {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .expect("Failed to connect to test server");
        let head = format!(
            "POST /compress HTTP/1.1\r\n\
             Host: {}\r\n\
             Content-Type: multipart/form-data; boundary={}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n",
            self.addr, BOUNDARY, content_length
        );
        stream
            .write_all(head.as_bytes())
            .await
            .expect("Failed to send request head");
        stream
    }

    /// Poll the upload holding area until it holds `count` files.
    pub async fn wait_for_uploads(&self, count: usize) -> Vec<String> {
        for _ in 0..500 {
            let files = self.upload_files();
            if files.len() == count {
                return files;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("upload area never held {} files: {:?}", count, self.upload_files());
    }
}

/// Opening of the `image` part, up to where its bytes begin.
pub fn image_part_head(filename: &str) -> String {
    format!(
        "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
        BOUNDARY, filename
    )
}

/// Opening of a text part, up to where its value begins. Starts with the CRLF that
/// ends the previous part.
pub fn text_part_head(name: &str) -> String {
    format!(
        "\r\n--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
        BOUNDARY, name
    )
}

/// Closing delimiter, including the CRLF that ends the last part.
pub fn closing() -> String {
    format!("\r\n--{}--\r\n", BOUNDARY)
}

/// Read one response: status code and body.
pub async fn read_response(stream: &mut TcpStream) -> (u16, String) {
    tokio::time::timeout(Duration::from_secs(10), read_response_inner(stream))
        .await
        .expect("No response within 10s")
}

async fn read_response_inner(stream: &mut TcpStream) -> (u16, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await.expect("Failed to read response");
        assert!(n > 0, "connection closed before response headers");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let status: u16 = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("Malformed status line");
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.expect("Failed to read response body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[header_end..]).into_owned();
    (status, body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
