//! One-shot HTTP server for exercising the lookup client offline.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Accepts a single connection, records the raw request and answers with a
/// canned JSON response.
pub struct FakeServer {
  endpoint: String,
  handle: JoinHandle<String>,
}

impl FakeServer {
  /// `status_line` is the part after `HTTP/1.1 `, e.g. `"404 Not Found"`.
  pub async fn start(status_line: &str, body: &str) -> Self {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
      "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
      body.len()
    );

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let request = read_request(&mut socket).await;
      socket.write_all(response.as_bytes()).await.unwrap();
      let _ = socket.shutdown().await;
      request
    });

    Self {
      endpoint: format!("http://{addr}/json"),
      handle,
    }
  }

  pub fn endpoint(&self) -> String {
    self.endpoint.clone()
  }

  /// Waits for the recorded request (request line, headers and body).
  pub async fn request(self) -> String {
    self.handle.await.unwrap()
  }
}

async fn read_request(socket: &mut TcpStream) -> String {
  let mut buf = Vec::new();
  let mut chunk = [0_u8; 1024];

  loop {
    if let Some(head_end) = find_head_end(&buf) {
      let expected = head_end + content_length(&buf[..head_end]);
      if buf.len() >= expected {
        break;
      }
    }
    let n = socket.read(&mut chunk).await.unwrap();
    if n == 0 {
      break;
    }
    buf.extend_from_slice(&chunk[..n]);
  }

  String::from_utf8_lossy(&buf).into_owned()
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
  buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(head: &[u8]) -> usize {
  String::from_utf8_lossy(head)
    .lines()
    .find_map(|line| {
      let (name, value) = line.split_once(':')?;
      name
        .eq_ignore_ascii_case("content-length")
        .then(|| value.trim().parse().ok())
        .flatten()
    })
    .unwrap_or(0)
}
