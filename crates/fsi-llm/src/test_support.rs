// Local mock of the Messages API for client and advisor tests.

use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Read one HTTP request, headers and body, so the socket is drained before
/// the response goes out.
pub async fn read_request(socket: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

/// Serve one raw HTTP response. Returns the base URL and a receiver for the
/// request the client sent.
pub async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
    serve_after(response, Duration::ZERO).await
}

/// Like `serve_once`, but waits `delay` after reading the request.
pub async fn serve_after(
    response: String,
    delay: Duration,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (req_tx, req_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let _ = req_tx.send(request);
        tokio::time::sleep(delay).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.flush().await;
        // Keep the connection open briefly so the client reads everything.
        tokio::time::sleep(Duration::from_millis(100)).await;
    });
    (format!("http://{addr}/v1/messages"), req_rx)
}

/// A streamed Messages API response whose text arrives in `chunks`.
pub fn sse_response(chunks: &[&str], input_tokens: u32, output_tokens: u32) -> String {
    let mut body = String::new();
    let mut event = |name: &str, data: serde_json::Value| {
        body.push_str(&format!("event: {name}\r\ndata: {data}\r\n\r\n"));
    };
    event(
        "message_start",
        json!({"type": "message_start", "message": {"id": "msg_1", "usage": {"input_tokens": input_tokens}}}),
    );
    event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
    );
    event("ping", json!({"type": "ping"}));
    for chunk in chunks {
        event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": chunk}}),
        );
    }
    event("content_block_stop", json!({"type": "content_block_stop", "index": 0}));
    event(
        "message_delta",
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}, "usage": {"output_tokens": output_tokens}}),
    );
    event("message_stop", json!({"type": "message_stop"}));

    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n{body}"
    )
}

/// A JSON error response in the Messages API shape.
pub fn error_response(status_line: &str, message: &str) -> String {
    let body = json!({"type": "error", "error": {"type": "authentication_error", "message": message}})
        .to_string();
    format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}
