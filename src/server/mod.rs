// Server module entry point
// Accept loop, per-connection serving and listener creation

pub mod connection;
pub mod listener;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::logger;

// Re-export commonly used types
pub use connection::App;
pub use listener::create_listener;

/// Accept connections forever, serving each one in its own local task.
///
/// Must run inside a `tokio::task::LocalSet`.
pub async fn run(listener: TcpListener, app: Arc<App>) {
    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => {
                connection::handle_connection(stream, Arc::clone(&app));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    /// Send one request with `Connection: close` and read the raw reply
    async fn roundtrip(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {path} HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        String::from_utf8(reply).unwrap()
    }

    #[tokio::test]
    async fn test_serves_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(&data, r#"{"a":1}"#).unwrap();

        let mut cfg = Config::load_from("definitely-missing-config-file").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.data.file = data.display().to_string();
        cfg.logging.access_log = false;

        let listener = create_listener(cfg.socket_addr().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Arc::new(App::from_config(&cfg));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let _server = tokio::task::spawn_local(run(listener, app));

                let reply = roundtrip(addr, "/cpl/getshipper").await;
                assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"), "{reply}");
                assert!(reply.ends_with("\r\n\r\n{\n\t\"a\": 1\n}"), "{reply}");

                let reply = roundtrip(addr, "/nope").await;
                assert!(reply.starts_with("HTTP/1.1 404 Not Found\r\n"), "{reply}");
                assert!(reply.contains("x-content-type-options: nosniff\r\n"), "{reply}");
                assert!(reply.ends_with("\r\n\r\n404 page not found\n"), "{reply}");
            })
            .await;
    }
}
