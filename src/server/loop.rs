// Server loop module
// Accepts connections until shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections and hand each one to its own local task.
///
/// Must run inside a `tokio::task::LocalSet`. Returns once `shutdown` is
/// notified; connections already being served keep running on their tasks.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown("Shutdown requested");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn exchange(addr: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        String::from_utf8_lossy(&response).into_owned()
    }

    async fn state_in(dir: &std::path::Path, limit: u64, header_timeout: u64) -> Arc<AppState> {
        let mut config = Config::defaults().unwrap();
        config.storage.files_root = dir.join("files");
        config.storage.public_root = dir.join("public");
        config.storage.limit_file_size = limit;
        config.performance.header_read_timeout = header_timeout;
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(config));
        state.store.ensure_roots().await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_slow_upload_outlives_header_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), 1024, 1).await;

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&shutdown),
                ));

                let mut stream = TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"POST /slow.bin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 30\r\n\r\n")
                    .await
                    .unwrap();
                // 1.8 seconds of steady progress against a 1 second header timeout
                for chunk in [b"0123456789", b"abcdefghij", b"ABCDEFGHIJ"] {
                    tokio::time::sleep(Duration::from_millis(600)).await;
                    stream.write_all(chunk).await.unwrap();
                }
                let mut response = Vec::new();
                stream.read_to_end(&mut response).await.unwrap();
                let resp = String::from_utf8_lossy(&response);
                assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
                assert!(resp.ends_with("File upload completed"), "{resp}");
                assert_eq!(
                    std::fs::read(dir.path().join("files/slow.bin")).unwrap(),
                    b"0123456789abcdefghijABCDEFGHIJ"
                );

                shutdown.notify_one();
                server.await.unwrap();
            })
            .await;
    }

    #[tokio::test]
    async fn test_end_to_end_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), 16, 30).await;

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&shutdown),
                ));

                let resp = exchange(
                    addr,
                    b"POST /hello.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 5\r\n\r\nhello",
                )
                .await;
                assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
                assert!(resp.ends_with("File upload completed"), "{resp}");

                let resp = exchange(
                    addr,
                    b"GET /hello.txt HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
                assert!(resp.contains("content-type: text/plain"), "{resp}");
                assert!(resp.ends_with("\r\n\r\nhello"), "{resp}");

                let resp = exchange(
                    addr,
                    b"POST /big.bin HTTP/1.1\r\nHost: localhost\r\nContent-Length: 17\r\n\r\n",
                )
                .await;
                assert!(resp.starts_with("HTTP/1.1 413"), "{resp}");
                assert!(!dir.path().join("files/big.bin").exists());

                let resp = exchange(
                    addr,
                    b"GET /nested/path HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(resp.starts_with("HTTP/1.1 400"), "{resp}");

                shutdown.notify_one();
                server.await.unwrap();
            })
            .await;
    }
}
