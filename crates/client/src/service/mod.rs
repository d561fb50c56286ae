mod account;
mod postal;

pub use self::account::AccountService;
pub use self::postal::PostalLookupService;

use reqwest::Client;
use shared::{
    config::Config,
    utils::{AppError, Method, Metrics, Status},
};
use std::sync::Arc;
use tokio::{sync::Mutex, time::Instant};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct HttpClients {
    pub postal: Client,
    pub account: Client,
}

impl HttpClients {
    /// The postal client honours the configured timeout. The account client
    /// has none: a submission settles only when the network layer gives up.
    pub fn init(config: &Config) -> Result<Self, AppError> {
        let mut postal = Client::builder();
        if let Some(timeout) = config.lookup_timeout {
            postal = postal.timeout(timeout);
        }

        Ok(Self {
            postal: postal.build()?,
            account: Client::builder().build()?,
        })
    }
}

pub(crate) struct TracingContext {
    pub operation: &'static str,
    pub start_time: Instant,
}

pub(crate) fn start_tracing(operation: &'static str) -> TracingContext {
    info!("Starting operation: {operation}");
    TracingContext {
        operation,
        start_time: Instant::now(),
    }
}

pub(crate) async fn complete_tracing(
    metrics: &Arc<Mutex<Metrics>>,
    tracing_ctx: &TracingContext,
    method: Method,
    is_success: bool,
    message: &str,
) {
    let status = if is_success {
        Status::Success
    } else {
        Status::Error
    };
    let elapsed = tracing_ctx.start_time.elapsed().as_secs_f64();

    if is_success {
        info!(
            "Operation {} completed successfully in {elapsed:.3}s: {message}",
            tracing_ctx.operation
        );
    } else {
        error!(
            "Operation {} failed in {elapsed:.3}s: {message}",
            tracing_ctx.operation
        );
    }

    metrics.lock().await.record(method, status, elapsed);
}

#[cfg(test)]
pub(crate) mod loopback {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    /// Answers a single HTTP/1.1 request on a local port with a canned
    /// reply. The join handle yields the raw request it received.
    pub(crate) async fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            while !is_complete(&request) {
                let read = socket.read(&mut chunk).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }

            let reason = if status < 300 { "OK" } else { "Error" };
            let reply = format!(
                "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, server)
    }

    fn is_complete(request: &[u8]) -> bool {
        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };

        let head = String::from_utf8_lossy(&request[..head_end]);
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        request.len() >= head_end + 4 + content_length
    }
}
