use crate::domain_model::BuddyEvent;
use crate::domain_port::BuddyEventSink;
use anyhow::anyhow;
use serde_json::json;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const QUEUE_CAPACITY: usize = 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

fn build_envelope(event: &BuddyEvent) -> anyhow::Result<Vec<u8>> {
    let envelope = json!({
        "receivers": event.receivers(),
        "body": event,
    });

    let mut line = serde_json::to_vec(&envelope)?;
    line.push(b'\n');
    Ok(line)
}

/// Sink for deployments without a socket server.
pub struct LogNotifier;

#[async_trait::async_trait]
impl BuddyEventSink for LogNotifier {
    async fn publish(&self, event: &BuddyEvent) -> anyhow::Result<()> {
        tracing::info!(receivers = ?event.receivers(), ?event, "buddy event");
        Ok(())
    }
}

/// Forwards events to the socket server as newline-delimited JSON.
///
/// `publish` only enqueues; a background task owns the connection.
pub struct SocketNotifier {
    queue: mpsc::Sender<BuddyEvent>,
}

impl SocketNotifier {
    pub fn spawn(address: String, cancellation_token: CancellationToken) -> (Self, JoinHandle<()>) {
        let (queue, events) = mpsc::channel(QUEUE_CAPACITY);
        let writer = SocketWriter {
            address,
            events,
            cancellation_token,
            stream: None,
        };
        let handle = tokio::spawn(writer.run());
        (Self { queue }, handle)
    }
}

#[async_trait::async_trait]
impl BuddyEventSink for SocketNotifier {
    async fn publish(&self, event: &BuddyEvent) -> anyhow::Result<()> {
        self.queue
            .try_send(event.clone())
            .map_err(|e| anyhow!("notification queue: {e}"))
    }
}

struct SocketWriter {
    address: String,
    events: mpsc::Receiver<BuddyEvent>,
    cancellation_token: CancellationToken,
    stream: Option<TcpStream>,
}

impl SocketWriter {
    async fn connect(&self) -> anyhow::Result<TcpStream> {
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&self.address))
            .await
            .map_err(|_| anyhow!("connect {} timed out", self.address))??;
        stream.set_nodelay(true)?;
        tracing::info!("connected to socket server at {}", self.address);
        Ok(stream)
    }

    async fn deliver(&mut self, event: &BuddyEvent) -> anyhow::Result<()> {
        let payload = build_envelope(event)?;

        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.connect().await?,
        };
        // a broken connection is dropped here and re-dialled on the next event
        stream.write_all(&payload).await?;
        self.stream = Some(stream);
        Ok(())
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Notifier shutting down...");
                    break;
                }
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    if let Err(e) = self.deliver(&event).await {
                        tracing::warn!(?event, "dropping buddy event: {e:#}");
                    }
                }
            }
        }
    }
}
