use crate::{
    error::{
        Result,
        error::{ConnectSnafu, InvalidSubscriptionSnafu, ReceiveSnafu, SubscribeSnafu},
    },
    sink::ReportSink,
};
use ais_core::{InboundFrame, RawReport, SubscriptionRequest};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use snafu::ResultExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};
use tracing::{debug, error, info, instrument, warn};

pub type TransportError = tungstenite::Error;

/// A duplex, message oriented connection to the upstream.
#[async_trait]
pub trait FrameTransport: Send {
    async fn send_frame(&mut self, frame: String) -> std::result::Result<(), TransportError>;

    /// Returns `None` once the remote end has closed the connection.
    async fn next_frame(&mut self) -> Option<std::result::Result<String, TransportError>>;

    async fn close(&mut self) -> std::result::Result<(), TransportError>;
}

pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameTransport for WebSocketTransport {
    async fn send_frame(&mut self, frame: String) -> std::result::Result<(), TransportError> {
        self.stream.send(Message::Text(frame)).await
    }

    async fn next_frame(&mut self) -> Option<std::result::Result<String, TransportError>> {
        loop {
            let message = match self.stream.next().await? {
                Ok(message) => message,
                Err(TransportError::ConnectionClosed | TransportError::AlreadyClosed) => {
                    return None;
                }
                Err(e) => return Some(Err(e)),
            };

            match message {
                Message::Text(text) => return Some(Ok(text)),
                // aisstream.io delivers its json payloads as binary frames.
                Message::Binary(data) => {
                    return Some(Ok(String::from_utf8_lossy(&data).into_owned()));
                }
                Message::Close(_) => return None,
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) -> std::result::Result<(), TransportError> {
        match self.stream.close(None).await {
            Ok(()) | Err(TransportError::ConnectionClosed | TransportError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Lifecycle of a session once connected, a session value only exists after the subscription
/// frame has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Subscribed,
    Receiving,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Report(RawReport),
    /// The upstream reported a problem, the session stays open.
    ServerError(String),
    EndOfStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The message limit was reached and the session closed the connection.
    Limit,
    /// The remote end closed the connection.
    EndOfStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub accepted: u64,
    pub server_errors: u64,
    pub skipped: u64,
    pub end: SessionEnd,
}

/// One subscribe-then-receive cycle over a single connection.
///
/// There is no reconnection, a transport failure ends the session.
pub struct StreamSession<T> {
    transport: T,
    state: SessionState,
    limit: Option<u64>,
    accepted: u64,
    server_errors: u64,
    skipped: u64,
}

impl StreamSession<WebSocketTransport> {
    /// Connects to `endpoint` and sends `request` as the first frame.
    #[instrument(skip(request))]
    pub async fn open(endpoint: &str, request: &SubscriptionRequest) -> Result<Self> {
        debug!("connecting");

        let (stream, _) = connect_async(endpoint)
            .await
            .context(ConnectSnafu { endpoint })?;

        Self::subscribe(WebSocketTransport { stream }, request).await
    }
}

impl<T: FrameTransport> StreamSession<T> {
    /// Sends `request` over an already established transport.
    pub async fn subscribe(mut transport: T, request: &SubscriptionRequest) -> Result<Self> {
        let frame = request.to_frame().context(InvalidSubscriptionSnafu)?;
        transport.send_frame(frame).await.context(SubscribeSnafu)?;

        info!("subscribed to stream, listening...");

        Ok(StreamSession {
            transport,
            state: SessionState::Subscribed,
            limit: None,
            accepted: 0,
            server_errors: 0,
            skipped: 0,
        })
    }

    /// Closes the session once `limit` reports have been accepted, `None` streams until the
    /// remote end closes.
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Waits for the next frame that is either a report or an upstream error.
    ///
    /// Frames that are not json objects are logged and skipped. There is no timeout, a silent
    /// upstream blocks indefinitely.
    pub async fn receive_next(&mut self) -> Result<Received> {
        loop {
            if self.state == SessionState::Closed {
                return Ok(Received::EndOfStream);
            }

            let frame = match self.transport.next_frame().await {
                None => {
                    self.state = SessionState::Closed;
                    return Ok(Received::EndOfStream);
                }
                Some(Err(e)) => {
                    self.state = SessionState::Closed;
                    return Err(e).context(ReceiveSnafu);
                }
                Some(Ok(frame)) => frame,
            };

            self.state = SessionState::Receiving;

            match InboundFrame::decode(&frame) {
                Ok(InboundFrame::ServerError(e)) => {
                    self.server_errors += 1;
                    return Ok(Received::ServerError(e));
                }
                Ok(InboundFrame::Report(report)) => return Ok(Received::Report(report)),
                Err(e) => {
                    self.skipped += 1;
                    error!("received a frame that is not a json object: {e:?}");
                }
            }
        }
    }

    /// Receives until the limit is reached or the remote end closes, appending every accepted
    /// report to `sink`.
    ///
    /// Upstream errors are logged and do not count towards the limit.
    #[instrument(skip_all, fields(app.limit = self.limit, app.accepted))]
    pub async fn run<S: ReportSink>(mut self, sink: &mut S) -> Result<SessionSummary> {
        let end = loop {
            match self.receive_next().await? {
                Received::Report(report) => {
                    sink.append(&report).await?;
                    self.accepted += 1;
                    info!("processed {} message(s)", self.accepted);

                    if self.limit.is_some_and(|limit| self.accepted >= limit) {
                        self.close().await;
                        break SessionEnd::Limit;
                    }
                }
                Received::ServerError(e) => warn!("upstream reported an error: {e}"),
                Received::EndOfStream => break SessionEnd::EndOfStream,
            }
        };

        tracing::Span::current().record("app.accepted", self.accepted);

        Ok(SessionSummary {
            accepted: self.accepted,
            server_errors: self.server_errors,
            skipped: self.skipped,
            end,
        })
    }

    async fn close(&mut self) {
        if let Err(e) = self.transport.close().await {
            warn!("failed to close stream cleanly: {e:?}");
        }
        self.state = SessionState::Closed;
    }
}
