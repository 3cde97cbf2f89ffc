use ais_stream::{cli::StreamArgs, settings::Settings, startup::App};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub enum ServerFrame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

/// A local websocket server standing in for aisstream.io, accepting a single connection.
pub struct TestHelper {
    pub endpoint: String,
    pub temp_dir: TempDir,
    pub app: App,
    subscription: Option<oneshot::Receiver<String>>,
    frames: mpsc::UnboundedSender<ServerFrame>,
}

impl TestHelper {
    pub async fn new() -> TestHelper {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("ws://{}", listener.local_addr().unwrap());

        let (subscription_tx, subscription_rx) = oneshot::channel();
        let (frames, mut frames_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            if let Some(Ok(Message::Text(subscription))) = ws.next().await {
                let _ = subscription_tx.send(subscription);
            }

            while let Some(frame) = frames_rx.recv().await {
                let result = match frame {
                    ServerFrame::Text(text) => ws.send(Message::Text(text)).await,
                    ServerFrame::Binary(data) => ws.send(Message::Binary(data)).await,
                    ServerFrame::Close => {
                        let _ = ws.close(None).await;
                        break;
                    }
                };
                if result.is_err() {
                    break;
                }
            }

            while let Some(Ok(_)) = ws.next().await {}
        });

        let app = App::build(Settings {
            api_key: Some("test-key".to_string()),
            endpoint: endpoint.clone(),
            log_level: "debug".to_string(),
        });

        TestHelper {
            endpoint,
            temp_dir: tempdir().unwrap(),
            app,
            subscription: Some(subscription_rx),
            frames,
        }
    }

    pub fn outpath(&self) -> PathBuf {
        self.temp_dir.path().join("ais_data").join("data")
    }

    pub fn stream_args(&self, mmsi: &str, limit: Option<u64>) -> StreamArgs {
        StreamArgs {
            mmsi: Some(mmsi.to_string()),
            north_west: None,
            south_east: None,
            limit,
            positions_only: false,
            outpath: self.outpath(),
        }
    }

    pub fn send_text(&self, frame: serde_json::Value) {
        self.frames.send(ServerFrame::Text(frame.to_string())).unwrap();
    }

    pub fn send_binary(&self, frame: serde_json::Value) {
        self.frames
            .send(ServerFrame::Binary(frame.to_string().into_bytes()))
            .unwrap();
    }

    pub fn close(&self) {
        self.frames.send(ServerFrame::Close).unwrap();
    }

    /// The first frame the client sent, parsed as json.
    pub async fn subscription(&mut self) -> serde_json::Value {
        let frame = self.subscription.take().unwrap().await.unwrap();
        serde_json::from_str(&frame).unwrap()
    }
}

pub fn position(mmsi: i32, lat: f64, lon: f64, sog: f64, name: &str) -> serde_json::Value {
    json!({
        "MessageType": "PositionReport",
        "Message": {
            "PositionReport": {
                "Cog": 308.0,
                "Latitude": lat,
                "Longitude": lon,
                "Sog": sog,
                "UserID": mmsi,
                "Valid": true
            }
        },
        "MetaData": {
            "MMSI": mmsi,
            "ShipName": name,
            "latitude": lat,
            "longitude": lon,
            "time_utc": "2024-06-01 12:00:00.000000000 +0000 UTC"
        }
    })
}

pub fn static_data(mmsi: i32, name: &str) -> serde_json::Value {
    json!({
        "MessageType": "ShipStaticData",
        "Message": {"ShipStaticData": {"UserID": mmsi, "Name": name, "ImoNumber": 0}},
        "MetaData": {"MMSI": mmsi, "ShipName": name}
    })
}

pub fn server_error() -> serde_json::Value {
    json!({"error": "Api Key Is Not Valid"})
}
