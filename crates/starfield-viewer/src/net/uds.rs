use crate::net::Incoming;
use anyhow::{anyhow, Context, Result};
use crossbeam_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use starfield_core::Msg;
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::bytes::Bytes;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

fn encode(msg: &Msg) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(msg)?))
}

#[derive(Clone)]
pub struct FeedHandle {
    out: mpsc::UnboundedSender<Msg>,
}

impl FeedHandle {
    pub fn send(&self, msg: Msg) -> Result<()> {
        self.out
            .send(msg)
            .map_err(|_| anyhow!("feed client has stopped"))
    }
}

enum Flow {
    Reconnect,
    Stop,
}

pub fn spawn_client(sock_path: String, refresh: Duration, tx: Sender<Incoming>) -> FeedHandle {
    let (out, mut out_rx) = mpsc::unbounded_channel();
    let refresh = refresh.max(Duration::from_secs(1));

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                let _ = tx.send(Incoming::error(sock_path.clone(), format!("tokio runtime: {e}")));
                return;
            }
        };
        rt.block_on(async move {
            loop {
                match run(&sock_path, refresh, &tx, &mut out_rx).await {
                    Ok(Flow::Stop) => break,
                    Ok(Flow::Reconnect) => {}
                    Err(e) => {
                        let _ = tx.send(Incoming::error(sock_path.clone(), format!("{e:#}")));
                        let _ = tx.send(Incoming::disconnected(sock_path.clone()));
                    }
                }
                if drop_pending(&mut out_rx) {
                    break;
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
            tracing::debug!(endpoint = %sock_path, "feed client stopped");
        });
    });

    FeedHandle { out }
}

fn drop_pending(out_rx: &mut mpsc::UnboundedReceiver<Msg>) -> bool {
    loop {
        match out_rx.try_recv() {
            Ok(Msg::RecordClick { id }) => {
                tracing::warn!(item = %id, "feed offline, click not recorded");
            }
            Ok(_) => {}
            Err(mpsc::error::TryRecvError::Empty) => return false,
            Err(mpsc::error::TryRecvError::Disconnected) => return true,
        }
    }
}

async fn run(
    sock_path: &str,
    refresh: Duration,
    tx: &Sender<Incoming>,
    out_rx: &mut mpsc::UnboundedReceiver<Msg>,
) -> Result<Flow> {
    let stream = UnixStream::connect(sock_path)
        .await
        .with_context(|| format!("connect UDS {sock_path}"))?;

    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    let _ = tx.send(Incoming::connected(sock_path.to_string()));
    tracing::info!(endpoint = %sock_path, "item feed connected");

    let hello = Msg::Hello {
        version: env!("CARGO_PKG_VERSION").into(),
    };
    framed.send(encode(&hello)?).await?;

    let mut refresh_timer = tokio::time::interval(refresh);

    loop {
        tokio::select! {
            frame = framed.next() => {
                let Some(frame) = frame else {
                    break;
                };
                let bytes = frame?;
                match serde_json::from_slice::<Msg>(&bytes) {
                    Ok(m) => {
                        let _ = tx.send(Incoming::from_msg(sock_path.to_string(), m));
                    }
                    Err(e) => {
                        let _ = tx.send(Incoming::error(
                            sock_path.to_string(),
                            format!("decode error: {e}"),
                        ));
                    }
                }
            }
            out = out_rx.recv() => {
                let Some(msg) = out else {
                    return Ok(Flow::Stop);
                };
                if let Err(e) = framed.send(encode(&msg)?).await {
                    // fire-and-forget: the message is gone, the connection is rebuilt
                    tracing::warn!(error = %e, ?msg, "failed to send to item feed");
                    return Err(e.into());
                }
            }
            // first tick fires immediately and doubles as the initial request
            _ = refresh_timer.tick() => {
                framed.send(encode(&Msg::RequestCatalog)?).await?;
            }
        }
    }

    let _ = tx.send(Incoming::disconnected(sock_path.to_string()));
    Ok(Flow::Reconnect)
}
