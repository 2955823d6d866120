//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! Every request runs on its own task so a slow upstream call doesn't hold up
//! `ping` or `tools/list`. Replies are funnelled through a single writer task.
//! `notifications/cancelled` drops the matching in-flight call without a reply.
//! A request reusing the id of one still in flight is rejected.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use log::{error, info, warn};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;

use crate::mcp::rpc::{OutboundResponse, RpcRequest};
use crate::mcp::service::McpService;

const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;
const CANCELLED_METHOD: &str = "notifications/cancelled";

/// In-flight requests by id. The generation tells a finishing task whether
/// the slot is still its own.
type InFlight = Arc<Mutex<HashMap<String, (u64, CancellationToken)>>>;

/// Serves the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(service: McpService) -> std::io::Result<()> {
    serve(service, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serves one connection until `reader` reaches EOF, then waits for
/// outstanding replies to be written.
pub async fn serve<R, W>(service: McpService, reader: R, writer: W) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut frames = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_FRAME_BYTES));
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut sink = FramedWrite::new(writer, LinesCodec::new());
        while let Some(line) = rx.recv().await {
            if let Err(err) = sink.send(line).await {
                error!("failed to write MCP response: {}", err);
                return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
            }
        }
        Ok(())
    });

    let in_flight: InFlight = Arc::default();
    let mut generation: u64 = 0;

    while let Some(frame) = frames.next().await {
        let line = match frame {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                warn!("discarding MCP frame larger than {} bytes", MAX_FRAME_BYTES);
                reply(&tx, &OutboundResponse::parse_error("Parse error: frame too large"));
                continue;
            }
            Err(LinesCodecError::Io(err)) => {
                error!("failed to read MCP input: {}", err);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request = match decode(&line) {
            Ok(request) => request,
            Err(response) => {
                reply(&tx, &response);
                continue;
            }
        };

        if request.method == CANCELLED_METHOD {
            cancel(&in_flight, request.params.as_ref());
            continue;
        }

        let Some(id) = request.id.clone() else {
            // Notifications never produce a reply.
            service.handle_request(request).await;
            continue;
        };

        let key = id.to_string();
        let token = CancellationToken::new();
        generation += 1;
        let owner = generation;
        match in_flight.lock().entry(key.clone()) {
            Entry::Occupied(_) => {
                warn!("rejecting request {}: id already in flight", key);
                reply(
                    &tx,
                    &OutboundResponse::invalid_request(
                        Some(id),
                        format!("Invalid request: id {} is already in flight", key),
                    ),
                );
                continue;
            }
            Entry::Vacant(slot) => {
                slot.insert((owner, token.clone()));
            }
        }

        let service = service.clone();
        let tx = tx.clone();
        let in_flight = in_flight.clone();
        tokio::spawn(async move {
            let response = tokio::select! {
                _ = token.cancelled() => {
                    info!("request {} cancelled by client", key);
                    None
                }
                response = service.handle_request(request) => response,
            };
            release(&in_flight, &key, owner);
            if let Some(response) = response {
                reply(&tx, &response);
            }
        });
    }

    info!("MCP input closed, waiting for pending replies");
    drop(tx);
    writer_task
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?
}

fn decode(line: &str) -> Result<RpcRequest, OutboundResponse> {
    let value: Value = serde_json::from_str(line)
        .map_err(|err| OutboundResponse::parse_error(format!("Parse error: {}", err)))?;
    let id = value.get("id").cloned();
    serde_json::from_value(value)
        .map_err(|err| OutboundResponse::invalid_request(id, format!("Invalid request: {}", err)))
}

fn cancel(in_flight: &InFlight, params: Option<&Value>) {
    let Some(request_id) = params.and_then(|p| p.get("requestId")) else {
        warn!("{} without a requestId", CANCELLED_METHOD);
        return;
    };

    match in_flight.lock().remove(&request_id.to_string()) {
        Some((_, token)) => token.cancel(),
        None => info!("cancellation for unknown or finished request {}", request_id),
    }
}

fn release(in_flight: &InFlight, key: &str, owner: u64) {
    let mut table = in_flight.lock();
    if matches!(table.get(key), Some((current, _)) if *current == owner) {
        table.remove(key);
    }
}

fn reply(tx: &mpsc::UnboundedSender<String>, response: &OutboundResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if tx.send(line).is_err() {
                warn!("MCP writer closed, dropping response");
            }
        }
        Err(err) => error!("failed to serialize MCP response: {}", err),
    }
}
