//! stdio transport: newline-delimited JSON-RPC on stdin/stdout.
//!
//! Each incoming line is handled on its own task. Responses go through a
//! channel to a single writer so output lines never interleave.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::jsonrpc::{JsonRpcResponse, ProtocolError};
use crate::mcp::McpServer;

/// Serve on the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: Arc<McpServer>) -> io::Result<()> {
    serve(server, io::stdin(), io::stdout()).await
}

/// Serve newline-delimited messages from `reader`, writing responses to
/// `writer`. Returns once `reader` hits EOF and every in-flight request has
/// been answered.
pub async fn serve<R, W>(server: Arc<McpServer>, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>(32);
    let writer_task = tokio::spawn(write_responses(rx, writer));

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut in_flight = JoinSet::new();

    info!("Awaiting client messages on stdin");
    loop {
        reap_finished(&mut in_flight);

        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read from input");
                break;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                debug!(error = %e, "Message is not valid UTF-8");
                let response = JsonRpcResponse::failure(
                    Value::Null,
                    ProtocolError::Parse(format!("message is not valid UTF-8: {e}")).into(),
                );
                match serde_json::to_string(&response) {
                    Ok(text) => {
                        if tx.send(text).await.is_err() {
                            debug!("Writer closed before response was sent");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize response"),
                }
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let server = server.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = server.handle_line(&line).await {
                if tx.send(response).await.is_err() {
                    debug!("Writer closed before response was sent");
                }
            }
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        log_join_error(joined);
    }
    drop(tx);

    let result = writer_task
        .await
        .map_err(|e| io::Error::other(format!("writer task failed: {e}")))?;
    info!("Input closed, session ended");
    result
}

/// Drop handler tasks that already finished so the set only holds live ones.
fn reap_finished(in_flight: &mut JoinSet<()>) {
    while let Some(joined) = in_flight.try_join_next() {
        log_join_error(joined);
    }
}

fn log_join_error(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "Request handler did not complete");
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<String>, mut writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
