//! Line-delimited JSON-RPC over stdin/stdout

use super::handler::McpHandler;
use super::protocol::{JsonRpcResponse, PARSE_ERROR};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Serve requests read from `reader` until EOF or cancellation.
///
/// Requests are handled one at a time; each response is written as a
/// single line and flushed. A line that is not UTF-8 gets a parse error
/// and the loop keeps reading.
pub async fn serve<R, W>(
    handler: &McpHandler,
    mut reader: R,
    mut writer: W,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("MCP server started (JSON-RPC 2.0 over stdio)");
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("stdio transport cancelled");
                break;
            }
            n = reader.read_until(b'\n', &mut buf) => n?,
        };
        if n == 0 {
            debug!("stdin closed");
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                handler.handle_message(trimmed).await
            }
            Err(e) => {
                warn!(error = %e, "Discarding non UTF-8 input line");
                Some(JsonRpcResponse::err(None, PARSE_ERROR, "Parse error: invalid UTF-8"))
            }
        };

        if let Some(response) = response {
            let json = serde_json::to_string(&response)?;
            writer.write_all(json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    info!("MCP stdio server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;
    use tubekit_core::ShutdownController;
    use tubekit_tools::ToolRegistry;

    fn handler() -> McpHandler {
        McpHandler::new(Arc::new(ToolRegistry::new()), ShutdownController::new())
    }

    #[tokio::test]
    async fn test_one_line_per_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            "garbage\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        serve(
            &handler(),
            input.as_bytes(),
            &mut output,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], -32700);
        assert_eq!(lines[2]["result"]["tools"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#);
        input.push(b'\n');

        let mut output = Vec::new();
        serve(
            &handler(),
            input.as_slice(),
            &mut output,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], -32700);
        assert_eq!(lines[1]["id"], 7);
        assert_eq!(lines[1]["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_cancelled_before_input() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (_client, server) = tokio::io::duplex(64);
        let mut output = Vec::new();
        serve(
            &handler(),
            tokio::io::BufReader::new(server),
            &mut output,
            cancel,
        )
        .await
        .unwrap();
        assert!(output.is_empty());
    }
}
