//! Newline-delimited JSON-RPC over stdin/stdout.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

use crate::models::Response;
use crate::server::McpServer;

/// Serves the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: &McpServer) -> io::Result<()> {
    info!("serving MCP over stdio");
    let reader = BufReader::new(io::stdin());
    let writer = BufWriter::new(io::stdout());
    serve_lines(server, reader, writer).await?;
    info!("stdin closed, stopping");
    Ok(())
}

/// Reads one message per line, answering each request on its own line.
/// Blank lines are skipped; messages are handled strictly in order.
pub async fn serve_lines<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        // invalid UTF-8 decodes to replacement characters and fails as a parse error
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(response) = server.handle_message(line).await {
            write_response(&mut writer, &response).await?;
        }
    }
}

async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = serde_json::to_string(response)?;
    debug!(bytes = line.len(), "response");
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
