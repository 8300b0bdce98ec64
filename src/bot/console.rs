//! Console transport: `<user>: <text>` lines in, `[<user>] <text>` lines out.

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{ChatMessage, Reply};

/// Split `alice: !profile` into a message from `alice`. The user doubles as the
/// display name. Lines without a `:` or with an empty user are rejected.
pub fn parse_line(line: &str) -> Option<ChatMessage> {
    let (user, text) = line.split_once(':')?;
    let user = user.trim();
    if user.is_empty() || user.chars().any(char::is_whitespace) {
        return None;
    }
    Some(ChatMessage::new(user, user, text.trim()))
}

pub fn format_reply(reply: &Reply) -> String {
    reply
        .text
        .lines()
        .map(|line| format!("[{}] {}", reply.to, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read lines from `reader` until EOF, forwarding every well-formed one.
pub async fn pump_lines<R>(reader: R, tx: mpsc::Sender<ChatMessage>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(msg) => {
                if tx.send(msg).await.is_err() {
                    break;
                }
            }
            None => debug!("console: ignoring line without '<user>:' prefix"),
        }
    }
    Ok(())
}

/// Write every reply to `writer` until the channel closes.
pub async fn drain_replies<W>(mut writer: W, mut rx: mpsc::Receiver<Reply>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(reply) = rx.recv().await {
        writer.write_all(format_reply(&reply).as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Spawn the stdin reader and stdout writer tasks and return the channel ends the
/// server loop consumes.
pub fn spawn_stdio() -> (mpsc::Receiver<ChatMessage>, mpsc::Sender<Reply>, JoinHandle<()>) {
    let (in_tx, in_rx) = mpsc::channel(64);
    let (out_tx, out_rx) = mpsc::channel(64);
    tokio::spawn(async move {
        if let Err(e) = pump_lines(BufReader::new(tokio::io::stdin()), in_tx).await {
            warn!("console: stdin read failed: {}", e);
        }
    });
    let writer = tokio::spawn(async move {
        if let Err(e) = drain_replies(tokio::io::stdout(), out_rx).await {
            warn!("console: stdout write failed: {}", e);
        }
    });
    (in_rx, out_tx, writer)
}
