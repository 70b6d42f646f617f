//! Interactive loop shared by the binary and its tests.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::error::ClientError;
use crate::render::render_message;
use crate::session::ChatSession;
use crate::transport::{ChatReply, ChatTransport};

/// Reads questions from `input` while earlier requests are still in flight.
///
/// Every submitted line is written to `out` at once; replies are appended in
/// completion order, one bot message per question. Returns after `input`
/// reaches EOF and every outstanding reply has arrived.
pub async fn run<R, W>(
    session: &mut ChatSession,
    transport: Arc<dyn ChatTransport>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    for msg in session.messages() {
        writeln!(out, "{}", render_message(msg))?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Result<ChatReply, ClientError>>();
    let mut lines = input.lines();
    let mut pending = 0usize;
    let mut input_open = true;

    while input_open || pending > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                let Some(question) = session.submit(&line) else {
                    continue;
                };
                if let Some(msg) = session.last() {
                    writeln!(out, "{}", render_message(msg))?;
                }
                pending += 1;
                let transport = transport.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reply = transport.send(&question).await;
                    // receiver only goes away on exit
                    let _ = tx.send(reply);
                });
            }
            Some(reply) = rx.recv() => {
                pending = pending.saturating_sub(1);
                writeln!(out, "{}", render_message(session.apply_reply(reply)))?;
            }
        }
    }

    out.flush()
}
