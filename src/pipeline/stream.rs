use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// Prefix of worker output lines meant for the console.
pub const INFO_TAG: &str = "info ";

/// Reads `reader` line by line until end of stream, forwarding every line
/// that starts with `tag` to `sink` with the tag removed.
///
/// Other lines are dropped. Returns the forwarded lines without their line
/// terminators.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub async fn filter_tagged_lines<R, W>(
    mut reader: R,
    mut sink: W,
    tag: &str,
) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut forwarded = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let Some(rest) = buf.strip_prefix(tag.as_bytes()) else {
            continue;
        };
        sink.write_all(rest).await?;
        if !rest.ends_with(b"\n") {
            sink.write_all(b"\n").await?;
        }
        sink.flush().await?;

        let text = String::from_utf8_lossy(rest);
        forwarded.push(text.trim_end_matches(['\r', '\n']).to_string());
    }
    Ok(forwarded)
}
