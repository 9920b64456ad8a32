//! Incremental decoding of newline-delimited JSON response bodies.

use crate::error::{PipelineError, PipelineResult};
use futures_util::stream::{self, Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;

struct LineReader<S> {
    body: Pin<Box<S>>,
    buf: Vec<u8>,
    done: bool,
}

/// Decode one item per non-blank line of a chunked body.
///
/// Lines are parsed as soon as they are complete, so items are available
/// before the body finishes. Trailing data without a final newline is parsed
/// at end-of-stream. The stream ends after the first parse or read error,
/// which is yielded as its last item.
pub fn ndjson_stream<S, B, E, T>(
    body: S,
    parse: fn(&[u8]) -> PipelineResult<T>,
) -> impl Stream<Item = PipelineResult<T>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
    T: Send + 'static,
{
    let reader = LineReader {
        body: Box::pin(body),
        buf: Vec::new(),
        done: false,
    };

    stream::unfold(reader, move |mut reader| async move {
        loop {
            if reader.done {
                return None;
            }

            if let Some(pos) = reader.buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = reader.buf.drain(..=pos).collect();
                let line = trim(&line);
                if line.is_empty() {
                    continue;
                }
                let item = parse(line);
                reader.done = item.is_err();
                return Some((item, reader));
            }

            match reader.body.next().await {
                Some(Ok(chunk)) => reader.buf.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    reader.done = true;
                    let err = PipelineError::transport(format!("Failed to read response body: {e}"));
                    return Some((Err(err), reader));
                }
                None => {
                    reader.done = true;
                    let rest = std::mem::take(&mut reader.buf);
                    let rest = trim(&rest);
                    if rest.is_empty() {
                        return None;
                    }
                    return Some((parse(rest), reader));
                }
            }
        }
    })
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
