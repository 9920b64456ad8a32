//! Joining response fragments into the final text.

use super::provider::FragmentStream;
use crate::error::AggregateError;
use futures_util::StreamExt;

/// Concatenate fragment text in arrival order and trim the result.
///
/// The `is_final` marker does not stop aggregation; the stream's own end does.
/// If the stream yields an error, the text gathered so far is returned with it.
pub async fn aggregate(mut fragments: FragmentStream) -> Result<String, AggregateError> {
    let mut text = String::new();
    let mut count = 0usize;

    while let Some(item) = fragments.next().await {
        match item {
            Ok(fragment) => {
                text.push_str(&fragment.text);
                count += 1;
                if fragment.is_final {
                    tracing::trace!("Final fragment received after {count} fragments");
                }
            }
            Err(source) => {
                return Err(AggregateError {
                    partial: text.trim().to_string(),
                    source,
                });
            }
        }
    }

    tracing::debug!("Aggregated {count} fragments");
    Ok(text.trim().to_string())
}
