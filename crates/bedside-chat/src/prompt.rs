//! Prompt augmentation with retrieved directory context.

use bedside_directory::Record;

/// Context line used when retrieval found nothing.
const NO_CONTEXT: &str = "No relevant directory entries were found in the database.";

/// Wrap a user message with retrieved context, instructing the model to
/// answer only from that context.
pub fn augment(message: &str, records: &[&Record]) -> String {
    let context = if records.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        serde_json::to_string(records).unwrap_or_else(|_| NO_CONTEXT.to_string())
    };

    format!(
        "Context from our database:\n---\n{}\n---\nBased ONLY on the context above, answer the user's request: \"{}\"",
        context, message
    )
}
