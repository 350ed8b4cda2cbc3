//! Cancellable fetch and import of remote sheets.

use qsheet_core::{Clock, CommandOutcome, DocumentStore, IdGenerator, Storage};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::FetchError;
use crate::normalize::{Record, normalize_records, parse_payload};
use crate::source::SheetSource;

/// What an import changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub topics: usize,
    pub questions: usize,
    pub outcome: CommandOutcome,
}

/// Fetch the question records of a sheet unless `token` is cancelled first.
///
/// A result that arrives after cancellation is discarded.
pub async fn fetch_records_cancellable<S: SheetSource>(
    source: &S,
    slug: &str,
    token: &CancellationToken,
) -> Result<Vec<Record>, FetchError> {
    let payload = tokio::select! {
        biased;
        () = token.cancelled() => return Err(FetchError::Cancelled),
        result = source.fetch_sheet(slug) => result?,
    };
    if token.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    Ok(parse_payload(&payload))
}

/// Fetch a sheet, normalize it and replace the store's tree with it.
///
/// An empty sheet is rejected so a bad slug never wipes the current tree.
/// The import goes through the store's normal command path and can be undone.
pub async fn import_sheet<St, S>(
    store: &mut DocumentStore<St>,
    source: &S,
    slug: &str,
    token: &CancellationToken,
    clock: &dyn Clock,
    ids: &mut dyn IdGenerator,
) -> Result<ImportSummary, FetchError>
where
    St: Storage,
    S: SheetSource,
{
    let records = fetch_records_cancellable(source, slug, token).await?;
    let tree = normalize_records(&records, clock, ids);
    if tree.is_empty() {
        return Err(FetchError::Empty {
            slug: slug.to_string(),
        });
    }

    let summary = ImportSummary {
        topics: tree.len(),
        questions: tree.questions().count(),
        outcome: store.import_tree(tree)?,
    };
    info!(
        slug,
        topics = summary.topics,
        questions = summary.questions,
        "Imported remote sheet"
    );
    Ok(summary)
}
