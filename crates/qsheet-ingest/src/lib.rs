//! Import of external question sheets.
//!
//! - [`normalize`] turns flat question records with loosely named fields into
//!   a canonical [`qsheet_model::Tree`]
//! - [`source`] fetches raw sheets over HTTP, with a per-slug TTL cache
//! - [`fetch`] ties both together behind a cancellation token and hands the
//!   result to the document store

mod error;
pub mod fetch;
pub mod fields;
pub mod normalize;
pub mod source;

pub use error::FetchError;
pub use fetch::{ImportSummary, fetch_records_cancellable, import_sheet};
pub use fields::FieldChain;
pub use normalize::{Record, normalize_records, parse_payload};
pub use source::{
    CachedSheetSource, DEFAULT_BASE_URL, DEFAULT_CACHE_TTL, DEFAULT_SLUG, FetchedSheet,
    HttpSheetSource, SheetSource,
};
