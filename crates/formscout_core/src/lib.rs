//! Formscout core: pure URL handling and page classification.
mod classify;
mod normalize;
mod source;

pub use classify::{classify, has_form, is_block_page, Verdict, BLOCK_PAGE_BRAND, BLOCK_PAGE_PHRASE};
pub use normalize::normalize_url;
pub use source::{read_urls_from_file, read_urls_from_stream, SourceError, StreamUrls};
