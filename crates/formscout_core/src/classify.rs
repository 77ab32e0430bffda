//! Heuristic page classification.
//!
//! Both predicates are plain functions over body text. Neither builds a
//! document tree: block pages are found by substring, forms by walking the
//! tokenizer output until the first `<form>` start tag.

use std::cell::Cell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::TokenizerResult;

/// Title phrase of the edge provider's access-denied interstitial.
pub const BLOCK_PAGE_PHRASE: &str = "Attention Required";
/// Brand string that must accompany [`BLOCK_PAGE_PHRASE`].
pub const BLOCK_PAGE_BRAND: &str = "Cloudflare";

/// Outcome of classifying one response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The body is a challenge page; its markup is not inspected further.
    Blocked,
    Form,
    NoForm,
}

/// Classifies `body`, checking for a block page before looking for a form.
pub fn classify(body: &str) -> Verdict {
    if is_block_page(body) {
        Verdict::Blocked
    } else if has_form(body) {
        Verdict::Form
    } else {
        Verdict::NoForm
    }
}

/// True iff both marker strings occur anywhere in `body`.
pub fn is_block_page(body: &str) -> bool {
    body.contains(BLOCK_PAGE_PHRASE) && body.contains(BLOCK_PAGE_BRAND)
}

/// True iff the markup contains a `form` start tag.
///
/// Malformed or truncated markup never fails; it simply yields no tag.
pub fn has_form(body: &str) -> bool {
    let tokenizer = Tokenizer::new(FormSink::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(body));

    // The sink suspends the tokenizer on the first match.
    if let TokenizerResult::Script(()) = tokenizer.feed(&input) {
        return true;
    }
    tokenizer.end();
    tokenizer.sink.found.get()
}

#[derive(Default)]
struct FormSink {
    found: Cell<bool>,
}

impl TokenSink for FormSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if tag.kind != TagKind::StartTag {
            return TokenSinkResult::Continue;
        }

        // Without a tree builder the tokenizer has to be told about raw text
        // elements, otherwise `<form>` inside a script would count.
        match &*tag.name {
            "form" => {
                self.found.set(true);
                TokenSinkResult::Script(())
            }
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }
}
