use std::sync::Once;

use formscout_core::{classify, has_form, is_block_page, Verdict};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

#[test]
fn block_page_needs_both_markers() {
    init_logging();
    assert!(is_block_page(
        "...Attention Required... powered by Cloudflare..."
    ));
    assert!(is_block_page("Cloudflare Ray ID ... Attention Required!"));
    assert!(!is_block_page("<h1>Attention Required</h1>"));
    assert!(!is_block_page("<footer>Cloudflare</footer>"));
    assert!(!is_block_page(""));
}

#[test]
fn block_page_match_is_case_sensitive() {
    assert!(!is_block_page("attention required by cloudflare"));
}

#[test]
fn form_detection_examples() {
    init_logging();
    assert!(has_form("<html><body><form></form></body></html>"));
    assert!(!has_form("<html><body>no form here</body></html>"));
    assert!(has_form("<html><body><FORM>"));
    assert!(has_form("<Form action=\"/login\">"));
}

#[test]
fn empty_and_truncated_bodies_have_no_form() {
    assert!(!has_form(""));
    assert!(!has_form("<html><body><form"));
    assert!(!has_form("<html><body><fo"));
    assert!(!has_form("<<<>>>&&&</ \u{0}"));
}

#[test]
fn malformed_markup_before_form_is_tolerated() {
    assert!(has_form("<div <p =\"\" class=>x</div><!-- unterminated --><form>"));
}

#[test]
fn form_in_comment_is_not_a_tag() {
    assert!(!has_form("<!-- <form> -->"));
}

#[test]
fn first_form_short_circuits_large_body() {
    let mut body = String::from("<form>");
    body.push_str(&"<div>filler</div>".repeat(100_000));
    assert!(has_form(&body));
    assert_eq!(classify(&body), Verdict::Form);
}
