use assert_matches::assert_matches;

use brc_catalog_build::domain::RefLabel;
use brc_catalog_build::normalize::{InvalidNumber, boolean_label, list, number, number_or_null};

#[test]
fn required_numbers() {
    assert_matches!(number(""), Err(InvalidNumber(_)));
    assert_eq!(number("12.5").unwrap().value(), 12.5);
    assert_matches!(number("abc"), Err(InvalidNumber(value)) if value == "abc");
    assert_eq!(number("2.5e6").unwrap().value(), 2_500_000.0);
}

#[test]
fn optional_numbers() {
    assert_eq!(number_or_null("").unwrap(), None);
    assert_matches!(number_or_null("12x"), Err(InvalidNumber(_)));
}

#[test]
fn lists() {
    assert!(list("").is_empty());
    assert_eq!(list("a,b,c"), vec!["a", "b", "c"]);
}

#[test]
fn reference_labels() {
    assert_eq!(boolean_label("true"), Some(RefLabel::Yes));
    assert_eq!(boolean_label("False"), Some(RefLabel::No));
}
