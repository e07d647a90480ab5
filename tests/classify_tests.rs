// SPDX-License-Identifier: MPL-2.0

//! Integration tests for payload classification

use qrscan::constants::links::FILE_EXTENSIONS;
use qrscan::{PayloadKind, QrAction};

#[test]
fn test_every_listed_extension_is_a_file_link() {
    for ext in FILE_EXTENSIONS {
        let url = format!("https://example.com/files/report.{}", ext);
        assert_eq!(
            QrAction::classify(&url).kind(),
            PayloadKind::FileLink,
            "extension {} should be a file link",
            ext
        );
    }
}

#[test]
fn test_unlisted_extensions_are_web_links() {
    for url in [
        "https://example.com/index.html",
        "https://example.com/script.php",
        "https://example.com/archive.tar",
        "https://example.com/pdf",
    ] {
        assert_eq!(QrAction::classify(url).kind(), PayloadKind::WebLink, "{}", url);
    }
}

#[test]
fn test_classification_ignores_case() {
    assert_eq!(
        QrAction::classify("HTTP://X.COM/A.PDF").kind(),
        QrAction::classify("http://x.com/a.pdf").kind()
    );
    assert_eq!(
        QrAction::classify("https://EXAMPLE.com/Download/latest").kind(),
        PayloadKind::FileLink
    );
}

#[test]
fn test_download_segment_anywhere_in_path() {
    assert_eq!(
        QrAction::classify("https://example.com/a/download/b?id=7").kind(),
        PayloadKind::FileLink
    );
    // Segment needs both slashes
    assert_eq!(
        QrAction::classify("https://example.com/downloads").kind(),
        PayloadKind::WebLink
    );
}

#[test]
fn test_classification_is_total() {
    for input in [
        "",
        "   ",
        "://",
        "http://",
        "http:// example.com",
        "mailto:someone@example.com",
        "example.com/app.apk",
        "12345",
        "ünïcödé ✓",
        "\u{0}",
    ] {
        // Never panics, and only a valid URL can become a link
        let action = QrAction::classify(input);
        assert_eq!(action.kind(), PayloadKind::PlainText, "{:?}", input);
    }
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    assert_eq!(
        QrAction::classify("  https://example.com/app.apk\n"),
        QrAction::FileLink("https://example.com/app.apk".into())
    );
}

#[test]
fn test_other_schemes_are_links() {
    assert_eq!(
        QrAction::classify("ftp://files.example.com/pub/file.zip").kind(),
        PayloadKind::FileLink
    );
    assert_eq!(
        QrAction::classify("myapp://open").kind(),
        PayloadKind::WebLink
    );
}

#[test]
fn test_payload_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&PayloadKind::FileLink).unwrap(),
        "\"file_link\""
    );
}
