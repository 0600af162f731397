use super::*;

#[test]
fn test_get_existing_doc() {
    let doc = ErrorDocs::get(ErrorCode::E6001).unwrap();
    assert!(doc.contains("Unresolved Identifier"));
}

#[test]
fn test_tdz_doc_mentions_dead_zone() {
    let doc = ErrorDocs::get(ErrorCode::E6002).unwrap();
    assert!(doc.contains("temporal dead zone"));
}

/// Every code is documented, and the heading names the code it documents.
#[test]
fn test_every_code_documented() {
    for code in ErrorCode::ALL {
        let doc = ErrorDocs::get(*code);
        assert!(doc.is_some(), "{code} has no documentation");
        let heading = doc.unwrap().lines().next().unwrap_or_default();
        assert!(
            heading.starts_with(&format!("# {code}:")),
            "{code} heading is {heading:?}"
        );
    }
}

#[test]
fn test_no_duplicate_docs() {
    let codes: Vec<_> = ErrorDocs::all_codes().collect();
    let unique: std::collections::HashSet<_> = codes.iter().collect();
    assert_eq!(codes.len(), unique.len(), "DOCS contains duplicate codes");
    assert!(ErrorDocs::has_docs(ErrorCode::E9001));
}
