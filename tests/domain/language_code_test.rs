use wordstamp::domain::LanguageCode;

#[test]
fn given_mixed_case_code_when_parsing_then_normalizes() {
    let code = LanguageCode::parse("  EN ").unwrap();

    assert_eq!(code.as_str(), "en");
    assert_eq!(code.to_string(), "en");
}

#[test]
fn given_blank_code_when_parsing_then_returns_none() {
    assert!(LanguageCode::parse("").is_none());
    assert!(LanguageCode::parse("   ").is_none());
}
