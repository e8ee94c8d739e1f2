use switchyard::pattern::{DomainPattern, PathPattern, PatternError, WILDCARD_PARAM};

fn compile(template: &str) -> PathPattern {
    PathPattern::compile(template, &[]).expect("template should compile")
}

fn constraints(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn param<'a>(params: &'a switchyard::ParamVec, name: &str) -> Option<&'a str> {
    params
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_literal_match() {
    let pattern = compile("/zoo/animals");
    let params = pattern.match_path("/zoo/animals").unwrap();
    assert!(params.is_empty());
    assert!(pattern.match_path("/zoo/plants").is_none());
    assert!(pattern.match_path("/zoo/animals/1").is_none());
}

#[test]
fn test_root_template() {
    let pattern = compile("/");
    assert!(pattern.match_path("/").is_some());
    assert!(pattern.match_path("/x").is_none());
}

#[test]
fn test_param_extraction() {
    let pattern = compile("/users/{user_id}/posts/{post_id}");
    let params = pattern.match_path("/users/42/posts/seven").unwrap();
    assert_eq!(param(&params, "user_id"), Some("42"));
    assert_eq!(param(&params, "post_id"), Some("seven"));
}

#[test]
fn test_default_constraint_excludes_slash() {
    let pattern = compile("/users/{id}");
    assert!(pattern.match_path("/users/abc").is_some());
    assert!(pattern.match_path("/users/a/b").is_none());
    assert!(pattern.match_path("/users/").is_none());
}

#[test]
fn test_custom_constraint() {
    let pattern =
        PathPattern::compile("/users/{id}", &constraints(&[("id", r"\d+")])).unwrap();
    let params = pattern.match_path("/users/42").unwrap();
    assert_eq!(param(&params, "id"), Some("42"));
    assert!(pattern.match_path("/users/abc").is_none());
}

#[test]
fn test_constraint_with_capture_group_does_not_shift_extraction() {
    let pattern = PathPattern::compile(
        "/files/{name}/{ext}",
        &constraints(&[("name", r"(img|doc)-\d+")]),
    )
    .unwrap();
    let params = pattern.match_path("/files/img-7/png").unwrap();
    assert_eq!(param(&params, "name"), Some("img-7"));
    assert_eq!(param(&params, "ext"), Some("png"));
}

#[test]
fn test_wildcard_captures_remainder() {
    let pattern = compile("/files/*");
    assert!(pattern.is_wildcard());
    let params = pattern.match_path("/files/images/logo.png").unwrap();
    assert_eq!(param(&params, WILDCARD_PARAM), Some("images/logo.png"));
}

#[test]
fn test_wildcard_matches_bare_prefix() {
    let pattern = compile("/files/*");
    let params = pattern.match_path("/files").unwrap();
    assert_eq!(param(&params, WILDCARD_PARAM), Some(""));
}

#[test]
fn test_wildcard_must_be_last() {
    let err = PathPattern::compile("/files/*/meta", &[]).unwrap_err();
    assert!(matches!(err, PatternError::WildcardPosition));
}

#[test]
fn test_unterminated_brace_rejected() {
    let err = PathPattern::compile("/users/{id", &[]).unwrap_err();
    assert!(matches!(err, PatternError::UnterminatedBrace { .. }));
}

#[test]
fn test_empty_param_rejected() {
    let err = PathPattern::compile("/users/{}", &[]).unwrap_err();
    assert!(matches!(err, PatternError::EmptyParam { .. }));
}

#[test]
fn test_mixed_segment_rejected() {
    let err = PathPattern::compile("/users/v{id}", &[]).unwrap_err();
    assert!(matches!(err, PatternError::MalformedSegment { .. }));
}

#[test]
fn test_duplicate_param_rejected() {
    let err = PathPattern::compile("/a/{id}/b/{id}", &[]).unwrap_err();
    assert!(matches!(err, PatternError::DuplicateParam { .. }));
}

#[test]
fn test_bad_constraint_rejected_at_compile_time() {
    let err =
        PathPattern::compile("/users/{id}", &constraints(&[("id", "([")])).unwrap_err();
    match err {
        PatternError::Constraint { param, .. } => assert_eq!(param, "id"),
        other => panic!("expected constraint error, got {other:?}"),
    }
}

#[test]
fn test_domain_exact_match() {
    let pattern = DomainPattern::compile("api.example.com").unwrap();
    assert!(pattern.match_host("api.example.com").is_some());
    assert!(pattern.match_host("API.Example.COM").is_some());
    assert!(pattern.match_host("api.example.com:8080").is_some());
    assert!(pattern.match_host("www.example.com").is_none());
}

#[test]
fn test_domain_param_extraction() {
    let pattern = DomainPattern::compile("{tenant}.example.com").unwrap();
    let params = pattern.match_host("acme.example.com").unwrap();
    assert_eq!(param(&params, "tenant"), Some("acme"));
    assert!(pattern.match_host("example.com").is_none());
    assert!(pattern.match_host("a.b.example.com").is_none());
}

#[test]
fn test_domain_prefix_wildcard() {
    let pattern = DomainPattern::compile("*.example.com").unwrap();
    assert!(pattern.match_host("a.example.com").is_some());
    assert!(pattern.match_host("a.b.example.com").is_some());
    assert!(pattern.match_host("example.com").is_none());
}

#[test]
fn test_domain_wildcard_must_lead() {
    let err = DomainPattern::compile("api.*.com").unwrap_err();
    assert!(matches!(err, PatternError::DomainWildcardPosition));
}

#[test]
fn test_domain_empty_label_rejected() {
    let err = DomainPattern::compile("api..com").unwrap_err();
    assert!(matches!(err, PatternError::EmptyDomainLabel));
}
