//! Siteaccess resolution against a URIElement(2) + MapURI + MapHost router.

use siteaccess_router::routing::{MatchingType, NormalizedRequest};

mod common;

fn resolve(url: &str) -> String {
    let router = common::router(common::ELEMENT_URI_HOST);
    let request = NormalizedRequest::from_url(url).unwrap();
    router.match_request(&request).name().to_string()
}

#[test]
fn test_default_siteaccess() {
    for url in [
        "http://example.com",
        "https://example.com",
        "http://example.com/",
        "https://example.com/",
        "http://example.com//",
        "https://example.com//",
        "http://example.com:8080/",
        "http://example.com/first_siteaccess/",
        "http://example.com/?first_siteaccess",
        "http://example.com/?first_sa",
        "http://example.com/first_salt",
        "http://example.com/first_sa.foo",
        "http://example.com/test",
        "http://example.com/default_sa",
    ] {
        assert_eq!(resolve(url), "default_sa", "{url}");
    }
}

#[test]
fn test_uri_element() {
    let cases = [
        ("http://example.com/test/foo/", "test_foo"),
        ("http://example.com/test/foo/bar/", "test_foo"),
        ("http://example.com/test/foo/bar/first_sa", "test_foo"),
        ("http://example.com/first_sa/foo", "first_sa_foo"),
        ("http://first_siteaccess:83/foo/baz/", "foo_baz"),
        ("http://example.com/second_sa/foo/", "second_sa_foo"),
    ];
    for (url, expected) in cases {
        assert_eq!(resolve(url), expected, "{url}");
    }
}

#[test]
fn test_double_slashes_are_not_collapsed() {
    for url in [
        "http://example.com//first_sa//",
        "http://example.com///first_sa///test",
        "http://example.com//first_sa//foo/bar",
    ] {
        assert_eq!(resolve(url), "default_sa", "{url}");
    }
}

#[test]
fn test_map_uri() {
    for url in [
        "http://example.com/first_sa",
        "http://example.com/first_sa/",
        "http://example.com:82/first_sa/",
        "http://third_siteaccess/first_sa/",
    ] {
        assert_eq!(resolve(url), "first_sa", "{url}");
    }
    for url in [
        "http://example.com/second_sa",
        "http://example.com/second_sa/",
        "http://example.com/second_sa?param1=foo",
        "http://example.com:82/second_sa/",
        "http://example.com:83/second_sa/",
        "http://first_siteaccess:82/second_sa/",
        "http://first_siteaccess:83/second_sa/",
    ] {
        assert_eq!(resolve(url), "second_sa", "{url}");
    }
}

#[test]
fn test_map_host() {
    for url in [
        "http://first_siteaccess:82/foo//bar/",
        "http://first_sa/",
        "https://first_sa/",
        "http://first_sa:81/",
        "http://first_siteaccess/",
        "http://first_siteaccess:82/",
        "http://first_siteaccess:83/",
        "http://first_siteaccess/foo/",
    ] {
        assert_eq!(resolve(url), "first_sa", "{url}");
    }
}

#[test]
fn test_matching_type_and_lexer() {
    let router = common::router(common::ELEMENT_URI_HOST);

    let by_element = router.match_request(&NormalizedRequest::from_url("http://example.com/test/foo/bar").unwrap());
    assert_eq!(by_element.matching_type(), MatchingType::UriElement);
    assert_eq!(by_element.analyse_uri("/test/foo/bar"), "/bar");
    assert_eq!(by_element.analyse_link("/bar"), "/test/foo/bar");

    let by_uri = router.match_request(&NormalizedRequest::from_url("http://example.com/second_sa/").unwrap());
    assert_eq!(by_uri.matching_type(), MatchingType::MapUri);
    assert_eq!(by_uri.analyse_uri("/second_sa/"), "/");

    let by_host = router.match_request(&NormalizedRequest::from_url("http://first_sa/foo").unwrap());
    assert_eq!(by_host.matching_type(), MatchingType::MapHost);
    assert!(!by_host.has_uri_lexer());

    let fallback = router.match_request(&NormalizedRequest::from_url("http://example.com/").unwrap());
    assert_eq!(fallback.matching_type(), MatchingType::Default);
}

#[test]
fn test_compound_requires_every_child() {
    let router = common::router(common::SITE);
    let resolve = |url: &str| {
        router
            .match_request(&NormalizedRequest::from_url(url).unwrap())
            .name()
            .to_string()
    };

    assert_eq!(resolve("http://shop.example.com:8080/cart"), "shop_dev");
    assert_eq!(resolve("http://shop.example.com/cart"), "setup");
    assert_eq!(resolve("http://example.com:8080/cart"), "setup");
}

#[test]
fn test_host_and_path_are_matched_as_written() {
    // Host lookup is case-sensitive and dot segments are ordinary segments
    assert_eq!(resolve("http://First_SA/"), "default_sa");
    assert_eq!(resolve("http://example.com/./"), "default_sa");
    assert_eq!(resolve("http://example.com/first_sa/../x"), "first_sa_..");
}
