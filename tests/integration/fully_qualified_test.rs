// Fully-qualified source URLs are carried as a single escaped path segment

use imgpath::url_builder::{normalize, ParameterMap};
use imgpath::UrlSpec;

#[test]
fn test_encodes_fully_qualified_url() {
    let spec = UrlSpec::new("http://avatars.com/john-smith.png", "my-social-network.imgix.net")
        .unwrap()
        .with_token("FOO123bar");
    assert_eq!(
        spec.to_string(),
        "https://my-social-network.imgix.net/http%3A%2F%2Favatars.com%2Fjohn-smith.png?s=493a52f008c91416351f8b33d4883135"
    );
}

#[test]
fn test_encodes_fully_qualified_url_with_spaces() {
    let spec = UrlSpec::new(
        "http://awebsite.com/users dir/image 1.png",
        "my-social-network.imgix.net",
    )
    .unwrap()
    .with_token("FOO123bar");
    assert_eq!(
        spec.to_string(),
        "https://my-social-network.imgix.net/http%3A%2F%2Fawebsite.com%2Fusers%20dir%2Fimage%201.png?s=a82cd70cc2b2edae1fd0d83fc86e7884"
    );
}

#[test]
fn test_encodes_fully_qualified_url_with_params() {
    let spec = UrlSpec::new("http://avatars.com/john-smith.png", "my-social-network.imgix.net")
        .unwrap()
        .with_token("FOO123bar");
    let url = spec.to_url(&ParameterMap::new().with("w", 400).with("h", 300));
    assert_eq!(
        url,
        "https://my-social-network.imgix.net/http%3A%2F%2Favatars.com%2Fjohn-smith.png?w=400&h=300&s=61ea1cc7add87653bb0695fe25f2b534"
    );
}

#[test]
fn test_fully_qualified_segment_percent_decodes_to_input() {
    let inputs = [
        "http://avatars.com/john-smith.png",
        "https://a.com/x y/z.png?size=large&v=2#frag",
        "ftp://files.example.org/~user/pic.gif",
    ];
    for input in inputs {
        let canonical = normalize(input);
        assert!(canonical.as_str().starts_with('/'));
        assert!(!canonical.as_str()[1..].contains('/'));
        assert_eq!(urlencoding::decode(&canonical.as_str()[1..]).unwrap(), input);
    }
}

#[test]
fn test_malformed_scheme_is_treated_as_relative() {
    let spec = UrlSpec::new("://not-a-url.png", "demo.imgix.net").unwrap();
    assert_eq!(spec.to_string(), "https://demo.imgix.net/%3A//not-a-url.png");
}
