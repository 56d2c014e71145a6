// Query parameters: ordering, escaping, Base64 variants, signature placement

use imgpath::url_builder::{
    serialize, verify_signature, ParameterMap, QueryString, SIGNATURE_PARAM,
};
use imgpath::UrlSpec;
use serde_json::json;

fn social(path: &str) -> UrlSpec {
    UrlSpec::new(path, "my-social-network.imgix.net")
        .unwrap()
        .with_token("FOO123bar")
}

fn demo(path: &str) -> UrlSpec {
    UrlSpec::new(path, "demo.imgix.net").unwrap()
}

#[test]
fn test_simple_path_with_params_and_signature() {
    let url = social("/users/1.png").to_url(&ParameterMap::new().with("w", 400).with("h", 300));
    assert_eq!(
        url,
        "https://my-social-network.imgix.net/users/1.png?w=400&h=300&s=c7b86f666a832434dd38577e38cf86d1"
    );
}

#[test]
fn test_url_encodes_param_keys() {
    let url = demo("demo.png").to_url(&ParameterMap::new().with("hello world", "interesting"));
    assert_eq!(url, "https://demo.imgix.net/demo.png?hello%20world=interesting");
}

#[test]
fn test_url_encodes_param_values() {
    let url = demo("demo.png").to_url(
        &ParameterMap::new().with("hello_world", r#"/foo"> <script>alert("hacked")</script><"#),
    );
    assert_eq!(
        url,
        "https://demo.imgix.net/demo.png?hello_world=%2Ffoo%22%3E%20%3Cscript%3Ealert%28%22hacked%22%29%3C%2Fscript%3E%3C"
    );
}

#[test]
fn test_base64_encodes_base64_param_variants() {
    let text = "I cann\u{f8}t bel\u{ee}\u{e9}v\u{2211} it wor\u{f8ff}s! \u{1f631}";
    let url = demo("~text").to_url(&ParameterMap::new().with("txt64", text));
    assert_eq!(
        url,
        "https://demo.imgix.net/~text?txt64=SSBjYW5uw7h0IGJlbMOuw6l24oiRIGl0IHdvcu-jv3MhIPCfmLE"
    );
}

#[test]
fn test_base64_values_use_url_safe_alphabet() {
    let samples = ["??>>", "a", "ab", "~~~", "\u{1f631}\u{1f631}", "subjects?/"];
    for sample in samples {
        let query = serialize(&ParameterMap::new().with("mark64", sample));
        let value = query.as_str().strip_prefix("mark64=").unwrap();
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "unexpected character in {}",
            value
        );
    }
}

#[test]
fn test_order_is_preserved() {
    let spec = demo("/a.png");
    let ab = spec.to_url(&ParameterMap::new().with("a", 1).with("b", 2));
    let ba = spec.to_url(&ParameterMap::new().with("b", 2).with("a", 1));
    assert_eq!(ab, "https://demo.imgix.net/a.png?a=1&b=2");
    assert_eq!(ba, "https://demo.imgix.net/a.png?b=2&a=1");
}

#[test]
fn test_signature_is_last_even_when_caller_passes_s_first() {
    let url = social("/users/1.png").to_url(&ParameterMap::new().with("s", "mine").with("w", 1));
    let query = url.as_str().split_once('?').unwrap().1;
    let last = query.rsplit('&').next().unwrap();
    assert!(last.starts_with(&format!("{}=", SIGNATURE_PARAM)));
    assert!(query.starts_with("s=mine&w=1&"));
}

#[test]
fn test_json_params_match_typed_params() {
    let spec = social("/users/1.png");
    let typed = spec.to_url(
        &ParameterMap::new()
            .with("w", 400)
            .with("fit", "crop")
            .with("lossless", true),
    );
    let from_json = spec
        .to_url_from_json(json!({"w": 400, "fit": "crop", "lossless": true}))
        .unwrap();
    assert_eq!(typed, from_json);
}

#[test]
fn test_generated_signature_verifies() {
    let spec = social("/users/image 1.png");
    let params = ParameterMap::new().with("w", 400).with("txt64", "hi there");
    let url = spec.to_url(&params);

    let signature = url.as_str().rsplit_once("&s=").unwrap().1;
    assert!(verify_signature(
        spec.token(),
        &spec.canonical_path(),
        &serialize(&params),
        signature
    ));
    assert!(!verify_signature(
        spec.token(),
        &spec.canonical_path(),
        &QueryString::default(),
        signature
    ));
}

#[test]
fn test_concurrent_generation_is_consistent() {
    let spec = social("/users/1.png");
    let params = ParameterMap::new().with("w", 400).with("h", 300);
    let expected = spec.to_url(&params);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| spec.to_url(&params)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
