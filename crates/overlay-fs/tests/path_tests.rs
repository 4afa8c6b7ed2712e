use overlay_fs::RelativePath;
use proptest::prelude::*;
use std::path::Path;

#[test]
fn test_equal_keys_across_separator_styles() {
    let unix = RelativePath::new("css/site.css").unwrap();
    let windows = RelativePath::new("css\\site.css").unwrap();
    assert_eq!(unix, windows);
}

#[test]
fn test_join_validates_the_tail() {
    let base = RelativePath::new("img").unwrap();
    assert_eq!(base.join("icons/a.png").unwrap().as_str(), "img/icons/a.png");
    assert!(base.join("../x").is_err());
}

#[test]
fn test_try_from_str() {
    let p: RelativePath = "a/b".try_into().unwrap();
    assert_eq!(p.to_string(), "a/b");
}

proptest! {
    #[test]
    fn test_normalized_form_is_stable(segments in prop::collection::vec("[a-zA-Z0-9_.-]{1,8}", 1..6)) {
        prop_assume!(segments.iter().all(|s| s != "." && s != ".."));
        let raw = segments.join("/");
        let path = RelativePath::new(&raw).unwrap();

        prop_assert!(!path.as_str().contains('\\'));
        prop_assert!(!path.as_str().contains("//"));
        prop_assert!(!path.as_str().starts_with('/'));

        // Re-parsing the native form yields the same key
        let native = path.under(Path::new("root"));
        let reparsed = RelativePath::strip_root(&native, Path::new("root")).unwrap();
        prop_assert_eq!(reparsed, path);
    }
}
