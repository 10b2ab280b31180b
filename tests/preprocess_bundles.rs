use realm_index::preprocess::{
    add_to_bundle, append_content, relative_dir, safe_filename, sorted_bundles, BundleMap,
    DirectoryBundle, ROOT_KEY, ROOT_LABEL,
};

#[test]
fn test_append_content_starts_without_separator() {
    assert_eq!(append_content("", "first"), "first");
    assert_eq!(append_content("first", "second"), "first\nsecond");
}

#[test]
fn test_bundle_concatenates_in_order_with_newline() {
    let a = "A".repeat(60);
    let b = "B".repeat(60);
    let mut bundles = BundleMap::new();

    add_to_bundle(&mut bundles, "foo", &a);
    add_to_bundle(&mut bundles, "foo", &b);

    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles["foo"].content, format!("{a}\n{b}"));
    assert_eq!(bundles["foo"].label, "foo");
}

#[test]
fn test_relative_dir_strips_base_path() {
    assert_eq!(relative_dir("r/foo/one.gno", "r"), "foo");
    assert_eq!(relative_dir("r/foo/bar/one.gno", "r"), "foo/bar");
    assert_eq!(
        relative_dir("examples/gno.land/r/demo/boards/board.gno", "examples/gno.land/r"),
        "demo/boards"
    );
}

#[test]
fn test_top_level_files_share_the_root_bundle() {
    assert_eq!(relative_dir("r/one.gno", "r"), ROOT_KEY);

    let mut bundles = BundleMap::new();
    add_to_bundle(&mut bundles, ROOT_KEY, "one");
    add_to_bundle(&mut bundles, ROOT_KEY, "two");

    let root = &bundles[ROOT_KEY];
    assert_eq!(root.label, ROOT_LABEL);
    assert_eq!(root.content, "one\ntwo");
}

#[test]
fn test_safe_filename_replaces_separators() {
    assert_eq!(safe_filename("foo/bar"), "foo_bar");
    assert_eq!(safe_filename("demo/boards/v2"), "demo_boards_v2");
    assert_eq!(safe_filename("root"), "root");
    assert_eq!(safe_filename(""), "");
}

#[test]
fn test_sorted_bundles_orders_by_label_then_key() {
    let mut bundles = BundleMap::new();
    let bundle = |label: &str| DirectoryBundle {
        label: label.to_string(),
        content: String::new(),
    };
    bundles.insert("k1".to_string(), bundle("b"));
    bundles.insert("k3".to_string(), bundle("a"));
    bundles.insert("k2".to_string(), bundle("a"));

    let order: Vec<(&str, &str)> = sorted_bundles(&bundles)
        .into_iter()
        .map(|(key, b)| (key.as_str(), b.label.as_str()))
        .collect();

    assert_eq!(order, vec![("k2", "a"), ("k3", "a"), ("k1", "b")]);
}
