//! Directory bundling: the pure bookkeeping between fetched files and the
//! index. Nothing here touches the network or the filesystem.

use std::collections::BTreeMap;
use std::path::Path;

/// Key used for files that sit directly under the base path.
pub const ROOT_KEY: &str = ".";

/// Label shown for the top-level bundle.
pub const ROOT_LABEL: &str = "root";

/// Aggregated text of all qualifying files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryBundle {
    pub label: String,
    pub content: String,
}

/// Bundles keyed by directory path relative to the base path.
pub type BundleMap = BTreeMap<String, DirectoryBundle>;

/// Merge `new` into `existing`, newline separated when `existing` is non-empty.
pub fn append_content(existing: &str, new: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{existing}\n{new}")
    }
}

/// Directory of `path` relative to `base_path`, or [`ROOT_KEY`] for files
/// directly under it.
pub fn relative_dir(path: &str, base_path: &str) -> String {
    let relative = path
        .strip_prefix(base_path)
        .unwrap_or(path)
        .trim_start_matches('/');
    match Path::new(relative).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ROOT_KEY.to_string(),
    }
}

pub fn label_for(key: &str) -> String {
    if key == ROOT_KEY {
        ROOT_LABEL.to_string()
    } else {
        key.to_string()
    }
}

/// Add one file's content to the bundle for `key`, creating it if needed.
pub fn add_to_bundle(bundles: &mut BundleMap, key: &str, content: &str) {
    let bundle = bundles
        .entry(key.to_string())
        .or_insert_with(|| DirectoryBundle {
            label: label_for(key),
            content: String::new(),
        });
    bundle.content = append_content(&bundle.content, content);
}

/// Replace every path separator with an underscore.
pub fn safe_filename(name: &str) -> String {
    name.replace(&['/', '\\'][..], "_")
}

/// Bundles ordered by label, then by key.
pub fn sorted_bundles(bundles: &BundleMap) -> Vec<(&String, &DirectoryBundle)> {
    let mut sorted: Vec<_> = bundles.iter().collect();
    sorted.sort_by(|(ka, a), (kb, b)| a.label.cmp(&b.label).then_with(|| ka.cmp(kb)));
    sorted
}
