//! Exclusion rules applied to real directory trees.

use std::fs;

use strata::{ScanConfig, Strata};
use tempfile::TempDir;

fn workspace_with_files(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for path in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, "<?php\nclass Placeholder {}\n").expect("failed to write file");
    }

    dir
}

fn snapshot_files(config: ScanConfig, dir: &TempDir) -> Vec<String> {
    let mut strata = Strata::new(config);
    strata.set_ast(dir.path()).expect("set_ast failed");
    strata
        .snapshot()
        .expect("snapshot should be published")
        .files()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn default_rules_on_a_laravel_layout() {
    let dir = workspace_with_files(&[
        "app/Models/User.php",
        "app/vendor/Local.php",
        "app/vendors/Kept.php",
        "srcvendor/Kept.php",
        "vendor/laravel/framework/Foo.php",
        "node_modules/pkg/index.js",
        "bootstrap/app.php",
        "storage/framework/cache.php",
        "public/build/assets/app.js",
        "public/index.php",
        "resources/views/welcome.blade.php",
        "resources/js/app.js",
        ".git/hooks/pre-commit.js",
    ]);

    let files = snapshot_files(ScanConfig::default(), &dir);

    assert_eq!(
        files,
        vec![
            "app/Models/User.php",
            "app/vendors/Kept.php",
            "public/index.php",
            "resources/js/app.js",
            "srcvendor/Kept.php",
        ]
    );
}

#[test]
fn multi_segment_rule_requires_contiguous_segments() {
    let dir = workspace_with_files(&[
        "app/public/build/x.js",
        "public/assets/build/y.js",
        "build/public/z.js",
    ]);
    let config = ScanConfig {
        excluded_dirs: vec!["public/build".to_string()],
        ..ScanConfig::default()
    };

    let files = snapshot_files(config, &dir);

    assert_eq!(files, vec!["build/public/z.js", "public/assets/build/y.js"]);
}

#[test]
fn custom_suffix_rules_replace_defaults() {
    let dir = workspace_with_files(&[
        "src/component.test.ts",
        "src/component.ts",
        "views/home.blade.php",
    ]);
    let config = ScanConfig::from_yaml("excluded_suffixes: ['.test.ts']\n").expect("valid config");

    let files = snapshot_files(config, &dir);

    assert_eq!(files, vec!["src/component.ts", "views/home.blade.php"]);
}

#[test]
fn excluded_entries_are_counted() {
    let dir = workspace_with_files(&[
        "vendor/a.php",
        "node_modules/b.js",
        "views/c.blade.php",
        "d.php",
    ]);
    let mut strata = Strata::new(ScanConfig::default());

    let stats = strata.set_ast(dir.path()).expect("set_ast failed");

    assert_eq!(stats.files_parsed, 1);
    assert_eq!(stats.entries_excluded, 3);
}

#[test]
fn empty_exclusion_lists_accept_everything() {
    let dir = workspace_with_files(&["vendor/a.php", "x.blade.php"]);
    let config = ScanConfig {
        excluded_dirs: Vec::new(),
        excluded_suffixes: Vec::new(),
        reject_syntax_errors: false,
    };

    let files = snapshot_files(config, &dir);

    assert_eq!(files, vec!["vendor/a.php", "x.blade.php"]);
}
