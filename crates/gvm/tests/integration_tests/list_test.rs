use crate::common::GvmTest;
use pretty_assertions::assert_eq;

#[test]
fn test_list_no_versions() {
    let test = GvmTest::new();

    let output = test.gvm(&["list", "go"]);

    output.assert_success();
    assert_eq!(output.stdout(), "");
    assert!(output.stderr().contains("No versions of go installed."));
}

#[test]
fn test_list_installed_versions_in_order() {
    let test = GvmTest::new();
    test.create_version_dir("go", "1.22.3");
    test.create_version_dir("go", "1.9.2");
    test.create_version_dir("go", "1.21.10");
    test.create_version_dir("python", "3.12.4");
    std::fs::write(test.versions_dir().join("go/notes.txt"), "not a version").unwrap();

    let output = test.gvm(&["list", "go"]);

    output.assert_success();
    assert_eq!(output.stdout(), "1.9.2\n1.21.10\n1.22.3\n");
}

#[test]
fn test_list_ignores_staging_directories() {
    let test = GvmTest::new();
    test.create_version_dir("go", "1.22.3");
    test.create_version_dir("go", ".staging-abc123");

    let output = test.gvm(&["list", "go"]);

    output.assert_success();
    assert_eq!(output.stdout(), "1.22.3\n");
}

#[test]
fn test_list_json() {
    let test = GvmTest::new();
    test.create_version_dir("go", "1.22.3");
    test.create_version_dir("go", "1.21.10");

    let output = test.gvm(&["list", "go", "--format", "json"]);

    output.assert_success();
    let entries: serde_json::Value = serde_json::from_str(&output.normalized_stdout()).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            {"version": "1.21.10", "path": "/gvm/versions/go/1.21.10"},
            {"version": "1.22.3", "path": "/gvm/versions/go/1.22.3"},
        ])
    );
}

#[test]
fn test_list_json_empty() {
    let test = GvmTest::new();

    let output = test.gvm(&["list", "python", "--format", "json"]);

    output.assert_success();
    assert_eq!(output.stdout().trim(), "[]");
}

#[test]
fn test_list_on_platform_without_downloads() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "aarch64-pc-windows-msvc".into());
    test.create_version_dir("go", "1.22.3");

    let output = test.gvm(&["list", "go"]);

    output.assert_success();
    assert_eq!(output.stdout(), "1.22.3\n");
}
