use crate::common::{GvmTest, go_tarball, zip_archive};
use std::fs;

#[test]
fn test_go_install_successful_download() {
    let mut test = GvmTest::new();
    let mock = test
        .mock_download("/go1.22.3.linux-amd64.tar.gz", &go_tarball("1.22.3"))
        .create();

    let output = test.gvm(&["install", "go", "1.22.3"]);

    output.assert_success();
    mock.assert();

    let install_dir = test.versions_dir().join("go").join("1.22.3");
    assert_eq!(
        fs::read_to_string(install_dir.join("go/VERSION")).unwrap(),
        "go1.22.3\n"
    );
    assert!(install_dir.join("go/bin/go").is_file());
    assert!(output.normalized_stdout().contains("Installed go 1.22.3"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(install_dir.join("go/bin/go"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_go_install_windows_zip() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "x86_64-pc-windows-msvc".into());
    let archive = zip_archive(&[("go/bin/go.exe", "MZ"), ("go/VERSION", "go1.22.3\n")]);
    let mock = test
        .mock_download("/go1.22.3.windows-amd64.zip", &archive)
        .create();

    let output = test.gvm(&["install", "go", "1.22.3"]);

    output.assert_success();
    mock.assert();
    let install_dir = test.versions_dir().join("go").join("1.22.3");
    assert_eq!(
        fs::read_to_string(install_dir.join("go/bin/go.exe")).unwrap(),
        "MZ"
    );
}

#[test]
fn test_python_install_windows_zip() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "x86_64-pc-windows-msvc".into());
    let archive = zip_archive(&[("python.exe", "MZ"), ("python312.zip", "PK")]);
    let mock = test
        .mock_download("/3.12.4/python-3.12.4-embed-amd64.zip", &archive)
        .create();

    let output = test.gvm(&["install", "python", "3.12.4"]);

    output.assert_success();
    mock.assert();
    assert!(
        test.versions_dir()
            .join("python/3.12.4/python.exe")
            .is_file()
    );
}

#[test]
fn test_install_is_idempotent() {
    let mut test = GvmTest::new();
    let mock = test
        .mock_download("/go1.22.3.linux-amd64.tar.gz", &go_tarball("1.22.3"))
        .expect(1)
        .create();

    test.gvm(&["install", "go", "1.22.3"]).assert_success();
    let second = test.gvm(&["install", "go", "1.22.3"]);
    second.assert_success();

    assert!(second.stdout().contains("already installed"));
    mock.assert();
}

#[test]
fn test_install_unsupported_language_writes_nothing() {
    let test = GvmTest::new();

    let output = test.gvm(&["install", "cobol", "1.0"]);

    output.assert_failure();
    assert_eq!(output.output.status.code(), Some(1));
    assert!(
        output
            .stderr()
            .contains("Error: gvm doesn't know how to install cobol")
    );
    assert!(!test.root_dir().exists());
}

#[test]
fn test_install_python_on_linux_is_unsupported() {
    let test = GvmTest::new();

    let output = test.gvm(&["install", "python", "3.12.4"]);

    output.assert_failure();
    assert!(
        output
            .stderr()
            .contains("No python downloads are published for linux")
    );
    assert!(!test.root_dir().exists());
}

#[test]
fn test_install_http_failure() {
    let mut test = GvmTest::new();
    let _mock = test
        .server
        .mock("GET", "/go9.9.9.linux-amd64.tar.gz")
        .with_status(404)
        .create();

    let output = test.gvm(&["install", "go", "9.9.9"]);

    output.assert_failure();
    assert!(output.stderr().contains("404"));
    assert!(!test.versions_dir().join("go/9.9.9").exists());
}

#[test]
fn test_install_corrupt_archive_leaves_nothing_behind() {
    let mut test = GvmTest::new();
    let _mock = test
        .mock_download("/go1.22.3.linux-amd64.tar.gz", b"invalid-tarball-content")
        .create();

    let output = test.gvm(&["install", "go", "1.22.3"]);

    output.assert_failure();
    let go_dir = test.versions_dir().join("go");
    assert!(!go_dir.join("1.22.3").exists());
    let leftovers: Vec<_> = fs::read_dir(&go_dir).unwrap().collect();
    assert!(leftovers.is_empty(), "staging directory should be removed");

    let list = test.gvm(&["list", "go"]);
    list.assert_success();
    assert_eq!(list.stdout(), "");
}

#[test]
fn test_install_rejects_path_traversal_in_version() {
    let test = GvmTest::new();

    let output = test.gvm(&["install", "go", "../../x"]);

    output.assert_failure();
    assert!(output.stderr().contains("Invalid version name"));
    assert!(!test.root_dir().exists());
}

#[test]
fn test_install_rejects_archive_escaping_destination() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "x86_64-pc-windows-msvc".into());
    let archive = zip_archive(&[("go/VERSION", "go1.22.3\n"), ("../../evil", "pwned")]);
    let _mock = test
        .mock_download("/go1.22.3.windows-amd64.zip", &archive)
        .create();

    let output = test.gvm(&["install", "go", "1.22.3"]);

    output.assert_failure();
    assert!(output.stderr().contains("would be extracted outside"));
    assert!(!test.versions_dir().join("go/1.22.3").exists());
    assert!(!test.versions_dir().join("evil").exists());
    assert!(!test.root_dir().join("evil").exists());
}

#[test]
fn test_install_uses_mirror_url() {
    let mut test = GvmTest::new();
    let mirror = format!("{}/mirror/", test.server_url());
    test.env.insert("GVM_DOWNLOAD_URL".into(), mirror);
    let mock = test
        .mock_download("/mirror/go1.21.0.linux-amd64.tar.gz", &go_tarball("1.21.0"))
        .create();

    test.gvm(&["install", "go", "1.21.0"]).assert_success();

    mock.assert();
}

#[test]
fn test_install_on_platform_without_downloads() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "riscv64gc-unknown-linux-gnu".into());

    let output = test.gvm(&["install", "go", "1.22.3"]);

    output.assert_failure();
    assert!(output.stderr().contains("does not (yet) support your platform"));
    assert!(!test.root_dir().exists());
}
