use crate::common::GvmTest;
use pretty_assertions::assert_eq;

#[test]
fn test_use_not_installed() {
    let test = GvmTest::new();

    let output = test.gvm(&["use", "go", "1.22.3"]);

    output.assert_failure();
    assert_eq!(output.stdout(), "");
    assert!(output.stderr().contains("go 1.22.3 is not installed"));
}

#[test]
fn test_use_replaces_previous_version() {
    let mut test = GvmTest::new();
    test.create_version_dir("go", "1.21");
    test.create_version_dir("go", "1.22.3");
    let old_bin = test.versions_dir().join("go/1.21/go/bin");
    test.env
        .insert("PATH".into(), format!("{old_bin}:/usr/local/bin:/usr/bin"));

    let output = test.gvm(&["use", "go", "1.22.3"]);

    output.assert_success();
    let stdout = output.stdout();
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(
        output.normalized_stdout(),
        "export PATH='/gvm/versions/go/1.22.3/go/bin:/usr/local/bin:/usr/bin'\n"
    );
    assert!(!stdout.contains("1.21"));
}

#[test]
fn test_use_with_fish() {
    let test = GvmTest::new();
    test.create_version_dir("go", "1.22.3");

    let output = test.gvm(&["use", "go", "1.22.3", "--shell", "fish"]);

    output.assert_success();
    let bin_dir = test.versions_dir().join("go/1.22.3/go/bin");
    assert_eq!(
        output.stdout(),
        format!("set -gx PATH {bin_dir} /usr/local/bin /usr/bin\n")
    );
}

#[test]
fn test_use_detects_shell_from_env() {
    let mut test = GvmTest::new();
    test.create_version_dir("python", "3.12.4");
    test.env.insert("SHELL".into(), "/usr/bin/fish".into());

    let output = test.gvm(&["use", "python", "3.12.4"]);

    output.assert_success();
    assert!(output.stdout().starts_with("set -gx PATH "));
}

#[test]
fn test_use_powershell_on_windows() {
    let mut test = GvmTest::new();
    test.create_version_dir("go", "1.22.3");
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "x86_64-pc-windows-msvc".into());
    test.env
        .insert("PATH".into(), r"C:\Windows;C:\Windows\System32".into());

    let output = test.gvm(&["use", "go", "1.22.3"]);

    output.assert_success();
    let stdout = output.stdout();
    assert!(stdout.starts_with("$env:PATH = '"));
    assert!(stdout.trim_end().ends_with(r";C:\Windows;C:\Windows\System32'"));
}

#[test]
fn test_use_rejects_traversal() {
    let test = GvmTest::new();

    let output = test.gvm(&["use", "go", ".."]);

    output.assert_failure();
    assert_eq!(output.stdout(), "");
}

#[test]
fn test_use_powershell_on_linux_keeps_posix_path() {
    let mut test = GvmTest::new();
    test.create_version_dir("go", "1.21");
    test.create_version_dir("go", "1.22.3");
    let old_bin = test.versions_dir().join("go/1.21/go/bin");
    test.env
        .insert("PATH".into(), format!("{old_bin}:/usr/local/bin:/usr/bin"));

    let output = test.gvm(&["use", "go", "1.22.3", "--shell", "powershell"]);

    output.assert_success();
    assert_eq!(
        output.normalized_stdout(),
        "$env:PATH = '/gvm/versions/go/1.22.3/go/bin:/usr/local/bin:/usr/bin'\n"
    );
}

#[test]
fn test_use_on_platform_without_downloads() {
    let mut test = GvmTest::new();
    test.env
        .insert("GVM_TEST_PLATFORM".into(), "riscv64gc-unknown-linux-gnu".into());
    test.create_version_dir("go", "1.22.3");

    let output = test.gvm(&["use", "go", "1.22.3"]);

    output.assert_success();
    assert_eq!(
        output.normalized_stdout(),
        "export PATH='/gvm/versions/go/1.22.3/go/bin:/usr/local/bin:/usr/bin'\n"
    );
}
