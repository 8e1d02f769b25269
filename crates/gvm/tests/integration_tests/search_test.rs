use crate::common::GvmTest;
use pretty_assertions::assert_eq;

const GO_INDEX: &str = r#"[
    {"version": "go1.22.3", "stable": true, "files": []},
    {"version": "go1.23rc1", "stable": false, "files": []},
    {"version": "go1.21.10", "stable": true, "files": []}
]"#;

fn mock_go_index(test: &mut GvmTest) -> mockito::Mock {
    test.server
        .mock("GET", "/?mode=json&include=all")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(GO_INDEX)
        .create()
}

#[test]
fn test_search_go() {
    let mut test = GvmTest::new();
    let mock = mock_go_index(&mut test);

    let output = test.gvm(&["search", "go"]);

    output.assert_success();
    mock.assert();
    assert_eq!(output.stdout(), "1.23rc1\n1.22.3\n1.21.10\n");
}

#[test]
fn test_search_stable_only_marks_installed() {
    let mut test = GvmTest::new();
    let _mock = mock_go_index(&mut test);
    test.create_version_dir("go", "1.21.10");

    let output = test.gvm(&["--color", "never", "search", "go", "--stable-only"]);

    output.assert_success();
    assert_eq!(output.stdout(), "1.22.3\n1.21.10 [installed]\n");
}

#[test]
fn test_search_python() {
    let mut test = GvmTest::new();
    let mock = test
        .server
        .mock("GET", "/")
        .with_status(200)
        .with_body(
            r#"<a href="../">../</a>
<a href="3.11.9/">3.11.9/</a>
<a href="3.12.4/">3.12.4/</a>
<a href="3.13/">3.13/</a>"#,
        )
        .create();

    let output = test.gvm(&["search", "python"]);

    output.assert_success();
    mock.assert();
    assert_eq!(output.stdout(), "3.12.4\n3.11.9\n");
}

#[test]
fn test_search_unsupported_language() {
    let test = GvmTest::new();

    let output = test.gvm(&["search", "cobol"]);

    output.assert_failure();
    assert!(
        output
            .stderr()
            .contains("gvm can't list available versions of cobol")
    );
}

#[test]
fn test_search_server_error() {
    let mut test = GvmTest::new();
    let _mock = test
        .server
        .mock("GET", "/")
        .with_status(500)
        .create();

    let output = test.gvm(&["search", "python"]);

    output.assert_failure();
    assert_eq!(output.stdout(), "");
    assert!(output.stderr().contains("500"));
}
