//! End-to-end tests driving the compiled binary.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

fn schemadoc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_schemadoc"))
}

#[test]
fn directive_free_file_passes_through_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.md");
    fs::write(&file, "# Plain document\n\nNothing to replace.\n").unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("doc.md")
        .output()
        .expect("run schemadoc");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "# Plain document\n\nNothing to replace.\n"
    );
}

#[test]
fn unreachable_database_substitutes_empty_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.md");
    fs::write(
        &file,
        "before\n<schemadoc host=\"127.0.0.1\" port=\"1\"/>\nafter\n",
    )
    .unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("doc.md")
        .output()
        .expect("run schemadoc");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    assert_eq!(fs::read_to_string(&file).unwrap(), "before\n\nafter\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schemadoc: warning:"), "stderr: {stderr}");

    // The default template was provisioned before the connection attempt.
    assert!(dir.path().join("schemadoc.md.j2").exists());
}

#[test]
fn unknown_directive_option_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("doc.md");
    fs::write(&file, "<schemadoc hostname=\"db\"/>\n").unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("doc.md")
        .output()
        .expect("run schemadoc");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("schemadoc: error:"), "stderr: {stderr}");
    // The directive is still removed from the document.
    assert_eq!(fs::read_to_string(&file).unwrap(), "\n");
}

#[test]
fn stdin_mode_writes_processed_content_to_stdout() {
    let dir = tempfile::tempdir().unwrap();

    let mut child = schemadoc()
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn schemadoc");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"# No directives here\n")
        .unwrap();
    let output = child.wait_with_output().expect("wait for schemadoc");

    assert!(output.status.success());
    assert_eq!(output.stdout, b"# No directives here\n");
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("schemadoc.toml"), "port = \"not closed").unwrap();
    fs::write(dir.path().join("doc.md"), "text\n").unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("doc.md")
        .output()
        .expect("run schemadoc");

    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn config_file_supplies_connection_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("schemadoc.toml"),
        "host = \"127.0.0.1\"\nport = 1\n",
    )
    .unwrap();
    let file = dir.path().join("doc.md");
    fs::write(&file, "<schemadoc/>\n").unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("doc.md")
        .output()
        .expect("run schemadoc");

    // Connection to port 1 fails, contained as a warning.
    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("127.0.0.1:1"), "stderr: {stderr}");
}

#[test]
fn directories_are_walked_for_markdown_files() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.md"), "a\n").unwrap();
    fs::write(docs.join("b.txt"), "<schemadoc/>\n").unwrap();

    let output = schemadoc()
        .current_dir(dir.path())
        .arg("docs")
        .output()
        .expect("run schemadoc");

    assert!(output.status.success(), "stderr: {:?}", output.stderr);
    // The non-markdown file is ignored, directive intact.
    assert_eq!(
        fs::read_to_string(docs.join("b.txt")).unwrap(),
        "<schemadoc/>\n"
    );
}
