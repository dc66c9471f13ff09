use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .arg("run")
        .arg("--quiet")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_flag() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rhumb-grid"));
    assert!(stdout.contains("--rows"));
    assert!(stdout.contains("--top-left"));
}

#[test]
fn test_zero_rows_fails() {
    let output = run(&["--rows", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rows must be positive"));
}

#[test]
fn test_oversized_grid_fails() {
    let output = run(&["--rows", "9223372036854775807"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mesh points"));
}

#[test]
fn test_stroke_width_limit() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&[
        "-f",
        "png",
        "--stroke-width",
        "100000",
        "-o",
        dir.path().to_str().unwrap(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Stroke width must be at most 64"));
    assert!(!dir.path().join("grid.png").exists());
}

#[test]
fn test_invalid_corner_fails() {
    let output = run(&["--top-left", "invalid"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("top-left"));
}

#[test]
fn test_writes_geojson_quietly() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run(&[
        "-q",
        "--rows",
        "2",
        "--columns",
        "2",
        "-o",
        temp_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let path = temp_dir.path().join("grid.geojson");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), path.display().to_string());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["type"], "geojson");
    assert_eq!(written["data"]["features"].as_array().unwrap().len(), 4);
}

#[test]
fn test_writes_style_document() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run(&[
        "-f",
        "style",
        "--zoom",
        "15",
        "--output-name",
        "site",
        "-o",
        temp_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("site.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(written["zoom"], 15.0);
    assert_eq!(written["layers"].as_array().unwrap().len(), 2);
    assert_eq!(
        written["sources"]["grid"]["data"]["features"]
            .as_array()
            .unwrap()
            .len(),
        14 * 40
    );
}

#[test]
fn test_writes_png() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = run(&[
        "-f",
        "png",
        "--resolution",
        "0.00005",
        "-o",
        temp_dir.path().to_str().unwrap(),
    ]);

    if !output.status.success() {
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success());

    let metadata = std::fs::metadata(temp_dir.path().join("grid.png")).unwrap();
    assert!(metadata.len() > 0);
}
