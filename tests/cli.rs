use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shotmark_cmd() -> Command {
    Command::cargo_bin("shotmark").expect("binary exists")
}

fn write_white_png(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    image::RgbaImage::from_pixel(50, 50, image::Rgba([255, 255, 255, 255]))
        .save(&path)
        .unwrap();
    path
}

const BLUE_BOX_SCENE: &str = r#"{
  "version": 1,
  "annotations": [
    {
      "id": 1,
      "start": { "x": 10, "y": 10 },
      "end": { "x": 40, "y": 40 },
      "style": {
        "stroke_color": { "r": 0, "g": 0, "b": 1, "a": 1 },
        "stroke_width": 4,
        "fill_color": { "r": 0, "g": 0, "b": 1, "a": 1 }
      },
      "kind": { "type": "rectangle" }
    }
  ]
}"#;

#[test]
fn shotmark_help_prints_usage() {
    shotmark_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Annotate screenshots from the command line",
        ));
}

#[test]
fn missing_input_is_rejected() {
    shotmark_cmd()
        .args(["--output", "out.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn applies_scene_and_writes_png() {
    let temp = TempDir::new().unwrap();
    let input = write_white_png(&temp, "in.png");
    let scene = temp.path().join("scene.json");
    std::fs::write(&scene, BLUE_BOX_SCENE).unwrap();
    let output = temp.path().join("out.png");
    let saved = temp.path().join("saved.json");

    shotmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--scene")
        .arg(&scene)
        .arg("--output")
        .arg(&output)
        .arg("--save-scene")
        .arg(&saved)
        .assert()
        .success();

    let result = image::open(&output).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (50, 50));
    let inside = result.get_pixel(25, 25).0;
    assert!(inside[2] > 200 && inside[0] < 60, "got {inside:?}");
    assert_eq!(result.get_pixel(2, 2).0, [255, 255, 255, 255]);

    let saved_text = std::fs::read_to_string(&saved).unwrap();
    assert!(saved_text.contains("\"rectangle\""));
}

#[test]
fn unreadable_input_reports_path() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("missing.png");

    shotmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.png"));
}

#[test]
fn invalid_config_fails_with_context() {
    let temp = TempDir::new().unwrap();
    let input = write_white_png(&temp, "in.png");
    let config = temp.path().join("bad.toml");
    std::fs::write(&config, "[drawing\n").unwrap();

    shotmark_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));
}

#[test]
#[cfg(target_os = "linux")]
fn init_config_writes_example_file() {
    let temp = TempDir::new().unwrap();

    shotmark_cmd()
        .env("XDG_CONFIG_HOME", temp.path())
        .env("HOME", temp.path())
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    assert!(temp.path().join("shotmark").join("config.toml").exists());
}
