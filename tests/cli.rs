// Drives the compiled binary without a terminal. Startup checks run before
// the TUI, so they can be observed through exit status and stderr.
use assert_cmd::Command;

fn spelldrill(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("spelldrill").unwrap();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn stderr_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn missing_catalog_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("vocab_words.json");

    let assert = spelldrill(home.path())
        .arg("--catalog")
        .arg(&missing)
        .assert()
        .failure();

    let stderr = stderr_of(&assert);
    assert!(stderr.contains("vocab_words.json not found"), "{stderr}");
}

#[test]
fn malformed_catalog_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("broken.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let assert = spelldrill(home.path())
        .arg("-c")
        .arg(&path)
        .assert()
        .failure();

    assert!(stderr_of(&assert).contains("unable to parse catalog"));
}

#[test]
fn requires_a_tty() {
    let home = tempfile::tempdir().unwrap();
    let assert = spelldrill(home.path()).arg("ocean").assert().failure();
    assert!(stderr_of(&assert).contains("stdin must be a tty"));
}

#[cfg(unix)]
#[test]
fn save_config_writes_overrides_before_tty_check() {
    let home = tempfile::tempdir().unwrap();
    spelldrill(home.path())
        .args(["--save-config", "--rate", "170", "--answer-secs", "9"])
        .assert()
        .failure();

    let config = walk_for(home.path(), "config.json").expect("config.json written");
    let saved: serde_json::Value =
        serde_json::from_slice(&std::fs::read(config).unwrap()).unwrap();
    assert_eq!(saved["speech_rate"], 170);
    assert_eq!(saved["answer_window_secs"], 9.0);
}

#[test]
fn help_lists_word_sources() {
    let home = tempfile::tempdir().unwrap();
    let assert = spelldrill(home.path()).arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("--catalog"));
    assert!(stdout.contains("--builtin"));
}

#[cfg(unix)]
fn walk_for(dir: &std::path::Path, name: &str) -> Option<std::path::PathBuf> {
    for entry in std::fs::read_dir(dir).ok()? {
        let path = entry.ok()?.path();
        if path.is_dir() {
            if let Some(found) = walk_for(&path, name) {
                return Some(found);
            }
        } else if path.file_name().is_some_and(|n| n == name) {
            return Some(path);
        }
    }
    None
}
