use git_autoflow::config::{load_config, Config};
use serial_test::serial;
use std::env;
use std::fs;

// These tests change the process working directory, so they are
// serialized against each other.

#[test]
#[serial]
fn test_loads_from_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("gitautoflow.toml"),
        r#"
        remote = "fork"
        commit_limit = 25
        "#,
    )
    .unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    env::set_current_dir(previous).unwrap();

    let config = config.unwrap();
    assert_eq!(config.remote, "fork");
    assert_eq!(config.commit_limit, 25);
}

#[test]
#[serial]
fn test_defaults_when_no_file_present() {
    let dir = tempfile::tempdir().unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    env::set_current_dir(previous).unwrap();

    assert_eq!(config.unwrap(), Config::default());
}

#[test]
#[serial]
fn test_explicit_path_beats_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("gitautoflow.toml"), "remote = \"cwd\"").unwrap();
    let explicit = dir.path().join("other.toml");
    fs::write(&explicit, "remote = \"explicit\"").unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir.path()).unwrap();
    let config = load_config(Some(explicit.to_str().unwrap()));
    env::set_current_dir(previous).unwrap();

    assert_eq!(config.unwrap().remote, "explicit");
}
