use assert_cmd::Command;
use std::path::Path;

pub fn storybook_cmd() -> Command {
    let mut cmd = Command::cargo_bin("storybook").unwrap();
    cmd.env_remove("STORYBOOK_DIR");
    cmd.env_remove("STORYBOOK_LOG");
    cmd
}

/// `storybook init` in `dir`, asserting success
#[allow(dead_code)]
pub fn init_library(dir: &Path) {
    storybook_cmd().arg("init").arg(dir).assert().success();
}

/// Add a story through the CLI and return its id
#[allow(dead_code)]
pub fn add_story(dir: &Path, args: &[&str]) -> String {
    let output = storybook_cmd()
        .current_dir(dir)
        .arg("add")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .trim()
        .strip_prefix("Added story ")
        .expect("add prints the new id")
        .to_string()
}
