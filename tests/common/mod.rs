use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_log_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let log_path = temp_dir.path().join(name);
    fs::write(&log_path, contents).expect("failed to write log file");
    (temp_dir, log_path)
}

/// Config pointing at `api_base`, reading the key only from `env_var`
#[allow(dead_code)]
pub fn env_only_config(api_base: &str, api_style: &str, env_var: &str) -> String {
    format!(
        "provider:\n  api_base: {}\n  model: gpt-3.5-turbo\n  api_style: {}\ncredentials:\n  env_var: {}\n  use_keyring: false\n",
        api_base, api_style, env_var
    )
}
