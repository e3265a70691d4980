#![allow(dead_code)]

pub mod fake_catalog;
pub mod mock_data;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use acr_browser::tui::{Action, Browser};
use tempfile::TempDir;

use fake_catalog::FakeCatalog;

/// Helper struct to run the acr-browser binary in an isolated temp directory
pub struct AcrBrowserTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl AcrBrowserTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        AcrBrowserTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_acr-browser").to_string(),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("ACR_BROWSER_CONFIG")
            .env_remove("ACR_BROWSER_TOKEN")
            .output()
            .expect("Failed to execute acr-browser")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Write a config file into the temp directory and return its path
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join("config.yaml");
        fs::write(&path, content).expect("Failed to write config");
        path
    }
}

/// Perform every action the browser has queued against `catalog`, until the
/// queue stays empty. Returns how many actions ran.
pub async fn settle(browser: &mut Browser, catalog: &FakeCatalog) -> usize {
    let mut performed = 0;
    loop {
        let actions = browser.take_actions();
        if actions.is_empty() {
            return performed;
        }
        for action in actions {
            let completion = action.perform(catalog).await;
            browser.complete(completion);
            performed += 1;
        }
    }
}

/// Pending actions without running them
pub fn pending(browser: &Browser) -> Vec<Action> {
    browser.take_actions()
}
