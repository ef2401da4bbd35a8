//! CLI Interface Tests
//!
//! Runs the built rusty-curves binary against a temporary data directory

#[cfg(test)]
mod cli_tests {
    use std::fs;
    use std::process::Command;
    use tempfile::tempdir;

    fn binary() -> Command {
        Command::new(env!("CARGO_BIN_EXE_rusty-curves"))
    }

    fn config_file(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, format!("data_dir = {:?}\n", dir.join("data"))).unwrap();
        path
    }

    #[test]
    fn test_cli_help() {
        let output = binary().arg("--help").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("generate"));
        assert!(stdout.contains("update"));
    }

    #[test]
    fn test_last_update_on_empty_store() {
        let dir = tempdir().unwrap();
        let output = binary()
            .args(["--config"])
            .arg(config_file(dir.path()))
            .arg("last-update")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Last update: None"));
    }

    #[test]
    fn test_last_update_reads_store() {
        let dir = tempdir().unwrap();
        let config = config_file(dir.path());
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data").join("discount_factors.csv"),
            "date,1.0\n2024-01-02,0.95\n2024-01-03,0.951\n",
        )
        .unwrap();

        let output = binary()
            .arg("--config")
            .arg(config)
            .arg("last-update")
            .output()
            .unwrap();

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Last update: 2024-01-03"));
    }

    #[test]
    fn test_update_requires_api_key() {
        let dir = tempdir().unwrap();
        let output = binary()
            .env_remove("FRED_API_KEY")
            .arg("--config")
            .arg(config_file(dir.path()))
            .arg("update")
            .output()
            .unwrap();

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("FRED_API_KEY not set"));
        assert!(!dir.path().join("data").join("discount_factors.csv").exists());
    }
}
