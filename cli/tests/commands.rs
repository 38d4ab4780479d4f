#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Writes a settings file with two filesystem backends under `root`.
    fn write_settings(root: &Path) -> PathBuf {
        let settings = serde_json::json!({
            "chunking": {
                "target_chunk_count": 4,
                "min_chunk_size": 16,
                "max_chunk_size": 1024
            },
            "metadata": { "path": root.join("metadata") },
            "backends": [
                {
                    "kind": "filesystem",
                    "name": "FileSystem",
                    "path": root.join("chunks-a")
                },
                {
                    "kind": "filesystem",
                    "name": "Archive",
                    "path": root.join("chunks-b"),
                    "cache_capacity": 8
                }
            ]
        });
        let path = root.join("settings.json");
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        path
    }

    fn cli(settings: &Path) -> Command {
        let mut cmd = Command::cargo_bin("storage-cli").expect("binary is built");
        cmd.arg("--config").arg(settings);
        cmd
    }

    fn store(settings: &Path, file: &Path) -> String {
        let output = cli(settings)
            .arg("store")
            .arg("--file")
            .arg(file)
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        stdout.lines().next().expect("file id on first line").trim().to_string()
    }

    #[test]
    fn test_store_then_restore() {
        let temp_dir = TempDir::new().unwrap();
        let settings = write_settings(temp_dir.path());

        let source = temp_dir.path().join("sample.pdf");
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 256) as u8).collect();
        fs::write(&source, &data).unwrap();

        let file_id = store(&settings, &source);

        let output = temp_dir.path().join("reconstructed.pdf");
        cli(&settings)
            .args(["restore", "--file-id", file_id.as_str(), "--output"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("File restored to"));

        assert_eq!(fs::read(&output).unwrap(), data);
    }

    #[test]
    fn test_store_places_chunks_round_robin() {
        let temp_dir = TempDir::new().unwrap();
        let settings = write_settings(temp_dir.path());

        let source = temp_dir.path().join("four.bin");
        fs::write(&source, vec![1u8; 400]).unwrap();

        let output = cli(&settings)
            .arg("store")
            .arg("--file")
            .arg(&source)
            .output()
            .unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let placements: Vec<&str> = stdout.lines().skip(1).map(str::trim).collect();
        assert_eq!(placements.len(), 4);
        let expected = ["FileSystem", "Archive", "FileSystem", "Archive"];
        for (order, (line, backend)) in placements.iter().zip(expected).enumerate() {
            assert!(line.starts_with(&format!("#{} ", order)), "unexpected line: {}", line);
            assert!(line.contains("(100 bytes)"), "unexpected line: {}", line);
            assert!(line.ends_with(&format!("-> {}", backend)), "unexpected line: {}", line);
        }
    }

    #[test]
    fn test_list_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let settings = write_settings(temp_dir.path());

        let source = temp_dir.path().join("file1.txt");
        fs::write(&source, b"Content of file1").unwrap();
        let file_id = store(&settings, &source);

        cli(&settings)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "{}: file1.txt (16 bytes, 1 chunks)",
                file_id
            )));

        cli(&settings)
            .args(["delete", "--file-id", file_id.as_str()])
            .assert()
            .success();

        cli(&settings)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("file1.txt").not());
    }

    #[test]
    fn test_store_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let settings = write_settings(temp_dir.path());

        cli(&settings)
            .args(["store", "--file"])
            .arg(temp_dir.path().join("nope.bin"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("nope.bin"));
    }

    #[test]
    fn test_restore_unknown_id_fails() {
        let temp_dir = TempDir::new().unwrap();
        let settings = write_settings(temp_dir.path());

        cli(&settings)
            .args([
                "restore",
                "--file-id",
                "00000000-0000-0000-0000-000000000000",
                "--output",
            ])
            .arg(temp_dir.path().join("out.bin"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not found"));
    }
}
