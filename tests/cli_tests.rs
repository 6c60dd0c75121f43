//! Runs the `crudql` binary against temporary databases.

mod common;

#[cfg(test)]
mod cli_tests {
    use super::common::{setup_db, TestDb};
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::fs;

    /// The binary with its working directory and config home inside the test db's dir,
    /// so no stray crudql.toml is picked up.
    fn crudql(db: &TestDb) -> Command {
        let mut cmd = Command::cargo_bin("crudql").unwrap();
        cmd.current_dir(db.dir.path())
            .env("XDG_CONFIG_HOME", db.dir.path())
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_full_run_prints_status_lines() {
        let db = setup_db(&["Ada", "Grace"]);

        crudql(&db)
            .arg(&db.path)
            .assert()
            .success()
            .stdout(
                "A new user was inserted successfully!\n\
                 ID: 1, Name: Ada\n\
                 ID: 2, Name: Grace\n\
                 ID: 3, Name: John Doe\n\
                 An existing user was updated successfully!\n\
                 A user was deleted successfully!\n",
            );

        assert_eq!(
            db.rows(),
            vec![(2, Some("Grace".to_string())), (3, Some("John Doe".to_string()))]
        );
    }

    #[test]
    fn test_missing_database_fails_without_writes() {
        let db = setup_db(&["Ada"]);
        let missing = db.dir.path().join("nowhere.db");

        crudql(&db)
            .arg(&missing)
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Database operation failed"));

        assert!(!missing.exists());
        assert_eq!(db.rows(), vec![(1, Some("Ada".to_string()))]);
    }

    #[test]
    fn test_absent_target_row_prints_no_update_notice() {
        let db = setup_db(&[]);
        let config = db.dir.path().join("run.toml");
        fs::write(&config, "[crud]\ntarget_id = 500\ninsert_name = \"Ada Lovelace\"\n").unwrap();

        crudql(&db)
            .arg("--config")
            .arg(&config)
            .arg(&db.path)
            .assert()
            .success()
            .stdout("A new user was inserted successfully!\nID: 1, Name: Ada Lovelace\n");
    }

    #[test]
    fn test_local_config_file_is_picked_up() {
        let db = setup_db(&["Ada"]);
        fs::write(
            db.dir.path().join("crudql.toml"),
            "[database]\npath = \"people.db\"\n\n[crud]\nupdate_name = \"Grace Hopper\"\ntarget_id = 2\n",
        )
        .unwrap();

        crudql(&db)
            .assert()
            .success()
            .stdout(predicate::str::contains("An existing user was updated successfully!"))
            .stdout(predicate::str::contains("A user was deleted successfully!"));

        assert_eq!(db.rows(), vec![(1, Some("Ada".to_string()))]);
    }

    #[test]
    fn test_oversized_busy_timeout_fails_cleanly() {
        let db = setup_db(&["Ada"]);
        let config = db.dir.path().join("slow.toml");
        fs::write(&config, "[database]\nbusy_timeout_ms = 3000000000\n").unwrap();

        crudql(&db)
            .arg("--config")
            .arg(&config)
            .arg(&db.path)
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("busy_timeout_ms"));

        assert_eq!(db.rows(), vec![(1, Some("Ada".to_string()))]);
    }

    #[test]
    fn test_invalid_table_name_is_rejected() {
        let db = setup_db(&["Ada"]);

        crudql(&db)
            .args(["--table", "users; DROP TABLE users"])
            .arg(&db.path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid SQL identifier"));

        assert_eq!(db.rows(), vec![(1, Some("Ada".to_string()))]);
    }

    #[test]
    fn test_missing_table_reports_cause() {
        let db = setup_db(&["Ada"]);

        crudql(&db)
            .args(["--table", "accounts"])
            .arg(&db.path)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("no such table"))
            .stderr(predicate::str::contains("caused by"));
    }

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        let db = setup_db(&[]);

        crudql(&db).arg("--retry").assert().code(2);
    }
}
