//! Integration tests for cohort assessment (`prime-cvd batch`).

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "id,age,sex,sbp,total_chol,hdl,ldl,smoker,diabetes,egfr,crp,vascular_count,current_therapy,prescribed_therapy,add_ons,target_ldl\n";

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("prime-cvd"));
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_cohort(dir: &Path, rows: &str) -> std::path::PathBuf {
    let path = dir.join("cohort.csv");
    fs::write(&path, format!("{}{}", HEADER, rows)).expect("Failed to write cohort");
    path
}

#[test]
fn test_batch_to_file() {
    let temp_dir = setup_test_dir();
    let input = write_cohort(
        temp_dir.path(),
        "p1,65,male,140,5.0,1.0,3.5,false,false,80,2.0,0,None,Rosuvastatin 20 mg,,\n\
         p2,72,female,150,6.1,1.2,4.0,true,true,55,3.0,2,Atorvastatin 20 mg,Atorvastatin 80 mg,Ezetimibe,1.8\n\
         p3,65,male,140,5.0,1.0,3.5,false,false,80,2.0,0,,,,\n",
    );
    let output = temp_dir.path().join("out").join("results.csv");

    cli(temp_dir.path())
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Assessed 3 patients (0 failed)"));

    let mut reader = csv::Reader::from_path(&output).expect("Failed to open results");
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "id",
            "baseline_risk",
            "projected_ldl",
            "total_reduction",
            "final_risk",
            "tier",
            "target_met",
            "error"
        ]
    );

    let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][1], "28.9");
    assert_eq!(&records[0][3], "55.0");
    assert_eq!(&records[1][3], "45.0");
    assert_eq!(&records[2][1], "28.9");
    assert_eq!(&records[2][3], "0.0");
    assert_eq!(&records[2][5], "High Risk");
}

#[test]
fn test_batch_to_stdout_reports_failures() {
    let temp_dir = setup_test_dir();
    let input = write_cohort(
        temp_dir.path(),
        "ok,65,male,140,5.0,1.0,3.5,false,false,80,2.0,0,,Rosuvastatin 10 mg,,\n\
         bad,65,male,140,5.0,1.0,3.5,false,false,80,50.0,0,,Rosuvastatin 10 mg,,\n",
    );

    cli(temp_dir.path())
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("id,baseline_risk"))
        .stdout(predicate::str::contains("crp 50 outside"))
        .stderr(predicate::str::contains("Assessed 2 patients (1 failed)"));
}

#[test]
fn test_batch_empty_cohort_writes_header() {
    let temp_dir = setup_test_dir();
    let input = write_cohort(temp_dir.path(), "");
    let output = temp_dir.path().join("empty.csv");

    cli(temp_dir.path())
        .arg("batch")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Assessed 0 patients (0 failed)"));

    let contents = fs::read_to_string(&output).expect("Failed to read results");
    assert_eq!(
        contents,
        "id,baseline_risk,projected_ldl,total_reduction,final_risk,tier,target_met,error\n"
    );
}

#[test]
fn test_batch_missing_input_fails() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("batch")
        .arg("--input")
        .arg(temp_dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Io"));
}
