use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const MARZO: &str = "Movistar Chile S.A.
Boleta Electrónica N° : 004512873
Sr./Sra. MARIA JOSE GONZALEZ RUT: 15.234.876-K
Dirección: Av. Providencia 1234, Santiago
Fecha de Emisión: 15 de marzo de 2024
Total Único Cuenta Telefónica $ 1.234,56
";

const ABRIL: &str = "Boleta Electrónica N° : 004600001
Sr./Sra. PEDRO SOTO RUT: 9.876.543-2
Fecha de Emisión: 15 de Marzober de 2024
Total Único Cuenta Telefónica $ 25.990
";

fn facturas() -> Command {
    Command::cargo_bin("facturas").unwrap()
}

/// Temp dir with a default config file, so the user's own config is never read.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    (dir, config)
}

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn only_file(dir: &Path) -> PathBuf {
    let entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected one output file, got {:?}", entries);
    entries.into_iter().next().unwrap()
}

#[test]
fn process_prints_json_record() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "marzo.txt", MARZO.as_bytes());

    facturas()
        .arg("-c")
        .arg(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""source_file_name": "marzo.txt""#))
        .stdout(predicate::str::contains(r#""customer": "MARIA JOSE GONZALEZ""#))
        .stdout(predicate::str::contains(r#""number": "004512873""#))
        .stdout(predicate::str::contains(r#""date": "2024-03-15""#))
        .stdout(predicate::str::contains(r#""total": "1234.56""#));
}

#[test]
fn process_unknown_month_is_error_not_missing() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "abril.txt", ABRIL.as_bytes());

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["process", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Date:     error"))
        .stdout(predicate::str::contains("Total:    25990"));
}

#[test]
fn process_result_independent_of_host_locale() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "marzo.txt", MARZO.as_bytes());

    let run = |locale: &str| {
        let output = facturas()
            .env("LC_ALL", locale)
            .env("LC_TIME", locale)
            .env("LANG", locale)
            .arg("-c")
            .arg(&config)
            .arg("process")
            .arg(&input)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let spanish = run("es_ES.UTF-8");
    assert!(spanish.contains("2024-03-15"));
    for locale in ["C", "en_US.UTF-8", "tr_TR.UTF-8", "POSIX"] {
        assert_eq!(run(locale), spanish, "locale {}", locale);
    }
}

#[test]
fn consolidate_writes_timestamped_workbook() {
    let (dir, config) = workspace();
    let out_dir = dir.path().join("out");

    let marzo = write(dir.path(), "marzo.txt", MARZO.as_bytes());
    let roto = write(dir.path(), "roto.pdf", b"%PDF-1.7\ntruncated");
    let vacio = write(dir.path(), "vacio.txt", b"Lorem ipsum dolor sit amet");
    let abril = write(dir.path(), "abril.txt", ABRIL.as_bytes());

    facturas()
        .arg("-c")
        .arg(&config)
        .arg("consolidate")
        .args([&marzo, &roto, &vacio, &abril])
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 files"))
        .stdout(predicate::str::contains("1 complete, 2 partial, 1 unreadable"));

    let workbook_path = only_file(&out_dir);
    let name = workbook_path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("Facturas_Consolidadas_"), "{}", name);
    assert!(name.ends_with(".xlsx"), "{}", name);
    // Facturas_Consolidadas_YYYYMMDD_HHMMSS.xlsx
    assert_eq!(name.len(), "Facturas_Consolidadas_".len() + 15 + ".xlsx".len());

    let mut workbook: Xlsx<_> = open_workbook(&workbook_path).unwrap();
    let range = workbook.worksheet_range("Facturas").unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    assert_eq!(rows.len(), 5);

    let file_names: Vec<String> = rows[1..].iter().map(|r| r[0].to_string()).collect();
    assert_eq!(file_names, ["marzo.txt", "roto.pdf", "vacio.txt", "abril.txt"]);

    // Full record survives the round trip
    assert_eq!(rows[1][1], Data::String("MARIA JOSE GONZALEZ".to_string()));
    assert_eq!(rows[1][2], Data::String("004512873".to_string()));
    assert_eq!(rows[1][3].as_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
    assert!((rows[1][4].get_float().unwrap() - 1234.56).abs() < 1e-9);

    // Unreadable document: every field is an error
    for cell in &rows[2][1..] {
        assert_eq!(*cell, Data::String("error".to_string()));
    }

    // No markers: every field is missing
    for cell in &rows[3][1..] {
        assert_eq!(*cell, Data::String("not found".to_string()));
    }

    // Bad month only affects the date
    assert_eq!(rows[4][3], Data::String("error".to_string()));
    assert_eq!(rows[4][4].get_float(), Some(25990.0));
}

#[test]
fn consolidate_csv() {
    let (dir, config) = workspace();
    let out_dir = dir.path().join("out");
    let marzo = write(dir.path(), "marzo.txt", MARZO.as_bytes());

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["consolidate", "--no-preview", "--format", "csv"])
        .arg(&marzo)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    let content = fs::read_to_string(only_file(&out_dir)).unwrap();
    assert_eq!(
        content,
        "FILE NAME,CUSTOMER,NUMBER,DATE,TOTAL\n\
         marzo.txt,MARIA JOSE GONZALEZ,004512873,2024-03-15,1234.56\n"
    );
}

#[test]
fn consolidate_missing_file_gets_error_row() {
    let (dir, config) = workspace();
    let out_dir = dir.path().join("out");
    let marzo = write(dir.path(), "marzo.txt", MARZO.as_bytes());
    let missing = dir.path().join("missing.pdf");

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["consolidate", "--no-preview", "--format", "csv"])
        .arg(&marzo)
        .arg(&missing)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("1 complete, 0 partial, 1 unreadable"))
        .stdout(predicate::str::contains("missing.pdf: cannot read document"));

    let content = fs::read_to_string(only_file(&out_dir)).unwrap();
    assert_eq!(
        content,
        "FILE NAME,CUSTOMER,NUMBER,DATE,TOTAL\n\
         marzo.txt,MARIA JOSE GONZALEZ,004512873,2024-03-15,1234.56\n\
         missing.pdf,error,error,error,error\n"
    );
}

#[test]
fn consolidate_old_date_does_not_lose_workbook() {
    let (dir, config) = workspace();
    let out_dir = dir.path().join("out");
    let antigua = write(
        dir.path(),
        "antigua.txt",
        MARZO.replace("de 2024", "de 1899").as_bytes(),
    );
    let marzo = write(dir.path(), "marzo.txt", MARZO.as_bytes());

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["consolidate", "--no-preview"])
        .arg(&antigua)
        .arg(&marzo)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    let mut workbook: Xlsx<_> = open_workbook(only_file(&out_dir)).unwrap();
    let range = workbook.worksheet_range("Facturas").unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][3], Data::String("1899-03-15".to_string()));
    assert_eq!(rows[2][3].as_date(), NaiveDate::from_ymd_opt(2024, 3, 15));
}

#[test]
fn consolidate_without_documents_fails() {
    let (dir, config) = workspace();
    let out_dir = dir.path().join("out");
    let pattern = dir.path().join("*.pdf");

    facturas()
        .arg("-c")
        .arg(&config)
        .arg("consolidate")
        .arg(&pattern)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no documents have been processed"));

    assert!(!out_dir.exists());
}

#[test]
fn config_labels_apply_to_export() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let out_dir = dir.path().join("out");
    let vacio = write(dir.path(), "vacio.txt", b"sin datos");

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "export.not_found_label", "No encontrado"])
        .assert()
        .success();

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "export.not_found_label"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"No encontrado\""));

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["consolidate", "--no-preview", "--format", "csv"])
        .arg(&vacio)
        .arg("-o")
        .arg(&out_dir)
        .assert()
        .success();

    let content = fs::read_to_string(only_file(&out_dir)).unwrap();
    assert!(content.ends_with(
        "vacio.txt,No encontrado,No encontrado,No encontrado,No encontrado\n"
    ));
}

#[test]
fn config_set_unknown_key_fails() {
    let (_dir, config) = workspace();

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "export.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_set_rejects_indistinguishable_labels() {
    let (_dir, config) = workspace();

    facturas()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "export.error_label", "not found"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("export.not_found_label and export.error_label"));

    assert_eq!(fs::read_to_string(&config).unwrap(), "{}");
}
