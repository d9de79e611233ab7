//! Pipeline config YAML parsing and validation tests

use quarry_core::config::{PipelineConfig, OLTP_DB};
use quarry_core::error::Error;

#[test]
fn test_parse_full_config() {
    let yaml = r#"
log_file: logs/retail.log
seed: 7
databases:
  oltp: { path: data/retail.db }
sources:
  departments:
    path: data/departments
    delimiter: "|"
    columns: [department_id, department_name]
  users:
    path: data/users.csv
    delimiter: "|"
    header: true
queries:
  movies: "SELECT 1 AS movieID"
"#;

    let cfg = PipelineConfig::from_yaml_str(yaml).expect("parse");
    assert_eq!(cfg.log_file, "logs/retail.log");
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.database(OLTP_DB).unwrap().path, "data/retail.db");

    let departments = cfg.source("departments").unwrap();
    assert!(!departments.header);
    assert_eq!(departments.delimiter, '|');
    assert_eq!(departments.columns, vec!["department_id", "department_name"]);

    assert!(cfg.source("users").unwrap().header);
    assert_eq!(cfg.query("movies").unwrap(), "SELECT 1 AS movieID");
}

#[test]
fn test_empty_document_gives_defaults() {
    let cfg = PipelineConfig::from_yaml_str("{}").expect("parse");
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.seed, None);
}

#[test]
fn test_delimiter_defaults_to_comma() {
    let yaml = r#"
sources:
  awards: { path: data/Awards_movie.csv, header: true }
"#;
    let cfg = PipelineConfig::from_yaml_str(yaml).expect("parse");
    assert_eq!(cfg.source("awards").unwrap().delimiter, ',');
}

#[test]
fn test_parse_invalid_yaml() {
    let result = PipelineConfig::from_yaml_str("invalid: yaml: [");
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_multibyte_delimiter_is_rejected() {
    let yaml = r#"
sources:
  orders:
    path: data/orders
    delimiter: "¦"
    columns: [order_id]
"#;
    assert!(PipelineConfig::from_yaml_str(yaml).is_err());
}

#[test]
fn test_defaults_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!("quarry-defaults-{}.yaml", std::process::id()));
    let cfg = PipelineConfig::warehouse_defaults();
    std::fs::write(&path, cfg.to_yaml().unwrap()).unwrap();

    let back = PipelineConfig::from_path(&path).expect("load");
    assert_eq!(back, cfg);
    let _ = std::fs::remove_file(&path);
}
