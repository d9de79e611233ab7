//! Delimited source reader tests against real files.


use quarry_core::schema::SourceSpec;
use quarry_core::types::Scalar;
use quarry_io::{read_delimited, IoError};
use test_data_gen::{create_temp_dir, write_file};

#[test]
fn test_headerless_pipe_file_uses_declared_columns() {
    let dir = create_temp_dir("csv-headerless");
    let path = write_file(&dir, "orders", "1|2013-07-25 00:00:00.0|11599|CLOSED\n2|2013-07-25 00:00:00.0|256|PENDING_PAYMENT\n");
    let spec = SourceSpec::headerless(
        path,
        '|',
        &["order_id", "order_date", "order_customer_id", "order_status"],
    );

    let batch = read_delimited(&spec).expect("read");
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(
        batch.column("order_customer_id").unwrap().values,
        vec![Scalar::I64(11599), Scalar::I64(256)]
    );
    assert_eq!(
        batch.column("order_date").unwrap().values[0],
        Scalar::Str("2013-07-25 00:00:00.0".into())
    );
}

#[test]
fn test_short_record_is_a_field_count_error() {
    let dir = create_temp_dir("csv-short");
    let path = write_file(&dir, "departments", "2|Fitness\n3\n");
    let spec = SourceSpec::headerless(path, '|', &["department_id", "department_name"]);

    match read_delimited(&spec) {
        Err(IoError::FieldCount {
            line,
            expected,
            found,
            ..
        }) => {
            assert_eq!(line, 2);
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected FieldCount, got {other:?}"),
    }
}

#[test]
fn test_header_file_takes_columns_from_header() {
    let dir = create_temp_dir("csv-header");
    let path = write_file(&dir, "awards.csv", "movieID,IdAward,Aware\n1,10,Oscar\n2,,\n");
    let batch = read_delimited(&SourceSpec::with_header(path, ',')).expect("read");

    assert_eq!(batch.column_names(), vec!["movieID", "IdAward", "Aware"]);
    assert_eq!(
        batch.column("IdAward").unwrap().values,
        vec![Scalar::I64(10), Scalar::Null]
    );
    assert_eq!(batch.column("Aware").unwrap().values[1], Scalar::Null);
}

#[test]
fn test_declared_columns_must_match_header() {
    let dir = create_temp_dir("csv-mismatch");
    let path = write_file(&dir, "users.csv", "idUser|username\n1|ana\n");
    let mut spec = SourceSpec::with_header(path, '|');
    spec.columns = vec!["userID".into(), "username".into()];

    assert!(matches!(
        read_delimited(&spec),
        Err(IoError::HeaderMismatch { .. })
    ));
}

#[test]
fn test_mixed_numeric_column_becomes_float() {
    let dir = create_temp_dir("csv-float");
    let path = write_file(&dir, "items", "1|59.98\n2|60\n");
    let batch =
        read_delimited(&SourceSpec::headerless(path, '|', &["id", "price"])).expect("read");
    assert_eq!(
        batch.column("price").unwrap().values,
        vec![Scalar::F64(59.98), Scalar::F64(60.0)]
    );
}

#[test]
fn test_missing_file_is_an_open_error() {
    let dir = create_temp_dir("csv-missing");
    let spec = SourceSpec::headerless(
        dir.join("nope").to_string_lossy(),
        '|',
        &["a"],
    );
    assert!(matches!(read_delimited(&spec), Err(IoError::Open { .. })));
}
