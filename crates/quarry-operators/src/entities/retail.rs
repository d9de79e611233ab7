//! Retail OLTP entities: departments, categories, customers, products,
//! orders and order items.

use quarry_core::catalog::retail::*;
use quarry_core::schema::DataType;
use quarry_core::types::{RowBatch, Scalar};

use super::Tagged;
use crate::error::{Healed, TransformError, ValidationError};
use crate::reshape::{lowercase, parse_timestamps};
use crate::validate::{column_of, validate_not_null, validate_references, validate_unique};

const DEPARTMENT_NAME: &str = DEPARTMENT_COLUMNS[1];
const CATEGORY_ID: &str = CATEGORY_COLUMNS[0];
const CUSTOMER_ID: &str = CUSTOMER_COLUMNS[0];
const CUSTOMER_FNAME: &str = CUSTOMER_COLUMNS[1];
const CUSTOMER_LNAME: &str = CUSTOMER_COLUMNS[2];
const CUSTOMER_EMAIL: &str = CUSTOMER_COLUMNS[3];
const PRODUCT_ID: &str = PRODUCT_COLUMNS[0];
const PRODUCT_CATEGORY_ID: &str = PRODUCT_COLUMNS[1];
const ORDER_ID: &str = ORDER_COLUMNS[0];
const ORDER_DATE: &str = ORDER_COLUMNS[1];
const ORDER_CUSTOMER_ID: &str = ORDER_COLUMNS[2];
const ITEM_ORDER_ID: &str = ORDER_ITEM_COLUMNS[1];
const ITEM_PRODUCT_ID: &str = ORDER_ITEM_COLUMNS[2];
const ITEM_QUANTITY: &str = ORDER_ITEM_COLUMNS[3];
const ITEM_SUBTOTAL: &str = ORDER_ITEM_COLUMNS[4];
const ITEM_PRICE: &str = ORDER_ITEM_COLUMNS[5];

pub fn transform_departments(batch: RowBatch) -> Result<RowBatch, TransformError> {
    validate_unique(&batch, DEPARTMENT_NAME).entity(DEPARTMENTS)?;
    Ok(batch)
}

/// Categories are loaded as read.
pub fn transform_categories(batch: RowBatch) -> Result<RowBatch, TransformError> {
    Ok(batch)
}

pub fn transform_customers(batch: RowBatch) -> Result<RowBatch, TransformError> {
    validate_not_null(&batch, &[CUSTOMER_FNAME, CUSTOMER_LNAME, CUSTOMER_EMAIL])
        .entity(CUSTOMERS)?;
    lowercase(batch, CUSTOMER_EMAIL).entity(CUSTOMERS)
}

pub fn transform_products(
    batch: RowBatch,
    categories: &RowBatch,
) -> Result<RowBatch, TransformError> {
    validate_references(&batch, categories, PRODUCT_CATEGORY_ID, CATEGORY_ID).entity(PRODUCTS)?;
    Ok(batch)
}

pub fn transform_orders(batch: RowBatch, customers: &RowBatch) -> Result<RowBatch, TransformError> {
    let batch = parse_timestamps(batch, ORDER_DATE).entity(ORDERS)?;
    validate_references(&batch, customers, ORDER_CUSTOMER_ID, CUSTOMER_ID).entity(ORDERS)?;
    Ok(batch)
}

/// Validate both parents, then overwrite every subtotal that disagrees with
/// `quantity × price`. Overwritten rows are returned as `Healed`; this is
/// the only rule that corrects instead of rejecting.
pub fn transform_order_items(
    mut batch: RowBatch,
    orders: &RowBatch,
    products: &RowBatch,
) -> Result<(RowBatch, Option<Healed>), TransformError> {
    validate_references(&batch, orders, ITEM_ORDER_ID, ORDER_ID).entity(ORDER_ITEMS)?;
    validate_references(&batch, products, ITEM_PRODUCT_ID, PRODUCT_ID).entity(ORDER_ITEMS)?;

    let recomputed = recompute_subtotals(&batch).entity(ORDER_ITEMS)?;
    let subtotal = batch
        .column_mut(ITEM_SUBTOTAL)
        .ok_or_else(|| ValidationError::UnknownColumn(ITEM_SUBTOTAL.to_string()))
        .entity(ORDER_ITEMS)?;

    let mut rows = Vec::new();
    for (row, (stored, fresh)) in subtotal.values.iter_mut().zip(recomputed).enumerate() {
        if stored.key() != fresh.key() {
            *stored = fresh;
            rows.push(row);
        }
    }

    let healed = (!rows.is_empty()).then(|| Healed {
        column: ITEM_SUBTOTAL.to_string(),
        rows,
    });
    Ok((batch, healed))
}

fn recompute_subtotals(batch: &RowBatch) -> Result<Vec<Scalar>, ValidationError> {
    let quantity = column_of(batch, ITEM_QUANTITY)?;
    let price = column_of(batch, ITEM_PRICE)?;
    quantity
        .values
        .iter()
        .zip(&price.values)
        .enumerate()
        .map(|(row, (q, p))| line_total(row, q, p))
        .collect()
}

fn line_total(row: usize, quantity: &Scalar, price: &Scalar) -> Result<Scalar, ValidationError> {
    let not_numeric = |column: &str, value: &Scalar| ValidationError::Coercion {
        column: column.to_string(),
        row,
        value: value.clone(),
        target: DataType::Float64,
    };
    match (quantity, price) {
        (Scalar::Null, _) | (_, Scalar::Null) => Ok(Scalar::Null),
        (Scalar::I64(q), Scalar::I64(p)) => Ok(q
            .checked_mul(*p)
            .map(Scalar::I64)
            .unwrap_or(Scalar::F64(*q as f64 * *p as f64))),
        (q, p) => {
            let qf = q.as_f64().ok_or_else(|| not_numeric(ITEM_QUANTITY, q))?;
            let pf = p.as_f64().ok_or_else(|| not_numeric(ITEM_PRICE, p))?;
            Ok(Scalar::F64(qf * pf))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::types::Column;

    fn s(v: &str) -> Scalar {
        Scalar::Str(v.to_string())
    }

    fn batch(columns: &[&str], rows: Vec<Vec<Scalar>>) -> RowBatch {
        let cols = columns
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(*name, rows.iter().map(|r| r[i].clone()).collect()))
            .collect();
        RowBatch::try_new(cols).unwrap()
    }

    fn orders() -> RowBatch {
        batch(
            &ORDER_COLUMNS,
            vec![vec![Scalar::I64(1), s("2024-03-01"), Scalar::I64(7), s("CLOSED")]],
        )
    }

    fn products() -> RowBatch {
        batch(
            &PRODUCT_COLUMNS,
            vec![vec![
                Scalar::I64(10),
                Scalar::I64(2),
                s("Ball"),
                Scalar::Null,
                Scalar::F64(2.5),
                s("img"),
            ]],
        )
    }

    fn item(id: i64, quantity: Scalar, subtotal: Scalar, price: Scalar) -> Vec<Scalar> {
        vec![
            Scalar::I64(id),
            Scalar::I64(1),
            Scalar::I64(10),
            quantity,
            subtotal,
            price,
        ]
    }

    #[test]
    fn duplicate_department_name_is_rejected() {
        let b = batch(
            &DEPARTMENT_COLUMNS,
            vec![
                vec![Scalar::I64(1), s("Fitness")],
                vec![Scalar::I64(2), s("Fitness")],
            ],
        );
        let err = transform_departments(b).unwrap_err();
        assert_eq!(err.entity, DEPARTMENTS);
        assert!(matches!(err.source, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn customer_email_is_lowercased() {
        let b = batch(
            &CUSTOMER_COLUMNS,
            vec![vec![
                Scalar::I64(1),
                s("Mary"),
                s("Smith"),
                s("Mary@Example.COM"),
                s("x"),
                s("Main"),
                s("Town"),
                s("TX"),
                Scalar::I64(725),
            ]],
        );
        let out = transform_customers(b).unwrap();
        assert_eq!(
            out.column(CUSTOMER_EMAIL).unwrap().values[0],
            s("mary@example.com")
        );
    }

    #[test]
    fn customer_without_last_name_is_rejected() {
        let b = batch(
            &CUSTOMER_COLUMNS,
            vec![vec![
                Scalar::I64(1),
                s("Mary"),
                Scalar::Null,
                s("m@x.io"),
                s("x"),
                s("Main"),
                s("Town"),
                s("TX"),
                Scalar::I64(725),
            ]],
        );
        let err = transform_customers(b).unwrap_err();
        assert_eq!(
            err.source,
            ValidationError::MissingValues {
                column: CUSTOMER_LNAME.into(),
                rows: vec![0]
            }
        );
    }

    fn categories(ids: &[i64]) -> RowBatch {
        batch(
            &CATEGORY_COLUMNS,
            ids.iter()
                .map(|&id| vec![Scalar::I64(id), Scalar::I64(2), s("Football")])
                .collect(),
        )
    }

    #[test]
    fn products_with_known_categories_pass_unchanged() {
        let out = transform_products(products(), &categories(&[1, 2])).unwrap();
        assert_eq!(out, products());
    }

    #[test]
    fn product_in_unknown_category_is_rejected() {
        let mut raw = products();
        raw.column_mut(PRODUCT_CATEGORY_ID).unwrap().values[0] = Scalar::I64(5);
        let err = transform_products(raw, &categories(&[1, 2])).unwrap_err();
        assert_eq!(err.entity, PRODUCTS);
        match err.source {
            ValidationError::DanglingReference {
                fk_column, missing, ..
            } => {
                assert_eq!(fk_column, PRODUCT_CATEGORY_ID);
                assert_eq!(missing, vec![Scalar::I64(5)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unparseable_order_date_is_fatal() {
        let customers = batch(&[CUSTOMER_ID], vec![vec![Scalar::I64(7)]]);
        let b = batch(
            &ORDER_COLUMNS,
            vec![vec![Scalar::I64(1), s("not-a-date"), Scalar::I64(7), s("CLOSED")]],
        );
        let err = transform_orders(b, &customers).unwrap_err();
        assert!(matches!(
            err.source,
            ValidationError::UnparseableTimestamp { row: 0, .. }
        ));

        let out = transform_orders(orders(), &customers).unwrap();
        assert_eq!(
            out.column(ORDER_DATE).unwrap().values[0].data_type(),
            DataType::Timestamp
        );
    }

    #[test]
    fn order_for_unknown_customer_is_rejected() {
        let customers = batch(&[CUSTOMER_ID], vec![vec![Scalar::I64(8)]]);
        let err = transform_orders(orders(), &customers).unwrap_err();
        assert!(matches!(
            err.source,
            ValidationError::DanglingReference { .. }
        ));
    }

    #[test]
    fn wrong_subtotal_is_healed_and_right_one_untouched() {
        let b = batch(
            &ORDER_ITEM_COLUMNS,
            vec![
                item(1, Scalar::I64(3), Scalar::F64(5.0), Scalar::F64(2.5)),
                item(2, Scalar::I64(1), Scalar::F64(199.99), Scalar::F64(199.99)),
            ],
        );
        let (out, healed) = transform_order_items(b, &orders(), &products()).unwrap();
        let subtotal = &out.column(ITEM_SUBTOTAL).unwrap().values;
        assert_eq!(subtotal[0], Scalar::F64(7.5));
        match subtotal[1] {
            Scalar::F64(v) => assert_eq!(v.to_bits(), 199.99f64.to_bits()),
            ref other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            healed,
            Some(Healed {
                column: ITEM_SUBTOTAL.into(),
                rows: vec![0]
            })
        );
    }

    #[test]
    fn consistent_items_report_no_healing() {
        let b = batch(
            &ORDER_ITEM_COLUMNS,
            vec![item(1, Scalar::I64(2), Scalar::I64(8), Scalar::I64(4))],
        );
        let (_, healed) = transform_order_items(b, &orders(), &products()).unwrap();
        assert!(healed.is_none());
    }

    #[test]
    fn item_for_unknown_product_is_rejected() {
        let mut row = item(1, Scalar::I64(1), Scalar::F64(2.5), Scalar::F64(2.5));
        row[2] = Scalar::I64(99);
        let b = batch(&ORDER_ITEM_COLUMNS, vec![row]);
        let err = transform_order_items(b, &orders(), &products()).unwrap_err();
        match err.source {
            ValidationError::DanglingReference { missing, .. } => {
                assert_eq!(missing, vec![Scalar::I64(99)])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_numeric_quantity_is_a_coercion_error() {
        let b = batch(
            &ORDER_ITEM_COLUMNS,
            vec![item(1, s("two"), Scalar::F64(5.0), Scalar::F64(2.5))],
        );
        let err = transform_order_items(b, &orders(), &products()).unwrap_err();
        assert!(matches!(err.source, ValidationError::Coercion { .. }));
    }
}
