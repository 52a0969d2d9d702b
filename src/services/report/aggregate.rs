use indexmap::IndexMap;

use super::columns::ColumnMap;
use super::values::{number_or_zero, string_or_empty};
use crate::models::Row;

#[derive(Debug, Default, Clone)]
pub struct ProductAgg {
    pub quantity: f64,
    pub revenue: f64,
}

#[derive(Debug, Default, Clone)]
pub struct MonthAgg {
    pub revenue: f64,
    pub units: f64,
}

/// Running aggregates for one analysis pass. Maps are insertion-ordered so
/// the later stable sorts break ties by first appearance.
#[derive(Debug, Default)]
pub struct Aggregates {
    pub products: IndexMap<String, ProductAgg>,
    pub sizes: IndexMap<String, u64>,
    pub months: IndexMap<String, MonthAgg>,
    pub total_revenue: f64,
    pub total_units: f64,
    pub skipped_rows: usize,
}

/// Fold all rows into per-product, per-size, and per-month aggregates in a
/// single pass.
///
/// A row contributes only if its trimmed product name is non-empty and its
/// quantity is > 0; everything else is counted in `skipped_rows`. Row revenue
/// comes from the revenue column when one was detected, otherwise from
/// price * quantity.
pub fn fold_rows(rows: &[Row], columns: &ColumnMap) -> Aggregates {
    let mut aggs = Aggregates::default();

    for row in rows {
        let product = string_or_empty(row.get(&columns.product));
        let product = product.trim();
        let quantity = number_or_zero(row.get(&columns.quantity));

        if product.is_empty() || quantity <= 0.0 {
            aggs.skipped_rows += 1;
            continue;
        }

        let revenue = match &columns.revenue {
            Some(col) => number_or_zero(row.get(col)),
            None => {
                let price = columns
                    .price
                    .as_ref()
                    .map_or(0.0, |col| number_or_zero(row.get(col)));
                price * quantity
            }
        };

        aggs.total_revenue += revenue;
        aggs.total_units += quantity;

        let entry = aggs
            .products
            .entry(product.to_string())
            .or_insert_with(ProductAgg::default);
        entry.quantity += quantity;
        entry.revenue += revenue;

        if let Some(col) = &columns.size {
            // Raw label, no normalization.
            let size = string_or_empty(row.get(col));
            if !size.is_empty() {
                *aggs.sizes.entry(size).or_insert(0) += 1;
            }
        }

        if let Some(col) = &columns.date {
            let month: String = string_or_empty(row.get(col)).chars().take(7).collect();
            if !month.is_empty() {
                let entry = aggs.months.entry(month).or_insert_with(MonthAgg::default);
                entry.revenue += revenue;
                entry.units += quantity;
            }
        }
    }

    aggs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::columns::detect_columns;
    use serde_json::json;

    fn rows(values: &[serde_json::Value]) -> Vec<Row> {
        values
            .iter()
            .map(|v| v.as_object().expect("test row must be an object").clone())
            .collect()
    }

    #[test]
    fn rows_without_product_or_quantity_are_skipped() {
        let rows = rows(&[
            json!({ "Product": "Kemeja", "Qty": 10 }),
            json!({ "Product": "   ", "Qty": 4 }),
            json!({ "Product": "Polo", "Qty": 0 }),
            json!({ "Product": "Polo", "Qty": -2 }),
            json!({ "Product": "Polo", "Qty": "not a number" }),
        ]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.products.len(), 1);
        assert_eq!(aggs.total_units, 10.0);
        assert_eq!(aggs.skipped_rows, 4);
    }

    #[test]
    fn revenue_column_wins_over_price() {
        let rows = rows(&[json!({
            "Product": "Kemeja",
            "Qty": 2,
            "Price": 50000,
            "Total": 90000
        })]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        // Discounted line total, not price * quantity.
        assert_eq!(aggs.total_revenue, 90000.0);
    }

    #[test]
    fn bad_revenue_cell_does_not_fall_back_to_price() {
        let rows = rows(&[json!({
            "Product": "Kemeja",
            "Qty": 2,
            "Price": 50000,
            "Total": "n/a"
        })]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.total_revenue, 0.0);
        assert_eq!(aggs.total_units, 2.0);
    }

    #[test]
    fn missing_price_and_revenue_yield_zero_revenue() {
        let rows = rows(&[json!({ "Product": "Kemeja", "Qty": 3 })]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.total_revenue, 0.0);
        assert_eq!(aggs.total_units, 3.0);
    }

    #[test]
    fn month_keys_truncate_to_seven_chars() {
        let rows = rows(&[
            json!({ "Product": "Kemeja", "Qty": 1, "Price": 100, "Date": "2024-01-15" }),
            json!({ "Product": "Kemeja", "Qty": 2, "Price": 100, "Date": "2024-01-20" }),
            json!({ "Product": "Polo", "Qty": 1, "Price": 100, "Date": "2024-02-01" }),
            json!({ "Product": "Polo", "Qty": 1, "Price": 100, "Date": "" }),
        ]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.months.len(), 2);
        let january = &aggs.months["2024-01"];
        assert_eq!(january.units, 3.0);
        assert_eq!(january.revenue, 300.0);
    }

    #[test]
    fn size_counts_span_products_and_skip_empty_labels() {
        let rows = rows(&[
            json!({ "Product": "Kemeja", "Qty": 1, "Size": "M" }),
            json!({ "Product": "Polo", "Qty": 1, "Size": "M" }),
            json!({ "Product": "Polo", "Qty": 1, "Size": "L" }),
            json!({ "Product": "Polo", "Qty": 1, "Size": "" }),
        ]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.sizes["M"], 2);
        assert_eq!(aggs.sizes["L"], 1);
        assert_eq!(aggs.sizes.len(), 2);
    }

    #[test]
    fn product_names_are_trimmed_before_keying() {
        let rows = rows(&[
            json!({ "Product": " Kemeja ", "Qty": 1 }),
            json!({ "Product": "Kemeja", "Qty": 2 }),
        ]);
        let columns = detect_columns(&rows[0]).unwrap();

        let aggs = fold_rows(&rows, &columns);
        assert_eq!(aggs.products.len(), 1);
        assert_eq!(aggs.products["Kemeja"].quantity, 3.0);
    }
}
