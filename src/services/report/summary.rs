use super::aggregate::{fold_rows, Aggregates};
use super::columns::detect_columns;
use crate::error::AppError;
use crate::models::{MonthlyPoint, ProductTotals, Row, SalesSummary, SizeCount};

const RANKED_PRODUCTS: usize = 5;

/// Analyze parsed sales rows into a summary report.
///
/// Column roles are detected from the first row's headers, all rows are
/// folded in a single pass, and the aggregates are ranked into the final
/// summary. Fails fast on empty input or undetectable required columns;
/// row-level bad data never fails the run.
pub fn analyze_rows(rows: &[Row]) -> Result<SalesSummary, AppError> {
    let first = rows.first().ok_or(AppError::EmptyInput)?;
    let columns = detect_columns(first)?;

    tracing::debug!(
        "Detected columns: product={}, quantity={}, price={:?}, revenue={:?}, size={:?}, date={:?}",
        columns.product,
        columns.quantity,
        columns.price,
        columns.revenue,
        columns.size,
        columns.date
    );

    let aggs = fold_rows(rows, &columns);
    Ok(build_summary(aggs))
}

fn build_summary(aggs: Aggregates) -> SalesSummary {
    let mut products: Vec<ProductTotals> = aggs
        .products
        .into_iter()
        .map(|(name, agg)| ProductTotals {
            name,
            quantity: agg.quantity,
            revenue: agg.revenue,
        })
        .collect();
    // Stable sort: equal quantities keep first-appearance order.
    products.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));

    let top_products: Vec<ProductTotals> = products.iter().take(RANKED_PRODUCTS).cloned().collect();

    // The lowest-quantity products are the tail of the descending list,
    // reversed so the smallest comes first.
    let tail_start = products.len().saturating_sub(RANKED_PRODUCTS);
    let mut bottom_products: Vec<ProductTotals> = products[tail_start..].to_vec();
    bottom_products.reverse();

    let mut size_distribution: Vec<SizeCount> = aggs
        .sizes
        .into_iter()
        .map(|(size, count)| SizeCount { size, count })
        .collect();
    size_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    let mut monthly_trend: Vec<MonthlyPoint> = aggs
        .months
        .into_iter()
        .map(|(month, agg)| MonthlyPoint {
            month,
            revenue: agg.revenue,
            units: agg.units,
        })
        .collect();
    monthly_trend.sort_by(|a, b| a.month.cmp(&b.month));

    let average_price = if aggs.total_units > 0.0 {
        aggs.total_revenue / aggs.total_units
    } else {
        0.0
    };

    SalesSummary {
        total_revenue: aggs.total_revenue,
        total_units: aggs.total_units,
        product_count: products.len(),
        average_price,
        top_products,
        bottom_products,
        size_distribution,
        monthly_trend,
        skipped_rows: aggs.skipped_rows,
    }
}
