use serde::Serialize;
use serde_json::Value;

/// One spreadsheet row: column name -> cell value, in sheet order.
///
/// Column detection scans the first row's keys in order, so the map must
/// preserve insertion order (serde_json's `preserve_order` feature).
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Serialize)]
pub struct ProductTotals {
    pub name: String,
    pub quantity: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SizeCount {
    pub size: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub revenue: f64,
    pub units: f64,
}

/// The full report for one analysis run. Computed in a single pass and
/// returned as a plain value; nothing is cached between calls.
#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub total_units: f64,
    pub product_count: usize,
    pub average_price: f64,
    pub top_products: Vec<ProductTotals>,
    pub bottom_products: Vec<ProductTotals>,
    pub size_distribution: Vec<SizeCount>,
    pub monthly_trend: Vec<MonthlyPoint>,
    /// Rows excluded by the inclusion rule (empty product or quantity <= 0).
    pub skipped_rows: usize,
}
