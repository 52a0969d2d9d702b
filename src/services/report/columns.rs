use crate::error::AppError;
use crate::models::Row;

/// Logical roles a spreadsheet column can play in a sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Product,
    Quantity,
    Price,
    Revenue,
    Size,
    Date,
}

impl ColumnRole {
    /// Known header substrings for this role, matched case-insensitively.
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            ColumnRole::Product => &["product", "nama", "item"],
            ColumnRole::Quantity => &["quantity", "qty", "jumlah"],
            ColumnRole::Price => &["price", "harga"],
            ColumnRole::Revenue => &["revenue", "total", "amount"],
            ColumnRole::Size => &["size", "ukuran"],
            ColumnRole::Date => &["date", "tanggal", "bulan"],
        }
    }
}

/// Resolved mapping from role to the actual column name found in the input.
/// `product` and `quantity` are mandatory; the rest degrade gracefully.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub product: String,
    pub quantity: String,
    pub price: Option<String>,
    pub revenue: Option<String>,
    pub size: Option<String>,
    pub date: Option<String>,
}

/// First header in original order whose lower-cased form contains any of the
/// role's synonyms. Ambiguity is not an error: first match wins.
fn match_role(headers: &[&str], role: ColumnRole) -> Option<String> {
    headers
        .iter()
        .find(|header| {
            let lowered = header.to_lowercase();
            role.synonyms().iter().any(|syn| lowered.contains(syn))
        })
        .map(|header| header.to_string())
}

/// Resolve column roles from the key set of the first row.
pub fn detect_columns(first_row: &Row) -> Result<ColumnMap, AppError> {
    let headers: Vec<&str> = first_row.keys().map(String::as_str).collect();

    let product = match_role(&headers, ColumnRole::Product);
    let quantity = match_role(&headers, ColumnRole::Quantity);

    let (product, quantity) = match (product, quantity) {
        (Some(product), Some(quantity)) => (product, quantity),
        (product, quantity) => {
            let mut missing = Vec::new();
            if product.is_none() {
                missing.push("product");
            }
            if quantity.is_none() {
                missing.push("quantity");
            }
            return Err(AppError::MissingColumns(missing.join(", ")));
        }
    };

    Ok(ColumnMap {
        product,
        quantity,
        price: match_role(&headers, ColumnRole::Price),
        revenue: match_role(&headers, ColumnRole::Revenue),
        size: match_role(&headers, ColumnRole::Size),
        date: match_role(&headers, ColumnRole::Date),
    })
}
