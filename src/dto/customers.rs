use serde::Deserialize;

/// Query string of `GET /api/customers`.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    /// Optional free-form search over name, phone, email and memo.
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}
