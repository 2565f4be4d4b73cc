use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct DraftForm {
    pub customer_id: i32,
    #[validate(length(min = 1, max = 1000))]
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeForm {
    pub customer_id: i32,
}
