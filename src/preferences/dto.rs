use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreatePreferenceRequest {
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
}
