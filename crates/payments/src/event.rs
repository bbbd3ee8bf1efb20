//! Typed Paystack charge event payload

use std::collections::HashMap;

use serde::Deserialize;

/// Webhook envelope: `{event, data}`.
#[derive(Debug, Deserialize)]
pub struct ChargeEvent {
    pub event: String,
    #[serde(default)]
    pub data: ChargeData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChargeData {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

/// One entry of the provider's weakly-typed bag of checkout fields.
#[derive(Debug, Deserialize)]
pub struct CustomField {
    #[serde(default)]
    pub variable_name: String,
    #[serde(default)]
    pub value: String,
}

/// Name → value lookup over `metadata.custom_fields`.
///
/// Built once per event. When a name repeats, the last entry in list order
/// wins.
#[derive(Debug, Default)]
pub struct CustomFields(HashMap<String, String>);

impl CustomFields {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let mut map = HashMap::new();
        for field in &metadata.custom_fields {
            map.insert(field.variable_name.clone(), field.value.clone());
        }
        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.get("full_name")
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.get("chat_id")
    }
}
