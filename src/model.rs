use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{RenderError, Result};

/// The quotation as handed over by the record store. Read-only to the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationRecord {
    #[serde(default, deserialize_with = "label")]
    pub quotation_number: String,
    #[serde(default, deserialize_with = "label")]
    pub client_name: String,
    #[serde(default, deserialize_with = "label")]
    pub client_code: String,
    /// Missing, `null` or non-array `items` collapse to an empty list.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, alias = "_id", deserialize_with = "label")]
    pub id: String,
    #[serde(default, alias = "itemSelect", deserialize_with = "label")]
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentGroup>,
    #[serde(default, alias = "bo")]
    pub back_order: Vec<BackOrderEntry>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub rate: Option<Decimal>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentGroup {
    #[serde(default, alias = "unit", deserialize_with = "label")]
    pub unit_label: String,
    #[serde(default)]
    pub materials: Vec<MaterialRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackOrderEntry {
    #[serde(default, alias = "materialname", deserialize_with = "label")]
    pub material_name: String,
    /// Kept verbatim: the store sends either a number or free text ("2 sets").
    #[serde(default, deserialize_with = "label")]
    pub quantity: String,
    #[serde(default)]
    pub materials: Vec<MaterialRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    #[serde(default, alias = "material", deserialize_with = "label")]
    pub material_label: String,
}

/// Derived totals. Recomputed from `items` on every run, never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FinancialTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub grand_total: Decimal,
}

impl QuotationRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RenderError::MalformedRecord(e.to_string()).into())
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| RenderError::MalformedRecord(e.to_string()).into())
    }

    /// True when there is nothing to put in the item table.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reject records the aggregator must not see.
    pub fn validate(&self) -> Result<()> {
        for (idx, item) in self.items.iter().enumerate() {
            if item.total_amount.is_sign_negative() && !item.total_amount.is_zero() {
                return Err(RenderError::MalformedRecord(format!(
                    "item {} ({}) has negative totalAmount {}",
                    idx + 1,
                    item.id,
                    item.total_amount
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Accept strings, numbers and booleans as display labels; `null` becomes "".
fn label<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

fn items_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<LineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}
