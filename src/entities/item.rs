//! Inventory item entity - one component record stored at a location

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::InventoryError;

/// A single inventory record
///
/// Several records may share one `inventory_number` when a logical asset is
/// made of components (e.g. "ASSET-001" = laptop + monitor + keyboard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItem {
    /// Unique record id, assigned by the store
    pub id: u32,

    /// Shared identifier of the logical asset
    pub inventory_number: String,

    /// Component name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Pieces of this component at `location`
    #[serde(default)]
    pub quantity: u32,

    /// Storage location (soft reference into the location set)
    #[serde(default)]
    pub location: String,

    /// Last modification time
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

impl std::fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[Inv# {}] [{}] {} ({} pcs) - Loc: {}",
            self.inventory_number, self.id, self.name, self.quantity, self.location
        )
    }
}

/// Field values for a record that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub inventory_number: String,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub location: String,
}

impl ItemDraft {
    pub fn new(inventory_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            inventory_number: inventory_number.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Check required fields and turn the draft into a stored item
    pub fn into_item(self, id: u32, now: DateTime<Utc>) -> Result<InventoryItem, InventoryError> {
        let inventory_number = required("inventory number", &self.inventory_number)?;
        let name = required("name", &self.name)?;
        let quantity = checked_quantity(self.quantity)?;

        Ok(InventoryItem {
            id,
            inventory_number,
            name,
            description: self.description.trim().to_string(),
            quantity,
            location: self.location.trim().to_string(),
            last_updated: now,
        })
    }

    /// Validate without consuming
    pub fn validate(&self) -> Result<(), InventoryError> {
        required("inventory number", &self.inventory_number)?;
        required("name", &self.name)?;
        checked_quantity(self.quantity)?;
        Ok(())
    }
}

/// Partial update of an existing record; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub inventory_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
}

impl ItemUpdate {
    /// An update that sets every field to the item's current values
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            inventory_number: Some(item.inventory_number.clone()),
            name: Some(item.name.clone()),
            description: Some(item.description.clone()),
            quantity: Some(i64::from(item.quantity)),
            location: Some(item.location.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inventory_number.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.location.is_none()
    }

    /// Compute the item that results from this update.
    ///
    /// Returns `Ok(None)` when every provided field already matches, so the
    /// caller can tell "confirmed without edits" apart from a real change.
    pub fn apply_to(
        &self,
        item: &InventoryItem,
        now: DateTime<Utc>,
    ) -> Result<Option<InventoryItem>, InventoryError> {
        let mut next = item.clone();

        if let Some(ref v) = self.inventory_number {
            next.inventory_number = required("inventory number", v)?;
        }
        if let Some(ref v) = self.name {
            next.name = required("name", v)?;
        }
        if let Some(ref v) = self.description {
            next.description = v.trim().to_string();
        }
        if let Some(v) = self.quantity {
            next.quantity = checked_quantity(v)?;
        }
        if let Some(ref v) = self.location {
            next.location = v.trim().to_string();
        }

        if next == *item {
            return Ok(None);
        }

        next.last_updated = now;
        Ok(Some(next))
    }
}

fn required(field: &str, value: &str) -> Result<String, InventoryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InventoryError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn checked_quantity(quantity: i64) -> Result<u32, InventoryError> {
    u32::try_from(quantity).map_err(|_| {
        if quantity < 0 {
            InventoryError::Validation(format!("quantity cannot be negative (got {})", quantity))
        } else {
            InventoryError::Validation(format!("quantity {} is too large", quantity))
        }
    })
}

/// Accept RFC 3339 timestamps as well as the offset-less local timestamps
/// older data files carry.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InventoryItem {
        ItemDraft::new("A-1", "Widget")
            .with_quantity(5)
            .with_location("Shelf1")
            .into_item(1, Utc::now())
            .unwrap()
    }

    #[test]
    fn test_draft_trims_fields() {
        let item = ItemDraft::new("  A-1 ", " Widget ")
            .with_description("  blue ")
            .with_location(" Shelf1 ")
            .into_item(7, Utc::now())
            .unwrap();

        assert_eq!(item.id, 7);
        assert_eq!(item.inventory_number, "A-1");
        assert_eq!(item.name, "Widget");
        assert_eq!(item.description, "blue");
        assert_eq!(item.location, "Shelf1");
    }

    #[test]
    fn test_draft_requires_name_and_number() {
        let err = ItemDraft::new("A-1", "   ").into_item(1, Utc::now()).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        let err = ItemDraft::new("", "Widget").into_item(1, Utc::now()).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[test]
    fn test_draft_rejects_negative_quantity() {
        let err = ItemDraft::new("A-1", "Widget")
            .with_quantity(-3)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_update_with_same_values_is_noop() {
        let item = sample();
        let update = ItemUpdate::from_item(&item);
        assert!(update.apply_to(&item, Utc::now()).unwrap().is_none());
    }

    #[test]
    fn test_update_whitespace_only_difference_is_noop() {
        let item = sample();
        let update = ItemUpdate {
            name: Some("Widget  ".to_string()),
            ..Default::default()
        };
        assert!(update.apply_to(&item, Utc::now()).unwrap().is_none());
    }

    #[test]
    fn test_update_changes_timestamp() {
        let item = sample();
        let later = item.last_updated + chrono::Duration::seconds(10);
        let update = ItemUpdate {
            quantity: Some(9),
            ..Default::default()
        };
        let next = update.apply_to(&item, later).unwrap().unwrap();
        assert_eq!(next.quantity, 9);
        assert_eq!(next.last_updated, later);
        assert_eq!(next.id, item.id);
    }

    #[test]
    fn test_json_uses_pascal_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"InventoryNumber\":\"A-1\""));
        assert!(json.contains("\"LastUpdated\""));
    }

    #[test]
    fn test_parse_legacy_timestamps() {
        assert!(parse_timestamp("2024-03-01T10:15:30.1234567+02:00").is_some());
        assert!(parse_timestamp("2024-03-01T10:15:30.1234567").is_some());
        assert!(parse_timestamp("2024-03-01T10:15:30Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let json = r#"{"Id":3,"InventoryNumber":"B-1","Name":"Cable","Quantity":2,"Location":"Bin","LastUpdated":"2024-01-01T00:00:00Z"}"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.quantity, 2);
    }
}
