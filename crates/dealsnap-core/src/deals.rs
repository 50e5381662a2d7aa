use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Reads an explicit `null` as the type's default, like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// GPS fix attached to a photo when the uploading device shared one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
}

/// One queue message describing a photographed sign whose text has already
/// been recognised.
///
/// Every field falls back to its zero value when absent or `null`, so `{}`
/// decodes to an empty message rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomingMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub photo_id: String,
    /// Object-storage key of the uploaded photo. Not carried into the deal.
    #[serde(deserialize_with = "null_as_default")]
    pub photo_key: String,
    pub location: Option<Location>,
    /// Raw OCR output, possibly empty or noisy.
    #[serde(deserialize_with = "null_as_default")]
    pub detected_text: String,
    /// Opaque upload timestamp; never parsed by the extractor.
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
}

/// A deal assembled from an [`IncomingMessage`].
///
/// `price`, `latitude` and `longitude` use `0.0` for "unknown", which cannot
/// be told apart from a genuine zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDeal {
    /// Assigned by the record sink on persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub photo_id: String,
    pub business_name: String,
    /// Verbatim copy of the detected text.
    pub deal_text: String,
    pub price: f64,
    pub expires_at: Option<NaiveDate>,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

impl ExtractedDeal {
    /// Returns the deal with its persistent identifier set.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns `true` if a dollar amount was found in the text.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price > 0.0
    }
}
