//! Composition of the individual extractors into an [`ExtractedDeal`].

use dealsnap_core::{ExtractedDeal, IncomingMessage};

use crate::date::extract_expiration;
use crate::fields::{extract_business_name, extract_price};

/// Builds a deal record from a queue message.
///
/// Price is read from a lower-cased copy of the text; business name and
/// expiration from the original. Missing location leaves both coordinates
/// at `0.0`. The identifier is left unset for the record sink to assign.
#[must_use]
pub fn assemble(message: &IncomingMessage) -> ExtractedDeal {
    let (latitude, longitude) = message
        .location
        .map_or((0.0, 0.0), |loc| (loc.latitude, loc.longitude));

    let text = message.detected_text.as_str();
    let lowered = text.to_lowercase();

    ExtractedDeal {
        id: None,
        photo_id: message.photo_id.clone(),
        business_name: extract_business_name(text),
        deal_text: text.to_owned(),
        price: extract_price(&lowered),
        expires_at: extract_expiration(text),
        latitude,
        longitude,
        timestamp: message.timestamp.clone(),
    }
}
