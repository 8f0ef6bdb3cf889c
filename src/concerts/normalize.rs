use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::concerts::types::{Concert, PriceRange, RawEvent};
use crate::models::UnifiedArtist;

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn price_range(min: Option<f64>, max: Option<f64>, currency: Option<String>) -> Option<PriceRange> {
    let (min, max) = match (min, max) {
        (Some(a), Some(b)) => (a.min(b), a.max(b)),
        (Some(a), None) | (None, Some(a)) => (a, a),
        (None, None) => return None,
    };
    if !min.is_finite() || !max.is_finite() || min < 0.0 {
        return None;
    }
    Some(PriceRange {
        min,
        max,
        currency: clean(currency).unwrap_or_else(|| "USD".to_string()),
    })
}

/// Turn a raw listing into a [`Concert`].
///
/// Listings without a venue, a city or a parseable date are dropped. A
/// missing artist name falls back to the artist the fetch was made for.
pub fn normalize_event(raw: RawEvent, fetched_for: &UnifiedArtist) -> Option<Concert> {
    let Some(date) = raw.date.as_deref().and_then(parse_date) else {
        log::debug!(
            "[Concerts] Dropping '{}' listing with unusable date {:?}",
            fetched_for.name,
            raw.date
        );
        return None;
    };
    let venue_name = clean(raw.venue_name)?;
    let city = clean(raw.city)?;

    let start_time = raw.time.as_deref().and_then(parse_time).or_else(|| {
        raw.date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
            .map(|dt| dt.time())
    });

    Some(Concert {
        artist_name: clean(raw.artist_name).unwrap_or_else(|| fetched_for.name.trim().to_string()),
        artist_image_url: clean(raw.artist_image_url).or_else(|| fetched_for.image_url.clone()),
        venue_name,
        address: clean(raw.address),
        city,
        date,
        start_time,
        price_range: price_range(raw.price_min, raw.price_max, raw.currency),
        ticket_url: clean(raw.ticket_url),
    })
}
