// file: src/collector/filter.rs
// description: listing creation date filter
// reference: https://docs.rs/chrono

use chrono::{DateTime, Utc};
use tracing::debug;

/// Whether an item with creation timestamp `created` should be kept.
///
/// Items without a timestamp are kept. A timestamp that does not parse as
/// RFC 3339 drops the item, as does one strictly before `cutoff`.
pub fn passes_date_filter(created: Option<&str>, cutoff: DateTime<Utc>) -> bool {
    let Some(created) = created.map(str::trim).filter(|c| !c.is_empty()) else {
        return true;
    };

    match DateTime::parse_from_rfc3339(created) {
        Ok(parsed) => parsed.with_timezone(&Utc) >= cutoff,
        Err(e) => {
            debug!("Dropping item with unparseable creation date {:?}: {}", created, e);
            false
        }
    }
}
