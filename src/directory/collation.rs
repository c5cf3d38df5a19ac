//! Ordering of names and attribute values the way a Swedish directory
//! expects them: accents fold into their base letter, `Å`, `Ä` and `Ö`
//! come after `Z`.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;

pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    pub fn swedish() -> Self {
        let collator = Collator::try_new(&locale!("sv").into(), CollatorOptions::new())
            .map_err(|e| tracing::warn!("Swedish collation unavailable, using code points: {}", e))
            .ok();
        Self { collator }
    }

    /// Collation order, with the raw strings as tiebreak so the
    /// result is total
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        collated.then_with(|| a.cmp(b))
    }
}
