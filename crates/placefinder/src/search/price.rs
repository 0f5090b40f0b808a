use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// An amount with optional `.`/`,` thousands groups, an optional decimal part and an
/// optional unit, e.g. `30.000`, `1,200,000`, `30k` or `1,5 triệu`.
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d{3})*)(?:[.,](\d+))?\s*(?:(triệu|tr|nghìn|ngàn|k)\b)?")
        .expect("amount pattern is valid")
});

fn unit_scale(unit: &str) -> u64 {
    match unit.to_lowercase().as_str() {
        "k" | "nghìn" | "ngàn" => 1_000,
        "tr" | "triệu" => 1_000_000,
        _ => 1,
    }
}

/// Value of one matched amount in đồng. `None` on overflow.
fn amount(caps: &Captures<'_>, scale: u64) -> Option<u64> {
    let whole = caps[1]
        .replace(['.', ','], "")
        .parse::<u64>()
        .ok()?
        .checked_mul(scale)?;
    let Some(fraction) = caps.get(2).map(|m| m.as_str()) else {
        return Some(whole);
    };
    let divisor = 10u64.checked_pow(u32::try_from(fraction.len()).ok()?)?;
    let fraction = fraction.parse::<u64>().ok()?.checked_mul(scale)? / divisor;
    whole.checked_add(fraction)
}

/// Numeric interval parsed from a free-text price bucket such as `"30.000đ - 100.000đ"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    pub low: u64,
    pub high: u64,
}

impl PriceBand {
    /// Parse a bucket. The first amount is one bound and the last amount the other;
    /// a bucket with a single amount is a point interval.
    ///
    /// An amount without a unit takes the unit of the next amount that has one, so
    /// `"1,5 - 2 triệu"` spans 1 500 000 to 2 000 000. `None` when no amount is found or
    /// any amount overflows `u64`.
    pub fn parse(bucket: &str) -> Option<Self> {
        let mut scale = 1;
        let mut amounts = Vec::new();
        for caps in AMOUNT.captures_iter(bucket).collect::<Vec<_>>().iter().rev() {
            if let Some(unit) = caps.get(3) {
                scale = unit_scale(unit.as_str());
            }
            amounts.push(amount(caps, scale)?);
        }
        // Collected back to front
        let (first, last) = (*amounts.last()?, *amounts.first()?);
        Some(Self {
            low: first.min(last),
            high: first.max(last),
        })
    }

    /// True if this band shares at least one value with `[min, max]`.
    pub fn overlaps(&self, min: u64, max: u64) -> bool {
        min <= max && self.low <= max && self.high >= min
    }
}
