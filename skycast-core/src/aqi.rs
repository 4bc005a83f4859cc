//! PM2.5 to US AQI derivation and band classification.

use serde::{Deserialize, Serialize};

/// Convert a PM2.5 concentration (µg/m³) to an air quality index.
///
/// Piecewise linear over five segments; each segment meets the next at its
/// upper breakpoint. `pm25` must be non-negative.
pub fn derive_index(pm25: f64) -> u32 {
    debug_assert!(pm25 >= 0.0, "negative PM2.5 concentration: {pm25}");

    let index = if pm25 <= 12.0 {
        pm25 / 12.0 * 50.0
    } else if pm25 <= 35.4 {
        50.0 + (pm25 - 12.0) / 23.4 * 50.0
    } else if pm25 <= 55.4 {
        100.0 + (pm25 - 35.4) / 20.0 * 50.0
    } else if pm25 <= 150.4 {
        150.0 + (pm25 - 55.4) / 95.0 * 50.0
    } else {
        200.0 + (pm25 - 150.4) / 49.6 * 100.0
    };

    index.round().max(0.0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiBand {
    pub fn label(&self) -> &'static str {
        match self {
            AqiBand::Good => "Good",
            AqiBand::Moderate => "Moderate",
            AqiBand::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiBand::Unhealthy => "Unhealthy",
            AqiBand::VeryUnhealthy => "Very Unhealthy",
        }
    }
}

impl std::fmt::Display for AqiBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Band for an index. Upper bounds are inclusive.
pub fn classify(index: u32) -> AqiBand {
    match index {
        0..=50 => AqiBand::Good,
        51..=100 => AqiBand::Moderate,
        101..=150 => AqiBand::UnhealthyForSensitiveGroups,
        151..=200 => AqiBand::Unhealthy,
        _ => AqiBand::VeryUnhealthy,
    }
}

/// Coarse styling tier for a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTier {
    Good,
    Moderate,
    Unhealthy,
}

impl StatusTier {
    /// Matches on label text, so it also accepts labels that are not band names
    /// (e.g. "Air quality data not available" lands in `Unhealthy`).
    pub fn from_label(label: &str) -> Self {
        if label.contains("Good") {
            StatusTier::Good
        } else if label.contains("Moderate") {
            StatusTier::Moderate
        } else {
            StatusTier::Unhealthy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_index_at_segment_starts() {
        assert_eq!(derive_index(0.0), 0);
        assert_eq!(derive_index(12.0), 50);
        assert_eq!(derive_index(35.4), 100);
        assert_eq!(derive_index(55.4), 150);
        assert_eq!(derive_index(150.4), 200);
    }

    #[test]
    fn derive_index_is_continuous_across_breakpoints() {
        for bp in [12.0, 35.4, 55.4, 150.4] {
            let below = derive_index(bp);
            let above = derive_index(bp + 0.01);
            assert!(
                above.abs_diff(below) <= 1,
                "jump at {bp}: {below} -> {above}"
            );
        }
    }

    #[test]
    fn derive_index_inside_segments() {
        assert_eq!(derive_index(6.0), 25);
        assert_eq!(derive_index(35.0), 99);
        assert_eq!(derive_index(45.4), 125);
        assert_eq!(derive_index(200.0), 300);
    }

    #[test]
    fn classify_boundaries_belong_to_lower_band() {
        assert_eq!(classify(0).label(), "Good");
        assert_eq!(classify(50).label(), "Good");
        assert_eq!(classify(51).label(), "Moderate");
        assert_eq!(classify(100).label(), "Moderate");
        assert_eq!(classify(101).label(), "Unhealthy for Sensitive Groups");
        assert_eq!(classify(150).label(), "Unhealthy for Sensitive Groups");
        assert_eq!(classify(151).label(), "Unhealthy");
        assert_eq!(classify(200).label(), "Unhealthy");
        assert_eq!(classify(201).label(), "Very Unhealthy");
        assert_eq!(classify(500).label(), "Very Unhealthy");
    }

    #[test]
    fn status_tier_groups_by_label_text() {
        assert_eq!(StatusTier::from_label("Good"), StatusTier::Good);
        assert_eq!(StatusTier::from_label("Moderate"), StatusTier::Moderate);
        assert_eq!(
            StatusTier::from_label("Unhealthy for Sensitive Groups"),
            StatusTier::Unhealthy
        );
        assert_eq!(StatusTier::from_label("Very Unhealthy"), StatusTier::Unhealthy);
    }
}
