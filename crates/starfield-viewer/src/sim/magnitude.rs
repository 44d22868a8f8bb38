use anyhow::{bail, Result};

use crate::util::config::{default_magnitudes, MagnitudeConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeTier {
    pub tier: u8,
    pub min_popularity: u64,
    pub radius: f32,
    pub brightness: f32,
    pub glow_radius: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeTable {
    // sorted by min_popularity, descending
    tiers: Vec<MagnitudeTier>,
}

impl Default for MagnitudeTable {
    fn default() -> Self {
        Self::from_config(&default_magnitudes()).unwrap_or_else(|_| Self {
            tiers: vec![MagnitudeTier {
                tier: 7,
                min_popularity: 0,
                radius: 2.5,
                brightness: 0.4,
                glow_radius: 4.0,
                label: "faintest".to_string(),
            }],
        })
    }
}

impl MagnitudeTable {
    pub fn from_config(rows: &[MagnitudeConfig]) -> Result<Self> {
        let mut tiers: Vec<MagnitudeTier> = rows
            .iter()
            .filter(|r| r.enabled)
            .map(|r| MagnitudeTier {
                tier: r.tier,
                min_popularity: r.min_popularity,
                radius: r.radius,
                brightness: r.brightness,
                glow_radius: r.glow,
                label: r.label.clone(),
            })
            .collect();

        if tiers.is_empty() {
            bail!("magnitude table has no enabled rows");
        }
        for t in &tiers {
            if !(t.radius.is_finite() && t.radius > 0.0) {
                bail!("tier {} has invalid radius {}", t.tier, t.radius);
            }
            if !(0.0..=1.0).contains(&t.brightness) {
                bail!("tier {} brightness {} outside 0..=1", t.tier, t.brightness);
            }
            if !(t.glow_radius.is_finite() && t.glow_radius >= 0.0) {
                bail!("tier {} has invalid glow {}", t.tier, t.glow_radius);
            }
        }

        tiers.sort_by(|a, b| b.min_popularity.cmp(&a.min_popularity));
        for w in tiers.windows(2) {
            if w[0].min_popularity == w[1].min_popularity {
                bail!(
                    "tiers {} and {} share threshold {}",
                    w[0].tier,
                    w[1].tier,
                    w[0].min_popularity
                );
            }
            if w[0].tier > w[1].tier {
                bail!(
                    "tier {} (>= {}) is dimmer than tier {} (>= {})",
                    w[0].tier,
                    w[0].min_popularity,
                    w[1].tier,
                    w[1].min_popularity
                );
            }
        }

        Ok(Self { tiers })
    }

    pub fn tier_for(&self, popularity: u64) -> &MagnitudeTier {
        self.tiers
            .iter()
            .find(|t| popularity >= t.min_popularity)
            .unwrap_or_else(|| self.faintest())
    }

    pub fn faintest(&self) -> &MagnitudeTier {
        // non-empty by construction
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn tiers(&self) -> &[MagnitudeTier] {
        &self.tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_threshold_boundaries() {
        let t = MagnitudeTable::default();
        assert_eq!(t.tier_for(1000).tier, 1);
        assert_eq!(t.tier_for(999).tier, 2);
        assert_eq!(t.tier_for(500).tier, 2);
        assert_eq!(t.tier_for(499).tier, 3);
        assert_eq!(t.tier_for(200).tier, 3);
        assert_eq!(t.tier_for(199).tier, 4);
        assert_eq!(t.tier_for(100).tier, 4);
        assert_eq!(t.tier_for(99).tier, 5);
        assert_eq!(t.tier_for(50).tier, 5);
        assert_eq!(t.tier_for(49).tier, 6);
        assert_eq!(t.tier_for(20).tier, 6);
        assert_eq!(t.tier_for(19).tier, 7);
        assert_eq!(t.tier_for(0).tier, 7);
        assert_eq!(t.tier_for(0).radius, 2.5);
    }

    #[test]
    fn higher_popularity_never_dimmer() {
        let t = MagnitudeTable::default();
        let mut prev = t.tier_for(0).tier;
        for p in 1..3000u64 {
            let cur = t.tier_for(p).tier;
            assert!(cur <= prev, "popularity {p} got tier {cur} after {prev}");
            prev = cur;
        }
        assert_eq!(t.tier_for(u64::MAX).tier, 1);
    }

    #[test]
    fn hundred_items_across_all_tiers() {
        let t = MagnitudeTable::default();
        let expected = |p: u64| match p {
            1000.. => 1,
            500..=999 => 2,
            200..=499 => 3,
            100..=199 => 4,
            50..=99 => 5,
            20..=49 => 6,
            _ => 7,
        };
        let samples: Vec<u64> = (0..100u64).map(|i| (i * i * 13 + i * 7) % 1400).collect();
        let mut seen = std::collections::HashSet::new();
        for p in samples.iter().copied().chain([0, 19, 20, 49, 50, 99, 100, 199, 200, 499, 500, 999, 1000]) {
            let tier = t.tier_for(p).tier;
            assert_eq!(tier, expected(p), "popularity {p}");
            seen.insert(tier);
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn disabled_rows_are_skipped() {
        let mut rows = default_magnitudes();
        rows[0].enabled = false;
        let t = MagnitudeTable::from_config(&rows).expect("table");
        assert_eq!(t.tier_for(5000).tier, 2);
    }

    #[test]
    fn missing_floor_falls_back_to_faintest() {
        let rows: Vec<MagnitudeConfig> = default_magnitudes()
            .into_iter()
            .filter(|r| r.min_popularity >= 50)
            .collect();
        let t = MagnitudeTable::from_config(&rows).expect("table");
        assert_eq!(t.tier_for(3).tier, 5);
    }

    #[test]
    fn rejects_non_monotonic_table() {
        let mut rows = default_magnitudes();
        rows[0].tier = 4;
        rows[3].tier = 1;
        assert!(MagnitudeTable::from_config(&rows).is_err());
    }

    #[test]
    fn rejects_degenerate_rows() {
        let mut rows = default_magnitudes();
        rows[2].radius = 0.0;
        assert!(MagnitudeTable::from_config(&rows).is_err());

        let mut rows = default_magnitudes();
        rows[2].brightness = 1.5;
        assert!(MagnitudeTable::from_config(&rows).is_err());

        let rows: Vec<MagnitudeConfig> = default_magnitudes()
            .into_iter()
            .map(|mut r| {
                r.enabled = false;
                r
            })
            .collect();
        assert!(MagnitudeTable::from_config(&rows).is_err());
    }
}
