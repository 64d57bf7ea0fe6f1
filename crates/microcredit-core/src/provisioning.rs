use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One loss-provisioning band: an inclusive days-late range mapped to a
/// provisioning percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningRate {
    pub number: i32,
    pub nb_of_days_min: i32,
    pub nb_of_days_max: i32,
    /// Percentage, e.g. 25 for 25%.
    pub rate: Decimal,
}

/// Insertion-ordered set of provisioning bands, owned by the calling session
/// and passed by reference into whatever needs it.
///
/// Bands are not required to be exhaustive or non-overlapping; both lookups
/// are first-match linear scans, so ambiguity resolves by table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvisionTable {
    rates: Vec<ProvisioningRate>,
}

impl ProvisionTable {
    pub fn new() -> Self {
        ProvisionTable::default()
    }

    pub fn from_rates(rates: Vec<ProvisioningRate>) -> Self {
        ProvisionTable { rates }
    }

    pub fn add(&mut self, rate: ProvisioningRate) {
        self.rates.push(rate);
    }

    pub fn rates(&self) -> &[ProvisioningRate] {
        &self.rates
    }

    /// Band at `rank`, the zero-based position in insertion order — not a
    /// match on the band's `number` field. Ranks outside the table are a
    /// normal not-found, not an error.
    pub fn provisioning_rate(&self, rank: i32) -> Option<&ProvisioningRate> {
        usize::try_from(rank).ok().and_then(|i| self.rates.get(i))
    }

    /// First band whose inclusive range contains `days_late`.
    pub fn provisioning_rate_by_days_late(&self, days_late: i32) -> Option<&ProvisioningRate> {
        self.rates
            .iter()
            .find(|r| r.nb_of_days_min <= days_late && days_late <= r.nb_of_days_max)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table() -> ProvisionTable {
        let mut table = ProvisionTable::new();
        table.add(ProvisioningRate {
            number: 1,
            nb_of_days_min: 0,
            nb_of_days_max: 0,
            rate: dec!(2),
        });
        table.add(ProvisioningRate {
            number: 2,
            nb_of_days_min: 1,
            nb_of_days_max: 30,
            rate: dec!(10),
        });
        table.add(ProvisioningRate {
            number: 3,
            nb_of_days_min: 31,
            nb_of_days_max: 60,
            rate: dec!(25),
        });
        table
    }

    #[test]
    fn test_rate_by_rank() {
        assert_eq!(table().provisioning_rate(2).unwrap().rate, dec!(25));
        assert_eq!(table().provisioning_rate(0).unwrap().rate, dec!(2));
    }

    #[test]
    fn test_rate_by_rank_not_found() {
        assert!(table().provisioning_rate(-123).is_none());
        assert!(table().provisioning_rate(3).is_none());
    }

    #[test]
    fn test_rate_by_days_late() {
        assert_eq!(table().provisioning_rate_by_days_late(21).unwrap().rate, dec!(10));
    }

    #[test]
    fn test_rate_by_days_late_zero() {
        assert_eq!(table().provisioning_rate_by_days_late(0).unwrap().rate, dec!(2));
    }

    #[test]
    fn test_rate_by_days_late_not_found() {
        assert!(table().provisioning_rate_by_days_late(-123).is_none());
        assert!(table().provisioning_rate_by_days_late(61).is_none());
    }

    #[test]
    fn test_overlapping_bands_resolve_by_insertion_order() {
        let mut table = table();
        table.add(ProvisioningRate {
            number: 4,
            nb_of_days_min: 0,
            nb_of_days_max: 90,
            rate: dec!(50),
        });
        // the wide band loses to every earlier band it overlaps
        assert_eq!(table.provisioning_rate_by_days_late(21).unwrap().rate, dec!(10));
        // and wins where it alone matches
        assert_eq!(table.provisioning_rate_by_days_late(75).unwrap().rate, dec!(50));
    }
}
