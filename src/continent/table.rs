// Continent table module
// Fixed lookup table, built once and only read afterwards

use std::collections::HashMap;

use super::error::ContinentError;
use super::record::ContinentRecord;

/// Literal data set: (lookup key, display name, area km², population)
static CONTINENTS: [(&str, &str, u32, u64); 7] = [
    ("asia", "asia", 44_614_000, 4_700_000_000),
    ("africa", "africa", 30_365_000, 1_400_000_000),
    ("north_america", "north america", 24_230_000, 600_000_000),
    ("south_america", "south america", 17_814_000, 430_000_000),
    ("antarctica", "antarctica", 14_200_000, 0),
    ("europe", "europe", 10_000_000, 750_000_000),
    ("oceania", "australia/oceania", 8_510_900, 44_000_000),
];

/// Immutable mapping from underscore-form key to continent record
///
/// Exposes no mutating methods, so it can be shared behind an `Arc`
/// across every connection task without a lock.
#[derive(Debug, Clone)]
pub struct ContinentTable {
    entries: HashMap<&'static str, ContinentRecord>,
    /// Keys in literal data set order
    order: Vec<&'static str>,
}

impl ContinentTable {
    /// Build the table from the literal data set
    pub fn new() -> Self {
        let entries = CONTINENTS
            .iter()
            .map(|&(key, name, area, population)| {
                (key, ContinentRecord::new(name, area, population))
            })
            .collect();

        let order = CONTINENTS.iter().map(|&(key, ..)| key).collect();

        Self { entries, order }
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, key: &str) -> Option<&ContinentRecord> {
        self.entries.get(key)
    }

    /// Lookup that reports a miss as `ContinentError::LookupMiss`
    pub fn lookup(&self, key: &str) -> Result<&ContinentRecord, ContinentError> {
        self.get(key)
            .ok_or_else(|| ContinentError::LookupMiss(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in the literal data set order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

impl Default for ContinentTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_seven_entries() {
        let table = ContinentTable::new();
        assert_eq!(table.len(), 7);
        assert!(!table.is_empty());
        assert_eq!(
            table.keys().collect::<Vec<_>>(),
            vec![
                "asia",
                "africa",
                "north_america",
                "south_america",
                "antarctica",
                "europe",
                "oceania"
            ]
        );
    }

    #[test]
    fn test_keys_resolve() {
        let table = ContinentTable::new();
        for key in table.keys() {
            assert!(table.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn test_display_names() {
        let table = ContinentTable::new();
        assert_eq!(table.get("north_america").unwrap().name, "north america");
        assert_eq!(table.get("south_america").unwrap().name, "south america");
        assert_eq!(table.get("oceania").unwrap().name, "australia/oceania");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = ContinentTable::new();
        assert!(table.get("Asia").is_none());
        assert!(table.get("ASIA").is_none());
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        let table = ContinentTable::new();
        assert_eq!(
            table.lookup("asia2"),
            Err(ContinentError::LookupMiss("asia2".to_string()))
        );
        assert!(table.get("as").is_none());
        assert!(table.get("north america").is_none());
    }

    #[test]
    fn test_lookup_hit() {
        let table = ContinentTable::new();
        let record = table.lookup("antarctica").unwrap();
        assert_eq!(record.area, 14_200_000);
        assert_eq!(record.population, 0);
    }

    #[test]
    fn test_lookup_empty_key() {
        let table = ContinentTable::new();
        assert_eq!(
            table.lookup(""),
            Err(ContinentError::LookupMiss(String::new()))
        );
    }
}
