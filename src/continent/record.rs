// Continent record type

use serde::Serialize;

/// One continent entry
///
/// Field declaration order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinentRecord {
    /// Display name, may contain a space or a slash
    pub name: String,
    /// Area in square kilometers
    pub area: u32,
    /// Population, zero for uninhabited continents
    pub population: u64,
}

impl ContinentRecord {
    pub fn new(name: &str, area: u32, population: u64) -> Self {
        Self {
            name: name.to_string(),
            area,
            population,
        }
    }

    /// Serialize as a compact JSON object: `{"name":..,"area":..,"population":..}`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_order() {
        let record = ContinentRecord::new("europe", 10_000_000, 750_000_000);
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"name":"europe","area":10000000,"population":750000000}"#
        );
    }

    #[test]
    fn test_zero_population_is_serialized() {
        let record = ContinentRecord::new("antarctica", 14_200_000, 0);
        let json = record.to_json().unwrap();
        assert!(json.ends_with(r#""population":0}"#), "got: {json}");
    }

    #[test]
    fn test_slash_and_space_are_not_escaped() {
        let record = ContinentRecord::new("australia/oceania", 8_510_900, 44_000_000);
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"name":"australia/oceania","area":8510900,"population":44000000}"#
        );

        let record = ContinentRecord::new("north america", 24_230_000, 600_000_000);
        assert!(record.to_json().unwrap().contains(r#""name":"north america""#));
    }

    #[test]
    fn test_population_above_u32() {
        let record = ContinentRecord::new("asia", 44_614_000, 4_700_000_000);
        assert!(record.to_json().unwrap().contains("4700000000"));
    }
}
