//! Embedded reference dataset of West Bengal monitoring sites.
//!
//! These are static survey values shipped with the crate; their status and
//! color are derived from the stored WQI via the classifier rather than
//! being stored alongside it.

use serde::{Deserialize, Serialize};

/// Embedded CSV of the 15 static West Bengal monitoring sites.
static WEST_BENGAL_CSV: &str = include_str!("../fixtures/west_bengal_sites.csv");

/// One static monitoring site from the reference survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSite {
    pub name: String,
    /// Town or district the site sits in.
    pub area: String,
    pub latitude: f64,
    pub longitude: f64,
    pub wqi: f64,
    /// Free-form site description, e.g. "River / Drinking Source".
    pub category: String,
}

impl ReferenceSite {
    /// Display name used for map markers: `"Teesta River (Jalpaiguri)"`.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.area)
    }

    /// Name used in tabular export: `"Teesta River - Jalpaiguri"`.
    pub fn export_name(&self) -> String {
        format!("{} - {}", self.name, self.area)
    }
}

/// Parse a reference-site CSV (with headers) into typed records.
pub fn parse_sites(data: &str) -> anyhow::Result<Vec<ReferenceSite>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());
    let mut sites = Vec::new();
    for record in reader.deserialize() {
        sites.push(record?);
    }
    Ok(sites)
}

/// The built-in West Bengal reference sites.
pub fn west_bengal_sites() -> Vec<ReferenceSite> {
    parse_sites(WEST_BENGAL_CSV).expect("embedded reference CSV is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusScale;

    #[test]
    fn embedded_fixture_parses_fully() {
        let sites = west_bengal_sites();
        assert_eq!(sites.len(), 15);
        let teesta = sites
            .iter()
            .find(|s| s.name == "Teesta River")
            .expect("Teesta River present");
        assert_eq!(teesta.area, "Jalpaiguri");
        assert_eq!(teesta.wqi, 35.0);
    }

    #[test]
    fn all_sites_classify_cleanly() {
        let scale = StatusScale::default();
        for site in west_bengal_sites() {
            let (label, _) = scale.classify(Some(site.wqi));
            assert_ne!(label, "No Data", "{} should have a status", site.name);
            assert!((-90.0..=90.0).contains(&site.latitude));
            assert!((-180.0..=180.0).contains(&site.longitude));
        }
    }

    #[test]
    fn display_and_export_names() {
        let site = ReferenceSite {
            name: "Damodar River".to_string(),
            area: "Durgapur".to_string(),
            latitude: 23.5204,
            longitude: 87.3119,
            wqi: 55.0,
            category: "River / Industrial Area".to_string(),
        };
        assert_eq!(site.display_name(), "Damodar River (Durgapur)");
        assert_eq!(site.export_name(), "Damodar River - Durgapur");
    }

    #[test]
    fn malformed_csv_is_an_error() {
        assert!(parse_sites("name,area\noops").is_err());
    }
}
