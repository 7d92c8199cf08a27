use serde::{Deserialize, Serialize};

/// Which reference list an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Sanction,
    Pep,
}

/// One row of a reference list, as resolved from a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub kind: EntryKind,
    pub display_name: String,
    /// Feed-assigned identifier, empty when the feed has none
    pub uid: String,
    /// Feed identifier, e.g. "OFAC:SDN"
    pub source: String,
    /// Program for sanctions, "country • role" for PEPs
    pub extra: String,
    /// "individual", "entity", ... when the sanctions feed carries it
    #[serde(default)]
    pub entity_type: String,
    /// Publisher dataset for PEPs, e.g. "wd_peps"
    #[serde(default)]
    pub dataset: String,
}

const EXTRA_SEPARATOR: &str = " • ";

impl WatchlistEntry {
    pub fn sanction(
        source: impl Into<String>,
        display_name: impl Into<String>,
        program: impl Into<String>,
        entity_type: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            kind: EntryKind::Sanction,
            display_name: display_name.into(),
            uid: uid.into(),
            source: source.into(),
            extra: program.into(),
            entity_type: entity_type.into(),
            dataset: String::new(),
        }
    }

    pub fn pep(
        source: impl Into<String>,
        display_name: impl Into<String>,
        country: &str,
        role: &str,
        uid: impl Into<String>,
    ) -> Self {
        let country = country.trim();
        let role = role.trim();
        let extra = match (country.is_empty(), role.is_empty()) {
            (false, false) => format!("{country}{EXTRA_SEPARATOR}{role}"),
            (false, true) => country.to_string(),
            (true, false) => role.to_string(),
            (true, true) => String::new(),
        };

        Self {
            kind: EntryKind::Pep,
            display_name: display_name.into(),
            uid: uid.into(),
            source: source.into(),
            extra,
            entity_type: String::new(),
            dataset: String::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }
}

/// Entries produced by one load cycle, in feed order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchlistBatch {
    pub sanctions: Vec<WatchlistEntry>,
    pub peps: Vec<WatchlistEntry>,
}

/// A watchlist entry that scored at or above threshold for one screening call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMatch {
    pub source: String,
    pub uid: String,
    pub display_name: String,
    pub score: f64, // 0.0 to 1.0
    pub extra: String,
}

impl WatchlistMatch {
    pub fn from_entry(entry: &WatchlistEntry, score: f64) -> Self {
        Self {
            source: entry.source.clone(),
            uid: entry.uid.clone(),
            display_name: entry.display_name.clone(),
            score,
            extra: entry.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// HIGH on any sanctions hit, MEDIUM on PEP hits only, LOW otherwise
    pub fn classify(sanction_hits: usize, pep_hits: usize) -> Self {
        if sanction_hits > 0 {
            RiskLevel::High
        } else if pep_hits > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResult {
    pub input_name: String,
    pub sanction_matches: Vec<WatchlistMatch>,
    pub pep_matches: Vec<WatchlistMatch>,
    pub risk: RiskLevel,
}

/// Read-only projection of the currently cached snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStats {
    pub sanctions_count: usize,
    pub peps_count: usize,
    pub last_loaded_epoch_millis: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pep_extra_joins_country_and_role() {
        let e = WatchlistEntry::pep("PEP", "Jane Doe", "NZ", "Minister", "p-1");
        assert_eq!(e.extra, "NZ • Minister");

        let e = WatchlistEntry::pep("PEP", "Jane Doe", "", "Minister", "p-1");
        assert_eq!(e.extra, "Minister");

        let e = WatchlistEntry::pep("PEP", "Jane Doe", "NZ", "  ", "p-1");
        assert_eq!(e.extra, "NZ");

        let e = WatchlistEntry::pep("PEP", "Jane Doe", "", "", "");
        assert_eq!(e.extra, "");
    }

    #[test]
    fn test_risk_classification() {
        assert_eq!(RiskLevel::classify(1, 0), RiskLevel::High);
        assert_eq!(RiskLevel::classify(2, 5), RiskLevel::High);
        assert_eq!(RiskLevel::classify(0, 1), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0, 0), RiskLevel::Low);
    }

    #[test]
    fn test_screen_result_wire_shape() {
        let result = ScreenResult {
            input_name: "Acme".to_string(),
            sanction_matches: vec![WatchlistMatch {
                source: "OFAC:SDN".to_string(),
                uid: "42".to_string(),
                display_name: "ACME".to_string(),
                score: 1.0,
                extra: "SDGT".to_string(),
            }],
            pep_matches: vec![],
            risk: RiskLevel::High,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["inputName"], "Acme");
        assert_eq!(json["risk"], "HIGH");
        assert_eq!(json["sanctionMatches"][0]["displayName"], "ACME");
        assert!(json["pepMatches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_stats_wire_shape() {
        let stats = WatchlistStats {
            sanctions_count: 3,
            peps_count: 1,
            last_loaded_epoch_millis: 1_700_000_000_000,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["sanctionsCount"], 3);
        assert_eq!(json["pepsCount"], 1);
        assert_eq!(json["lastLoadedEpochMillis"], 1_700_000_000_000i64);
    }
}
