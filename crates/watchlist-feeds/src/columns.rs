//! Header resolution for feeds whose column names vary by publisher.
//!
//! Each logical field has an ordered list of candidate headers; the first
//! candidate that is present and non-blank in a row wins.

use csv::ByteRecord;
use std::collections::HashMap;

pub const SANCTION_NAME: &[&str] = &["name", "SDN_Name", "Entity", "Individual", "Last Name"];
pub const SANCTION_PROGRAM: &[&str] = &["program", "Program", "Programs", "Remarks"];
pub const SANCTION_TYPE: &[&str] = &["sdnType", "Type", "SDN_Type", "sdn_type"];
pub const SANCTION_UID: &[&str] = &["uid", "ID", "Unique ID", "sdn_uid", "entity_number"];

pub const PEP_NAME: &[&str] = &["name", "full_name", "caption", "person.name"];
pub const PEP_COUNTRY: &[&str] = &["country", "country_name", "countries"];
pub const PEP_ROLE: &[&str] = &["position", "role", "function"];
pub const PEP_DATASET: &[&str] = &["dataset", "source", "publisher"];
pub const PEP_UID: &[&str] = &["id", "entity_id", "os_id"];

const UTF8_BOM: &str = "\u{feff}";

/// Header name → column position, first occurrence wins
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &ByteRecord) -> Self {
        let mut positions = HashMap::new();
        for (i, raw) in headers.iter().enumerate() {
            let header = String::from_utf8_lossy(raw);
            let header = header.trim_start_matches(UTF8_BOM).trim();
            positions.entry(header.to_string()).or_insert(i);
        }
        Self { positions }
    }

    /// True when at least one candidate header exists
    pub fn has_any(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|c| self.positions.contains_key(*c))
    }

    /// First present-and-non-blank candidate value, trimmed
    pub fn pick(&self, record: &ByteRecord, candidates: &[&str]) -> Option<String> {
        candidates.iter().find_map(|candidate| {
            let pos = *self.positions.get(*candidate)?;
            let value = String::from_utf8_lossy(record.get(pos)?);
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// Like `pick`, defaulting to an empty string
    pub fn pick_or_empty(&self, record: &ByteRecord, candidates: &[&str]) -> String {
        self.pick(record, candidates).unwrap_or_default()
    }
}
