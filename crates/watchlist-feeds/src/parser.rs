use crate::columns::{self, HeaderIndex};
use screening_core::{EntryKind, ScreeningError, WatchlistEntry};

/// Entries parsed from one feed payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeed {
    pub entries: Vec<WatchlistEntry>,
    /// Rows dropped for a missing name or a malformed record
    pub skipped: usize,
}

/// Parse a CSV feed with a header row into entries of the given kind.
///
/// A payload whose header has none of the name candidates is rejected as a
/// whole; individual bad rows are skipped.
pub fn parse_feed(bytes: &[u8], feed: &str, kind: EntryKind) -> Result<ParsedFeed, ScreeningError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .byte_headers()
        .map_err(|e| ScreeningError::parse(feed, e))?
        .clone();
    let index = HeaderIndex::new(&headers);

    let name_candidates = match kind {
        EntryKind::Sanction => columns::SANCTION_NAME,
        EntryKind::Pep => columns::PEP_NAME,
    };
    if !index.has_any(name_candidates) {
        return Err(ScreeningError::parse(
            feed,
            format!("no name column (expected one of {})", name_candidates.join(", ")),
        ));
    }

    let mut parsed = ParsedFeed::default();
    for (row, result) in reader.byte_records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("{} row {}: skipping malformed record: {}", feed, row + 1, e);
                parsed.skipped += 1;
                continue;
            }
        };

        let entry = match kind {
            EntryKind::Sanction => sanction_row(&index, &record, feed),
            EntryKind::Pep => pep_row(&index, &record, feed),
        };

        match entry {
            Some(entry) => parsed.entries.push(entry),
            None => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

fn sanction_row(index: &HeaderIndex, record: &csv::ByteRecord, feed: &str) -> Option<WatchlistEntry> {
    let name = index.pick(record, columns::SANCTION_NAME)?;
    Some(WatchlistEntry::sanction(
        feed,
        name,
        index.pick_or_empty(record, columns::SANCTION_PROGRAM),
        index.pick_or_empty(record, columns::SANCTION_TYPE),
        index.pick_or_empty(record, columns::SANCTION_UID),
    ))
}

fn pep_row(index: &HeaderIndex, record: &csv::ByteRecord, feed: &str) -> Option<WatchlistEntry> {
    let name = index.pick(record, columns::PEP_NAME)?;
    let entry = WatchlistEntry::pep(
        feed,
        name,
        &index.pick_or_empty(record, columns::PEP_COUNTRY),
        &index.pick_or_empty(record, columns::PEP_ROLE),
        index.pick_or_empty(record, columns::PEP_UID),
    );
    Some(entry.with_dataset(index.pick_or_empty(record, columns::PEP_DATASET)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use screening_core::WatchlistMatch;

    #[test]
    fn test_parse_sanctions() {
        let csv = "uid,SDN_Name,sdnType,Programs\n\
                   36,\"AEROCARIBBEAN AIRLINES\",Entity,CUBA\n\
                   173,  ANGLO-CARIBBEAN CO.  ,,\n\
                   306,,Individual,SDGT\n"; // no name, skipped

        let parsed = parse_feed(csv.as_bytes(), "OFAC:SDN", EntryKind::Sanction).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.entries[0];
        assert_eq!(first.kind, EntryKind::Sanction);
        assert_eq!(first.display_name, "AEROCARIBBEAN AIRLINES");
        assert_eq!(first.uid, "36");
        assert_eq!(first.source, "OFAC:SDN");
        assert_eq!(first.extra, "CUBA");
        assert_eq!(first.entity_type, "Entity");

        let second = &parsed.entries[1];
        assert_eq!(second.display_name, "ANGLO-CARIBBEAN CO.");
        assert_eq!(second.extra, "");
        assert_eq!(second.entity_type, "");
    }

    #[test]
    fn test_parse_sanctions_falls_back_across_name_headers() {
        let csv = "name,Entity,Last Name\n\
                   ,BANCO NACIONAL DE CUBA,\n\
                   ,,CASTRO\n";
        let parsed = parse_feed(csv.as_bytes(), "OFAC:Consolidated", EntryKind::Sanction).unwrap();
        let names: Vec<&str> = parsed.entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["BANCO NACIONAL DE CUBA", "CASTRO"]);
    }

    #[test]
    fn test_parse_peps() {
        let csv = "id,caption,countries,position,dataset\n\
                   Q1,Jane Doe,nz,Minister of Finance,wd_peps\n\
                   Q2,John Roe,,,\n";
        let parsed = parse_feed(csv.as_bytes(), "PEP", EntryKind::Pep).unwrap();
        assert_eq!(parsed.entries.len(), 2);

        let jane = &parsed.entries[0];
        assert_eq!(jane.kind, EntryKind::Pep);
        assert_eq!(jane.uid, "Q1");
        assert_eq!(jane.source, "PEP");
        assert_eq!(jane.dataset, "wd_peps");
        assert_eq!(jane.extra, "nz • Minister of Finance");

        let john = &parsed.entries[1];
        assert_eq!(john.source, "PEP");
        assert_eq!(john.dataset, "");
        assert_eq!(john.extra, "");
    }

    #[test]
    fn test_pep_match_reports_feed_id_not_dataset() {
        let csv = "id,name,dataset,source,publisher
                   Q1,Jane Doe,wd_peps,wikidata,OpenSanctions
";
        let parsed = parse_feed(csv.as_bytes(), "PEP", EntryKind::Pep).unwrap();

        let m = WatchlistMatch::from_entry(&parsed.entries[0], 0.97);
        assert_eq!(m.source, "PEP");
        assert_eq!(m.uid, "Q1");
        assert_eq!(parsed.entries[0].dataset, "wd_peps");
    }

    #[test]
    fn test_ragged_rows_are_tolerated() {
        let csv = "name,program,uid\n\
                   ACME\n\
                   GLOBEX,IRAN,7,unexpected\n";
        let parsed = parse_feed(csv.as_bytes(), "OFAC:SDN", EntryKind::Sanction).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].uid, "");
        assert_eq!(parsed.entries[1].uid, "7");
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut bytes = b"name,uid\n".to_vec();
        bytes.extend_from_slice(b"CAF\xC9 NOIR,1\n");
        let parsed = parse_feed(&bytes, "OFAC:SDN", EntryKind::Sanction).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert!(parsed.entries[0].display_name.starts_with("CAF"));
    }

    #[test]
    fn test_missing_name_column_is_parse_error() {
        let csv = "<html><body>Service Unavailable</body></html>\n";
        let err = parse_feed(csv.as_bytes(), "PEP", EntryKind::Pep).unwrap_err();
        assert!(matches!(err, ScreeningError::FeedParse { ref feed, .. } if feed == "PEP"));
    }

    #[test]
    fn test_empty_payload_is_parse_error() {
        assert!(parse_feed(b"", "OFAC:SDN", EntryKind::Sanction).is_err());
    }

    #[test]
    fn test_header_only_payload_is_empty_feed() {
        let parsed = parse_feed(b"name,uid\n", "OFAC:SDN", EntryKind::Sanction).unwrap();
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.skipped, 0);
    }
}
