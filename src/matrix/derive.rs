//! Environments computed from Chrome rather than tested directly.

use crate::core::compat::CompatRecord;
use crate::core::electron::ElectronTable;
use crate::core::version::VersionToken;

/// Opera version shipping the same engine as a Chrome version.
///
/// Opera moved to Blink at Chrome 28 (Opera 15) and trails Chrome by 13
/// majors from there; Chrome 5 lines up with Presto-era Opera 12.
pub fn opera_for_chrome(chrome: f64) -> Option<f64> {
    if chrome >= 28.0 {
        Some(chrome - 13.0)
    } else if chrome == 5.0 {
        Some(12.0)
    } else {
        None
    }
}

/// Add `opera` and `electron` entries derived from a numeric `chrome` entry.
///
/// A directly scored `opera` entry survives when no derivation applies.
pub fn add_derived_environments(record: &mut CompatRecord, electron: &ElectronTable) {
    let Some(chrome) = record.get("chrome").and_then(VersionToken::as_number) else {
        return;
    };

    if let Some(opera) = opera_for_chrome(chrome) {
        record.insert("opera", VersionToken::Number(opera));
    }

    if let Some(release) = electron.electron_for_chromium(chrome) {
        record.insert("electron", VersionToken::Number(release));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opera_offsets() {
        assert_eq!(opera_for_chrome(28.0), Some(15.0));
        assert_eq!(opera_for_chrome(51.0), Some(38.0));
        assert_eq!(opera_for_chrome(5.0), Some(12.0));
        assert_eq!(opera_for_chrome(27.0), None);
    }

    #[test]
    fn test_derived_entries_added() {
        let table = ElectronTable::from_pairs([("1.2", "51"), ("1.0", "49")]).unwrap();
        let mut record: CompatRecord = [("chrome", VersionToken::Number(49.0))].into_iter().collect();

        add_derived_environments(&mut record, &table);
        assert_eq!(record.get("opera"), Some(&VersionToken::Number(36.0)));
        assert_eq!(record.get("electron"), Some(&VersionToken::Number(1.0)));
    }

    #[test]
    fn test_no_chrome_no_derivation() {
        let table = ElectronTable::from_pairs([("1.0", "49")]).unwrap();
        let mut record: CompatRecord = [("opera", VersionToken::Number(10.5))].into_iter().collect();

        add_derived_environments(&mut record, &table);
        assert_eq!(record.get("opera"), Some(&VersionToken::Number(10.5)));
        assert_eq!(record.get("electron"), None);
    }

    #[test]
    fn test_scored_opera_kept_when_chrome_too_old() {
        let table = ElectronTable::from_pairs([("1.0", "49")]).unwrap();
        let mut record: CompatRecord = [
            ("chrome", VersionToken::Number(21.0)),
            ("opera", VersionToken::Number(12.1)),
        ]
        .into_iter()
        .collect();

        add_derived_environments(&mut record, &table);
        assert_eq!(record.get("opera"), Some(&VersionToken::Number(12.1)));
        assert_eq!(record.get("electron"), Some(&VersionToken::Number(1.0)));
    }
}
