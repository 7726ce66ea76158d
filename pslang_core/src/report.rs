//! Per-kind extraction report.
//!
//! Groups the zones of a document by kind, with counts and short previews.
//! This is what the `zones` command of the CLI prints.

use crate::tokenizer::tokenize;
use crate::zone::{Zone, ZoneKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Preview length in characters.
pub const PREVIEW_CHARS: usize = 60;

/// Zones of one kind.
#[derive(Debug, Clone, Serialize)]
pub struct KindSummary {
    pub kind: ZoneKind,
    pub count: usize,
    pub previews: Vec<String>,
}

/// Extraction report for one document.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneReport {
    pub total_zones: usize,
    pub max_depth: usize,
    pub kinds: Vec<KindSummary>,
}

impl ZoneReport {
    /// Tokenizes `text` and builds the report.
    pub fn from_text(text: &str) -> Self {
        Self::from_zones(&tokenize(text))
    }

    /// Builds a report from zones in document order.
    pub fn from_zones(zones: &[Zone]) -> Self {
        let mut grouped: BTreeMap<ZoneKind, Vec<&Zone>> = BTreeMap::new();
        for zone in zones {
            grouped.entry(zone.kind).or_default().push(zone);
        }

        let kinds = grouped
            .into_iter()
            .map(|(kind, zones)| KindSummary {
                kind,
                count: zones.len(),
                previews: zones.iter().map(|z| preview(&z.content)).collect(),
            })
            .collect();

        Self {
            total_zones: zones.len(),
            max_depth: zones.iter().map(|z| z.nesting_depth).max().unwrap_or(0),
            kinds,
        }
    }

    /// Returns the summary for `kind`, if any zone of that kind was found.
    pub fn get(&self, kind: ZoneKind) -> Option<&KindSummary> {
        self.kinds.iter().find(|s| s.kind == kind)
    }
}

/// Collapses whitespace and truncates to [`PREVIEW_CHARS`] characters.
pub fn preview(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_groups_by_kind() {
        let text = "<#. one #.> <. two .> <#. three #.>";
        let report = ZoneReport::from_text(text);
        assert_eq!(report.total_zones, 3);

        let pass = report.get(ZoneKind::PassThrough).unwrap();
        assert_eq!(pass.count, 2);
        assert_eq!(pass.previews, vec!["one", "three"]);
        assert_eq!(report.get(ZoneKind::CurrentAgentOnly).unwrap().count, 1);
        assert!(report.get(ZoneKind::Business).is_none());
    }

    #[test]
    fn test_report_max_depth() {
        let report = ZoneReport::from_text("<#. a <@. b <. c .> @.> #.>");
        assert_eq!(report.max_depth, 2);
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("  a\n\n b\t c "), "a b c");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "ü".repeat(100);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
    }

    #[test]
    fn test_empty_report() {
        let report = ZoneReport::from_text("nothing here");
        assert_eq!(report.total_zones, 0);
        assert_eq!(report.max_depth, 0);
        assert!(report.kinds.is_empty());
    }
}
