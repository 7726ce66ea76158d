//! Visibility filter: agent-scoped views of annotated text.

use crate::agents::AgentProfile;
use crate::tokenizer::tokenize;
use crate::zone::Zone;
use serde::Serialize;

/// Result of filtering text for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    /// Reconstructed prose with markers stripped and hidden zones removed
    pub visible_text: String,
    /// Every zone found in the input, for highlighting
    pub zones: Vec<Zone>,
    /// Zones absent from `visible_text`, nested ones included
    pub elided_count: usize,
}

/// Filters `text` for `agent_id`.
///
/// Never fails. Hidden zones are cut out whole (markers included); visible
/// zones keep their content minus the markers, and zones nested inside them
/// are filtered in turn. Nothing outside a removed span is touched, so no
/// whitespace is added or collapsed.
pub fn filter_for_agent(text: &str, agent_id: &str) -> FilterResult {
    let agent = AgentProfile::resolve(agent_id);
    filter_with_profile(text, &agent)
}

/// Filters `text` for an already resolved agent.
pub fn filter_with_profile(text: &str, agent: &AgentProfile) -> FilterResult {
    let zones = tokenize(text);
    if zones.is_empty() {
        return FilterResult {
            visible_text: text.to_string(),
            zones,
            elided_count: 0,
        };
    }

    let mut out = String::with_capacity(text.len());
    let mut elided = 0;
    render(text, 0..text.len(), &zones, agent, &mut out, &mut elided);

    FilterResult {
        visible_text: out,
        zones,
        elided_count: elided,
    }
}

/// Appends the visible rendering of `text[range]` to `out`.
///
/// `zones` must be the zones lying inside `range`, in document order.
fn render(
    text: &str,
    range: std::ops::Range<usize>,
    zones: &[Zone],
    agent: &AgentProfile,
    out: &mut String,
    elided: &mut usize,
) {
    let mut cursor = range.start;
    let mut i = 0;

    while i < zones.len() {
        let zone = &zones[i];
        // Zones nested in this one follow it directly in document order.
        let nested_end = zones[i + 1..]
            .iter()
            .position(|z| z.start_offset >= zone.end_offset)
            .map_or(zones.len(), |p| i + 1 + p);
        let nested = &zones[i + 1..nested_end];

        out.push_str(&text[cursor..zone.start_offset]);
        if agent.permits(zone) {
            render(text, zone.content_range(), nested, agent, out, elided);
        } else {
            *elided += 1 + nested.len();
        }

        cursor = zone.end_offset;
        i = nested_end;
    }

    out.push_str(&text[cursor..range.end]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{NO_ACCESS_AGENT, OWNER_AGENT};
    use proptest::prelude::*;

    #[test]
    fn test_no_zones_returns_input() {
        let result = filter_for_agent("just text", "anyone");
        assert_eq!(
            result,
            FilterResult {
                visible_text: "just text".to_string(),
                zones: vec![],
                elided_count: 0,
            }
        );
    }

    #[test]
    fn test_no_access_agent_leaves_whitespace_only() {
        let result = filter_for_agent("<@. A @.>  <#. B #.>", NO_ACCESS_AGENT);
        assert!(result.visible_text.trim().is_empty());
        assert_eq!(result.visible_text, "  ");
        assert_eq!(result.elided_count, 2);
        assert_eq!(result.zones.len(), 2);
    }

    #[test]
    fn test_owner_strips_markers_only() {
        let result = filter_for_agent("Intro <@. A @.> and <#. B #.>.", OWNER_AGENT);
        assert_eq!(result.visible_text, "Intro  A  and  B .");
        assert_eq!(result.elided_count, 0);
    }

    #[test]
    fn test_unknown_agent_sees_default_visible_only() {
        let text = "<#. shared #.>|<. secret .>|<?. why? ?.>";
        let result = filter_for_agent(text, "stranger");
        assert_eq!(result.visible_text, " shared || why? ");
        assert_eq!(result.elided_count, 1);
    }

    #[test]
    fn test_hidden_outer_zone_hides_nested() {
        let text = "a <. x <#. y #.> z .> b";
        let result = filter_for_agent(text, "downstream");
        assert_eq!(result.visible_text, "a  b");
        assert_eq!(result.elided_count, 2);
    }

    #[test]
    fn test_visible_outer_zone_filters_nested() {
        let text = "a <#. x <. y .> z #.> b";
        let result = filter_for_agent(text, "downstream");
        assert_eq!(result.visible_text, "a  x  z  b");
        assert_eq!(result.elided_count, 1);
    }

    #[test]
    fn test_adjacent_elided_zones_keep_source_whitespace() {
        let text = "one <$. a $.><$. b $.> two";
        let result = filter_for_agent(text, "public");
        assert_eq!(result.visible_text, "one  two");
    }

    #[test]
    fn test_malformed_markers_survive_filtering() {
        let text = "keep <. this and .# that";
        let result = filter_for_agent(text, NO_ACCESS_AGENT);
        assert_eq!(result.visible_text, text);
        assert_eq!(result.elided_count, 0);
    }

    #[test]
    fn test_private_zone_opened_like_benchmark_is_hidden() {
        let result = filter_for_agent("ask <.bmw car .> done", "stranger");
        assert_eq!(result.visible_text, "ask  done");
        assert!(!result.visible_text.contains("car"));
        assert_eq!(result.elided_count, 1);
    }

    #[test]
    fn test_named_zone_for_target_agent() {
        let text = "<*planner. plan *.><*coder. code *.>";
        let result = filter_for_agent(text, "coder");
        assert_eq!(result.visible_text, " code ");
        assert_eq!(result.elided_count, 1);
    }

    /// Removes every matched marker, keeping all content.
    fn strip_markers(text: &str) -> String {
        let zones = tokenize(text);
        let mut cut: Vec<std::ops::Range<usize>> = Vec::new();
        for zone in &zones {
            let inner = zone.content_range();
            cut.push(zone.start_offset..inner.start);
            cut.push(inner.end..zone.end_offset);
        }
        cut.sort_by_key(|r| r.start);
        let mut out = String::new();
        let mut cursor = 0;
        for r in cut {
            out.push_str(&text[cursor..r.start]);
            cursor = r.end;
        }
        out.push_str(&text[cursor..]);
        out
    }

    proptest! {
        #[test]
        fn prop_owner_view_is_text_without_markers(
            text in prop::collection::vec(
                prop::sample::select(vec![
                    "<.", ".>", "<#.", "#.>", "<~.", "~.>", "<.bm", ".bm>", "<*ops.", "*.>",
                    "word", " ", "\t", "ü", ".", "<",
                ]),
                0..40,
            ).prop_map(|v| v.concat())
        ) {
            let result = filter_for_agent(&text, OWNER_AGENT);
            prop_assert_eq!(result.visible_text, strip_markers(&text));
            prop_assert_eq!(result.elided_count, 0);
        }

        #[test]
        fn prop_filter_never_grows_text(text in "[a-z <>.#@~$?*]{0,64}", agent in "[a-z-]{0,12}") {
            let result = filter_for_agent(&text, &agent);
            prop_assert!(result.visible_text.len() <= text.len());
            prop_assert!(result.elided_count <= result.zones.len());
        }
    }
}
