//! Tokenizer and filter behavior on prompts seen from the outside.

use pslang_core::{filter_for_agent, tokenize, ZoneKind, ZoneReport};

#[test]
fn test_round_trip_two_zones() {
    let text = "<@. A @.>  <#. B #.>";
    let zones = tokenize(text);
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[0].kind, ZoneKind::ActiveWorkspace);
    assert_eq!(zones[0].content.trim(), "A");
    assert_eq!(zones[1].kind, ZoneKind::PassThrough);
    assert_eq!(zones[1].content.trim(), "B");

    let hidden = filter_for_agent(text, "none");
    assert!(hidden.visible_text.trim().is_empty());
    assert_eq!(hidden.elided_count, 2);
}

#[test]
fn test_owner_sees_text_without_markers() {
    let text = "Plan: <. secret .> then <#. share #.>.";
    let view = filter_for_agent(text, "owner");
    assert_eq!(view.visible_text, "Plan:  secret  then  share .");
    assert_eq!(view.elided_count, 0);
}

#[test]
fn test_unterminated_marker_stays_literal() {
    let text = "keep <. this text";
    assert!(tokenize(text).is_empty());
    assert_eq!(filter_for_agent(text, "none").visible_text, text);
}

#[test]
fn test_report_over_mixed_prompt() {
    let text = "<.bm run 1 .bm> <$. pricing $.> <?. why? ?.> <.bm run 2 .bm>";
    let report = ZoneReport::from_text(text);
    assert_eq!(report.total_zones, 4);
    assert_eq!(report.get(ZoneKind::Benchmark).unwrap().count, 2);
    assert_eq!(report.get(ZoneKind::Business).unwrap().count, 1);
    assert_eq!(report.get(ZoneKind::Question).unwrap().count, 1);
}

#[test]
fn test_private_zone_with_benchmark_like_opener_stays_private() {
    let text = "<.bmw car .>";
    let zones = tokenize(text);
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].kind, ZoneKind::CurrentAgentOnly);

    let hidden = filter_for_agent(text, "none");
    assert!(!hidden.visible_text.contains("car"));
    assert_eq!(hidden.elided_count, 1);
}
