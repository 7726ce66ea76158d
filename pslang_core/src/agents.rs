//! Agent permission table.
//!
//! An agent is only an id. What it may see is a pure function of that id,
//! looked up in a static table; nothing is stored per instance.

use crate::zone::{Zone, ZoneKind};
use serde::Serialize;
use std::collections::BTreeSet;

/// Id that sees nothing at all.
pub const NO_ACCESS_AGENT: &str = "none";

/// Id with every kind permitted.
pub const OWNER_AGENT: &str = "owner";

/// Resolved permissions for one agent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentProfile {
    /// Normalized id (trimmed, ASCII lowercase)
    pub id: String,
    pub kinds: BTreeSet<ZoneKind>,
    /// False when the id fell through to the default view
    pub known: bool,
}

impl AgentProfile {
    /// Resolves an agent id against the permission table.
    ///
    /// Unknown ids get the most restrictive default: only kinds whose policy
    /// is `default_visible`.
    pub fn resolve(agent_id: &str) -> Self {
        let id = agent_id.trim().to_ascii_lowercase();
        let (kinds, known) = match id.as_str() {
            "owner" | "editor" => (ZoneKind::ALL.iter().copied().collect(), true),
            "current-agent" | "primary" => (
                ZoneKind::ALL
                    .iter()
                    .copied()
                    .filter(|k| !matches!(k, ZoneKind::Business | ZoneKind::AgentNamed))
                    .collect(),
                true,
            ),
            "downstream" | "pass-through" => (
                [
                    ZoneKind::PassThrough,
                    ZoneKind::AiManaged,
                    ZoneKind::Question,
                    ZoneKind::Example,
                    ZoneKind::Metadata,
                ]
                .into_iter()
                .collect(),
                true,
            ),
            "export" | "public" => (kinds_where(|k| k.policy().export_ok), true),
            "benchmark-runner" => (
                [
                    ZoneKind::PassThrough,
                    ZoneKind::Benchmark,
                    ZoneKind::Example,
                    ZoneKind::Metadata,
                ]
                .into_iter()
                .collect(),
                true,
            ),
            NO_ACCESS_AGENT => (BTreeSet::new(), true),
            _ => (kinds_where(|k| k.policy().default_visible), false),
        };
        Self { id, kinds, known }
    }

    /// True if this agent may see `zone`.
    ///
    /// Agent-named zones are also visible to the agent they name.
    pub fn permits(&self, zone: &Zone) -> bool {
        if self.kinds.contains(&zone.kind) {
            return true;
        }
        zone.kind == ZoneKind::AgentNamed
            && zone
                .target_agent
                .as_deref()
                .is_some_and(|target| target.eq_ignore_ascii_case(&self.id))
    }

    /// True if every kind is permitted.
    pub fn sees_everything(&self) -> bool {
        self.kinds.len() == ZoneKind::ALL.len()
    }
}

fn kinds_where(pred: impl Fn(&ZoneKind) -> bool) -> BTreeSet<ZoneKind> {
    ZoneKind::ALL.iter().copied().filter(|k| pred(k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_zone(target: &str) -> Zone {
        Zone {
            kind: ZoneKind::AgentNamed,
            start_offset: 0,
            end_offset: 10,
            raw_delimiter_open: format!("<*{}.", target),
            raw_delimiter_close: "*.>".to_string(),
            content: String::new(),
            nesting_depth: 0,
            target_agent: Some(target.to_string()),
        }
    }

    #[test]
    fn test_owner_sees_everything() {
        let owner = AgentProfile::resolve(OWNER_AGENT);
        assert!(owner.known);
        assert!(owner.sees_everything());
    }

    #[test]
    fn test_none_sees_nothing() {
        let none = AgentProfile::resolve(NO_ACCESS_AGENT);
        assert!(none.known);
        assert!(none.kinds.is_empty());
        assert!(!none.permits(&named_zone("someone")));
    }

    #[test]
    fn test_unknown_agent_gets_default_view() {
        let stranger = AgentProfile::resolve("mystery-bot");
        assert!(!stranger.known);
        assert_eq!(
            stranger.kinds,
            [ZoneKind::PassThrough, ZoneKind::Question, ZoneKind::Example]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_ids_are_normalized() {
        let a = AgentProfile::resolve("  Current-Agent ");
        assert_eq!(a.id, "current-agent");
        assert!(a.known);
        assert!(!a.kinds.contains(&ZoneKind::Business));
    }

    #[test]
    fn test_export_agent_matches_policy() {
        let export = AgentProfile::resolve("export");
        for kind in ZoneKind::ALL {
            assert_eq!(export.kinds.contains(&kind), kind.policy().export_ok);
        }
    }

    #[test]
    fn test_named_zone_visible_to_its_target() {
        let reviewer = AgentProfile::resolve("reviewer");
        assert!(reviewer.permits(&named_zone("Reviewer")));
        assert!(!reviewer.permits(&named_zone("planner")));
        assert!(AgentProfile::resolve(OWNER_AGENT).permits(&named_zone("planner")));
    }
}
