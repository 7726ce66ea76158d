//! Zone model: kinds, visibility policies and the zone record itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Who may rewrite a zone's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutableBy {
    /// Only the agent currently holding the prompt
    CurrentAgent,
    /// Any agent in the pipeline
    Any,
    /// Read-only for agents
    None,
}

/// Static policy attached to each zone kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// Content may leave the workspace (exports, shared transcripts)
    pub export_ok: bool,
    pub mutable_by: MutableBy,
    /// Visible to consumers that are not in the agent table
    pub default_visible: bool,
}

/// The fixed set of zone kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoneKind {
    /// `<. ... .>` private to the current agent
    CurrentAgentOnly,
    /// `<#. ... #.>` forwarded to the next consumer untouched
    PassThrough,
    /// `<@. ... @.>` scratch area being edited right now
    ActiveWorkspace,
    /// `<~. ... ~.>` maintained by an AI agent
    AiManaged,
    /// `<$. ... $.>` pricing and monetization notes
    Business,
    /// `<?. ... ?.>` open questions for the reader
    Question,
    /// `<.bm ... .bm>` benchmark fixtures
    Benchmark,
    /// `<%. ... %.>`
    Metadata,
    /// `<&. ... &.>`
    Config,
    /// `<!. ... !.>`
    Example,
    /// `<^. ... ^.>`
    System,
    /// `<*name. ... *.>` addressed to one named agent
    AgentNamed,
}

impl ZoneKind {
    /// Every kind, in declaration order.
    pub const ALL: [ZoneKind; 12] = [
        ZoneKind::CurrentAgentOnly,
        ZoneKind::PassThrough,
        ZoneKind::ActiveWorkspace,
        ZoneKind::AiManaged,
        ZoneKind::Business,
        ZoneKind::Question,
        ZoneKind::Benchmark,
        ZoneKind::Metadata,
        ZoneKind::Config,
        ZoneKind::Example,
        ZoneKind::System,
        ZoneKind::AgentNamed,
    ];

    /// Returns the kind name.
    pub fn name(&self) -> &'static str {
        match self {
            ZoneKind::CurrentAgentOnly => "current-agent-only",
            ZoneKind::PassThrough => "pass-through",
            ZoneKind::ActiveWorkspace => "active-workspace",
            ZoneKind::AiManaged => "ai-managed",
            ZoneKind::Business => "business",
            ZoneKind::Question => "question",
            ZoneKind::Benchmark => "benchmark",
            ZoneKind::Metadata => "metadata",
            ZoneKind::Config => "config",
            ZoneKind::Example => "example",
            ZoneKind::System => "system",
            ZoneKind::AgentNamed => "agent-named",
        }
    }

    /// Returns the static visibility policy for this kind.
    pub fn policy(&self) -> VisibilityPolicy {
        let (export_ok, mutable_by, default_visible) = match self {
            ZoneKind::CurrentAgentOnly => (false, MutableBy::CurrentAgent, false),
            ZoneKind::PassThrough => (true, MutableBy::None, true),
            ZoneKind::ActiveWorkspace => (false, MutableBy::Any, false),
            ZoneKind::AiManaged => (true, MutableBy::CurrentAgent, false),
            ZoneKind::Business => (false, MutableBy::None, false),
            ZoneKind::Question => (true, MutableBy::Any, true),
            ZoneKind::Benchmark => (false, MutableBy::None, false),
            ZoneKind::Metadata => (true, MutableBy::None, false),
            ZoneKind::Config => (false, MutableBy::CurrentAgent, false),
            ZoneKind::Example => (true, MutableBy::None, true),
            ZoneKind::System => (false, MutableBy::None, false),
            ZoneKind::AgentNamed => (false, MutableBy::CurrentAgent, false),
        };
        VisibilityPolicy {
            export_ok,
            mutable_by,
            default_visible,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A matched, delimiter-bound region of text.
///
/// Offsets are byte offsets into the scanned string. `end_offset` is
/// exclusive and includes the closing marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub kind: ZoneKind,
    pub start_offset: usize,
    pub end_offset: usize,
    pub raw_delimiter_open: String,
    pub raw_delimiter_close: String,
    /// Raw text between the markers, inner markers included
    pub content: String,
    /// Number of zones strictly containing this one
    pub nesting_depth: usize,
    /// Target of an agent-named zone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_agent: Option<String>,
}

impl Zone {
    /// Full span, markers included.
    pub fn span(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }

    /// Span of `content` within the scanned string.
    pub fn content_range(&self) -> Range<usize> {
        (self.start_offset + self.raw_delimiter_open.len())
            ..(self.end_offset - self.raw_delimiter_close.len())
    }

    /// True if `other` lies strictly inside this zone's content.
    pub fn contains(&self, other: &Zone) -> bool {
        let inner = self.content_range();
        inner.start <= other.start_offset && other.end_offset <= inner.end
    }

    /// Returns the static policy of this zone's kind.
    pub fn policy(&self) -> VisibilityPolicy {
        self.kind.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_unique() {
        let mut names: Vec<_> = ZoneKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ZoneKind::ALL.len());
    }

    #[test]
    fn test_private_kinds_never_export() {
        assert!(!ZoneKind::CurrentAgentOnly.policy().export_ok);
        assert!(!ZoneKind::Business.policy().export_ok);
        assert!(ZoneKind::PassThrough.policy().export_ok);
    }

    #[test]
    fn test_default_visible_kinds() {
        let visible: Vec<_> = ZoneKind::ALL
            .iter()
            .filter(|k| k.policy().default_visible)
            .copied()
            .collect();
        assert_eq!(
            visible,
            vec![ZoneKind::PassThrough, ZoneKind::Question, ZoneKind::Example]
        );
    }

    #[test]
    fn test_zone_ranges() {
        let zone = Zone {
            kind: ZoneKind::PassThrough,
            start_offset: 2,
            end_offset: 12,
            raw_delimiter_open: "<#.".to_string(),
            raw_delimiter_close: "#.>".to_string(),
            content: "abcd".to_string(),
            nesting_depth: 0,
            target_agent: None,
        };
        assert_eq!(zone.span(), 2..12);
        assert_eq!(zone.content_range(), 5..9);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ZoneKind::CurrentAgentOnly).unwrap();
        assert_eq!(json, "\"current-agent-only\"");
    }
}
