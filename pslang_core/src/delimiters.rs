//! Delimiter table and the byte trie used to lex it.
//!
//! Several markers share prefixes (`<.` / `<.bm`, `.>` / `.bm>` / `.#>`),
//! so the lexer always takes the longest literal that matches at a position.

use crate::zone::ZoneKind;
use std::collections::BTreeMap;

/// What a marker does when it is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Open,
    /// Opener followed by `NAME.` (agent-named zones)
    OpenNamed,
    Close,
}

/// One literal marker from the delimiter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub literal: &'static str,
    pub kind: ZoneKind,
    pub role: MarkerRole,
}

const fn open(literal: &'static str, kind: ZoneKind) -> Marker {
    Marker { literal, kind, role: MarkerRole::Open }
}

const fn close(literal: &'static str, kind: ZoneKind) -> Marker {
    Marker { literal, kind, role: MarkerRole::Close }
}

/// The delimiter table.
pub const MARKERS: &[Marker] = &[
    open("<#.", ZoneKind::PassThrough),
    close("#.>", ZoneKind::PassThrough),
    close(".#>", ZoneKind::PassThrough),
    open("<.", ZoneKind::CurrentAgentOnly),
    close(".>", ZoneKind::CurrentAgentOnly),
    open("<@.", ZoneKind::ActiveWorkspace),
    close("@.>", ZoneKind::ActiveWorkspace),
    close(".@>", ZoneKind::ActiveWorkspace),
    open("<~.", ZoneKind::AiManaged),
    close("~.>", ZoneKind::AiManaged),
    open("<$.", ZoneKind::Business),
    close("$.>", ZoneKind::Business),
    open("<?.", ZoneKind::Question),
    close("?.>", ZoneKind::Question),
    open("<.bm", ZoneKind::Benchmark),
    close(".bm>", ZoneKind::Benchmark),
    open("<%.", ZoneKind::Metadata),
    close("%.>", ZoneKind::Metadata),
    open("<&.", ZoneKind::Config),
    close("&.>", ZoneKind::Config),
    open("<!.", ZoneKind::Example),
    close("!.>", ZoneKind::Example),
    open("<^.", ZoneKind::System),
    close("^.>", ZoneKind::System),
    Marker {
        literal: "<*",
        kind: ZoneKind::AgentNamed,
        role: MarkerRole::OpenNamed,
    },
    close("*.>", ZoneKind::AgentNamed),
];

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<u8, usize>,
    terminal: Option<usize>,
}

/// Byte trie over marker literals.
#[derive(Debug)]
pub struct DelimiterTrie {
    nodes: Vec<TrieNode>,
    markers: &'static [Marker],
}

impl DelimiterTrie {
    /// Builds a trie over the given marker table.
    pub fn new(markers: &'static [Marker]) -> Self {
        let mut nodes = vec![TrieNode::default()];
        for (idx, marker) in markers.iter().enumerate() {
            let mut node = 0;
            for byte in marker.literal.bytes() {
                node = match nodes[node].children.get(&byte) {
                    Some(&next) => next,
                    None => {
                        nodes.push(TrieNode::default());
                        let next = nodes.len() - 1;
                        nodes[node].children.insert(byte, next);
                        next
                    }
                };
            }
            nodes[node].terminal = Some(idx);
        }
        Self { nodes, markers }
    }

    /// Builds the trie over [`MARKERS`].
    pub fn standard() -> Self {
        Self::new(MARKERS)
    }

    /// Longest marker that matches `bytes` at `pos`.
    pub fn longest_match(&self, bytes: &[u8], pos: usize) -> Option<&'static Marker> {
        self.longest_match_under(bytes, pos, usize::MAX)
    }

    /// Longest marker shorter than `limit` bytes that matches at `pos`.
    pub fn longest_match_under(
        &self,
        bytes: &[u8],
        pos: usize,
        limit: usize,
    ) -> Option<&'static Marker> {
        let markers: &'static [Marker] = self.markers;
        let mut node = 0;
        let mut best = None;
        for (len, byte) in bytes.get(pos..)?.iter().enumerate() {
            if len + 1 >= limit {
                break;
            }
            match self.nodes[node].children.get(byte) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(idx) = self.nodes[node].terminal {
                best = Some(&markers[idx]);
            }
        }
        best
    }

    /// True if some marker starts with `byte`.
    pub fn starts_marker(&self, byte: u8) -> bool {
        self.nodes[0].children.contains_key(&byte)
    }
}
