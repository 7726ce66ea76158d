//! The zone tokenizer.
//!
//! Scanning happens in two passes:
//!
//! 1. **Lexing**: walk the text once, matching the longest marker literal at
//!    each position via the [`DelimiterTrie`]. Matched markers are consumed
//!    whole.
//! 2. **Pairing**: an explicit stack resolves openers against closers. A
//!    closer pairs with the nearest open marker of the same kind; openers
//!    above it are abandoned. Anything left unpaired stays literal text, so a
//!    malformed annotation never swallows content.
//!
//! An opener that never pairs but has a shorter opener as its prefix is
//! re-lexed as that shorter marker, and both passes run again. So
//! `<.bmw car .>` is a private `<.` zone with content `bmw car `, while
//! `<.bm x .bm>` stays a benchmark zone.
//!
//! Same-kind nesting resolves innermost first:
//!
//! ```text
//! <. a <. b .> c .>
//!      └──────┘        depth 1
//! └───────────────┘    depth 0
//! ```

use crate::delimiters::{DelimiterTrie, Marker, MarkerRole};
use crate::zone::Zone;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// A marker occurrence found by the lexer.
#[derive(Debug, Clone)]
struct Token {
    marker: &'static Marker,
    start: usize,
    end: usize,
    name: Option<String>,
}

/// Stateless zone tokenizer over a delimiter table.
#[derive(Debug)]
pub struct Tokenizer {
    trie: DelimiterTrie,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Creates a tokenizer over the standard delimiter table.
    pub fn new() -> Self {
        Self {
            trie: DelimiterTrie::standard(),
        }
    }

    /// Returns every matched zone in document order.
    ///
    /// An enclosing zone precedes the zones nested inside it.
    pub fn tokenize(&self, text: &str) -> Vec<Zone> {
        // Byte position -> exclusive upper bound on the marker length there
        let mut limits: BTreeMap<usize, usize> = BTreeMap::new();
        let (tokens, pairs) = loop {
            let tokens = self.lex(text, &limits);
            let pairs = pair(&tokens);
            let fallbacks = self.unpaired_fallbacks(text, &tokens, &pairs);
            if fallbacks.is_empty() {
                break (tokens, pairs);
            }
            limits.extend(fallbacks);
        };

        let mut zones: Vec<Zone> = pairs
            .into_iter()
            .map(|(open, close)| {
                let open = &tokens[open];
                let close = &tokens[close];
                Zone {
                    kind: open.marker.kind,
                    start_offset: open.start,
                    end_offset: close.end,
                    raw_delimiter_open: text[open.start..open.end].to_string(),
                    raw_delimiter_close: text[close.start..close.end].to_string(),
                    content: text[open.end..close.start].to_string(),
                    nesting_depth: 0,
                    target_agent: open.name.clone(),
                }
            })
            .collect();

        zones.sort_by(|a, b| {
            a.start_offset
                .cmp(&b.start_offset)
                .then(b.end_offset.cmp(&a.end_offset))
        });
        assign_depths(&mut zones);
        zones
    }

    fn lex(&self, text: &str, limits: &BTreeMap<usize, usize>) -> Vec<Token> {
        let bytes = text.as_bytes();
        let mut tokens = Vec::new();
        let mut pos = 0;

        // Markers are pure ASCII, so byte positions that start a match are
        // always char boundaries.
        while pos < bytes.len() {
            if !self.trie.starts_marker(bytes[pos]) {
                pos += 1;
                continue;
            }
            let limit = limits.get(&pos).copied().unwrap_or(usize::MAX);
            let Some(marker) = self.trie.longest_match_under(bytes, pos, limit) else {
                pos += 1;
                continue;
            };

            let mut end = pos + marker.literal.len();
            let mut name = None;
            if marker.role == MarkerRole::OpenNamed {
                match agent_name_end(bytes, end) {
                    Some(dot) => {
                        name = Some(text[end..dot].to_string());
                        end = dot + 1;
                    }
                    None => {
                        pos += 1;
                        continue;
                    }
                }
            }

            tokens.push(Token {
                marker,
                start: pos,
                end,
                name,
            });
            pos = end;
        }

        tokens
    }

    /// Unpaired openers that have a shorter opener at the same position,
    /// as `(position, length limit)` entries for the next lexing pass.
    fn unpaired_fallbacks(
        &self,
        text: &str,
        tokens: &[Token],
        pairs: &[(usize, usize)],
    ) -> Vec<(usize, usize)> {
        let paired: BTreeSet<usize> = pairs.iter().map(|&(open, _)| open).collect();
        tokens
            .iter()
            .enumerate()
            .filter(|(idx, token)| token.marker.role != MarkerRole::Close && !paired.contains(idx))
            .filter_map(|(_, token)| {
                let limit = token.marker.literal.len();
                self.trie
                    .longest_match_under(text.as_bytes(), token.start, limit)
                    .filter(|shorter| shorter.role != MarkerRole::Close)
                    .map(|_| (token.start, limit))
            })
            .collect()
    }
}

/// Index of the `.` terminating an agent name that starts at `from`.
fn agent_name_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len()
        && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b'_')
    {
        i += 1;
    }
    (i > from && bytes.get(i) == Some(&b'.')).then_some(i)
}

/// Pairs openers and closers, returning `(open, close)` token indices.
fn pair(tokens: &[Token]) -> Vec<(usize, usize)> {
    let mut stack: Vec<usize> = Vec::new();
    let mut pairs = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        match token.marker.role {
            MarkerRole::Open | MarkerRole::OpenNamed => stack.push(idx),
            MarkerRole::Close => {
                let found = stack
                    .iter()
                    .rposition(|&open| tokens[open].marker.kind == token.marker.kind);
                if let Some(depth) = found {
                    pairs.push((stack[depth], idx));
                    // Openers above the match can no longer close without
                    // crossing this zone.
                    stack.truncate(depth);
                }
            }
        }
    }

    pairs
}

/// Fills `nesting_depth`; expects zones sorted by (start asc, end desc).
fn assign_depths(zones: &mut [Zone]) {
    let mut open_ends: Vec<usize> = Vec::new();
    for zone in zones.iter_mut() {
        while open_ends.last().is_some_and(|&end| end <= zone.start_offset) {
            open_ends.pop();
        }
        zone.nesting_depth = open_ends.len();
        open_ends.push(zone.end_offset);
    }
}

fn shared() -> &'static Tokenizer {
    static TOKENIZER: OnceLock<Tokenizer> = OnceLock::new();
    TOKENIZER.get_or_init(Tokenizer::new)
}

/// Tokenizes `text` with the standard delimiter table.
///
/// Re-entrant: calling this on a zone's `content` yields the zones nested
/// inside it, with offsets relative to that content.
pub fn tokenize(text: &str) -> Vec<Zone> {
    shared().tokenize(text)
}
