use super::patterns::{NODE_END, NODE_START};
use crate::error::ParseWarning;
use ahash::{AHashMap, AHashSet};

/// The source text between one matched pair of boundary comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Block<'s> {
    pub id: &'s str,
    pub body: &'s str,
}

/// Locates every `# @@NODE_START:<id>@@` ... `# @@NODE_END:<id>@@` region.
///
/// Each start is paired with the first end marker for the same id after it.
/// End positions are indexed once up front, so scanning stays linear in the
/// source length even when markers are missing. Starts nested inside an
/// already matched region are ignored.
pub(super) fn scan_blocks(source: &str) -> (Vec<Block<'_>>, Vec<ParseWarning>) {
    let mut ends: AHashMap<&str, Vec<(usize, usize)>> = AHashMap::new();
    for caps in NODE_END.captures_iter(source) {
        if let (Some(marker), Some(id)) = (caps.get(0), caps.get(1)) {
            ends.entry(id.as_str())
                .or_default()
                .push((marker.start(), marker.end()));
        }
    }

    let mut blocks = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = AHashSet::new();
    let mut consumed_until = 0;

    for caps in NODE_START.captures_iter(source) {
        let (Some(marker), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if marker.start() < consumed_until {
            continue;
        }
        let id = id.as_str();

        let end = ends.get(id).and_then(|positions| {
            // positions are ascending; find the first end after this start
            let index = positions.partition_point(|(start, _)| *start < marker.end());
            positions.get(index).copied()
        });
        let Some((end_start, end_end)) = end else {
            tracing::warn!("[tgflow] Block '{}' has no end marker; skipping it", id);
            warnings.push(ParseWarning::UnterminatedBlock(id.to_string()));
            continue;
        };
        consumed_until = end_end;

        if !seen.insert(id) {
            tracing::warn!("[tgflow] Block '{}' appears more than once; keeping the first", id);
            warnings.push(ParseWarning::DuplicateBlock(id.to_string()));
            continue;
        }

        blocks.push(Block {
            id,
            body: &source[marker.end()..end_start],
        });
    }

    (blocks, warnings)
}
