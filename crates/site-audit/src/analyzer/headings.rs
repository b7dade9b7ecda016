//! Heading inventory and hierarchy check.

use crate::types::HeadingFacts;

/// Whether heading levels, in document order, nest without skipping.
///
/// The first heading sets the starting level. After that a heading may go
/// any number of levels back up (H3 to H1) but only one level deeper than
/// its predecessor (H2 to H3, not H2 to H4).
pub fn is_hierarchy_valid(levels: &[u8]) -> bool {
    let mut previous: Option<u8> = None;
    for &level in levels {
        if let Some(prev) = previous {
            if level > prev + 1 {
                return false;
            }
        }
        previous = Some(level);
    }
    true
}

/// Build heading facts from `(level, text)` pairs in document order.
pub fn heading_facts(headings: &[(u8, String)]) -> HeadingFacts {
    let mut level_counts = [0u32; 6];
    for (level, _) in headings {
        if (1..=6).contains(level) {
            level_counts[usize::from(*level - 1)] += 1;
        }
    }
    let h1_texts: Vec<String> = headings
        .iter()
        .filter(|(level, _)| *level == 1)
        .map(|(_, text)| text.clone())
        .collect();
    let levels: Vec<u8> = headings.iter().map(|(level, _)| *level).collect();

    HeadingFacts {
        h1_count: level_counts[0],
        missing_h1: level_counts[0] == 0,
        h1_texts,
        hierarchy_valid: is_hierarchy_valid(&levels),
        level_counts,
    }
}
