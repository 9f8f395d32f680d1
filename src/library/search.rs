use crate::player::Track;

/// Fuzzy/subsequence match: return the character positions in `text`
/// that match `query` (case-insensitive), or `None` if not matched.
pub fn fuzzy_match_positions(text: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut text_iter = text.chars().enumerate();

    for qc in query.chars().flat_map(char::to_lowercase) {
        loop {
            match text_iter.next() {
                Some((ti, tc)) if tc.to_lowercase().eq(std::iter::once(qc)) => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}

/// Indices of the tracks whose "Artist - Title" matches `query`, in catalog
/// order. A blank query matches everything.
pub fn search(tracks: &[Track], query: &str) -> Vec<usize> {
    let query = query.trim();
    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| fuzzy_match_positions(&t.display(), query).is_some())
        .map(|(i, _)| i)
        .collect()
}
