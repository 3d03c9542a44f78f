//! Search-to-offset resolution.
//!
//! Invalid queries never move the viewport. The outcome says why a query
//! was ignored so a host can choose to give feedback.

use super::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; the viewport stays where it is
    Empty,
    NotANumber,
    OutOfRange,
    /// The viewport now starts at the row containing `number`
    Found { number: usize, offset: usize },
    /// `number` exists but no column-aligned window at this zoom shows it;
    /// the viewport moved as close as it can
    OutOfView { number: usize, offset: usize },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

/// Parse a query into a ticket number within `0..ticket_count`.
pub fn parse_query(text: &str, ticket_count: usize) -> Result<Option<usize>, SearchOutcome> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let n: i64 = text.parse().map_err(|_| SearchOutcome::NotANumber)?;
    if n < 0 {
        return Err(SearchOutcome::OutOfRange);
    }
    match usize::try_from(n) {
        Ok(number) if number < ticket_count => Ok(Some(number)),
        _ => Err(SearchOutcome::OutOfRange),
    }
}

/// Resolve `text` and move the viewport when it names a ticket.
pub fn resolve_search(text: &str, viewport: &mut Viewport) -> SearchOutcome {
    match parse_query(text, viewport.ticket_count()) {
        Ok(None) => SearchOutcome::Empty,
        Ok(Some(number)) => {
            viewport.jump_to(number);
            let offset = viewport.offset();
            if viewport.visible_range().contains(&number) {
                SearchOutcome::Found { number, offset }
            } else {
                SearchOutcome::OutOfView { number, offset }
            }
        }
        Err(outcome) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::zoom::ZoomLevel;

    fn viewport(count: usize, level: u8) -> Viewport {
        Viewport::new(count, ZoomLevel::new(level).unwrap())
    }

    #[test]
    fn test_search_moves_to_row_start() {
        let mut vp = viewport(1_000, 3);
        let outcome = resolve_search("742", &mut vp);
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                number: 742,
                offset: 735
            }
        );
        assert_eq!(vp.offset(), 735);
    }

    #[test]
    fn test_search_past_last_window_is_not_found() {
        let mut vp = viewport(1_000, 3);
        let outcome = resolve_search("995", &mut vp);
        assert_eq!(
            outcome,
            SearchOutcome::OutOfView {
                number: 995,
                offset: 840
            }
        );
        assert!(!outcome.is_found());
        assert_eq!(vp.visible_range(), 840..990);

        // Paging cannot reach it either
        for _ in 0..200 {
            vp.page_forward();
        }
        assert!(!vp.visible_range().contains(&995));

        // A sparser zoom can
        let mut vp = viewport(1_000, 2);
        assert!(resolve_search("995", &mut vp).is_found());
        assert!(vp.visible_range().contains(&995));
    }

    #[test]
    fn test_search_ignores_empty_input() {
        let mut vp = viewport(1_000, 3);
        vp.page_forward();
        assert_eq!(resolve_search("   ", &mut vp), SearchOutcome::Empty);
        assert_eq!(vp.offset(), 15);
    }

    #[test]
    fn test_search_ignores_invalid_input() {
        let mut vp = viewport(1_000, 3);
        vp.page_forward();
        for (query, expected) in [
            ("abc", SearchOutcome::NotANumber),
            ("12.5", SearchOutcome::NotANumber),
            ("-1", SearchOutcome::OutOfRange),
            ("1000", SearchOutcome::OutOfRange),
            ("99999999999999999999999", SearchOutcome::NotANumber),
        ] {
            assert_eq!(resolve_search(query, &mut vp), expected, "query {query:?}");
            assert_eq!(vp.offset(), 15);
        }
    }

    #[test]
    fn test_search_trims_whitespace() {
        let mut vp = viewport(100, 1);
        assert!(resolve_search(" 42 ", &mut vp).is_found());
        assert_eq!(vp.offset(), 40);
    }

    #[test]
    fn test_parse_query_bounds() {
        assert_eq!(parse_query("0", 1), Ok(Some(0)));
        assert_eq!(parse_query("1", 1), Err(SearchOutcome::OutOfRange));
        assert_eq!(parse_query("", 0), Ok(None));
    }
}
