//! Raffle listings: filtering, sorting and aggregate stats.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::Serialize;

use crate::error::RifaError;
use crate::types::{DrawMode, Raffle, RaffleStatus, RaffleType};

/// Sort order for the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Most recently created first; raffles without a date go last
    #[default]
    Newest,
    /// Highest prize first
    Prize,
    /// Most tickets sold first
    Tickets,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Newest => write!(f, "newest"),
            SortBy::Prize => write!(f, "prize"),
            SortBy::Tickets => write!(f, "tickets"),
        }
    }
}

impl FromStr for SortBy {
    type Err = RifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "new" => Ok(SortBy::Newest),
            "prize" => Ok(SortBy::Prize),
            "tickets" | "sold" => Ok(SortBy::Tickets),
            _ => Err(RifaError::Other(format!(
                "invalid sort '{s}'. Must be one of: newest, prize, tickets"
            ))),
        }
    }
}

/// Quick filters of the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeFilter {
    #[default]
    All,
    Active,
    /// Active and featured
    Featured,
}

impl fmt::Display for HomeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomeFilter::All => write!(f, "all"),
            HomeFilter::Active => write!(f, "active"),
            HomeFilter::Featured => write!(f, "featured"),
        }
    }
}

impl FromStr for HomeFilter {
    type Err = RifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(HomeFilter::All),
            "active" => Ok(HomeFilter::Active),
            "featured" => Ok(HomeFilter::Featured),
            _ => Err(RifaError::Other(format!(
                "invalid filter '{s}'. Must be one of: all, active, featured"
            ))),
        }
    }
}

/// Catalog filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub raffle_type: Option<RaffleType>,
    pub status: Option<RaffleStatus>,
    pub draw_mode: Option<DrawMode>,
    pub search: Option<String>,
}

impl CatalogFilter {
    /// Drafts never show up in the catalog.
    pub fn matches(&self, raffle: &Raffle) -> bool {
        raffle.status != RaffleStatus::Draft
            && self.raffle_type.is_none_or(|t| raffle.raffle_type == t)
            && self.status.is_none_or(|s| raffle.status == s)
            && self.draw_mode.is_none_or(|m| raffle.draw_mode == m)
            && matches_search(raffle, self.search.as_deref())
    }
}

impl HomeFilter {
    pub fn matches(self, raffle: &Raffle) -> bool {
        match self {
            HomeFilter::All => true,
            HomeFilter::Active => raffle.status == RaffleStatus::Active,
            HomeFilter::Featured => raffle.status == RaffleStatus::Active && raffle.featured,
        }
    }
}

/// Case-insensitive substring match over title and description.
///
/// A blank term matches everything.
pub fn matches_search(raffle: &Raffle, term: Option<&str>) -> bool {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let term = term.to_lowercase();
    raffle
        .title
        .as_deref()
        .is_some_and(|title| title.to_lowercase().contains(&term))
        || raffle.description.to_lowercase().contains(&term)
}

/// Catalog view: filter, then sort.
pub fn filter_and_sort<'a>(
    raffles: &'a [Raffle],
    filter: &CatalogFilter,
    sort: SortBy,
) -> Vec<&'a Raffle> {
    let mut result: Vec<&Raffle> = raffles.iter().filter(|r| filter.matches(r)).collect();
    sort_raffles(&mut result, sort);
    result
}

/// Landing page view: quick filter plus search, in API order.
pub fn filter_home<'a>(
    raffles: &'a [Raffle],
    filter: HomeFilter,
    search: Option<&str>,
) -> Vec<&'a Raffle> {
    raffles
        .iter()
        .filter(|r| filter.matches(r) && matches_search(r, search))
        .collect()
}

/// Stable sort; ties keep their API order.
pub fn sort_raffles(raffles: &mut [&Raffle], sort: SortBy) {
    match sort {
        SortBy::Newest => raffles.sort_by(|a, b| compare_newest(created_at(a), created_at(b))),
        SortBy::Prize => raffles.sort_by(|a, b| b.prize_value.total_cmp(&a.prize_value)),
        SortBy::Tickets => raffles.sort_by_key(|r| std::cmp::Reverse(r.sold_count())),
    }
}

fn created_at(raffle: &Raffle) -> Option<Timestamp> {
    raffle.created_at.as_deref()?.parse().ok()
}

fn compare_newest(a: Option<Timestamp>, b: Option<Timestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Share of tickets sold, 0 to 100. Empty raffles report 0.
pub fn progress_percent(raffle: &Raffle) -> f64 {
    if raffle.ticket_count() == 0 {
        return 0.0;
    }
    raffle.sold_count() as f64 / raffle.ticket_count() as f64 * 100.0
}

/// Totals over the active raffles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaffleStats {
    pub active_raffles: usize,
    /// Main plus second prize of every active raffle
    pub total_prize_value: f64,
    pub total_tickets: usize,
    pub sold_tickets: usize,
}

pub fn compute_stats(raffles: &[Raffle]) -> RaffleStats {
    raffles
        .iter()
        .filter(|r| r.status == RaffleStatus::Active)
        .fold(RaffleStats::default(), |mut stats, r| {
            stats.active_raffles += 1;
            stats.total_prize_value += r.prize_value + r.second_prize_value.unwrap_or(0.0);
            stats.total_tickets += r.ticket_count();
            stats.sold_tickets += r.sold_count();
            stats
        })
}

pub fn status_label(status: RaffleStatus) -> &'static str {
    match status {
        RaffleStatus::Active => "Active",
        RaffleStatus::Draft => "Draft",
        RaffleStatus::Finished => "Finished",
        RaffleStatus::Cancelled => "Cancelled",
        RaffleStatus::Closed => "Closed",
        // Unknown statuses are shown like drafts
        RaffleStatus::Unknown => "Draft",
    }
}

pub fn type_label(raffle_type: RaffleType) -> &'static str {
    match raffle_type {
        RaffleType::Small => "100 tickets",
        RaffleType::Medium => "1K tickets",
        RaffleType::Large => "10K tickets",
    }
}

pub fn draw_mode_label(mode: DrawMode) -> &'static str {
    match mode {
        DrawMode::AppDraw => "App draw",
        DrawMode::ColombianLottery => "Colombian lottery",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raffle(id: &str, status: RaffleStatus) -> Raffle {
        Raffle {
            id: id.to_string(),
            description: format!("Raffle {id}"),
            ticket_price: 1.0,
            tickets: vec![false; 100],
            status,
            ..Default::default()
        }
    }

    fn ids(raffles: &[&Raffle]) -> Vec<String> {
        raffles.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_drafts_are_hidden_from_catalog() {
        let raffles = vec![
            raffle("a", RaffleStatus::Draft),
            raffle("b", RaffleStatus::Active),
            raffle("c", RaffleStatus::Finished),
        ];
        let result = filter_and_sort(&raffles, &CatalogFilter::default(), SortBy::Prize);
        assert_eq!(ids(&result), vec!["b", "c"]);

        let filter = CatalogFilter {
            status: Some(RaffleStatus::Draft),
            ..Default::default()
        };
        assert!(filter_and_sort(&raffles, &filter, SortBy::Newest).is_empty());
    }

    #[test]
    fn test_type_and_draw_mode_filters() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.raffle_type = RaffleType::Large;
        a.draw_mode = DrawMode::ColombianLottery;
        let b = raffle("b", RaffleStatus::Active);
        let raffles = vec![a, b];

        let filter = CatalogFilter {
            raffle_type: Some(RaffleType::Large),
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&raffles, &filter, SortBy::Newest)), vec!["a"]);

        let filter = CatalogFilter {
            draw_mode: Some(DrawMode::AppDraw),
            ..Default::default()
        };
        assert_eq!(ids(&filter_and_sort(&raffles, &filter, SortBy::Newest)), vec!["b"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.title = Some("Moto Yamaha".to_string());
        let mut b = raffle("b", RaffleStatus::Active);
        b.description = "Viaje a CARTAGENA".to_string();
        let raffles = vec![a, b];

        let search = |term: &str| {
            let filter = CatalogFilter {
                search: Some(term.to_string()),
                ..Default::default()
            };
            ids(&filter_and_sort(&raffles, &filter, SortBy::Newest))
        };
        assert_eq!(search("yamaha"), vec!["a"]);
        assert_eq!(search("cartagena"), vec!["b"]);
        assert_eq!(search("   "), vec!["a", "b"]);
        assert!(search("bicicleta").is_empty());
    }

    #[test]
    fn test_sort_newest_puts_missing_dates_last() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.created_at = Some("2024-01-01T00:00:00Z".to_string());
        let b = raffle("b", RaffleStatus::Active);
        let mut c = raffle("c", RaffleStatus::Active);
        c.created_at = Some("2024-06-01T10:30:00.000Z".to_string());
        let mut d = raffle("d", RaffleStatus::Active);
        d.created_at = Some("yesterday".to_string());
        let raffles = vec![a, b, c, d];

        let result = filter_and_sort(&raffles, &CatalogFilter::default(), SortBy::Newest);
        assert_eq!(ids(&result), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_sort_by_prize_and_tickets() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.prize_value = 100.0;
        a.tickets[0] = true;
        let mut b = raffle("b", RaffleStatus::Active);
        b.prize_value = 5_000.0;
        let mut c = raffle("c", RaffleStatus::Active);
        c.prize_value = 300.0;
        c.tickets[0] = true;
        c.tickets[1] = true;
        let raffles = vec![a, b, c];

        let by_prize = filter_and_sort(&raffles, &CatalogFilter::default(), SortBy::Prize);
        assert_eq!(ids(&by_prize), vec!["b", "c", "a"]);
        let by_tickets = filter_and_sort(&raffles, &CatalogFilter::default(), SortBy::Tickets);
        assert_eq!(ids(&by_tickets), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_home_filters() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.featured = true;
        let b = raffle("b", RaffleStatus::Active);
        let mut c = raffle("c", RaffleStatus::Closed);
        c.featured = true;
        let d = raffle("d", RaffleStatus::Draft);
        let raffles = vec![a, b, c, d];

        assert_eq!(ids(&filter_home(&raffles, HomeFilter::All, None)).len(), 4);
        assert_eq!(
            ids(&filter_home(&raffles, HomeFilter::Active, None)),
            vec!["a", "b"]
        );
        assert_eq!(
            ids(&filter_home(&raffles, HomeFilter::Featured, None)),
            vec!["a"]
        );
        assert_eq!(
            ids(&filter_home(&raffles, HomeFilter::All, Some("raffle c"))),
            vec!["c"]
        );
    }

    #[test]
    fn test_progress_percent() {
        let mut r = raffle("a", RaffleStatus::Active);
        assert_eq!(progress_percent(&r), 0.0);
        for n in 0..25 {
            r.tickets[n] = true;
        }
        assert_eq!(progress_percent(&r), 25.0);
        r.tickets.clear();
        assert_eq!(progress_percent(&r), 0.0);
    }

    #[test]
    fn test_stats_only_count_active_raffles() {
        let mut a = raffle("a", RaffleStatus::Active);
        a.prize_value = 1_000.0;
        a.second_prize_value = Some(200.0);
        a.tickets[3] = true;
        let mut b = raffle("b", RaffleStatus::Active);
        b.prize_value = 500.0;
        b.tickets = vec![true; 10];
        let mut c = raffle("c", RaffleStatus::Finished);
        c.prize_value = 9_999.0;
        let stats = compute_stats(&[a, b, c]);
        assert_eq!(
            stats,
            RaffleStats {
                active_raffles: 2,
                total_prize_value: 1_700.0,
                total_tickets: 110,
                sold_tickets: 11,
            }
        );
    }

    #[test]
    fn test_sort_and_filter_parse() {
        assert_eq!("Prize".parse::<SortBy>().unwrap(), SortBy::Prize);
        assert!("price".parse::<SortBy>().is_err());
        assert_eq!("featured".parse::<HomeFilter>().unwrap(), HomeFilter::Featured);
        assert!("hot".parse::<HomeFilter>().is_err());
    }

    #[test]
    fn test_labels_fall_back() {
        assert_eq!(status_label(RaffleStatus::Unknown), "Draft");
        assert_eq!(type_label(RaffleType::Medium), "1K tickets");
        assert_eq!(draw_mode_label(DrawMode::ColombianLottery), "Colombian lottery");
    }
}
