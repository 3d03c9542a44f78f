//! Zoom levels and the grid density each one selects.

use std::fmt;

use serde::Serialize;

use crate::types::RaffleType;

/// Responsive cell-size tokens handed to the rendering host verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellSize {
    pub mobile: &'static str,
    pub tablet: &'static str,
    pub desktop: &'static str,
}

/// Grid layout for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoomConfig {
    pub level: u8,
    pub rows: usize,
    pub cols: usize,
    pub cell_size: CellSize,
}

impl ZoomConfig {
    pub fn tickets_per_view(&self) -> usize {
        self.rows * self.cols
    }
}

pub const ZOOM_CONFIGS: [ZoomConfig; 5] = [
    ZoomConfig {
        level: 1,
        rows: 5,
        cols: 10,
        cell_size: CellSize {
            mobile: "w-12 h-12",
            tablet: "w-16 h-16",
            desktop: "w-20 h-20",
        },
    },
    ZoomConfig {
        level: 2,
        rows: 8,
        cols: 12,
        cell_size: CellSize {
            mobile: "w-10 h-10",
            tablet: "w-14 h-14",
            desktop: "w-18 h-18",
        },
    },
    ZoomConfig {
        level: 3,
        rows: 10,
        cols: 15,
        cell_size: CellSize {
            mobile: "w-8 h-8",
            tablet: "w-12 h-12",
            desktop: "w-16 h-16",
        },
    },
    ZoomConfig {
        level: 4,
        rows: 12,
        cols: 20,
        cell_size: CellSize {
            mobile: "w-6 h-6",
            tablet: "w-10 h-10",
            desktop: "w-14 h-14",
        },
    },
    ZoomConfig {
        level: 5,
        rows: 15,
        cols: 25,
        cell_size: CellSize {
            mobile: "w-5 h-5",
            tablet: "w-8 h-8",
            desktop: "w-12 h-12",
        },
    },
];

/// A zoom level within `1..=ZOOM_CONFIGS.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const MIN: ZoomLevel = ZoomLevel(1);
    pub const MAX: ZoomLevel = ZoomLevel(ZOOM_CONFIGS.len() as u8);
    /// Level used when nothing else decides
    pub const DEFAULT: ZoomLevel = ZoomLevel(3);

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&level)
            .then_some(ZoomLevel(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Default density for a raffle size: sparse grids for small raffles,
    /// dense ones for large raffles.
    pub fn for_raffle_type(raffle_type: RaffleType) -> Self {
        match raffle_type {
            RaffleType::Small => ZoomLevel(1),
            RaffleType::Medium => ZoomLevel(3),
            RaffleType::Large => ZoomLevel(5),
        }
    }

    /// One level denser, saturating at the last level.
    pub fn zoom_in(self) -> Self {
        ZoomLevel((self.0 + 1).min(Self::MAX.0))
    }

    /// One level sparser, saturating at level 1.
    pub fn zoom_out(self) -> Self {
        ZoomLevel(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    pub fn config(self) -> &'static ZoomConfig {
        zoom_config(self.0)
    }

    pub fn all() -> impl Iterator<Item = ZoomLevel> {
        (Self::MIN.0..=Self::MAX.0).map(ZoomLevel)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Look up a level's layout; unknown levels fall back to the default level.
pub fn zoom_config(level: u8) -> &'static ZoomConfig {
    ZOOM_CONFIGS
        .iter()
        .find(|c| c.level == level)
        .unwrap_or(&ZOOM_CONFIGS[(ZoomLevel::DEFAULT.0 - 1) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered_and_contiguous() {
        for (i, config) in ZOOM_CONFIGS.iter().enumerate() {
            assert_eq!(config.level as usize, i + 1);
        }
        assert_eq!(ZoomLevel::all().count(), ZOOM_CONFIGS.len());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ZoomLevel::new(0).is_none());
        assert!(ZoomLevel::new(6).is_none());
        assert_eq!(ZoomLevel::new(5), Some(ZoomLevel::MAX));
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        assert_eq!(ZoomLevel::MAX.zoom_in(), ZoomLevel::MAX);
        assert_eq!(ZoomLevel::MIN.zoom_out(), ZoomLevel::MIN);
        assert_eq!(ZoomLevel::DEFAULT.zoom_in().get(), 4);
        assert_eq!(ZoomLevel::DEFAULT.zoom_out().get(), 2);
    }

    #[test]
    fn test_tickets_per_view() {
        let per_view: Vec<usize> = ZoomLevel::all()
            .map(|z| z.config().tickets_per_view())
            .collect();
        assert_eq!(per_view, vec![50, 96, 150, 240, 375]);
    }

    #[test]
    fn test_unknown_level_falls_back_to_default() {
        assert_eq!(zoom_config(0).level, 3);
        assert_eq!(zoom_config(42).cols, 15);
        assert_eq!(zoom_config(4).cols, 20);
    }

    #[test]
    fn test_default_level_per_raffle_type() {
        assert_eq!(ZoomLevel::for_raffle_type(RaffleType::Small).get(), 1);
        assert_eq!(ZoomLevel::for_raffle_type(RaffleType::Medium).get(), 3);
        assert_eq!(ZoomLevel::for_raffle_type(RaffleType::Large).get(), 5);
    }
}
