//! Viewport offset controller.
//!
//! The viewport is a contiguous window into the flat ticket array. Its
//! offset always sits on a column boundary and never lets the window run
//! past the last ticket, except that raffles smaller than one view pin the
//! offset to zero and render fewer cells.

use std::ops::Range;

use super::zoom::{ZoomConfig, ZoomLevel};

/// Pixels a mouse drag must travel before the grid moves one column.
pub const MOUSE_DRAG_THRESHOLD: f64 = 30.0;
/// Pixels a touch drag must travel before the grid moves one column.
pub const TOUCH_DRAG_THRESHOLD: f64 = 20.0;

/// Direction of a single column step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Input device driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

impl PointerKind {
    pub fn threshold(self) -> f64 {
        match self {
            PointerKind::Mouse => MOUSE_DRAG_THRESHOLD,
            PointerKind::Touch => TOUCH_DRAG_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    x: f64,
    pointer: PointerKind,
}

/// Turns a continuous pointer drag into discrete column steps.
///
/// Every time the pointer travels further than the threshold from the
/// anchor, one step is emitted and the anchor moves to the pointer, so a
/// long drag produces one step per threshold crossing. Dragging right
/// (positive delta) reveals earlier tickets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragTracker {
    anchor: Option<DragAnchor>,
}

impl DragTracker {
    pub fn start(&mut self, x: f64, pointer: PointerKind) {
        self.anchor = Some(DragAnchor { x, pointer });
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Feed a pointer position; returns a step once the threshold is crossed.
    pub fn track(&mut self, x: f64) -> Option<Direction> {
        let anchor = self.anchor.as_mut()?;
        let delta = x - anchor.x;
        if delta.abs() <= anchor.pointer.threshold() {
            return None;
        }
        anchor.x = x;
        Some(if delta > 0.0 {
            Direction::Backward
        } else {
            Direction::Forward
        })
    }
}

/// Column-aligned window over a raffle's tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    ticket_count: usize,
    zoom: ZoomLevel,
    offset: usize,
}

impl Viewport {
    pub fn new(ticket_count: usize, zoom: ZoomLevel) -> Self {
        Self {
            ticket_count,
            zoom,
            offset: 0,
        }
    }

    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn layout(&self) -> &'static ZoomConfig {
        self.zoom.config()
    }

    pub fn cols(&self) -> usize {
        self.layout().cols
    }

    pub fn rows(&self) -> usize {
        self.layout().rows
    }

    pub fn tickets_per_view(&self) -> usize {
        self.layout().tickets_per_view()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Largest column-aligned offset whose window still fits the raffle.
    pub fn max_offset(&self) -> usize {
        let per_view = self.tickets_per_view();
        if self.ticket_count <= per_view {
            return 0;
        }
        let cols = self.cols();
        (self.ticket_count - per_view) / cols * cols
    }

    fn clamp(&self, offset: usize) -> usize {
        let cols = self.cols();
        offset.min(self.max_offset()) / cols * cols
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Move one column in `direction`; returns whether the offset changed.
    pub fn step(&mut self, direction: Direction) -> bool {
        let before = self.offset;
        let target = match direction {
            Direction::Forward => self.offset.saturating_add(self.cols()),
            Direction::Backward => self.offset.saturating_sub(self.cols()),
        };
        self.offset = self.clamp(target);
        self.offset != before
    }

    pub fn page_forward(&mut self) -> bool {
        self.step(Direction::Forward)
    }

    pub fn page_backward(&mut self) -> bool {
        self.step(Direction::Backward)
    }

    /// Bring `number` into view with its row leading the window.
    ///
    /// Numbers outside the raffle leave the viewport untouched.
    pub fn jump_to(&mut self, number: usize) -> bool {
        if number >= self.ticket_count {
            return false;
        }
        self.offset = self.clamp(row_start(number, self.cols()));
        true
    }

    /// Whether some offset at the current zoom puts `number` in the window.
    pub fn can_reach(&self, number: usize) -> bool {
        let mut probe = *self;
        probe.jump_to(number) && probe.visible_range().contains(&number)
    }

    /// Switch zoom level and pull the offset back into the new bounds.
    pub fn set_zoom(&mut self, zoom: ZoomLevel) -> bool {
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.offset = self.clamp(self.offset);
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom.zoom_in())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom.zoom_out())
    }

    /// Absolute ticket numbers currently in the window.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.tickets_per_view()).min(self.ticket_count);
        self.offset.min(end)..end
    }

    pub fn can_page_backward(&self) -> bool {
        self.offset > 0
    }

    pub fn can_page_forward(&self) -> bool {
        self.offset < self.max_offset()
    }
}

/// Zoom level closest to `from` at which `number` can be brought into view.
///
/// Ties prefer the sparser level.
pub fn zoom_reaching(ticket_count: usize, number: usize, from: ZoomLevel) -> Option<ZoomLevel> {
    (1..=ZoomLevel::MAX.get())
        .filter_map(ZoomLevel::new)
        .filter(|&level| Viewport::new(ticket_count, level).can_reach(number))
        .min_by_key(|level| (level.get().abs_diff(from.get()), level.get()))
}

/// First ticket number of the row holding `number`.
pub fn row_start(number: usize, cols: usize) -> usize {
    if cols == 0 {
        return number;
    }
    number / cols * cols
}

/// Zip the visible slice of the sold-state sequence with absolute numbers.
pub fn visible_tickets(sold: &[bool], viewport: &Viewport) -> Vec<(usize, bool)> {
    let range = viewport.visible_range();
    let end = range.end.min(sold.len());
    let start = range.start.min(end);
    sold[start..end]
        .iter()
        .enumerate()
        .map(|(i, is_sold)| (start + i, *is_sold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(level: u8) -> ZoomLevel {
        ZoomLevel::new(level).unwrap()
    }

    fn assert_invariants(vp: &Viewport) {
        let offset = vp.offset();
        assert_eq!(offset % vp.cols(), 0, "offset {offset} not column aligned");
        if vp.ticket_count() < vp.tickets_per_view() {
            assert_eq!(offset, 0);
        } else {
            assert!(
                offset + vp.tickets_per_view() <= vp.ticket_count(),
                "offset {offset} overruns {} tickets at zoom {}",
                vp.ticket_count(),
                vp.zoom()
            );
        }
    }

    #[test]
    fn test_page_forward_moves_one_column() {
        let mut vp = Viewport::new(100, zoom(1));
        assert_eq!(vp.tickets_per_view(), 50);
        assert!(vp.page_forward());
        assert_eq!(vp.offset(), 10);
    }

    #[test]
    fn test_page_forward_stops_at_last_full_window() {
        let mut vp = Viewport::new(100, zoom(1));
        for _ in 0..20 {
            vp.page_forward();
        }
        assert_eq!(vp.offset(), 50);
        assert!(!vp.can_page_forward());
        assert!(!vp.page_forward());
    }

    #[test]
    fn test_page_backward_stops_at_zero() {
        let mut vp = Viewport::new(100, zoom(1));
        assert!(!vp.can_page_backward());
        assert!(!vp.page_backward());
        vp.page_forward();
        assert!(vp.page_backward());
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_small_raffle_pins_offset() {
        let mut vp = Viewport::new(30, zoom(1));
        assert_eq!(vp.max_offset(), 0);
        vp.page_forward();
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..30);
    }

    #[test]
    fn test_max_offset_is_column_aligned() {
        // 100 tickets at 8x12: 4 spare tickets do not make a full column
        let vp = Viewport::new(100, zoom(2));
        assert_eq!(vp.max_offset(), 0);

        let vp = Viewport::new(10_000, zoom(2));
        assert_eq!(vp.max_offset(), 9_900);
        assert_eq!(vp.max_offset() % 12, 0);
    }

    #[test]
    fn test_jump_to_aligns_to_column() {
        let mut vp = Viewport::new(1_000, zoom(3));
        assert!(vp.jump_to(742));
        assert_eq!(vp.offset(), 735);
        assert!(vp.visible_range().contains(&742));
    }

    #[test]
    fn test_row_start() {
        assert_eq!(row_start(742, 50), 700);
        assert_eq!(row_start(49, 50), 0);
        assert_eq!(row_start(50, 50), 50);
        assert_eq!(row_start(7, 0), 7);
    }

    #[test]
    fn test_tail_of_raffle_unreachable_at_some_zooms() {
        // 1000 tickets at 10x15: the last full window starts at 840
        let vp = Viewport::new(1_000, zoom(3));
        assert_eq!(vp.max_offset(), 840);
        assert!(vp.can_reach(989));
        assert!(!vp.can_reach(995));

        assert_eq!(zoom_reaching(1_000, 995, zoom(3)), Some(zoom(2)));
        assert_eq!(zoom_reaching(1_000, 995, zoom(5)), Some(zoom(5)));
        assert_eq!(zoom_reaching(1_000, 1_000, zoom(3)), None);
    }

    #[test]
    fn test_jump_to_out_of_range_is_ignored() {
        let mut vp = Viewport::new(1_000, zoom(3));
        vp.page_forward();
        assert!(!vp.jump_to(1_000));
        assert_eq!(vp.offset(), 15);
    }

    #[test]
    fn test_jump_near_end_clamps() {
        let mut vp = Viewport::new(1_000, zoom(1));
        vp.jump_to(999);
        assert_eq!(vp.offset(), 950);
        assert_eq!(vp.visible_range(), 950..1_000);
    }

    #[test]
    fn test_zoom_change_reclamps_offset() {
        let mut vp = Viewport::new(1_000, zoom(1));
        vp.jump_to(999);
        assert_eq!(vp.offset(), 950);
        assert!(vp.zoom_in());
        assert_eq!(vp.zoom().get(), 2);
        assert_invariants(&vp);
        assert_eq!(vp.offset(), 900);

        vp.set_zoom(zoom(5));
        assert_invariants(&vp);
        assert_eq!(vp.offset(), 625);
    }

    #[test]
    fn test_zoom_is_noop_at_bounds() {
        let mut vp = Viewport::new(100, ZoomLevel::MIN);
        assert!(!vp.zoom_out());
        let mut vp = Viewport::new(100, ZoomLevel::MAX);
        assert!(!vp.zoom_in());
    }

    #[test]
    fn test_invariants_hold_for_all_layouts() {
        let counts = [0, 1, 49, 50, 51, 96, 100, 149, 150, 151, 999, 1_000, 10_000];
        for count in counts {
            for level in ZoomLevel::all() {
                let mut vp = Viewport::new(count, level);
                assert_invariants(&vp);
                for _ in 0..(count / vp.cols() + 2) {
                    vp.page_forward();
                    assert_invariants(&vp);
                }
                vp.zoom_out();
                assert_invariants(&vp);
                vp.zoom_in();
                vp.zoom_in();
                assert_invariants(&vp);
                for n in [0, count / 2, count.saturating_sub(1), count + 5] {
                    vp.jump_to(n);
                    assert_invariants(&vp);
                }
                for _ in 0..3 {
                    vp.page_backward();
                    assert_invariants(&vp);
                }
            }
        }
    }

    #[test]
    fn test_visible_tickets_zip_absolute_numbers() {
        let mut sold = vec![false; 60];
        sold[12] = true;
        let mut vp = Viewport::new(60, zoom(1));
        vp.page_forward();
        let visible = visible_tickets(&sold, &vp);
        assert_eq!(visible.len(), 50);
        assert_eq!(visible[0], (10, false));
        assert_eq!(visible[2], (12, true));
        assert_eq!(visible.last(), Some(&(59, false)));
    }

    #[test]
    fn test_drag_emits_one_step_per_threshold_crossing() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.track(500.0), None);

        drag.start(100.0, PointerKind::Mouse);
        assert_eq!(drag.track(70.0), None); // exactly 30px is not enough
        assert_eq!(drag.track(69.0), Some(Direction::Forward));
        assert_eq!(drag.track(50.0), None);
        assert_eq!(drag.track(38.0), Some(Direction::Forward));
        assert_eq!(drag.track(80.0), Some(Direction::Backward));
        drag.end();
        assert!(!drag.is_dragging());
        assert_eq!(drag.track(0.0), None);
    }

    #[test]
    fn test_touch_uses_smaller_threshold() {
        let mut drag = DragTracker::default();
        drag.start(0.0, PointerKind::Touch);
        assert_eq!(drag.track(21.0), Some(Direction::Backward));
    }
}
