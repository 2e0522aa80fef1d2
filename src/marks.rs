//! Point marks placed on the displayed image.

use log::debug;
use serde::{Deserialize, Serialize};

/// Which image a mark list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkView {
    Main,
    Section,
}

/// A point in image-container pixels, measured from its top-left corner at
/// zoom 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub x: f64,
    pub y: f64,
}

impl Mark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a click in client coordinates into container coordinates.
    ///
    /// `rect_left`/`rect_top` are the container's bounding box origin at
    /// click time and `scale` its current zoom, so a mark keeps pointing at
    /// the same image pixel when the viewport is panned or zoomed later.
    pub fn from_client(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64, scale: f64) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Self {
            x: (client_x - rect_left) / scale,
            y: (client_y - rect_top) / scale,
        }
    }
}

/// Ordered list of marks; insertion order is display order and the index
/// used for removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkList {
    marks: Vec<Mark>,
}

impl MarkList {
    pub fn as_slice(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Remove the most recent mark, if any.
    pub fn undo_last(&mut self) -> Option<Mark> {
        self.marks.pop()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Remove the mark at `index`; out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Mark> {
        (index < self.marks.len()).then(|| self.marks.remove(index))
    }
}

/// Mark lists for the main and section views. The lists are independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkOverlay {
    main: MarkList,
    section: MarkList,
}

impl MarkOverlay {
    pub fn list(&self, view: MarkView) -> &MarkList {
        match view {
            MarkView::Main => &self.main,
            MarkView::Section => &self.section,
        }
    }

    fn list_mut(&mut self, view: MarkView) -> &mut MarkList {
        match view {
            MarkView::Main => &mut self.main,
            MarkView::Section => &mut self.section,
        }
    }

    /// Append `mark` to `view`'s list when marking is enabled there.
    /// Returns whether the mark was placed.
    pub fn place(&mut self, view: MarkView, mark: Mark, marking_enabled: bool) -> bool {
        if !marking_enabled {
            return false;
        }
        debug!("📍 {:?} mark at ({:.1}, {:.1})", view, mark.x, mark.y);
        self.list_mut(view).push(mark);
        true
    }

    pub fn undo_last(&mut self, view: MarkView) -> Option<Mark> {
        self.list_mut(view).undo_last()
    }

    pub fn clear(&mut self, view: MarkView) {
        self.list_mut(view).clear();
    }

    /// Remove a single mark when marking is enabled; otherwise a no-op.
    pub fn remove_at(&mut self, view: MarkView, index: usize, marking_enabled: bool) -> Option<Mark> {
        if !marking_enabled {
            return None;
        }
        self.list_mut(view).remove_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay_with(view: MarkView, points: &[(f64, f64)]) -> MarkOverlay {
        let mut overlay = MarkOverlay::default();
        for &(x, y) in points {
            overlay.place(view, Mark::new(x, y), true);
        }
        overlay
    }

    #[test]
    fn test_place_then_undo_restores_prior_list() {
        let mut overlay = overlay_with(MarkView::Main, &[(1.0, 2.0), (3.0, 4.0)]);
        let before = overlay.clone();
        assert!(overlay.place(MarkView::Main, Mark::new(9.0, 9.0), true));
        assert_eq!(overlay.undo_last(MarkView::Main), Some(Mark::new(9.0, 9.0)));
        assert_eq!(overlay, before);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut overlay = MarkOverlay::default();
        assert_eq!(overlay.undo_last(MarkView::Section), None);
        assert!(overlay.list(MarkView::Section).is_empty());
    }

    #[test]
    fn test_place_requires_marking_mode() {
        let mut overlay = MarkOverlay::default();
        assert!(!overlay.place(MarkView::Main, Mark::new(1.0, 1.0), false));
        assert!(overlay.list(MarkView::Main).is_empty());
    }

    #[test]
    fn test_views_are_independent() {
        let mut overlay = overlay_with(MarkView::Main, &[(1.0, 1.0)]);
        overlay.place(MarkView::Section, Mark::new(5.0, 5.0), true);
        overlay.clear(MarkView::Main);
        assert!(overlay.list(MarkView::Main).is_empty());
        assert_eq!(overlay.list(MarkView::Section).as_slice(), &[Mark::new(5.0, 5.0)]);
    }

    #[test]
    fn test_remove_at() {
        let mut overlay = overlay_with(MarkView::Main, &[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(overlay.remove_at(MarkView::Main, 1, false), None);
        assert_eq!(overlay.list(MarkView::Main).len(), 3);

        assert_eq!(overlay.remove_at(MarkView::Main, 1, true), Some(Mark::new(2.0, 2.0)));
        assert_eq!(
            overlay.list(MarkView::Main).as_slice(),
            &[Mark::new(1.0, 1.0), Mark::new(3.0, 3.0)]
        );
        assert_eq!(overlay.remove_at(MarkView::Main, 7, true), None);
    }

    #[test]
    fn test_from_client_undoes_zoom() {
        let mark = Mark::from_client(150.0, 90.0, 50.0, 10.0, 2.0);
        assert_eq!(mark, Mark::new(50.0, 40.0));
        let unscaled = Mark::from_client(150.0, 90.0, 50.0, 10.0, 0.0);
        assert_eq!(unscaled, Mark::new(100.0, 80.0));
    }
}
