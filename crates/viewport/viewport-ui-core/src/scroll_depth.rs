//! Scroll-depth milestones, recomputed at most once per animation frame.

use crate::inputs::ScrollMetrics;

/// Rounded percentage of the scrollable range, or `None` when the page
/// can't scroll.
pub fn scroll_percent(m: &ScrollMetrics) -> Option<f64> {
    let range = m.scroll_height - m.viewport_height;
    if range.is_nan() || range <= 0.0 {
        return None;
    }
    Some((m.scroll_y / range * 100.0).round())
}

#[derive(Debug, Clone)]
pub struct ScrollDepthTracker {
    marks: Vec<u32>,
    reported: Vec<u32>,
    ticking: bool,
}

impl ScrollDepthTracker {
    pub fn new(marks: Vec<u32>) -> Self {
        Self {
            marks,
            reported: Vec::new(),
            ticking: false,
        }
    }

    /// Record that a scroll happened. Returns true when this scroll starts a
    /// new frame request; further scrolls before the frame are coalesced.
    pub fn note_scroll(&mut self) -> bool {
        if self.ticking {
            return false;
        }
        self.ticking = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.ticking
    }

    /// Frame callback: compute once with the latest metrics and return marks
    /// crossed for the first time.
    pub fn on_frame(&mut self, m: &ScrollMetrics) -> Vec<u32> {
        if !self.ticking {
            return Vec::new();
        }
        self.ticking = false;
        let Some(percent) = scroll_percent(m) else {
            return Vec::new();
        };
        let mut crossed = Vec::new();
        for &mark in &self.marks {
            if percent >= f64::from(mark) && !self.reported.contains(&mark) {
                self.reported.push(mark);
                crossed.push(mark);
            }
        }
        crossed
    }

    pub fn reported(&self) -> &[u32] {
        &self.reported
    }

    pub fn cancel_pending(&mut self) {
        self.ticking = false;
    }
}
