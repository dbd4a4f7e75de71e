//! Demonstration viewer state.
//!
//! The real document renders through a passive embed; this module holds
//! the toolbar state (page, zoom) and the hard-coded selectable overlay
//! lines the demo exposes as its selection surface.

/// Overlay text elements laid over the embedded document.
pub const OVERLAY_LINES: &[&str] = &[
    "Standard Insurance Company",
    "Group Policy No.: TS 05374370-G",
    "Policyholder: Oklahoma Public Employees Health & Welfare Plan",
    "Effective Date: July 1, 2021",
    "CERTIFICATE AND SUMMARY PLAN DESCRIPTION",
    "Group Long Term Disability Insurance",
];

/// Demo page count reported once a document is loaded.
pub const DEMO_PAGE_COUNT: u32 = 2;

pub const MIN_ZOOM: u32 = 50;
pub const MAX_ZOOM: u32 = 200;
const ZOOM_STEP: u32 = 10;

/// Toolbar state for the passive viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    page: u32,
    total_pages: u32,
    zoom: u32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    /// Create a viewer positioned on the first page at 100% zoom.
    pub fn new() -> Self {
        Self {
            page: 1,
            total_pages: DEMO_PAGE_COUNT,
            zoom: 100,
        }
    }

    /// Current page (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total page count.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Current zoom percentage.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Advance one page, clamped to the last page.
    pub fn next_page(&mut self) {
        if self.page < self.total_pages {
            self.page += 1;
        }
    }

    /// Go back one page, clamped to the first page.
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Jump to a page; out-of-range values are ignored.
    pub fn set_page(&mut self, page: u32) {
        if (1..=self.total_pages).contains(&page) {
            self.page = page;
        }
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(ZOOM_STEP).max(MIN_ZOOM);
    }

    /// The selectable overlay line at `index`, if any. This is the raw
    /// text the viewer reports upward on selection.
    pub fn select_line(&self, index: usize) -> Option<&'static str> {
        OVERLAY_LINES.get(index).copied()
    }
}
