//! Focus ring over the four interactive panes

/// An interactive pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Search,
    Repositories,
    Tags,
    Properties,
}

impl Pane {
    pub fn label(self) -> &'static str {
        match self {
            Pane::Search => "search",
            Pane::Repositories => "repositories",
            Pane::Tags => "tags",
            Pane::Properties => "properties",
        }
    }
}

/// Tab order
const RING: [Pane; 4] = [Pane::Search, Pane::Repositories, Pane::Tags, Pane::Properties];

/// Pane focused at startup and after a cancel
pub const ANCHOR: Pane = Pane::Repositories;

fn ring_index(pane: Pane) -> usize {
    RING.iter().position(|p| *p == pane).unwrap_or(0)
}

/// Tracks the focused pane and the ring position used by `advance`.
///
/// The ring position only moves when advancing. Direct jumps change the
/// focused pane without moving it, so the next `advance` continues from where
/// the ring was and skips the focused pane if it comes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRing {
    focused: Pane,
    position: usize,
}

impl Default for FocusRing {
    fn default() -> Self {
        Self {
            focused: ANCHOR,
            position: ring_index(ANCHOR),
        }
    }
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Pane {
        self.focused
    }

    pub fn is_focused(&self, pane: Pane) -> bool {
        self.focused == pane
    }

    /// Move to the next ring entry that is not already focused
    pub fn advance(&mut self) -> Pane {
        self.position = (self.position + 1) % RING.len();
        if RING[self.position] == self.focused {
            self.position = (self.position + 1) % RING.len();
        }
        self.focused = RING[self.position];
        self.focused
    }

    pub fn focus(&mut self, pane: Pane) {
        self.focused = pane;
    }

    pub fn return_to_anchor(&mut self) {
        self.focused = ANCHOR;
    }
}
