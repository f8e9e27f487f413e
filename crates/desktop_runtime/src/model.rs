use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default width for windows opened without explicit geometry.
pub const DEFAULT_WINDOW_WIDTH: i32 = 400;
/// Default height for windows opened without explicit geometry.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
/// Horizontal/vertical cascade step applied per already-open window.
pub const WINDOW_CASCADE_STEP: i32 = 30;
/// Base position for the first cascaded window.
pub const WINDOW_CASCADE_ORIGIN: (i32, i32) = (100, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppId {
    Solitaire,
    Blockfall,
    Minesweeper,
    Calculator,
    Browser,
}

impl AppId {
    pub fn title(self) -> &'static str {
        match self {
            Self::Solitaire => "Solitaire",
            Self::Blockfall => "Blockfall",
            Self::Minesweeper => "Minesweeper",
            Self::Calculator => "Calculator",
            Self::Browser => "Netscope Navigator",
        }
    }

    pub fn icon_glyph(self) -> &'static str {
        match self {
            Self::Solitaire => "\u{1F0CF}",
            Self::Blockfall => "\u{1F9F1}",
            Self::Minesweeper => "\u{1F4A3}",
            Self::Calculator => "\u{1F5A9}",
            Self::Browser => "\u{1F310}",
        }
    }

    /// Stable string identifier used by launch entry points.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Solitaire => "solitaire",
            Self::Blockfall => "blockfall",
            Self::Minesweeper => "minesweeper",
            Self::Calculator => "calculator",
            Self::Browser => "browser",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        match raw {
            "solitaire" => Some(Self::Solitaire),
            "blockfall" => Some(Self::Blockfall),
            "minesweeper" => Some(Self::Minesweeper),
            "calculator" => Some(Self::Calculator),
            "browser" => Some(Self::Browser),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: WINDOW_CASCADE_ORIGIN.0,
            y: WINDOW_CASCADE_ORIGIN.1,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub icon_glyph: String,
    pub rect: WindowRect,
    /// Geometry snapshot taken on maximize, re-applied on restore.
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    /// Gates both the resize handle and the maximize control.
    pub resizable: bool,
    pub launch_params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    /// Strictly increasing stacking counter; bumped once per focus event.
    pub next_z_index: u32,
    pub windows: Vec<WindowRecord>,
    pub start_menu_open: bool,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            next_z_index: 1,
            windows: Vec::new(),
            start_menu_open: false,
        }
    }
}

impl DesktopState {
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: AppId,
    pub title: Option<String>,
    pub icon_glyph: Option<String>,
    /// Each geometry field falls back independently: width/height to the
    /// window defaults, position to the per-window cascade.
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub resizable: bool,
    pub launch_params: Value,
}

impl OpenWindowRequest {
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            title: None,
            icon_glyph: None,
            x: None,
            y: None,
            width: None,
            height: None,
            resizable: true,
            launch_params: Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
    /// Desktop viewport captured at drag start; clamp target for the whole drag.
    pub viewport: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}
