//! Shared window-manager transition helpers used by the desktop reducer.

use crate::model::{DesktopState, WindowId, WindowRect};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 200;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 100;
/// Horizontal sliver of a dragged window that must stay inside the viewport.
pub const MIN_VISIBLE_WIDTH: i32 = 100;
/// Vertical sliver of a dragged window that must stay inside the viewport.
pub const MIN_VISIBLE_HEIGHT: i32 = 40;
/// Height of the taskbar strip reserved at the bottom of the viewport.
pub const TASKBAR_HEIGHT: i32 = 40;

/// Focuses and raises `window_id`, assigning the next stacking value.
///
/// Un-minimizes the target, unfocuses every other window, and bumps the
/// strictly increasing z counter so the window lands above all live windows.
/// Focusing the already-focused, visible window is a no-op (the counter is
/// only consumed by focus events that change state).
///
/// Returns `false` when the id is unknown.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return false;
    };

    if state.windows[index].is_focused && !state.windows[index].minimized {
        return true;
    }

    for window in &mut state.windows {
        window.is_focused = false;
    }
    let window = &mut state.windows[index];
    window.is_focused = true;
    window.minimized = false;
    window.z_index = state.next_z_index;
    state.next_z_index = state.next_z_index.saturating_add(1);
    true
}

/// Returns the visible window with the highest stacking value, if any.
pub fn topmost_visible(state: &DesktopState) -> Option<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id)
}

/// Enforces focus invariants: minimized windows are never focused, and at
/// most one window holds focus (ties resolved toward the topmost).
pub fn normalize_focus(state: &mut DesktopState) {
    for window in &mut state.windows {
        if window.minimized {
            window.is_focused = false;
        }
    }

    let focused: Vec<(WindowId, u32)> = state
        .windows
        .iter()
        .filter(|w| w.is_focused)
        .map(|w| (w.id, w.z_index))
        .collect();
    if focused.len() > 1 {
        let keep = focused.iter().max_by_key(|(_, z)| *z).map(|(id, _)| *id);
        for window in &mut state.windows {
            window.is_focused = Some(window.id) == keep;
        }
    }
}

/// Clamps a dragged window position so a minimum sliver stays visible inside
/// `viewport` on every side, keeping the taskbar strip clear.
pub fn clamp_dragged_rect(rect: WindowRect, viewport: WindowRect) -> WindowRect {
    let min_x = viewport.x + MIN_VISIBLE_WIDTH - rect.w;
    let max_x = (viewport.x + viewport.w - MIN_VISIBLE_WIDTH).max(min_x);
    let min_y = viewport.y;
    let max_y = (viewport.y + viewport.h - TASKBAR_HEIGHT - MIN_VISIBLE_HEIGHT).max(min_y);

    WindowRect {
        x: rect.x.clamp(min_x, max_x),
        y: rect.y.clamp(min_y, max_y),
        ..rect
    }
}

/// Applies a resize delta from the corner handle, clamped to the size floors.
/// The window origin never moves during a resize.
pub fn resize_rect(start: WindowRect, dx: i32, dy: i32) -> WindowRect {
    WindowRect {
        w: (start.w + dx).max(MIN_WINDOW_WIDTH),
        h: (start.h + dy).max(MIN_WINDOW_HEIGHT),
        ..start
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn viewport() -> WindowRect {
        WindowRect {
            x: 0,
            y: 0,
            w: 1280,
            h: 720,
        }
    }

    #[test]
    fn dragging_left_keeps_right_sliver_visible() {
        let rect = WindowRect {
            x: -2000,
            y: 100,
            w: 400,
            h: 300,
        };
        let clamped = clamp_dragged_rect(rect, viewport());
        assert_eq!(clamped.x, MIN_VISIBLE_WIDTH - 400);
        assert_eq!(clamped.x + clamped.w, MIN_VISIBLE_WIDTH);
    }

    #[test]
    fn dragging_right_keeps_left_sliver_visible() {
        let rect = WindowRect {
            x: 5000,
            y: 100,
            w: 400,
            h: 300,
        };
        let clamped = clamp_dragged_rect(rect, viewport());
        assert_eq!(clamped.x, 1280 - MIN_VISIBLE_WIDTH);
    }

    #[test]
    fn dragging_vertically_respects_top_edge_and_taskbar() {
        let above = WindowRect {
            x: 100,
            y: -500,
            w: 400,
            h: 300,
        };
        assert_eq!(clamp_dragged_rect(above, viewport()).y, 0);

        let below = WindowRect {
            x: 100,
            y: 5000,
            w: 400,
            h: 300,
        };
        assert_eq!(
            clamp_dragged_rect(below, viewport()).y,
            720 - TASKBAR_HEIGHT - MIN_VISIBLE_HEIGHT
        );
    }

    #[test]
    fn resize_clamps_to_floors_without_moving_origin() {
        let start = WindowRect {
            x: 40,
            y: 60,
            w: 400,
            h: 300,
        };
        let shrunk = resize_rect(start, -1000, -1000);
        assert_eq!(shrunk.w, MIN_WINDOW_WIDTH);
        assert_eq!(shrunk.h, MIN_WINDOW_HEIGHT);
        assert_eq!((shrunk.x, shrunk.y), (40, 60));

        let grown = resize_rect(start, 120, 80);
        assert_eq!((grown.w, grown.h), (520, 380));
    }
}
