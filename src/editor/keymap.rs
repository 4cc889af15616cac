//! Keyboard shortcut table

use serde::Serialize;

use crate::domain::rules::SeekStep;
use crate::editor::input::{Key, KeyEvent, Modifiers};

/// Something the editor can do in response to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorAction {
    TogglePlay,
    TogglePreview,
    ToggleMute,
    Seek { forward: bool, step: SeekStep },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    CenterTrack,
    SeekToClipStart,
    SeekToClipEnd,
    PreviewFromStart,
    ExportClip,
    ExportFrame,
    RemoveCrop,
}

/// Arrow-key step picked by the held modifiers
fn arrow_step(modifiers: &Modifiers) -> SeekStep {
    if modifiers.command() {
        SeekStep::Extreme
    } else if modifiers.shift {
        SeekStep::Large
    } else if modifiers.alt {
        SeekStep::Medium
    } else {
        SeekStep::Small
    }
}

/// Map a key press to an editor action
pub fn action_for(event: &KeyEvent) -> Option<EditorAction> {
    let m = &event.modifiers;
    let action = match event.key {
        Key::Space if m.command() => EditorAction::PreviewFromStart,
        Key::Space if m.shift => EditorAction::TogglePreview,
        Key::Space => EditorAction::TogglePlay,
        Key::ArrowRight => EditorAction::Seek {
            forward: true,
            step: arrow_step(m),
        },
        Key::ArrowLeft => EditorAction::Seek {
            forward: false,
            step: arrow_step(m),
        },
        Key::Escape | Key::Delete => EditorAction::RemoveCrop,
        Key::Char(c) => match c {
            's' if m.command() && m.shift => EditorAction::ExportFrame,
            's' if m.command() => EditorAction::ExportClip,
            '=' | '+' if m.command() => EditorAction::ZoomIn,
            '-' if m.command() => EditorAction::ZoomOut,
            '0' if m.command() => EditorAction::ResetZoom,
            _ if m.command() => return None,
            'm' => EditorAction::ToggleMute,
            '.' => EditorAction::Seek {
                forward: true,
                step: SeekStep::Frame,
            },
            ',' => EditorAction::Seek {
                forward: false,
                step: SeekStep::Frame,
            },
            '0' => EditorAction::CenterTrack,
            '[' => EditorAction::SeekToClipStart,
            ']' => EditorAction::SeekToClipEnd,
            _ => return None,
        },
    };
    Some(action)
}

/// Shortcut help entries: key combination and label
pub const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play/Pause"),
    ("Shift+Space", "Preview clip (loop)"),
    ("Ctrl+Space", "Preview clip from start"),
    ("M", "Mute/Unmute"),
    ("ArrowRight", "Forward"),
    ("ArrowLeft", "Backward"),
    (".", "Forward (frame)"),
    (",", "Backward (frame)"),
    ("Alt+ArrowRight", "Forward (fast)"),
    ("Alt+ArrowLeft", "Backward (fast)"),
    ("Shift+ArrowRight", "Forward (faster)"),
    ("Shift+ArrowLeft", "Backward (faster)"),
    ("Ctrl+ArrowRight", "End"),
    ("Ctrl+ArrowLeft", "Start"),
    ("[", "Go to clip start"),
    ("]", "Go to clip end"),
    ("Ctrl+=", "Zoom in"),
    ("Ctrl+-", "Zoom out"),
    ("Ctrl+0", "Reset zoom"),
    ("0", "Center timeline on playhead"),
    ("Ctrl+S", "Save clip"),
    ("Ctrl+Shift+S", "Save frame"),
    ("Escape", "Remove crop"),
    ("Shift+Click", "Set clip start (timeline)"),
    ("Shift+RightClick", "Set clip end (timeline)"),
    ("RightClick", "Snap marker to playhead (marker)"),
];

/// Render the help table with arrows substituted, one entry per line
pub fn render_shortcuts() -> String {
    let rows: Vec<(String, &str)> = SHORTCUTS
        .iter()
        .map(|(keys, label)| {
            let keys = keys.replace("ArrowRight", "→").replace("ArrowLeft", "←");
            (keys, *label)
        })
        .collect();
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(keys, label)| format!("{:<width$}  {}", keys, label, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}
