// Tractyl Pointer Commands
// Custom keycodes that drive the pointer config

use strum_macros::{Display, EnumIter, EnumString};

use crate::dpi::DpiCurve;

/// Pointer command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Command {
    DefaultDpiForward,
    DefaultDpiReverse,
    SnipingDpiForward,
    SnipingDpiReverse,
    SnipingMode,
    SnipingModeToggle,
    DragscrollMode,
    DragscrollModeToggle,
    CaretMode,
    CaretModeToggle,
    CustomMode,
    CustomModeToggle,
    ModeSelect,
    ModeSelectToggle,
    IntegrationMode,
    IntegrationModeToggle,
}

/// Pointer mode a mode command drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeFlag {
    Sniping,
    DragScroll,
    Caret,
    Custom,
    ModeSelect,
    Integration,
}

/// What a command does, independent of how it is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Step a DPI curve; `forward` before any shift reversal
    Dpi { curve: DpiCurve, forward: bool },
    /// Mode follows the key's pressed state
    Momentary(ModeFlag),
    /// Mode flips on press
    Toggle(ModeFlag),
}

impl Command {
    pub fn kind(self) -> CommandKind {
        use Command::*;
        match self {
            DefaultDpiForward => CommandKind::Dpi { curve: DpiCurve::Default, forward: true },
            DefaultDpiReverse => CommandKind::Dpi { curve: DpiCurve::Default, forward: false },
            SnipingDpiForward => CommandKind::Dpi { curve: DpiCurve::Sniping, forward: true },
            SnipingDpiReverse => CommandKind::Dpi { curve: DpiCurve::Sniping, forward: false },
            SnipingMode => CommandKind::Momentary(ModeFlag::Sniping),
            SnipingModeToggle => CommandKind::Toggle(ModeFlag::Sniping),
            DragscrollMode => CommandKind::Momentary(ModeFlag::DragScroll),
            DragscrollModeToggle => CommandKind::Toggle(ModeFlag::DragScroll),
            CaretMode => CommandKind::Momentary(ModeFlag::Caret),
            CaretModeToggle => CommandKind::Toggle(ModeFlag::Caret),
            CustomMode => CommandKind::Momentary(ModeFlag::Custom),
            CustomModeToggle => CommandKind::Toggle(ModeFlag::Custom),
            ModeSelect => CommandKind::Momentary(ModeFlag::ModeSelect),
            ModeSelectToggle => CommandKind::Toggle(ModeFlag::ModeSelect),
            IntegrationMode => CommandKind::Momentary(ModeFlag::Integration),
            IntegrationModeToggle => CommandKind::Toggle(ModeFlag::Integration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_names() {
        assert_eq!(Command::from_str("DEFAULT_DPI_FORWARD").unwrap(), Command::DefaultDpiForward);
        assert_eq!(
            Command::from_str("dragscroll_mode_toggle").unwrap(),
            Command::DragscrollModeToggle
        );
        assert_eq!(Command::from_str("MODE_SELECT").unwrap(), Command::ModeSelect);
        assert!(Command::from_str("POINTER_DEFAULT_DPI").is_err());
    }

    #[test]
    fn test_display_roundtrips_every_command() {
        for command in Command::iter() {
            let name = command.to_string();
            assert_eq!(Command::from_str(&name).unwrap(), command);
        }
        assert_eq!(Command::iter().count(), 16);
    }

    #[test]
    fn test_dragscroll_toggle_targets_dragscroll() {
        assert_eq!(
            Command::DragscrollModeToggle.kind(),
            CommandKind::Toggle(ModeFlag::DragScroll)
        );
    }

    #[test]
    fn test_dpi_kinds() {
        assert_eq!(
            Command::SnipingDpiReverse.kind(),
            CommandKind::Dpi { curve: DpiCurve::Sniping, forward: false }
        );
    }
}
