//! Draw commands
//!
//! The renderer addresses screen regions by [`Slot`], never by pixel.
//! Backends map slots onto their own layout for round or square screens.

use core::ops::Deref;

use heapless::{String, Vec};

/// Longest text placed in a slot (the date line)
pub const MAX_TEXT_LEN: usize = 24;

/// Most commands a single frame needs
pub const MAX_COMMANDS: usize = 12;

/// Screen region a command draws into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Hour,
    Colon,
    Minute,
    AmPm,
    Seconds,
    Date,
    HighTemp,
    LowTemp,
}

/// Frame background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Background {
    /// Themed background colour
    Themed,
    /// Plain black, used in ambient mode
    Black,
}

/// Text weight and emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextStyle {
    Normal,
    /// Light typeface
    Light,
    /// Normal typeface at reduced alpha
    Dimmed,
    /// Light typeface at reduced alpha
    LightDimmed,
}

/// One drawing step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawCommand {
    Fill(Background),
    Text {
        slot: Slot,
        text: String<MAX_TEXT_LEN>,
        style: TextStyle,
        anti_alias: bool,
    },
    /// Horizontal rule between the date and the weather
    Divider,
    Icon {
        asset: &'static str,
        anti_alias: bool,
    },
}

/// Ordered commands for one frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawList {
    commands: Vec<DrawCommand, MAX_COMMANDS>,
}

impl DrawList {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, command: DrawCommand) {
        // A frame never exceeds MAX_COMMANDS
        let _ = self.commands.push(command);
    }

    /// Text drawn into `slot`, if any
    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Text { slot: s, text, .. } if *s == slot => Some(text.as_str()),
            _ => None,
        })
    }

    /// Icon asset drawn, if any
    pub fn icon(&self) -> Option<&'static str> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Icon { asset, .. } => Some(*asset),
            _ => None,
        })
    }
}

impl Deref for DrawList {
    type Target = [DrawCommand];

    fn deref(&self) -> &Self::Target {
        &self.commands
    }
}
