//! Display backend trait
//!
//! A backend owns the pixels: it maps each [`Slot`] onto its own layout and
//! loads fonts and bitmaps. [`present`] replays a draw list against one.

use crate::command::{Background, DrawCommand, DrawList, Slot, TextStyle};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Slot or asset has no place in this layout
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Frame buffer overflow
    BufferOverflow,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            DisplayError::Communication => "display communication error",
            DisplayError::InvalidCoordinates => "slot outside display layout",
            DisplayError::NotInitialized => "display not initialized",
            DisplayError::BufferOverflow => "frame buffer overflow",
        };
        f.write_str(text)
    }
}

/// Display backend trait
///
/// Implementations handle the specifics of round, square, OLED or
/// simulated screens.
pub trait DisplayBackend {
    /// Fill the whole frame with a background
    fn fill(&mut self, background: Background) -> Result<(), DisplayError>;

    /// Draw text into a slot
    fn draw_text(
        &mut self,
        slot: Slot,
        text: &str,
        style: TextStyle,
        anti_alias: bool,
    ) -> Result<(), DisplayError>;

    /// Draw the rule between the date and the weather row
    fn draw_divider(&mut self) -> Result<(), DisplayError>;

    /// Draw a bitmap asset in the icon slot
    fn draw_icon(&mut self, asset: &str, anti_alias: bool) -> Result<(), DisplayError>;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}

/// Execute a draw list in order, then flush
pub fn present<B: DisplayBackend>(backend: &mut B, list: &DrawList) -> Result<(), DisplayError> {
    if !backend.is_ready() {
        return Err(DisplayError::NotInitialized);
    }

    for command in list.iter() {
        match command {
            DrawCommand::Fill(background) => backend.fill(*background)?,
            DrawCommand::Text {
                slot,
                text,
                style,
                anti_alias,
            } => backend.draw_text(*slot, text, *style, *anti_alias)?,
            DrawCommand::Divider => backend.draw_divider()?,
            DrawCommand::Icon { asset, anti_alias } => backend.draw_icon(asset, *anti_alias)?,
        }
    }

    backend.flush()
}
