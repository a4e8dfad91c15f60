//! One-line terminal display backend

use std::fmt::Write;

use log::info;
use nimbus_display::{Background, DisplayBackend, DisplayError, Slot, TextStyle};

/// Writes each frame as one log line
///
/// Layout: `[bg] HH:MM:SS AM | DATE | HIGH/LOW icon`. Dimmed text is shown
/// in lower case and aliased (low-bit) frames are tagged.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    line: String,
    aliased: bool,
    frames: u32,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames flushed so far
    #[cfg(test)]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Text of the frame being drawn, or the last one flushed
    #[cfg(test)]
    pub fn line(&self) -> &str {
        &self.line
    }

    fn separator(slot: Slot) -> &'static str {
        match slot {
            Slot::Hour => " ",
            Slot::Colon | Slot::Minute => "",
            Slot::Seconds => ":",
            Slot::AmPm => " ",
            Slot::Date => " | ",
            Slot::HighTemp => " ",
            Slot::LowTemp => "/",
        }
    }
}

impl DisplayBackend for TerminalDisplay {
    fn fill(&mut self, background: Background) -> Result<(), DisplayError> {
        self.line.clear();
        self.aliased = false;
        let tag = match background {
            Background::Themed => "[themed]",
            Background::Black => "[black] ",
        };
        self.line.push_str(tag);
        Ok(())
    }

    fn draw_text(
        &mut self,
        slot: Slot,
        text: &str,
        style: TextStyle,
        anti_alias: bool,
    ) -> Result<(), DisplayError> {
        self.aliased |= !anti_alias;
        self.line.push_str(Self::separator(slot));
        match style {
            TextStyle::Dimmed | TextStyle::LightDimmed => {
                self.line.push_str(&text.to_lowercase())
            }
            TextStyle::Normal | TextStyle::Light => self.line.push_str(text),
        }
        Ok(())
    }

    fn draw_divider(&mut self) -> Result<(), DisplayError> {
        self.line.push_str(" |");
        Ok(())
    }

    fn draw_icon(&mut self, asset: &str, anti_alias: bool) -> Result<(), DisplayError> {
        self.aliased |= !anti_alias;
        write!(self.line, " {}", asset).map_err(|_| DisplayError::BufferOverflow)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.aliased {
            self.line.push_str(" (low-bit)");
        }
        self.frames = self.frames.wrapping_add(1);
        info!("frame {:>4} {}", self.frames, self.line);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
