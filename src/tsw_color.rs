use ratatui::style::Color;
use term_color_support::ColorSupport;

/// What the current terminal can display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Ansi256,
    Basic,
}

impl ColorDepth {
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        if support.has_16m {
            ColorDepth::TrueColor
        } else if support.has_256 {
            ColorDepth::Ansi256
        } else {
            ColorDepth::Basic
        }
    }

    /// Pin a named ANSI color to the Windows Terminal "Campbell" look so the
    /// board reads the same across terminals. Other colors pass through.
    pub fn adapt(self, color: Color) -> Color {
        // ((R, G, B), ANSI_256_Index)
        let mapping = match color {
            Color::Black =>      Some(((12, 12, 12),   232)),
            Color::Red =>        Some(((197, 15, 31),  160)),
            Color::Green =>      Some(((19, 161, 14),  28)),
            Color::Yellow =>     Some(((193, 156, 0),  178)),
            Color::Blue =>       Some(((0, 55, 218),   20)),
            Color::Magenta =>    Some(((136, 23, 152), 90)),
            Color::Cyan =>       Some(((58, 150, 221), 38)),
            Color::Gray =>       Some(((204, 204, 204), 250)),
            Color::DarkGray =>   Some(((118, 118, 118), 243)),
            Color::LightRed =>   Some(((231, 72, 86),  203)),
            Color::LightGreen => Some(((22, 198, 12),  46)),
            Color::LightBlue =>  Some(((59, 120, 255), 63)),
            Color::White =>      Some(((242, 242, 242), 255)),
            _ => None,
        };
        match (mapping, self) {
            (Some(((r, g, b), _)), ColorDepth::TrueColor) => Color::Rgb(r, g, b),
            (Some((_, index)), ColorDepth::Ansi256) => Color::Indexed(index),
            _ => color,
        }
    }
}

/// Every color the UI uses, resolved once at startup
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub board_bg: Color,
    pub unopened: Color,
    pub cursor_bg: Color,
    pub flag: Color,
    pub mine: Color,
    pub detonated_bg: Color,
    pub menu_key: Color,
    pub button_bg: Color,
    pub button_fg: Color,
    pub indicator: Color,
    pub won: Color,
    pub lost: Color,
    /// Adjacency counts 1..=8
    pub numbers: [Color; 8],
}

impl Palette {
    pub fn new(depth: ColorDepth) -> Self {
        let c = |color| depth.adapt(color);
        Palette {
            board_bg: c(Color::DarkGray),
            unopened: c(Color::Gray),
            cursor_bg: c(Color::LightBlue),
            flag: c(Color::Red),
            mine: c(Color::Black),
            detonated_bg: c(Color::Red),
            menu_key: c(Color::Yellow),
            button_bg: c(Color::Gray),
            button_fg: c(Color::Black),
            indicator: c(Color::Yellow),
            won: c(Color::LightGreen),
            lost: c(Color::LightRed),
            numbers: [
                c(Color::LightBlue),
                c(Color::Green),
                c(Color::LightRed),
                c(Color::Blue),
                c(Color::Red),
                c(Color::Cyan),
                c(Color::Black),
                c(Color::Gray),
            ],
        }
    }

    pub fn number(&self, n: u8) -> Color {
        let i = (n as usize).clamp(1, 8) - 1;
        self.numbers[i]
    }
}
