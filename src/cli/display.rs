// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the scour CLI: colors, boxes and value formatting.
//!
//! Colors are picked by role ([`Tone`]), not by name, so a search hit, a
//! warning and a box border stay consistent across commands. Two true-color
//! palettes exist, OneDark and One Light. The palette is chosen from
//! `SCOUR_THEME` ("dark" / "light"), then from the background index in
//! `COLORFGBG`, and is dark otherwise. Nothing is colored when `NO_COLOR` is
//! set or stdout is not a terminal.

use std::sync::OnceLock;
use std::time::SystemTime;

/// Inner width of boxes, between the two vertical borders.
pub const BOX_WIDTH: usize = 80;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Decide from the raw values of `SCOUR_THEME` and `COLORFGBG`.
    fn from_hints(explicit: Option<&str>, colorfgbg: Option<&str>) -> Theme {
        match explicit.map(str::to_ascii_lowercase).as_deref() {
            Some("light" | "l") => return Theme::Light,
            Some("dark" | "d") => return Theme::Dark,
            _ => {}
        }

        // "fg;bg": 7 and 9..=15 are light backgrounds, 8 is dark gray
        let background = colorfgbg
            .and_then(|value| value.rsplit(';').next())
            .and_then(|bg| bg.parse::<u8>().ok());
        match background {
            Some(bg) if bg >= 7 && bg != 8 => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

pub fn theme() -> Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    *THEME.get_or_init(|| {
        Theme::from_hints(
            std::env::var("SCOUR_THEME").ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    })
}

/// What a piece of output means, which decides how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Error,
    Warning,
    Ok,
    Namespace,
    Link,
    Section,
    Label,
    Title,
    Border,
    Frame,
    Muted,
    /// A matched word inside an excerpt.
    Match,
    ScoreHigh,
    ScoreMid,
    ScoreLow,
}

impl Tone {
    // OneDark (joshdick/onedark.vim) and One Light (sonph/onehalf)
    fn rgb(self, theme: Theme) -> (u8, u8, u8) {
        use Tone::*;
        match (self, theme) {
            (Error | Match, Theme::Dark) => (224, 108, 117),
            (Error | Match, Theme::Light) => (228, 86, 73),
            (Warning | ScoreLow, Theme::Dark) => (229, 192, 123),
            (Warning | ScoreLow, Theme::Light) => (193, 132, 1),
            (Ok | ScoreMid, Theme::Dark) => (152, 195, 121),
            (Ok | ScoreMid, Theme::Light) => (80, 161, 79),
            (ScoreHigh, Theme::Dark) => (166, 226, 46),
            (ScoreHigh, Theme::Light) => (68, 140, 39),
            (Namespace | Label, Theme::Dark) => (86, 182, 194),
            (Namespace | Label, Theme::Light) => (1, 132, 188),
            (Title, Theme::Dark) => (102, 217, 239),
            (Title, Theme::Light) => (1, 112, 158),
            (Link | Section | Frame, Theme::Dark) => (97, 175, 239),
            (Link | Section | Frame, Theme::Light) => (64, 120, 242),
            (Border | Muted, Theme::Dark) => (92, 99, 112),
            (Border | Muted, Theme::Light) => (160, 161, 167),
        }
    }

    fn bold(self) -> bool {
        matches!(
            self,
            Tone::Error | Tone::Ok | Tone::Namespace | Tone::Section | Tone::Label | Tone::Title | Tone::Match
        )
    }

    fn escape(self) -> String {
        let (r, g, b) = self.rgb(theme());
        let weight = if self.bold() { BOLD } else { "" };
        format!("{}\x1b[38;2;{};{};{}m", weight, r, g, b)
    }
}

pub fn use_colors() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
    })
}

/// `text` in the color of `tone`, or unchanged when colors are off.
pub fn paint(tone: Tone, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", tone.escape(), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn bold(text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", BOLD, text, RESET)
    } else {
        text.to_string()
    }
}

/// Printable width of `s`, skipping ANSI escape sequences.
pub fn visible_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // consume through the terminating 'm'
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

/// Right-pad to a visible width; longer strings are returned as is.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", s, " ".repeat(pad))
}

// ─── boxes ──────────────────────────────────────────────────────────────────

/// One horizontal line of a box, e.g. `├─ LABEL ─────┤`.
fn rule(tone: Tone, left: char, fill: char, right: char, label: Option<&str>) -> String {
    let head = match label {
        Some(label) => format!("{} {} ", fill, paint(Tone::Label, label)),
        None => String::new(),
    };
    let rest = BOX_WIDTH.saturating_sub(visible_len(&head));
    let fill = fill.to_string().repeat(rest);
    format!(
        "{}{}{}{}",
        paint(tone, &left.to_string()),
        head,
        paint(tone, &fill),
        paint(tone, &right.to_string())
    )
}

/// `│ content            │`
pub fn row(content: &str) {
    let edge = paint(Tone::Border, "│");
    println!("{}{}{}", edge, pad_right(content, BOX_WIDTH), edge);
}

pub fn section_top(label: &str) {
    println!("{}", rule(Tone::Border, '┌', '─', '┐', Some(label)));
}

pub fn section_mid(label: &str) {
    println!("{}", rule(Tone::Border, '├', '─', '┤', Some(label)));
}

pub fn section_bot() {
    println!("{}", rule(Tone::Border, '└', '─', '┘', None));
}

/// Centered title in a double-line frame.
pub fn banner(text: &str) {
    let title = paint(Tone::Title, text);
    let space = BOX_WIDTH.saturating_sub(visible_len(&title));
    let left = space / 2;
    let edge = paint(Tone::Frame, "║");

    println!("{}", rule(Tone::Frame, '╔', '═', '╗', None));
    println!(
        "{}{}{}{}{}",
        edge,
        " ".repeat(left),
        title,
        " ".repeat(space - left),
        edge
    );
    println!("{}", rule(Tone::Frame, '╚', '═', '╝', None));
}

// ─── values ─────────────────────────────────────────────────────────────────

/// Matched words in excerpts.
pub fn emphasis(text: &str) -> String {
    paint(Tone::Match, text)
}

/// Relevance score, right-aligned, colored by strength.
pub fn score_value(score: f64) -> String {
    let tone = match score {
        s if s >= 5.0 => Tone::ScoreHigh,
        s if s >= 2.0 => Tone::ScoreMid,
        s if s >= 1.0 => Tone::ScoreLow,
        _ => Tone::Muted,
    };
    paint(tone, &format!("{:>7.3}", score))
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Keep the last `max_len` characters of a path, marking the cut with `...`.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - max_len.saturating_sub(3)).collect();
    format!("...{}", tail)
}

/// Local time as `dd/mm/YYYY HH:MM:SS`.
pub fn format_timestamp(time: SystemTime) -> String {
    let local: chrono::DateTime<chrono::Local> = time.into();
    local.format("%d/%m/%Y %H:%M:%S").to_string()
}
