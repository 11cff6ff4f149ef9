//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};
use textwrap::{Options, termwidth};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn item_style(&self) -> ColoredString;
    fn enemy_style(&self) -> ColoredString;
    fn quest_style(&self) -> ColoredString;
    fn quest_complete_style(&self) -> ColoredString;
    fn quest_locked_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn gold_style(&self) -> ColoredString;
    fn xp_style(&self) -> ColoredString;
    fn damage_style(&self) -> ColoredString;
    fn heal_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn highlight(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn enemy_style(&self) -> ColoredString {
        self.bold().truecolor(200, 60, 40)
    }
    fn quest_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn quest_complete_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220).strikethrough()
    }
    fn quest_locked_style(&self) -> ColoredString {
        self.dimmed()
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn gold_style(&self) -> ColoredString {
        self.truecolor(240, 200, 60)
    }
    fn xp_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn damage_style(&self) -> ColoredString {
        self.truecolor(230, 80, 80)
    }
    fn heal_style(&self) -> ColoredString {
        self.truecolor(80, 230, 120)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(150, 150, 230)
    }
    fn highlight(&self) -> ColoredString {
        self.bold().truecolor(230, 230, 230)
    }
}

impl GameStyle for String {
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn enemy_style(&self) -> ColoredString {
        self.as_str().enemy_style()
    }
    fn quest_style(&self) -> ColoredString {
        self.as_str().quest_style()
    }
    fn quest_complete_style(&self) -> ColoredString {
        self.as_str().quest_complete_style()
    }
    fn quest_locked_style(&self) -> ColoredString {
        self.as_str().quest_locked_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn gold_style(&self) -> ColoredString {
        self.as_str().gold_style()
    }
    fn xp_style(&self) -> ColoredString {
        self.as_str().xp_style()
    }
    fn damage_style(&self) -> ColoredString {
        self.as_str().damage_style()
    }
    fn heal_style(&self) -> ColoredString {
        self.as_str().heal_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
    fn highlight(&self) -> ColoredString {
        self.as_str().highlight()
    }
}

/// Wrapping options for ordinary paragraphs.
pub fn normal_block() -> Options<'static> {
    Options::new(termwidth().min(100))
}

/// Wrapping options for indented detail text.
pub fn indented_block() -> Options<'static> {
    Options::new(termwidth().min(100))
        .initial_indent("    ")
        .subsequent_indent("    ")
}
