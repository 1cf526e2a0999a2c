use ratatui::style::{Color, Modifier, Style};

use crate::grade::Grade;
use crate::render::CardStyle;

pub const HIGHLIGHT: Color = Color::Rgb(255, 235, 120);
pub const DIM: Color = Color::Rgb(120, 120, 135);

/// Grade colour used for card borders and stamps
pub fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::S => Color::Rgb(255, 196, 0),
        Grade::A => Color::Rgb(200, 90, 255),
        Grade::B => Color::Rgb(70, 150, 255),
        Grade::C => Color::Rgb(80, 200, 120),
        Grade::D => Color::Rgb(150, 150, 150),
    }
}

pub fn card_style(grade: Grade, selected: bool) -> CardStyle {
    let text = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Reset)
    };
    CardStyle {
        text,
        dim: Style::default().fg(DIM),
        accent: grade_color(grade),
    }
}
