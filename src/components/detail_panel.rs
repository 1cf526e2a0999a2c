use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
};
use tui_dispatch::DataResource;

use super::Component;
use super::artwork_view::ArtworkView;
use super::theme::{DIM, grade_color};
use crate::action::Action;
use crate::artwork::{ARTWORK_PIXELS, Artwork};
use crate::render::Card;

pub struct DetailPanelProps<'a> {
    pub card: Option<&'a Card>,
    pub artwork: Option<&'a DataResource<Artwork>>,
    pub evolution_artwork: Option<&'a DataResource<Artwork>>,
    pub artwork_enabled: bool,
}

/// Selected card: artwork, grade, link, evolution preview
#[derive(Default)]
pub struct DetailPanel;

const ARTWORK_ROWS: u16 = (ARTWORK_PIXELS / 2) as u16;

impl DetailPanel {
    fn info_lines(card: &Card) -> Vec<Line<'static>> {
        let dim = Style::default().fg(DIM);
        let accent = Style::default()
            .fg(grade_color(card.grade))
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(vec![
                Span::styled(card.number_label.clone(), dim),
                Span::raw("  "),
                Span::styled(format!("Grade {}", card.grade.letter()), accent),
            ]),
            Line::from(card.type_line.clone()),
            Line::from(Span::styled(
                card.detail_url.clone(),
                dim.add_modifier(Modifier::UNDERLINED),
            )),
        ];
        match &card.evolution {
            Some(evo) => {
                let number = evo
                    .number
                    .map(|n| format!(" #{n:03}"))
                    .unwrap_or_default();
                lines.push(Line::from(format!("Evolves into {}{number}", evo.name)));
            }
            None => lines.push(Line::from(Span::styled("Final form", dim))),
        }
        lines
    }

    fn render_artwork(
        frame: &mut Frame,
        area: Rect,
        artwork: Option<&DataResource<Artwork>>,
    ) {
        let dim = Style::default().fg(DIM);
        match artwork {
            Some(DataResource::Loaded(art)) => frame.render_widget(ArtworkView::new(art), area),
            Some(DataResource::Failed(error)) => frame.render_widget(
                Paragraph::new(Span::styled(format!("Artwork unavailable: {error}"), dim))
                    .wrap(Wrap { trim: true }),
                area,
            ),
            Some(DataResource::Loading) => {
                frame.render_widget(Paragraph::new(Span::styled("Loading artwork...", dim)), area)
            }
            _ => {}
        }
    }
}

impl Component<Action> for DetailPanel {
    type Props<'a> = DetailPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let Some(card) = props.card else {
            let block = Block::bordered().border_type(BorderType::Rounded);
            frame.render_widget(
                Paragraph::new(Span::styled("Grading...", Style::default().fg(DIM))).block(block),
                area,
            );
            return;
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(grade_color(card.grade)))
            .title(Span::styled(
                format!(" {} ", card.name),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let artwork_rows = if props.artwork_enabled { ARTWORK_ROWS } else { 0 };
        let chunks = Layout::vertical([
            Constraint::Length(artwork_rows), // Artwork
            Constraint::Length(5),            // Info
            Constraint::Min(0),               // Evolution artwork
        ])
        .split(inner);

        if props.artwork_enabled {
            Self::render_artwork(frame, chunks[0], props.artwork);
        }
        frame.render_widget(
            Paragraph::new(Self::info_lines(card)).wrap(Wrap { trim: true }),
            chunks[1],
        );
        if props.artwork_enabled && card.evolution.is_some() {
            Self::render_artwork(frame, chunks[2], props.evolution_artwork);
        }
    }
}
