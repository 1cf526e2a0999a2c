//! Card templates with tagged insertion points
//!
//! A template is plain text, one card row per line. `{tag}` marks where a
//! card field goes:
//!
//! ```text
//! {stamp} {grade}  {no}
//! {name}
//! {types}
//! {image}
//! {evo}
//! ```
//!
//! Every tag must appear at least once. A line holding nothing but `{evo}`
//! is dropped for species without evolutions.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::card::Card;

pub const DEFAULT_TEMPLATE: &str = include_str!("../../assets/card.tpl");

/// Rows taken by the card border
const BORDER_ROWS: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Name,
    Number,
    Image,
    Grade,
    Stamp,
    Types,
    Evolution,
}

impl Slot {
    pub const REQUIRED: [Slot; 7] = [
        Slot::Name,
        Slot::Number,
        Slot::Image,
        Slot::Grade,
        Slot::Stamp,
        Slot::Types,
        Slot::Evolution,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Slot::Name => "name",
            Slot::Number => "no",
            Slot::Image => "image",
            Slot::Grade => "grade",
            Slot::Stamp => "stamp",
            Slot::Types => "types",
            Slot::Evolution => "evo",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::REQUIRED.into_iter().find(|slot| slot.tag() == tag)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("card template is empty")]
    Empty,
    #[error("line {line}: unknown tag {{{tag}}}")]
    UnknownTag { line: usize, tag: String },
    #[error("line {line}: tag opened but never closed")]
    Unclosed { line: usize },
    #[error("missing insertion point {{{}}}", .0.tag())]
    MissingSlot(Slot),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// Colours a card is drawn with
#[derive(Clone, Copy, Debug)]
pub struct CardStyle {
    pub text: Style,
    pub dim: Style,
    /// Grade colour
    pub accent: Color,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardTemplate {
    lines: Vec<Vec<Segment>>,
}

impl CardTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut lines = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            lines.push(parse_line(raw, index + 1)?);
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(TemplateError::Empty);
        }

        let template = Self { lines };
        if let Some(missing) = Slot::REQUIRED
            .into_iter()
            .find(|slot| !template.has_slot(*slot))
        {
            return Err(TemplateError::MissingSlot(missing));
        }
        Ok(template)
    }

    pub fn embedded() -> Result<Self, TemplateError> {
        Self::parse(DEFAULT_TEMPLATE)
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.lines
            .iter()
            .flatten()
            .any(|segment| *segment == Segment::Slot(slot))
    }

    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    /// Height of a rendered card including its border
    pub fn card_height(&self) -> u16 {
        u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX - BORDER_ROWS)
            .saturating_add(BORDER_ROWS)
    }

    pub fn render(&self, card: &Card, style: &CardStyle) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .filter(|line| card.evolution.is_some() || !is_evolution_only(line))
            .map(|line| {
                let spans: Vec<Span<'static>> = line
                    .iter()
                    .map(|segment| match segment {
                        Segment::Text(text) => Span::styled(text.clone(), style.text),
                        Segment::Slot(slot) => slot_span(*slot, card, style),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn parse_line(raw: &str, line: usize) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = raw;
    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_string()));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or(TemplateError::Unclosed { line })?;
        let tag = after[..close].trim();
        let slot = Slot::from_tag(tag).ok_or_else(|| TemplateError::UnknownTag {
            line,
            tag: tag.to_string(),
        })?;
        segments.push(Segment::Slot(slot));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_string()));
    }
    Ok(segments)
}

fn is_evolution_only(line: &[Segment]) -> bool {
    let mut has_evolution = false;
    for segment in line {
        match segment {
            Segment::Slot(Slot::Evolution) => has_evolution = true,
            Segment::Text(text) if text.trim().is_empty() => {}
            _ => return false,
        }
    }
    has_evolution
}

fn slot_span(slot: Slot, card: &Card, style: &CardStyle) -> Span<'static> {
    match slot {
        Slot::Name => Span::styled(card.name.clone(), style.text.add_modifier(Modifier::BOLD)),
        Slot::Number => Span::styled(
            card.number_label.clone(),
            style.dim.add_modifier(Modifier::UNDERLINED),
        ),
        Slot::Image => {
            let file = card.artwork_url.rsplit('/').next().unwrap_or_default();
            Span::styled(format!("▧ {file}"), style.dim)
        }
        Slot::Grade => Span::styled(
            card.grade.letter(),
            Style::default()
                .fg(style.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Slot::Stamp => Span::styled("▐█▌", Style::default().fg(style.accent)),
        Slot::Types => Span::styled(card.type_line.clone(), style.text),
        Slot::Evolution => match &card.evolution {
            Some(preview) => {
                let number = preview
                    .number
                    .map(|number| format!(" #{number:03}"))
                    .unwrap_or_default();
                Span::styled(format!("→ {}{number}", preview.name), style.dim)
            }
            None => Span::raw(""),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;
    use crate::render::card::EvolutionPreview;

    fn style() -> CardStyle {
        CardStyle {
            text: Style::default(),
            dim: Style::default(),
            accent: Color::Yellow,
        }
    }

    fn card(evolution: Option<EvolutionPreview>) -> Card {
        Card {
            id: "Bulbasaur".into(),
            name: "Bulbasaur".into(),
            number: 1,
            number_label: "#001".into(),
            detail_url: "https://www.serebii.net/pokedex-swsh/bulbasaur/".into(),
            artwork_url: "https://example.test/official-artwork/1.png".into(),
            grade: Grade::B,
            type_line: "Grass / Poison".into(),
            evolution,
        }
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_embedded_template_is_valid() {
        let template = CardTemplate::embedded().expect("embedded template");
        assert_eq!(template.rows(), 5);
        assert_eq!(template.card_height(), 7);
    }

    #[test]
    fn test_missing_slot_is_reported() {
        let err = CardTemplate::parse("{name} {no}\n{image} {grade} {stamp}\n{types}")
            .expect_err("no evo slot");
        assert_eq!(err, TemplateError::MissingSlot(Slot::Evolution));
        assert_eq!(err.to_string(), "missing insertion point {evo}");
    }

    #[test]
    fn test_unknown_and_unclosed_tags() {
        let unknown = CardTemplate::parse("{name}\n{weight}").expect_err("unknown");
        assert_eq!(
            unknown,
            TemplateError::UnknownTag {
                line: 2,
                tag: "weight".into()
            }
        );

        let unclosed = CardTemplate::parse("{name").expect_err("unclosed");
        assert_eq!(unclosed, TemplateError::Unclosed { line: 1 });

        assert_eq!(CardTemplate::parse("\n\n"), Err(TemplateError::Empty));
    }

    #[test]
    fn test_render_fills_every_slot() {
        let template = CardTemplate::embedded().expect("embedded template");
        let preview = EvolutionPreview {
            name: "Ivysaur".into(),
            number: Some(2),
            artwork_url: None,
        };
        let lines = template.render(&card(Some(preview)), &style());

        assert_eq!(
            plain(&lines),
            vec![
                "▐█▌ B  #001",
                "Bulbasaur",
                "Grass / Poison",
                "▧ 1.png",
                "→ Ivysaur #002",
            ]
        );
    }

    #[test]
    fn test_evolution_line_hidden_without_evolution() {
        let template = CardTemplate::embedded().expect("embedded template");
        let lines = template.render(&card(None), &style());

        assert_eq!(lines.len(), 4);
        assert!(!plain(&lines).iter().any(|line| line.contains('→')));
    }

    #[test]
    fn test_shared_line_keeps_other_content() {
        let template =
            CardTemplate::parse("{stamp}{grade}{no}{image}\n{name} {evo}\n{types}").expect("valid");
        let lines = template.render(&card(None), &style());

        assert_eq!(lines.len(), 3);
        assert_eq!(plain(&lines)[1], "Bulbasaur ");
    }
}
