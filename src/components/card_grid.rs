use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Paragraph},
};

use super::Component;
use super::theme::{HIGHLIGHT, card_style, grade_color};
use crate::action::Action;
use crate::layout::{CARD_WIDTH, GridMetrics};
use crate::render::{Card, CardTemplate};
use crate::state::AppState;

pub struct CardGridProps<'a> {
    pub state: &'a AppState,
    pub template: &'a CardTemplate,
}

/// The card container: rendered cards laid out in rows, scrolled by
/// `state.scroll.row`
#[derive(Default)]
pub struct CardGrid;

impl CardGrid {
    fn render_card(frame: &mut Frame, area: Rect, card: &Card, props: &CardGridProps<'_>) {
        let state = props.state;
        let selected = state.selected_card().is_some_and(|sel| sel.id == card.id);
        let lit = state.highlight_lit(&card.id);

        let border_style = if lit {
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(grade_color(card.grade))
        };
        let border_type = if lit || selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        };
        let block = Block::bordered()
            .border_type(border_type)
            .border_style(border_style)
            .title(Span::styled(format!(" {} ", card.grade.letter()), border_style));

        let lines = props.template.render(card, &card_style(card.grade, selected));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let height = props.template.card_height();
        let metrics = GridMetrics::for_area(area, height);
        let columns = metrics.columns as usize;
        let first = state.scroll.row as usize * columns;
        let visible = columns * metrics.visible_rows as usize;

        for (slot, card) in state.page.cards.iter().skip(first).take(visible).enumerate() {
            let column = (slot % columns) as u16;
            let row = (slot / columns) as u16;
            let cell = Rect {
                x: area.x + column * CARD_WIDTH,
                y: area.y + row * height,
                width: CARD_WIDTH,
                height,
            };
            Self::render_card(frame, cell.intersection(area), card, &props);
        }
    }
}
