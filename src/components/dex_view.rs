use crossterm::event::KeyCode;
use ratatui::prelude::{Frame, Rect};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::theme::DIM;
use super::{CardGrid, CardGridProps, Component, DetailPanel, DetailPanelProps};
use crate::action::Action;
use crate::layout::page_layout;
use crate::render::CardTemplate;
use crate::state::{AppState, RenderPhase};

pub struct DexViewProps<'a> {
    pub state: &'a AppState,
    pub template: &'a CardTemplate,
    pub is_focused: bool,
}

/// Header, card grid, detail panel and help bar
#[derive(Default)]
pub struct DexView;

impl DexView {
    fn header(state: &AppState) -> Line<'static> {
        let title = Span::styled("gradedex", Style::default().add_modifier(Modifier::BOLD));
        let progress = match state.render.phase {
            RenderPhase::Idle => "starting".to_string(),
            RenderPhase::Rendering => format!(
                "grading {}/{}",
                state.rendered(),
                state.render.total
            ),
            RenderPhase::Done => format!("{} species graded", state.rendered()),
        };
        let mut spans = vec![
            title,
            Span::raw("  "),
            Span::styled(progress, Style::default().fg(DIM)),
        ];
        if let Some(message) = &state.message {
            spans.push(Span::raw("  "));
            spans.push(Span::raw(message.clone()));
        }
        Line::from(spans)
    }
}

impl Component<Action> for DexView {
    type Props<'a> = DexViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectionMove(-1)),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionRow(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionRow(1)),
                KeyCode::PageUp => Some(Action::SelectionPage(-1)),
                KeyCode::PageDown => Some(Action::SelectionPage(1)),
                KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectionJumpTop),
                KeyCode::End | KeyCode::Char('G') => Some(Action::SelectionJumpBottom),
                KeyCode::Char('/') => Some(Action::SearchOpen),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DexViewProps<'_>) {
        let state = props.state;
        let areas = page_layout(area);

        frame.render_widget(Paragraph::new(Self::header(state)), areas.header);

        let mut grid = CardGrid;
        grid.render(
            frame,
            areas.grid,
            CardGridProps {
                state,
                template: props.template,
            },
        );

        if let Some(detail_area) = areas.detail {
            let card = state.selected_card();
            let evolution_number = card
                .and_then(|card| card.evolution.as_ref())
                .and_then(|evo| evo.number);
            let mut detail = DetailPanel;
            detail.render(
                frame,
                detail_area,
                DetailPanelProps {
                    card,
                    artwork: card.and_then(|card| state.artwork_for(card.number)),
                    evolution_artwork: evolution_number.and_then(|n| state.artwork_for(n)),
                    artwork_enabled: state.artwork_enabled,
                },
            );
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            areas.status,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("←↑↓→", "move"),
                    StatusBarHint::new("PgUp/PgDn", "page"),
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
