use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, ScrollbarStyle, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, TextInput,
    TextInputProps, TextInputStyle, centered_rect, highlight_substring,
};

use super::Component;
use super::theme::DIM;
use crate::action::Action;
use crate::render::SearchOption;

pub const PLACEHOLDER: &str = "Search for a Pokémon...";

const INPUT_BG: Color = Color::Rgb(50, 50, 60);
const DIALOG_BG: Color = Color::Rgb(35, 35, 45);

fn clone_line(line: &Line<'static>) -> Line<'static> {
    line.clone()
}

pub fn modal_area(area: Rect) -> Rect {
    centered_rect(50, 16, area)
}

/// Search dialog: a query line over the matching species.
///
/// Enter submits what was typed. The highlighted suggestion is submitted
/// instead only once the user has moved through the list with Up/Down.
#[derive(Default)]
pub struct SearchOverlay {
    input: TextInput,
    list: SelectList,
    modal: Modal,
    was_open: bool,
    browsed: bool,
}

pub struct SearchOverlayProps<'a> {
    pub query: &'a str,
    pub suggestions: &'a [SearchOption],
    pub selected: usize,
    pub is_focused: bool,
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

impl SearchOverlayProps<'_> {
    fn input(&self, is_focused: bool, base: BaseStyle) -> TextInputProps<'_, Action> {
        TextInputProps {
            value: self.query,
            placeholder: PLACEHOLDER,
            is_focused,
            style: TextInputStyle {
                base,
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: self.on_query_change,
            on_submit: self.on_query_submit,
            on_cursor_move: Some(|_| Action::UiRender),
        }
    }

    fn list<'i>(
        &self,
        items: &'i [Line<'static>],
        is_focused: bool,
        padding: Padding,
    ) -> SelectListProps<'i, Line<'static>, Action> {
        SelectListProps {
            items,
            count: items.len(),
            selected: self.selected,
            is_focused,
            style: SelectListStyle {
                base: BaseStyle {
                    border: None,
                    padding,
                    bg: None,
                    fg: None,
                },
                selection: SelectionStyle::default(),
                scrollbar: ScrollbarStyle::default(),
            },
            behavior: SelectListBehavior::default(),
            on_select: self.on_select,
            render_item: &clone_line,
        }
    }

    /// Value Enter should submit, if any
    fn submission(&self, browsed: bool) -> Option<String> {
        let picked = browsed
            .then(|| self.suggestions.get(self.selected))
            .flatten()
            .map(|option| option.value.clone());
        let typed = self.query.trim();
        picked.or_else(|| (!typed.is_empty()).then(|| typed.to_string()))
    }
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
            self.list = SelectList::new();
            self.browsed = false;
        }
        self.was_open = is_open;
    }

    fn suggestion_items(suggestions: &[SearchOption], query: &str) -> Vec<Line<'static>> {
        let name = Style::default().fg(Color::Reset);
        let hit = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let label = Style::default().fg(DIM);
        suggestions
            .iter()
            .map(|option| {
                let mut line = highlight_substring(&option.value, query.trim(), name, hit);
                line.spans
                    .push(Span::styled(format!("  {}", option.label), label));
                line
            })
            .collect()
    }
}

impl Component<Action> for SearchOverlay {
    type Props<'a> = SearchOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if !props.is_focused {
            return Vec::new();
        }

        match key.code {
            KeyCode::Esc => vec![Action::SearchClose],
            KeyCode::Enter => props
                .submission(self.browsed)
                .map(props.on_query_submit)
                .into_iter()
                .collect(),
            KeyCode::Up | KeyCode::Down if !props.suggestions.is_empty() => {
                self.browsed = true;
                let items = Self::suggestion_items(props.suggestions, props.query);
                self.list
                    .handle_event(event, props.list(&items, true, Padding::xy(1, 1)))
                    .into_iter()
                    .collect()
            }
            KeyCode::Up | KeyCode::Down => Vec::new(),
            _ => {
                // Editing the query starts a new suggestion list
                self.browsed = false;
                let base = BaseStyle {
                    border: None,
                    padding: Padding::new(1, 0, 1, 0),
                    bg: None,
                    fg: None,
                };
                self.input
                    .handle_event(event, props.input(true, base))
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let SearchOverlay {
            input, list, modal, ..
        } = self;
        let items = Self::suggestion_items(props.suggestions, props.query);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let [query_area, list_area] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(content_area);

            let base = BaseStyle {
                border: None,
                padding: Padding::all(1),
                bg: Some(INPUT_BG),
                fg: None,
            };
            input.render(frame, query_area, props.input(props.is_focused, base));
            list.render(
                frame,
                list_area,
                props.list(&items, props.is_focused, Padding::all(1)),
            );
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area(area),
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(DIALOG_BG),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::SearchClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn option(value: &str, label: &str) -> SearchOption {
        SearchOption {
            value: value.into(),
            label: label.into(),
        }
    }

    fn options() -> Vec<SearchOption> {
        vec![option("Pikachu", "#25"), option("Raichu", "#26")]
    }

    fn props<'a>(
        query: &'a str,
        suggestions: &'a [SearchOption],
        selected: usize,
    ) -> SearchOverlayProps<'a> {
        SearchOverlayProps {
            query,
            suggestions,
            selected,
            is_focused: true,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchSubmit,
            on_select: Action::SearchSelect,
        }
    }

    fn enter(overlay: &mut SearchOverlay, props: SearchOverlayProps<'_>) -> Vec<Action> {
        overlay
            .handle_event(&press(KeyCode::Enter), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_enter_submits_typed_name_over_first_suggestion() {
        let mut overlay = SearchOverlay::new();
        // Kadabra renders earlier and also contains "abra"
        let suggestions = vec![option("Kadabra", "#64"), option("Abra", "#63")];

        let actions = enter(&mut overlay, props("Abra", &suggestions, 0));

        actions.assert_count(1);
        actions.assert_first(Action::SearchSubmit("Abra".into()));
    }

    #[test]
    fn test_enter_submits_browsed_suggestion() {
        let mut overlay = SearchOverlay::new();
        let suggestions = options();

        let moved: Vec<_> = overlay
            .handle_event(&press(KeyCode::Down), props("chu", &suggestions, 0))
            .into_iter()
            .collect();
        moved.assert_first(Action::SearchSelect(1));

        let actions = enter(&mut overlay, props("chu", &suggestions, 1));
        actions.assert_first(Action::SearchSubmit("Raichu".into()));
    }

    #[test]
    fn test_typing_after_browsing_submits_text_again() {
        let mut overlay = SearchOverlay::new();
        let suggestions = options();
        let _: Vec<_> = overlay
            .handle_event(&press(KeyCode::Down), props("chu", &suggestions, 0))
            .into_iter()
            .collect();
        let _: Vec<_> = overlay
            .handle_event(&press(KeyCode::Char('x')), props("chu", &suggestions, 1))
            .into_iter()
            .collect();

        let actions = enter(&mut overlay, props("chux", &suggestions, 0));
        actions.assert_first(Action::SearchSubmit("chux".into()));
    }

    #[test]
    fn test_enter_on_empty_query_submits_nothing() {
        let mut overlay = SearchOverlay::new();
        let suggestions = options();

        enter(&mut overlay, props("", &suggestions, 0)).assert_empty();
        enter(&mut overlay, props("   ", &suggestions, 0)).assert_empty();
    }

    #[test]
    fn test_enter_without_suggestions_submits_query() {
        let mut overlay = SearchOverlay::new();

        let actions = enter(&mut overlay, props(" agumon ", &[], 0));

        actions.assert_first(Action::SearchSubmit("agumon".into()));
    }

    #[test]
    fn test_escape_closes() {
        let mut overlay = SearchOverlay::new();
        let actions: Vec<_> = overlay
            .handle_event(&press(KeyCode::Esc), props("", &[], 0))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchClose);
    }

    #[test]
    fn test_render_lists_suggestions_with_labels() {
        let mut render = RenderHarness::new(80, 24);
        let mut overlay = SearchOverlay::new();
        let suggestions = options();

        let output = render.render_to_string_plain(|frame| {
            overlay.render(frame, frame.area(), props("chu", &suggestions, 0));
        });

        assert!(output.contains("Pikachu  #25"));
        assert!(output.contains("Raichu  #26"));
    }
}
