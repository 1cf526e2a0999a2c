//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::render::{EvolutionPreview, apply_batch};
use crate::state::{AppState, Highlight, RenderPhase};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            if state.render.phase != RenderPhase::Idle {
                return DispatchResult::unchanged();
            }
            if state.render.total == 0 {
                state.render.phase = RenderPhase::Done;
                return DispatchResult::changed();
            }
            state.render.phase = RenderPhase::Rendering;
            state.message = None;
            DispatchResult::changed_with(Effect::RenderBatch { offset: 0 })
        }

        // ===== Render actions =====
        Action::BatchDidRender(batch) => {
            if state.render.phase != RenderPhase::Rendering || batch.offset != state.rendered() {
                return DispatchResult::unchanged();
            }
            if batch.is_empty() {
                state.render.phase = RenderPhase::Done;
                return DispatchResult::changed();
            }

            let first = state.rendered() == 0;
            apply_batch(state, batch);
            state.render.batches += 1;

            let mut effects = Vec::new();
            let focused = match state.pending_focus.take() {
                Some(id) => match state.card_index(&id) {
                    Some(index) => {
                        state.message = None;
                        effects.extend(focus_card(state, index));
                        true
                    }
                    None => {
                        state.pending_focus = Some(id);
                        false
                    }
                },
                None => false,
            };
            if first && !focused {
                effects.extend(artwork_follow_up(state));
            }

            if state.rendered() >= state.render.total {
                state.render.phase = RenderPhase::Done;
            } else {
                effects.push(Effect::RenderBatch {
                    offset: state.rendered(),
                });
            }
            changed_with(effects)
        }

        Action::RenderDidFinish => {
            if state.render.phase != RenderPhase::Rendering {
                return DispatchResult::unchanged();
            }
            state.render.phase = RenderPhase::Done;
            if state.pending_focus.take().is_some() {
                state.message = None;
            }
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search.active = true;
            state.search.query.clear();
            state.search.selected = 0;
            state.search.refresh(&state.page.options);
            DispatchResult::changed()
        }

        Action::SearchClose => {
            close_search(state);
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search.query = query;
            state.search.selected = 0;
            state.search.refresh(&state.page.options);
            DispatchResult::changed()
        }

        Action::SearchSelect(index) => {
            if index < state.search.suggestions.len() && index != state.search.selected {
                state.search.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchSubmit(value) => {
            let highlighted = state.search.selected_value().map(str::to_string);
            close_search(state);
            let query = value.trim().to_string();
            if query.is_empty() {
                return DispatchResult::changed();
            }
            let fallback = highlighted.filter(|name| !name.eq_ignore_ascii_case(&query));
            DispatchResult::changed_with(Effect::LocateSpecies { query, fallback })
        }

        // ===== Card actions =====
        Action::CardFocus(id) => match state.card_index(&id) {
            Some(index) => changed_with(focus_card(state, index)),
            None if state.render.phase == RenderPhase::Rendering => {
                state.message = Some(format!("{id} is still being graded"));
                state.pending_focus = Some(id);
                DispatchResult::changed()
            }
            None => DispatchResult::unchanged(),
        },

        Action::HighlightDidExpire(token) => {
            if state.highlight.as_ref().is_some_and(|h| h.token == token) {
                state.highlight = None;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Selection actions =====
        Action::SelectionMove(delta) => {
            let index = offset_index(state.selected, i64::from(delta), state.rendered());
            select_index(state, index)
        }

        Action::SelectionRow(delta) => {
            let columns = i64::from(state.metrics().columns);
            let index = offset_index(state.selected, i64::from(delta) * columns, state.rendered());
            select_index(state, index)
        }

        Action::SelectionPage(delta) => {
            let metrics = state.metrics();
            let stride = i64::from(metrics.columns) * i64::from(metrics.visible_rows);
            let index = offset_index(state.selected, i64::from(delta) * stride, state.rendered());
            select_index(state, index)
        }

        Action::SelectionJumpTop => select_index(state, 0),

        Action::SelectionJumpBottom => {
            let last = state.rendered().saturating_sub(1);
            select_index(state, last)
        }

        // ===== Artwork actions =====
        Action::ArtworkDidLoad(number, artwork) => {
            state.artwork.insert(number, DataResource::Loaded(artwork));
            DispatchResult::changed()
        }

        Action::ArtworkDidError(number, error) => {
            state.artwork.insert(number, DataResource::Failed(error));
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            let metrics = state.metrics();
            let cards = state.rendered();
            if cards > 0 {
                state.scroll.target =
                    metrics.top_showing(state.scroll.target, state.selected, cards);
            }
            state.scroll.clamp(metrics.max_top(cards));
            DispatchResult::changed()
        }

        Action::UiRender => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            let scrolled = state.scroll.step();
            if scrolled || state.highlight.is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn close_search(state: &mut AppState) {
    state.search.active = false;
    state.search.query.clear();
    state.search.suggestions.clear();
    state.search.selected = 0;
}

fn offset_index(current: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = (len - 1) as i64;
    (current as i64 + delta).clamp(0, last) as usize
}

/// Keyboard selection: scroll only as far as needed to keep it visible
fn select_index(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    let cards = state.rendered();
    if cards == 0 || index == state.selected {
        return DispatchResult::unchanged();
    }
    state.selected = index;
    state.scroll.target = state.metrics().top_showing(state.scroll.target, index, cards);
    changed_with(artwork_follow_up(state))
}

/// Search hit: select, centre, and start a fresh highlight
fn focus_card(state: &mut AppState, index: usize) -> Vec<Effect> {
    let Some(card_id) = state.page.cards.get(index).map(|card| card.id.clone()) else {
        return Vec::new();
    };
    state.selected = index;
    state.scroll.target = state.metrics().centered_top(index, state.rendered());
    state.highlight_seq += 1;
    let token = state.highlight_seq;
    state.highlight = Some(Highlight {
        card_id,
        token,
        since_tick: state.tick,
    });

    let mut effects = vec![Effect::ExpireHighlight { token }];
    effects.extend(artwork_follow_up(state));
    effects
}

/// Artwork requests for the selected card and its evolution preview
fn artwork_follow_up(state: &mut AppState) -> Vec<Effect> {
    if !state.artwork_enabled {
        return Vec::new();
    }
    let Some(card) = state.selected_card() else {
        return Vec::new();
    };
    let mut wanted = vec![(card.number, card.artwork_url.clone())];
    if let Some(EvolutionPreview {
        number: Some(number),
        artwork_url: Some(url),
        ..
    }) = &card.evolution
    {
        wanted.push((*number, url.clone()));
    }

    let mut effects = Vec::new();
    for (number, url) in wanted {
        if state.artwork.contains_key(&number) {
            continue;
        }
        state.artwork.insert(number, DataResource::Loading);
        effects.push(Effect::LoadArtwork { number, url });
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Artwork;
    use crate::grade::Grade;
    use crate::render::{Batch, Card, SearchOption, artwork_url, detail_url};

    fn card(name: &str, number: u16) -> Card {
        Card {
            id: name.into(),
            name: name.into(),
            number,
            number_label: format!("#{number:03}"),
            detail_url: detail_url(&name.to_lowercase()),
            artwork_url: artwork_url(number),
            grade: Grade::C,
            type_line: "Normal".into(),
            evolution: None,
        }
    }

    fn batch(offset: usize, names: &[&str]) -> Batch {
        let cards: Vec<Card> = names
            .iter()
            .enumerate()
            .map(|(i, name)| card(name, (offset + i + 1) as u16))
            .collect();
        let options = cards
            .iter()
            .map(|card| SearchOption {
                value: card.name.clone(),
                label: format!("#{}", card.number),
            })
            .collect();
        Batch {
            offset,
            cards,
            options,
        }
    }

    fn rendering(total: usize) -> AppState {
        let mut state = AppState::new(total, 7, false);
        reducer(&mut state, Action::Init);
        state
    }

    #[test]
    fn test_init_schedules_first_batch() {
        let mut state = AppState::new(3, 7, false);
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert_eq!(result.effects, vec![Effect::RenderBatch { offset: 0 }]);
        assert_eq!(state.render.phase, RenderPhase::Rendering);
    }

    #[test]
    fn test_init_with_empty_index_is_done() {
        let mut state = AppState::new(0, 7, false);
        let result = reducer(&mut state, Action::Init);

        assert!(result.effects.is_empty());
        assert!(state.is_done());
        assert!(state.page.cards.is_empty());
    }

    #[test]
    fn test_batches_append_then_schedule_next() {
        let mut state = rendering(3);

        let result = reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra"])));
        assert_eq!(result.effects, vec![Effect::RenderBatch { offset: 2 }]);
        assert_eq!(state.rendered(), 2);
        assert_eq!(state.page.options.len(), 2);
        assert_eq!(state.search.bindings, 1);

        let result = reducer(&mut state, Action::BatchDidRender(batch(2, &["Alakazam"])));
        assert!(result.effects.is_empty());
        assert!(state.is_done());
        assert_eq!(state.render.batches, 2);
        assert_eq!(state.card_index("Alakazam"), Some(2));
    }

    #[test]
    fn test_stale_batch_is_ignored() {
        let mut state = rendering(4);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra"])));

        let result = reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra"])));

        assert!(!result.changed);
        assert_eq!(state.rendered(), 2);
        assert_eq!(state.search.bindings, 1);
    }

    #[test]
    fn test_empty_batch_finishes() {
        let mut state = rendering(4);
        let result = reducer(&mut state, Action::BatchDidRender(batch(0, &[])));

        assert!(result.changed);
        assert!(state.is_done());
    }

    #[test]
    fn test_focus_selects_centres_and_highlights() {
        let mut state = rendering(30);
        state.terminal_size = (80, 38);
        let names: Vec<String> = (0..30).map(|n| format!("Mon{n}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        reducer(&mut state, Action::BatchDidRender(batch(0, &names)));

        let result = reducer(&mut state, Action::CardFocus("Mon20".into()));

        assert_eq!(result.effects, vec![Effect::ExpireHighlight { token: 1 }]);
        assert_eq!(state.selected, 20);
        // 3 columns x 5 rows: row 6 centred -> top 4
        assert_eq!(state.scroll.target, 4);
        assert!(state.highlight_lit("Mon20"));
    }

    #[test]
    fn test_focus_waits_for_unrendered_card() {
        let mut state = rendering(4);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra"])));

        let result = reducer(&mut state, Action::CardFocus("Gastly".into()));
        assert!(result.effects.is_empty());
        assert_eq!(state.pending_focus.as_deref(), Some("Gastly"));

        let result = reducer(&mut state, Action::BatchDidRender(batch(2, &["Alakazam", "Gastly"])));
        assert_eq!(result.effects, vec![Effect::ExpireHighlight { token: 1 }]);
        assert_eq!(state.selected, 3);
        assert_eq!(state.pending_focus, None);
        assert_eq!(state.message, None);
    }

    #[test]
    fn test_unknown_focus_after_render_does_nothing() {
        let mut state = rendering(1);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra"])));

        let result = reducer(&mut state, Action::CardFocus("Agumon".into()));

        assert!(!result.changed);
        assert!(state.highlight.is_none());
        assert_eq!(state.pending_focus, None);
    }

    #[test]
    fn test_new_highlight_invalidates_previous_expiry() {
        let mut state = rendering(2);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra"])));
        reducer(&mut state, Action::CardFocus("Abra".into()));
        reducer(&mut state, Action::CardFocus("Kadabra".into()));

        let result = reducer(&mut state, Action::HighlightDidExpire(1));
        assert!(!result.changed);
        assert!(state.highlight_lit("Kadabra"));

        let result = reducer(&mut state, Action::HighlightDidExpire(2));
        assert!(result.changed);
        assert!(state.highlight.is_none());
    }

    #[test]
    fn test_search_submit_closes_and_locates() {
        let mut state = rendering(2);
        reducer(&mut state, Action::SearchOpen);
        reducer(&mut state, Action::SearchQueryChange("pika".into()));

        let result = reducer(&mut state, Action::SearchSubmit("  Pikachu ".into()));

        assert!(!state.search.active);
        assert_eq!(
            result.effects,
            vec![Effect::LocateSpecies {
                query: "Pikachu".into(),
                fallback: None,
            }]
        );
    }

    #[test]
    fn test_search_submit_keeps_highlighted_suggestion_as_fallback() {
        let mut state = rendering(2);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Kadabra", "Abra"])));
        reducer(&mut state, Action::SearchOpen);
        reducer(&mut state, Action::SearchQueryChange("abr".into()));

        let result = reducer(&mut state, Action::SearchSubmit("abr".into()));
        assert_eq!(
            result.effects,
            vec![Effect::LocateSpecies {
                query: "abr".into(),
                fallback: Some("Kadabra".into()),
            }]
        );

        // An exact name needs no fallback, even when another card is highlighted
        reducer(&mut state, Action::SearchOpen);
        reducer(&mut state, Action::SearchQueryChange("kadabra".into()));
        let result = reducer(&mut state, Action::SearchSubmit("KADABRA".into()));
        assert_eq!(
            result.effects,
            vec![Effect::LocateSpecies {
                query: "KADABRA".into(),
                fallback: None,
            }]
        );
    }

    #[test]
    fn test_blank_submit_has_no_effect() {
        let mut state = rendering(2);
        reducer(&mut state, Action::SearchOpen);
        let result = reducer(&mut state, Action::SearchSubmit("   ".into()));
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_search_suggestions_follow_query() {
        let mut state = rendering(3);
        reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra", "Kadabra", "Gastly"])));
        reducer(&mut state, Action::SearchOpen);
        assert_eq!(state.search.suggestions.len(), 3);

        reducer(&mut state, Action::SearchQueryChange("ABR".into()));
        let values: Vec<_> = state.search.suggestions.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Abra", "Kadabra"]);
    }

    #[test]
    fn test_selection_moves_clamp_to_grid() {
        let mut state = rendering(7);
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        reducer(&mut state, Action::BatchDidRender(batch(0, &names)));

        // 80 columns fit three cards per row
        reducer(&mut state, Action::SelectionRow(1));
        assert_eq!(state.selected, 3);
        reducer(&mut state, Action::SelectionMove(-1));
        assert_eq!(state.selected, 2);
        reducer(&mut state, Action::SelectionPage(5));
        assert_eq!(state.selected, 6);
        reducer(&mut state, Action::SelectionJumpTop);
        assert_eq!(state.selected, 0);

        let result = reducer(&mut state, Action::SelectionMove(-1));
        assert!(!result.changed);
    }

    #[test]
    fn test_first_batch_requests_artwork() {
        let mut state = AppState::new(2, 7, true);
        reducer(&mut state, Action::Init);

        let result = reducer(&mut state, Action::BatchDidRender(batch(0, &["Abra"])));

        assert_eq!(
            result.effects,
            vec![
                Effect::LoadArtwork {
                    number: 1,
                    url: artwork_url(1)
                },
                Effect::RenderBatch { offset: 1 },
            ]
        );
        assert!(state.artwork_for(1).is_some_and(|art| art.is_loading()));
    }

    #[test]
    fn test_artwork_results_are_stored() {
        let mut state = AppState::new(2, 7, true);
        let artwork = Artwork {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        };

        reducer(&mut state, Action::ArtworkDidLoad(1, artwork.clone()));
        reducer(&mut state, Action::ArtworkDidError(2, "timeout".into()));

        assert_eq!(state.artwork_for(1).and_then(|art| art.data()), Some(&artwork));
        assert!(state.artwork_for(2).is_some_and(|art| art.error().is_some()));
    }

    #[test]
    fn test_tick_eases_scroll() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);

        state.scroll.target = 6;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.scroll.row, 2);
    }
}
