//! gradedex - Pokémon tier list TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use gradedex::action::Action;
use gradedex::artwork::load_artwork;
use gradedex::components::search_overlay::modal_area;
use gradedex::components::{Component, DexView, DexViewProps, SearchOverlay, SearchOverlayProps};
use gradedex::config::{Settings, clock_seed};
use gradedex::context::DexContext;
use gradedex::effect::Effect;
use gradedex::reducer::reducer;
use gradedex::render::yield_between_batches;
use gradedex::state::{AppState, HIGHLIGHT_DURATION_MS, TICK_MS};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

/// Pokémon tier list: every species graded by its evolutionary line
#[derive(Parser, Debug)]
#[command(name = "gradedex")]
#[command(about = "Grades Pokémon by their strongest evolution and renders the cards in batches")]
struct Args {
    /// Species dataset (JSON object of slug -> record); embedded when omitted
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Card template with {name} {no} {image} {grade} {stamp} {types} {evo}
    #[arg(long)]
    template: Option<PathBuf>,

    /// Render order seed; a new order every run when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Cards per batch (minimum 1)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// Extra pause between batches
    #[arg(long, default_value = "0")]
    batch_delay_ms: u64,

    /// Do not download artwork
    #[arg(long)]
    no_artwork: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            dataset: self.dataset.clone(),
            template: self.template.clone(),
            seed: self.seed.unwrap_or_else(clock_seed),
            batch_size: usize::try_from(self.batch_size).unwrap_or(usize::MAX),
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            artwork: !self.no_artwork,
        }
    }
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DexComponentId {
    Grid,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DexBindingContext {
    Grid,
    Search,
}

impl EventRoutingState<DexComponentId, DexBindingContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            Some(DexComponentId::Grid)
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexBindingContext {
        match id {
            DexComponentId::Grid => DexBindingContext::Grid,
            DexComponentId::Search => DexBindingContext::Search,
        }
    }

    fn default_context(&self) -> DexBindingContext {
        DexBindingContext::Grid
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let settings = args.settings();
    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    // Dataset and template problems are reported before the terminal is touched
    let context = match DexContext::load(&settings).await {
        Ok(context) => Arc::new(context),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let total = context.dex().len();
    let card_height = context.template().card_height();
    let artwork = context.artwork_enabled();
    let state = debug
        .load_state_or_else_async(move || async move {
            let mut state = AppState::new(total, card_height, artwork);
            if let Ok(size) = crossterm::terminal::size() {
                state.terminal_size = size;
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, context, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct DexUi {
    context: Arc<DexContext>,
    view: DexView,
    search: SearchOverlay,
}

fn search_props(state: &AppState, is_focused: bool) -> SearchOverlayProps<'_> {
    SearchOverlayProps {
        query: &state.search.query,
        suggestions: &state.search.suggestions,
        selected: state.search.selected,
        is_focused,
        on_query_change: Action::SearchQueryChange,
        on_query_submit: Action::SearchSubmit,
        on_select: Action::SearchSelect,
    }
}

impl DexUi {
    fn new(context: Arc<DexContext>) -> Self {
        Self {
            context,
            view: DexView,
            search: SearchOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        event_ctx.set_component_area(DexComponentId::Grid, area);

        let props = DexViewProps {
            state,
            template: self.context.template(),
            is_focused: render_ctx.is_focused() && !state.search.active,
        };
        self.view.render(frame, area, props);

        self.search.set_open(state.search.active);
        if state.search.active {
            event_ctx.set_component_area(DexComponentId::Search, modal_area(area));
            self.search
                .render(frame, area, search_props(state, render_ctx.is_focused()));
        } else {
            event_ctx.component_areas.remove(&DexComponentId::Search);
        }
    }

    fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DexViewProps {
            state,
            template: self.context.template(),
            is_focused: true,
        };
        let actions: Vec<_> = self.view.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search.active);
        let actions: Vec<_> = self
            .search
            .handle_event(event, search_props(state, true))
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    context: Arc<DexContext>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new(Arc::clone(&context))));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexBindingContext> = EventBus::new();
    let keybindings: Keybindings<DexBindingContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(DexComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Scroll targets depend on the grid size, so resizes go through the store
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &context),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, context: &Arc<DexContext>) {
    match effect {
        Effect::RenderBatch { offset } => {
            let context = Arc::clone(context);
            ctx.tasks().spawn(TaskKey::new("render_batch"), async move {
                yield_between_batches(context.batch_delay()).await;
                match context.render_batch(offset) {
                    Some(batch) => Action::BatchDidRender(batch),
                    None => Action::RenderDidFinish,
                }
            });
        }
        Effect::LocateSpecies { query, fallback } => {
            // Unknown names are dropped without feedback
            let Some(id) = context.locate_submitted(&query, fallback.as_deref()) else {
                return;
            };
            ctx.tasks()
                .spawn(TaskKey::new("locate"), async move { Action::CardFocus(id) });
        }
        Effect::ExpireHighlight { token } => {
            // Same key: a newer highlight replaces the pending expiry
            ctx.tasks().spawn(TaskKey::new("highlight"), async move {
                tokio::time::sleep(Duration::from_millis(HIGHLIGHT_DURATION_MS)).await;
                Action::HighlightDidExpire(token)
            });
        }
        Effect::LoadArtwork { number, url } => {
            let key = format!("artwork_{number}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match load_artwork(&url).await {
                    Ok(artwork) => Action::ArtworkDidLoad(number, artwork),
                    Err(err) => Action::ArtworkDidError(number, err.to_string()),
                }
            });
        }
    }
}
