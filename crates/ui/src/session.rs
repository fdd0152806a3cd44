use crate::config::ViewerConfig;
use crate::outbox::Outbox;
use crate::render::{Layout, Painter};
use crate::state::ViewerState;
use crate::theme::Theme;
use core_types::{CellPos, Viewport};
use css::ClassCache;
use dom::{BuildError, Document, Event, MutationStats, NodeId, RedrawScheduler};
use input::{Modifiers, PointerPhase, ResizeTracker, key_request, pointer_request, wheel_request};
use protocol::{ProtocolError, Request, decode_frame};

/// One connected viewer: inbound frames in, host tree and requests out.
pub struct Session {
    doc: Document,
    classes: ClassCache,
    layout: Layout,
    theme: Theme,
    state: ViewerState,
    scheduler: RedrawScheduler,
    resize: ResizeTracker,
    outbox: Outbox,
}

impl Session {
    /// Starts a session and queues the initial `resize` for the configured
    /// viewport.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut classes = ClassCache::new(config.class_prefix.clone());
        let layout = Layout::new(&mut classes);
        let mut session = Self {
            doc: Document::new(),
            classes,
            layout,
            theme: Theme::with_overrides(&config.colours),
            state: ViewerState::new(config.viewport()),
            scheduler: RedrawScheduler::new(),
            resize: ResizeTracker::new(),
            outbox: Outbox::new(),
        };
        session.resize(config.viewport());
        session
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn classes(&self) -> &ClassCache {
        &self.classes
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn root(&self) -> Option<NodeId> {
        self.doc.root()
    }

    /// HTML of the current screen, empty before the first paint.
    pub fn html(&self) -> String {
        self.doc.root().map(|root| self.doc.outer_html(root)).unwrap_or_default()
    }

    /// Decodes and applies one frame. A frame that fails to decode changes
    /// nothing. Returns the number of messages applied.
    pub fn receive(&mut self, frame: &str) -> Result<usize, ProtocolError> {
        let messages = decode_frame(frame)?;
        let applied = self.state.apply_all(messages);
        self.scheduler.request();
        Ok(applied)
    }

    /// Runs the pending pass, if any. Returns the mutation counts of the pass,
    /// or `None` when no pass was pending. A pass before the screen is ready
    /// leaves the tree empty.
    pub fn redraw(&mut self) -> Result<Option<MutationStats>, BuildError> {
        if !self.scheduler.begin() {
            return Ok(None);
        }
        let mut painter = Painter::new(&mut self.classes, &self.theme, &self.layout, &self.outbox);
        let screen = painter.screen(&self.state)?;
        let Some(screen) = screen else {
            log::debug!(target: "ui.session", "screen not ready");
            return Ok(Some(MutationStats::default()));
        };
        self.doc.render(screen);
        let stats = self.doc.take_stats();
        log::debug!(target: "ui.session", "pass {}: {stats}", self.scheduler.passes());
        Ok(Some(stats))
    }

    /// Drops every generated class and starts over with `theme`. Layout
    /// classes are registered again and the next pass repaints every line.
    pub fn reset_styles(&mut self, theme: Theme) {
        self.classes.clear();
        self.layout = Layout::new(&mut self.classes);
        self.theme = theme;
        self.scheduler.request();
    }

    pub fn key(&mut self, key: &str, mods: Modifiers) -> bool {
        self.queue(key_request(key, mods))
    }

    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        self.queue(wheel_request(delta_x, delta_y))
    }

    pub fn pointer(&mut self, phase: PointerPhase, buttons: u16, button: u16, pos: CellPos) -> bool {
        self.queue(pointer_request(phase, buttons, button, pos))
    }

    /// Reports a new viewport; the editor hears about it only on change.
    /// Menu sizing follows the viewport on the next pass.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let request = self.resize.observe(viewport);
        let changed = self.queue(request);
        if changed {
            self.state.viewport = viewport;
            self.scheduler.request();
        }
        changed
    }

    /// Delivers a host event to the tree. Handlers may queue requests.
    pub fn dispatch(&mut self, target: NodeId, event: &mut Event) -> bool {
        self.doc.dispatch(target, event)
    }

    pub fn drain_requests(&mut self) -> Vec<Request> {
        self.outbox.drain()
    }

    /// Queued requests, encoded for the wire.
    pub fn drain_outbox(&mut self) -> Result<Vec<String>, ProtocolError> {
        self.outbox.drain().iter().map(Request::to_json).collect()
    }

    fn queue(&self, request: Option<Request>) -> bool {
        match request {
            Some(request) => {
                self.outbox.push(request);
                true
            }
            None => false,
        }
    }
}
