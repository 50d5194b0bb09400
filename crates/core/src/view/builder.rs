use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use super::TranscriptView;
use super::state::{ViewState, run_view};
use crate::config::ViewConfig;
use crate::frame::Frame;
use crate::render::{Registry, ResultView};

/// [`TranscriptView`] builder.
pub struct TranscriptViewBuilder {
    config: ViewConfig,
    registry: Registry,
    on_render: Option<Box<dyn Fn(&Frame) + Send + Sync>>,
}

impl TranscriptViewBuilder {
    /// Creates a builder with the default configuration and the built-in
    /// result views.
    #[inline]
    pub fn new() -> Self {
        Self {
            config: ViewConfig::default(),
            registry: Registry::standard(),
            on_render: None,
        }
    }

    /// Sets the configuration.
    #[inline]
    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the set of result views.
    #[inline]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers an additional result view.
    #[inline]
    pub fn with_view<V: ResultView>(mut self, view: V) -> Self {
        self.registry.register(view);
        self
    }

    /// Attaches a callback invoked with a fresh frame whenever what the view
    /// shows changes.
    #[inline]
    pub fn on_render(
        mut self,
        on_render: impl Fn(&Frame) + Send + Sync + 'static,
    ) -> Self {
        self.on_render = Some(Box::new(on_render));
        self
    }

    /// Mounts the view.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> TranscriptView {
        let Self {
            config,
            registry,
            on_render,
        } = self;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        let state = ViewState::new(config, registry, on_render, cmd_tx.downgrade());
        let task = tokio::spawn(
            run_view(state, cmd_rx, kill_rx).instrument(debug_span!("transcript view")),
        );

        TranscriptView {
            cmd_tx,
            kill_tx,
            task: Some(task),
        }
    }
}

impl Default for TranscriptViewBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
