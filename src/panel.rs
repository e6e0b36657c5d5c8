use std::collections::BTreeMap;
use std::fmt;

use crossbeam::channel::Receiver;
use log::{debug, error, info};
use serde_json::Value;

use crate::collaborators::{DataLoader, DateFormatter, ForceConfig, GraphRenderer, NodeSearch};
use crate::loader::{DatasetIndex, LoaderEvent, RequestTicket, Snapshot};
use crate::state::{NodeRef, PanelState, TimeSlider};
use crate::status::NoticeLog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// The requested dataset is not present in the loaded listing.
    DatasetNotFound(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatasetNotFound(option) => write!(f, "unknown dataset: {option}"),
        }
    }
}

impl std::error::Error for PanelError {}

/// The control-panel view-model. Owns [`PanelState`], holds the injected
/// collaborators, and is the sole mutation entry point for the state.
///
/// All methods run on the UI thread and never block; loader completions are
/// picked up by [`Panel::poll`] once per frame.
pub struct Panel {
    state: PanelState,
    config: ForceConfig,
    renderer: Box<dyn GraphRenderer>,
    loader: Box<dyn DataLoader>,
    formatter: Box<dyn DateFormatter>,
    searcher: Box<dyn NodeSearch>,
    notices: NoticeLog,
    events: Receiver<LoaderEvent>,
    generation: u64,
}

impl Panel {
    pub fn new(
        renderer: Box<dyn GraphRenderer>,
        loader: Box<dyn DataLoader>,
        formatter: Box<dyn DateFormatter>,
        searcher: Box<dyn NodeSearch>,
        config: ForceConfig,
        events: Receiver<LoaderEvent>,
    ) -> Self {
        Self {
            state: PanelState::new(),
            config,
            renderer,
            loader,
            formatter,
            searcher,
            notices: NoticeLog::new(),
            events,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeLog {
        &mut self.notices
    }

    /// Whether `ticket` still belongs to the newest snapshot request.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.value() == self.generation
    }

    /// Switches the panel to `option` and asks the loader for its current
    /// snapshot. Fails without touching state when the dataset is absent
    /// from the listing.
    pub fn select_dataset(&mut self, option: &str) -> Result<(), PanelError> {
        let listing_key = format!("public/{option}");
        let Some(entries) = self.state.full_options.get(&listing_key) else {
            return Err(PanelError::DatasetNotFound(option.to_string()));
        };

        self.state.time_options = entries.iter().map(|e| strip_dataset_prefix(e)).collect();
        self.state.current_option = option.to_string();
        self.state.current_time.clear();

        let last = self.state.time_options.len().saturating_sub(1);
        self.state.slider.max = last;
        self.state.slider.value = last;
        self.state.slider.label = self
            .state
            .time_options
            .last()
            .map_or_else(String::new, |t| self.formatter.format_date(t));

        let ticket = self.next_ticket();
        info!(
            "selected dataset {option} with {} snapshots, request {ticket}",
            self.state.time_options.len()
        );
        self.loader.generate(option, ticket);
        Ok(())
    }

    /// Switches the panel to the snapshot `new_time` of the current dataset.
    /// The value is not validated here; the slider only presents members of
    /// `time_options`.
    pub fn select_time(&mut self, new_time: &str) {
        self.state.current_time = new_time.to_string();
        let ticket = self.next_ticket();
        info!("selected time {new_time}, request {ticket}");
        self.loader.generate(new_time, ticket);
    }

    pub fn toggle_component_mode(&mut self) {
        self.state.component_mode = !self.state.component_mode;
    }

    pub fn toggle_show_all_labels(&mut self) {
        self.state.show_all_labels = !self.state.show_all_labels;
    }

    /// Starts or stops the renderer's force simulation. The pre-toggle value
    /// picks the instruction: running -> stop, stopped -> start.
    pub fn toggle_force(&mut self) {
        if self.state.force_on {
            self.renderer.stop_layout();
        } else {
            self.renderer.start_layout(&self.config);
        }
        self.state.force_on = !self.state.force_on;
        info!(
            "force layout {}",
            if self.state.force_on { "running" } else { "stopped" }
        );
    }

    /// Renders the highlighted path as `a->b->c`. Empty string when no path
    /// is highlighted.
    pub fn path_to_string(&self) -> String {
        match &self.state.selected_path {
            Some(path) => path
                .iter()
                .map(|n| n.id.as_str())
                .collect::<Vec<_>>()
                .join("->"),
            None => String::new(),
        }
    }

    /// Asks the backing service to rebuild its datasets from source data.
    /// Only meaningful against the full server deployment; completion is
    /// handled in [`Panel::poll`].
    pub fn recompile(&mut self) {
        info!("requesting dataset recompile");
        self.loader.recompile();
    }

    /// Re-fetches the dataset listing.
    pub fn reload_options(&mut self) {
        self.loader.reload_options();
    }

    /// Stores the term and hands it to the search routine.
    pub fn search(&mut self, term: &str) {
        self.state.search_term = term.to_string();
        debug!("searching nodes for {term:?}");
        self.searcher.search(term);
    }

    pub fn set_current_tab(&mut self, tab: usize) {
        self.state.current_tab = tab;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.state.search_term = term.to_string();
    }

    /// Moves the slider, clamped to its range, and refreshes the date label.
    pub fn set_slider_value(&mut self, value: usize) {
        self.state.slider.value = value.min(self.state.slider.max);
        self.state.slider.label = self
            .state
            .time_options
            .get(self.state.slider.value)
            .map_or_else(String::new, |t| self.formatter.format_date(t));
    }

    /// Records a node selection and its display metadata, as reported by the
    /// rendering layer.
    pub fn select_node(
        &mut self,
        node: NodeRef,
        basic_info: BTreeMap<String, Value>,
        links: BTreeMap<String, Value>,
    ) {
        debug!("selected node {}", node.id);
        self.state.selected_node = Some(node);
        self.state.basic_info = basic_info;
        self.state.links = links;
    }

    pub fn clear_selection(&mut self) {
        self.state.selected_node = None;
        self.state.selected_path = None;
        self.state.basic_info.clear();
        self.state.links.clear();
    }

    /// Stores the highlighted path; an empty path clears the highlight.
    pub fn set_selected_path(&mut self, path: Vec<NodeRef>) {
        self.state.selected_path = if path.is_empty() { None } else { Some(path) };
    }

    /// Drains the loader channel, applies listing and recompile completions
    /// to the state, and returns the snapshots that are still current for the
    /// host to hand to the rendering layer. Stale snapshots are dropped.
    pub fn poll(&mut self) -> Vec<(String, Snapshot)> {
        let mut fresh = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                LoaderEvent::Options(Ok(index)) => self.apply_options(index),
                LoaderEvent::Options(Err(err)) => {
                    error!("options reload failed: {err}");
                    self.notices.error(format!("options reload failed: {err}"));
                }
                LoaderEvent::Snapshot { ticket, key, result } => {
                    if !self.is_current(ticket) {
                        debug!("dropping stale snapshot {key} from request {ticket}");
                        continue;
                    }
                    match result {
                        Ok(snapshot) => fresh.push((key, snapshot)),
                        Err(err) => {
                            error!("loading {key} failed: {err}");
                            self.notices.error(format!("loading {key} failed: {err}"));
                        }
                    }
                }
                LoaderEvent::Recompiled(Ok(())) => {
                    info!("recompile finished, reloading the dataset listing");
                    self.notices.info("recompile finished");
                    self.loader.reload_options();
                }
                LoaderEvent::Recompiled(Err(err)) => {
                    error!("recompile failed: {err}");
                    self.notices.error(format!("recompile failed: {err}"));
                }
            }
        }
        fresh
    }

    fn next_ticket(&mut self) -> RequestTicket {
        self.generation += 1;
        RequestTicket(self.generation)
    }

    /// Installs a freshly loaded listing. A still-present selection survives
    /// with its `time_options` recomputed; a vanished one is reset.
    fn apply_options(&mut self, index: DatasetIndex) {
        self.state.full_options = index.0;
        self.state.options = self
            .state
            .full_options
            .keys()
            .map(|k| k.strip_prefix("public/").unwrap_or(k).to_string())
            .collect();
        info!("dataset listing loaded: {} datasets", self.state.options.len());

        if self.state.current_option.is_empty() {
            return;
        }
        let listing_key = format!("public/{}", self.state.current_option);
        if let Some(entries) = self.state.full_options.get(&listing_key) {
            self.state.time_options = entries.iter().map(|e| strip_dataset_prefix(e)).collect();
            if !self.state.time_options.contains(&self.state.current_time) {
                self.state.current_time.clear();
            }
            let last = self.state.time_options.len().saturating_sub(1);
            self.state.slider.max = last;
            self.state.slider.value = self.state.slider.value.min(last);
            self.state.slider.label = self
                .state
                .time_options
                .get(self.state.slider.value)
                .map_or_else(String::new, |t| self.formatter.format_date(t));
        } else {
            info!(
                "dataset {} disappeared from the listing, clearing selection",
                self.state.current_option
            );
            self.state.current_option.clear();
            self.state.current_time.clear();
            self.state.time_options.clear();
            self.state.slider = TimeSlider::default();
        }
    }
}

/// Drops the leading path segment of a snapshot key: `wikiA/2020-01-01`
/// becomes `2020-01-01`, a key with no separator becomes empty.
fn strip_dataset_prefix(entry: &str) -> String {
    let mut segments = entry.split('/');
    segments.next();
    segments.collect::<Vec<_>>().join("/")
}
