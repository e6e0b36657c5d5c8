use crossbeam::channel::Receiver;
use eframe::{App, CreationContext, Frame};
use egui::Context;
use egui_graphs::{
    DefaultEdgeShape, DefaultNodeShape, FruchtermanReingoldWithCenterGravity,
    FruchtermanReingoldWithCenterGravityState, GraphView, LayoutForceDirected,
    SettingsInteraction, SettingsNavigation, SettingsStyle,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::info;
use petgraph::stable_graph::{DefaultIx, NodeIndex};
use petgraph::Directed;
use wikigraph_panel::{event_channel, DataLoader, ForceConfig, Panel, PanelView, Snapshot};

use crate::bridge::{command_channel, ForceBridge, GraphCommand, SearchRelay};
use crate::dates::SnapshotDates;
use crate::graph::{self, DisplayGraph, NodeInfo};
use crate::loaders::{HttpLoader, SampleLoader};

type ExplorerView<'a> = GraphView<
    'a,
    NodeInfo,
    (),
    Directed,
    DefaultIx,
    DefaultNodeShape,
    DefaultEdgeShape,
    FruchtermanReingoldWithCenterGravityState,
    LayoutForceDirected<FruchtermanReingoldWithCenterGravity>,
>;

pub struct ExplorerApp {
    panel: Panel,
    view: PanelView,
    g: DisplayGraph,
    snapshot: Option<Snapshot>,
    commands: Receiver<GraphCommand>,
    pending_layout: Vec<GraphCommand>,
    last_selection: Vec<NodeIndex<DefaultIx>>,
    last_component_mode: bool,
}

impl ExplorerApp {
    pub fn new(_: &CreationContext<'_>, base_url: Option<String>) -> Self {
        let (events_tx, events_rx) = event_channel();
        let (commands_tx, commands_rx) = command_channel();

        let loader: Box<dyn DataLoader> = match base_url {
            Some(base) => Box::new(HttpLoader::new(base, events_tx)),
            None => Box::new(SampleLoader::new(events_tx)),
        };

        let mut panel = Panel::new(
            Box::new(ForceBridge::new(commands_tx.clone())),
            loader,
            Box::new(SnapshotDates),
            Box::new(SearchRelay::new(commands_tx)),
            ForceConfig::default(),
            events_rx,
        );
        panel.reload_options();

        Self {
            panel,
            view: PanelView::new(),
            g: graph::build_graph(&Snapshot::default(), None),
            snapshot: None,
            commands: commands_rx,
            pending_layout: Vec::new(),
            last_selection: Vec::new(),
            last_component_mode: false,
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                GraphCommand::Search(term) => self.run_search(&term),
                layout => self.pending_layout.push(layout),
            }
        }
    }

    fn drain_loader_events(&mut self) {
        let fresh = self.panel.poll();
        if let Some((key, snapshot)) = fresh.into_iter().last() {
            info!(
                "displaying snapshot {key}: {} nodes, {} edges",
                snapshot.nodes.len(),
                snapshot.edges.len()
            );
            self.snapshot = Some(snapshot);
            self.panel.clear_selection();
            self.rebuild_graph();
        }
    }

    fn component_root(&self) -> Option<String> {
        if !self.panel.state().component_mode {
            return None;
        }
        self.panel.state().selected_node.as_ref().map(|n| n.id.clone())
    }

    fn rebuild_graph(&mut self) {
        let Some(snapshot) = &self.snapshot else { return };
        let root = self.component_root();
        self.g = graph::build_graph(snapshot, root.as_deref());

        // Carry the selection over to the rebuilt graph.
        if let Some(selected) = self.panel.state().selected_node.clone() {
            if let Some(idx) = graph::find_node(&self.g, &selected.id) {
                self.g.set_selected_nodes(vec![idx]);
                self.last_selection = vec![idx];
                return;
            }
        }
        self.last_selection.clear();
    }

    fn run_search(&mut self, term: &str) {
        if term.is_empty() {
            return;
        }
        let matcher = SkimMatcherV2::default();
        let mut best: Option<(i64, NodeIndex<DefaultIx>)> = None;
        for idx in self.g.g().node_indices() {
            let Some(node) = self.g.g().node_weight(idx) else {
                continue;
            };
            if let Some(score) = matcher.fuzzy_match(&node.payload().label, term) {
                if best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, idx));
                }
            }
        }
        match best {
            Some((_, idx)) => {
                self.g.set_selected_nodes(vec![idx]);
                self.sync_selection();
            }
            None => self
                .panel
                .notices_mut()
                .error(format!("no node matches {term:?}")),
        }
    }

    /// Mirrors the widget's selection into the panel: the last-selected node
    /// becomes the panel selection, and with two nodes selected the shortest
    /// path between them is highlighted.
    fn sync_selection(&mut self) {
        let selected: Vec<_> = self.g.selected_nodes().to_vec();
        if selected == self.last_selection {
            return;
        }
        self.last_selection.clone_from(&selected);

        match selected.split_last() {
            None => self.panel.clear_selection(),
            Some((&primary, rest)) => {
                if let Some((node, basic, links)) = graph::selection_details(&self.g, primary) {
                    self.panel.select_node(node, basic, links);
                }
                let path = rest
                    .first()
                    .and_then(|&other| graph::shortest_path(&self.g, other, primary))
                    .unwrap_or_default();
                self.panel.set_selected_path(path);
                if self.panel.state().component_mode {
                    self.rebuild_graph();
                }
            }
        }
    }

    fn apply_layout_commands(&mut self, ui: &mut egui::Ui) {
        if self.pending_layout.is_empty() {
            return;
        }
        let mut state = ExplorerView::get_layout_state(ui);
        for command in self.pending_layout.drain(..) {
            match command {
                GraphCommand::StartLayout(config) => {
                    state.base.is_running = true;
                    state.base.dt = config.dt;
                    state.base.damping = config.damping;
                    state.base.max_step = config.max_step;
                    state.base.epsilon = config.epsilon;
                    state.base.k_scale = config.k_scale;
                    state.base.c_attract = config.c_attract;
                    state.base.c_repulse = config.c_repulse;
                    state.extras.0.enabled = config.center_gravity > 0.0;
                    state.extras.0.params.c = config.center_gravity;
                }
                GraphCommand::StopLayout => state.base.is_running = false,
                GraphCommand::Search(_) => {}
            }
        }
        ExplorerView::set_layout_state(ui, state);
    }
}

impl App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        self.drain_commands();
        self.drain_loader_events();

        if self.panel.state().component_mode != self.last_component_mode {
            self.last_component_mode = self.panel.state().component_mode;
            self.rebuild_graph();
        }

        egui::SidePanel::right("panel")
            .default_width(300.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                self.view.show(ui, &mut self.panel);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.apply_layout_commands(ui);

            let settings_interaction = &SettingsInteraction::new()
                .with_hover_enabled(true)
                .with_node_clicking_enabled(true)
                .with_node_selection_enabled(true)
                .with_node_selection_multi_enabled(true)
                .with_dragging_enabled(true);
            let settings_navigation = &SettingsNavigation::new().with_fit_to_screen_enabled(true);
            let settings_style =
                &SettingsStyle::new().with_labels_always(self.panel.state().show_all_labels);

            let mut view = ExplorerView::new(&mut self.g)
                .with_interactions(settings_interaction)
                .with_navigations(settings_navigation)
                .with_styles(settings_style);
            ui.add(&mut view);
        });

        self.sync_selection();
    }
}
