use crossbeam::channel::{unbounded, Receiver, Sender};
use log::debug;
use wikigraph_panel::{ForceConfig, GraphRenderer, NodeSearch};

/// Commands relayed from the panel to the graph view. The view's layout
/// state only exists inside egui's memory, so the collaborators queue
/// commands here and the app applies them within the frame.
#[derive(Debug, Clone)]
pub enum GraphCommand {
    StartLayout(ForceConfig),
    StopLayout,
    Search(String),
}

pub fn command_channel() -> (Sender<GraphCommand>, Receiver<GraphCommand>) {
    unbounded()
}

pub struct ForceBridge {
    commands: Sender<GraphCommand>,
}

impl ForceBridge {
    pub fn new(commands: Sender<GraphCommand>) -> Self {
        Self { commands }
    }
}

impl GraphRenderer for ForceBridge {
    fn start_layout(&mut self, config: &ForceConfig) {
        debug!("relaying layout start");
        let _ = self.commands.send(GraphCommand::StartLayout(config.clone()));
    }

    fn stop_layout(&mut self) {
        debug!("relaying layout stop");
        let _ = self.commands.send(GraphCommand::StopLayout);
    }
}

pub struct SearchRelay {
    commands: Sender<GraphCommand>,
}

impl SearchRelay {
    pub fn new(commands: Sender<GraphCommand>) -> Self {
        Self { commands }
    }
}

impl NodeSearch for SearchRelay {
    fn search(&mut self, term: &str) {
        let _ = self.commands.send(GraphCommand::Search(term.to_string()));
    }
}
