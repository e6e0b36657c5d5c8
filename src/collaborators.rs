use crate::loader::RequestTicket;

/// Configuration handed to the renderer on every layout start. The panel
/// treats it as opaque; hosts map the knobs onto whatever simulation they run.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceConfig {
    /// Simulation time step.
    pub dt: f32,

    /// Velocity damping per frame. 1 = no damping, 0 = immediate stop.
    pub damping: f32,

    /// Displacement clamp per step.
    pub max_step: f32,

    /// Convergence threshold, simulation settles below it.
    pub epsilon: f32,

    /// Scale for the ideal edge length.
    pub k_scale: f32,

    /// Attraction strength along edges.
    pub c_attract: f32,

    /// Repulsion strength between nodes.
    pub c_repulse: f32,

    /// Pull towards the canvas center. 0 disables.
    pub center_gravity: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            damping: 0.85,
            max_step: 10.0,
            epsilon: 1e-3,
            k_scale: 1.0,
            c_attract: 1.0,
            c_repulse: 1.0,
            center_gravity: 0.5,
        }
    }
}

impl ForceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_step(mut self, max_step: f32) -> Self {
        self.max_step = max_step;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_k_scale(mut self, k_scale: f32) -> Self {
        self.k_scale = k_scale;
        self
    }

    pub fn with_c_attract(mut self, c_attract: f32) -> Self {
        self.c_attract = c_attract;
        self
    }

    pub fn with_c_repulse(mut self, c_repulse: f32) -> Self {
        self.c_repulse = c_repulse;
        self
    }

    pub fn with_center_gravity(mut self, center_gravity: f32) -> Self {
        self.center_gravity = center_gravity;
        self
    }
}

/// Handle to the graph-drawing layer. The panel only ever starts and stops
/// its force simulation; everything else the renderer reads from
/// [`PanelState`](crate::PanelState) on its own.
pub trait GraphRenderer {
    /// Start the force-directed simulation with the given configuration.
    fn start_layout(&mut self, config: &ForceConfig);

    /// Stop the force-directed simulation.
    fn stop_layout(&mut self);
}

/// Handle to the data layer. All calls are fire and forget; completions come
/// back as [`LoaderEvent`](crate::LoaderEvent)s on the panel's channel.
pub trait DataLoader {
    /// Request the snapshot behind `key` (a dataset name or a time key).
    /// The response must carry `ticket` back so stale replies can be told
    /// apart from current ones.
    fn generate(&mut self, key: &str, ticket: RequestTicket);

    /// Re-fetch the dataset listing.
    fn reload_options(&mut self);

    /// Ask the backing service to rebuild its datasets from source data.
    fn recompile(&mut self);
}

/// Formats a snapshot key into the slider's human-readable date label.
pub trait DateFormatter {
    fn format_date(&self, key: &str) -> String;
}

/// Receives the search term whenever the user runs a node search. Matching
/// and highlighting live entirely on the implementor's side.
pub trait NodeSearch {
    fn search(&mut self, term: &str);
}
