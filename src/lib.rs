mod collaborators;
mod loader;
mod panel;
mod panel_view;
mod state;
mod status;

pub use self::collaborators::{DataLoader, DateFormatter, ForceConfig, GraphRenderer, NodeSearch};
pub use self::loader::{
    event_channel, DatasetIndex, LoadError, LoaderEvent, RequestTicket, Snapshot, SnapshotEdge,
    SnapshotNode,
};
pub use self::panel::{Panel, PanelError};
pub use self::panel_view::PanelView;
pub use self::state::{NodeRef, PanelState, TimeSlider};
pub use self::status::{Notice, NoticeLevel, NoticeLog};
