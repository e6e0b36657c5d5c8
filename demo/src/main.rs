use eframe::{run_native, NativeOptions};

mod app;
mod bridge;
mod dates;
mod graph;
mod loaders;

const APP_NAME: &str = "Wiki Graph Explorer";

fn main() {
    env_logger::init();

    // Base url of the wiki data server; without one the bundled sample
    // datasets are served instead.
    let base_url = std::env::args().nth(1);

    let native_options = NativeOptions::default();
    run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, base_url)))),
    )
    .unwrap();
}
