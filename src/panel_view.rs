use egui::{CollapsingHeader, Color32, Key, RichText, ScrollArea, Slider, TextEdit, Ui};

use crate::panel::Panel;
use crate::status::NoticeLevel;

const TABS: [&str; 2] = ["Explore", "Admin"];

const COLOR_INFO: Color32 = Color32::from_rgb(128, 200, 128);
const COLOR_ERROR: Color32 = Color32::from_rgb(255, 64, 64);

/// Widget rendering a [`Panel`] into a sidebar. Every user gesture is routed
/// through the panel's methods; nothing here touches the state directly.
#[derive(Default)]
pub struct PanelView;

impl PanelView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&mut self, ui: &mut Ui, panel: &mut Panel) {
        self.ui_tabs(ui, panel);
        ui.separator();
        ScrollArea::vertical().show(ui, |ui| {
            if panel.state().current_tab == 1 {
                self.ui_admin(ui, panel);
            } else {
                self.ui_explore(ui, panel);
            }
        });
        self.ui_notices(ui, panel);
    }

    fn ui_tabs(&mut self, ui: &mut Ui, panel: &mut Panel) {
        ui.horizontal(|ui| {
            for (i, title) in TABS.iter().enumerate() {
                if ui
                    .selectable_label(panel.state().current_tab == i, *title)
                    .clicked()
                {
                    panel.set_current_tab(i);
                }
            }
        });
    }

    fn ui_explore(&mut self, ui: &mut Ui, panel: &mut Panel) {
        self.ui_datasets(ui, panel);
        self.ui_time(ui, panel);
        self.ui_display(ui, panel);
        self.ui_search(ui, panel);
        self.ui_selected(ui, panel);
    }

    fn ui_datasets(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Dataset").default_open(true).show(ui, |ui| {
            if panel.state().options.is_empty() {
                ui.label("no datasets loaded");
                return;
            }
            let options = panel.state().options.clone();
            for option in options {
                let active = panel.state().current_option == option;
                if ui.selectable_label(active, &option).clicked() {
                    if let Err(err) = panel.select_dataset(&option) {
                        panel.notices_mut().error(err.to_string());
                    }
                }
            }
        });
    }

    fn ui_time(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Time").default_open(true).show(ui, |ui| {
            if panel.state().time_options.is_empty() {
                ui.label("select a dataset first");
                return;
            }
            let mut value = panel.state().slider.value;
            let max = panel.state().slider.max;
            if ui
                .add(Slider::new(&mut value, 0..=max).show_value(false))
                .on_hover_text("Scrub through the dataset's snapshots.")
                .changed()
            {
                panel.set_slider_value(value);
                let time = panel.state().time_options[value].clone();
                panel.select_time(&time);
            }
            ui.label(panel.state().slider.label.clone());
        });
    }

    fn ui_display(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Display").default_open(true).show(ui, |ui| {
            let mut force_on = panel.state().force_on;
            if ui
                .checkbox(&mut force_on, "force layout")
                .on_hover_text("Run the renderer's force-directed simulation.")
                .changed()
            {
                panel.toggle_force();
            }

            let mut component_mode = panel.state().component_mode;
            if ui
                .checkbox(&mut component_mode, "connected component only")
                .on_hover_text("Show only nodes reachable from the selection.")
                .changed()
            {
                panel.toggle_component_mode();
            }

            let mut show_all_labels = panel.state().show_all_labels;
            if ui
                .checkbox(&mut show_all_labels, "all labels")
                .on_hover_text("Label every node, not just the hovered one.")
                .changed()
            {
                panel.toggle_show_all_labels();
            }
        });
    }

    fn ui_search(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Search").default_open(true).show(ui, |ui| {
            let mut term = panel.state().search_term.clone();
            let response = ui.add(TextEdit::singleline(&mut term).hint_text("node name"));
            if response.changed() {
                panel.set_search_term(&term);
            }
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if submitted || ui.button("Search").clicked() {
                panel.search(&term);
            }
        });
    }

    fn ui_selected(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Selected").default_open(true).show(ui, |ui| {
            if let Some(node) = panel.state().selected_node.clone() {
                ui.label(RichText::new(node.label).strong());
                for (key, value) in &panel.state().basic_info {
                    ui.label(format!("{key}: {value}"));
                }
                if !panel.state().links.is_empty() {
                    ui.separator();
                    ui.label("links");
                    for (key, value) in &panel.state().links {
                        ui.label(format!("{key}: {value}"));
                    }
                }
            } else {
                ui.label("nothing selected");
            }
            if panel.state().selected_path.is_some() {
                ui.separator();
                ui.label(format!("path: {}", panel.path_to_string()));
            }
        });
    }

    fn ui_admin(&mut self, ui: &mut Ui, panel: &mut Panel) {
        CollapsingHeader::new("Data service").default_open(true).show(ui, |ui| {
            if ui
                .button("Recompile datasets")
                .on_hover_text(
                    "Rebuild every dataset from source dumps. Full server deployment only.",
                )
                .clicked()
            {
                panel.recompile();
            }
            if ui.button("Reload listing").clicked() {
                panel.reload_options();
            }
        });
    }

    fn ui_notices(&mut self, ui: &mut Ui, panel: &mut Panel) {
        panel.notices_mut().sweep();
        if let Some(notice) = panel.notices().latest() {
            let color = match notice.level {
                NoticeLevel::Info => COLOR_INFO,
                NoticeLevel::Error => COLOR_ERROR,
            };
            ui.separator();
            ui.colored_label(color, notice.text.clone());
        }
    }
}
