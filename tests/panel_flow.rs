use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crossbeam::channel::Sender;
use wikigraph_panel::{
    event_channel, DataLoader, DatasetIndex, DateFormatter, ForceConfig, GraphRenderer,
    LoaderEvent, NodeSearch, NoticeLevel, Panel, RequestTicket, Snapshot,
};

#[derive(Default)]
struct Recorded {
    layout_starts: usize,
    layout_stops: usize,
    generated: Vec<(String, RequestTicket)>,
    option_reloads: usize,
    recompiles: usize,
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Recorded>>);

impl GraphRenderer for Recorder {
    fn start_layout(&mut self, _config: &ForceConfig) {
        self.0.borrow_mut().layout_starts += 1;
    }

    fn stop_layout(&mut self) {
        self.0.borrow_mut().layout_stops += 1;
    }
}

impl DataLoader for Recorder {
    fn generate(&mut self, key: &str, ticket: RequestTicket) {
        self.0.borrow_mut().generated.push((key.to_string(), ticket));
    }

    fn reload_options(&mut self) {
        self.0.borrow_mut().option_reloads += 1;
    }

    fn recompile(&mut self) {
        self.0.borrow_mut().recompiles += 1;
    }
}

impl NodeSearch for Recorder {
    fn search(&mut self, _term: &str) {}
}

struct IsoDates;

impl DateFormatter for IsoDates {
    fn format_date(&self, key: &str) -> String {
        key.to_string()
    }
}

fn harness() -> (Panel, Recorder, Sender<LoaderEvent>) {
    let recorder = Recorder::default();
    let (tx, rx) = event_channel();
    let panel = Panel::new(
        Box::new(recorder.clone()),
        Box::new(recorder.clone()),
        Box::new(IsoDates),
        Box::new(recorder.clone()),
        ForceConfig::default(),
        rx,
    );
    (panel, recorder, tx)
}

fn listing(entries: &[(&str, &[&str])]) -> DatasetIndex {
    let mut map = BTreeMap::new();
    for (key, times) in entries {
        map.insert(
            (*key).to_string(),
            times.iter().map(|t| (*t).to_string()).collect(),
        );
    }
    DatasetIndex(map)
}

#[test]
fn startup_listing_then_dataset_selection() {
    let (mut panel, recorder, tx) = harness();

    panel.reload_options();
    assert_eq!(recorder.0.borrow().option_reloads, 1);

    tx.send(LoaderEvent::Options(Ok(listing(&[(
        "public/wikiA",
        &["wikiA/2020", "wikiA/2021"],
    )]))))
    .unwrap();
    assert!(panel.poll().is_empty());
    assert_eq!(panel.state().options, vec!["wikiA"]);

    panel.select_dataset("wikiA").unwrap();
    assert_eq!(panel.state().time_options, vec!["2020", "2021"]);
    assert_eq!(panel.state().slider.max, 1);
    assert_eq!(panel.state().slider.value, 1);
    assert_eq!(panel.state().slider.label, "2021");

    let ticket = {
        let recorded = recorder.0.borrow();
        assert_eq!(recorded.generated.len(), 1);
        assert_eq!(recorded.generated[0].0, "wikiA");
        recorded.generated[0].1
    };

    tx.send(LoaderEvent::Snapshot {
        ticket,
        key: "wikiA".to_string(),
        result: Ok(Snapshot::from_json(
            r#"{"nodes": [{"id": "a"}], "links": []}"#,
        )
        .unwrap()),
    })
    .unwrap();

    let fresh = panel.poll();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].0, "wikiA");
    assert_eq!(fresh[0].1.nodes.len(), 1);
}

#[test]
fn time_scrub_outruns_a_slow_response() {
    let (mut panel, recorder, tx) = harness();
    tx.send(LoaderEvent::Options(Ok(listing(&[(
        "public/wikiA",
        &["wikiA/2020", "wikiA/2021"],
    )]))))
    .unwrap();
    let _ = panel.poll();
    panel.select_dataset("wikiA").unwrap();

    panel.set_slider_value(0);
    panel.select_time("2020");
    panel.set_slider_value(1);
    panel.select_time("2021");

    let (slow, fast) = {
        let recorded = recorder.0.borrow();
        (
            recorded.generated[1].1,
            recorded.generated[2].1,
        )
    };

    // The older request finishes after the newer one.
    tx.send(LoaderEvent::Snapshot {
        ticket: fast,
        key: "2021".to_string(),
        result: Ok(Snapshot::default()),
    })
    .unwrap();
    tx.send(LoaderEvent::Snapshot {
        ticket: slow,
        key: "2020".to_string(),
        result: Ok(Snapshot::default()),
    })
    .unwrap();

    let fresh = panel.poll();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].0, "2021");
    assert_eq!(panel.state().current_time, "2021");
}

#[test]
fn recompile_roundtrip_refreshes_the_listing() {
    let (mut panel, recorder, tx) = harness();
    panel.recompile();
    assert_eq!(recorder.0.borrow().recompiles, 1);

    tx.send(LoaderEvent::Recompiled(Ok(()))).unwrap();
    let _ = panel.poll();
    assert_eq!(recorder.0.borrow().option_reloads, 1);

    tx.send(LoaderEvent::Options(Ok(listing(&[(
        "public/wikiB",
        &["wikiB/2022"],
    )]))))
    .unwrap();
    let _ = panel.poll();
    assert_eq!(panel.state().options, vec!["wikiB"]);
    assert_eq!(panel.notices().latest().unwrap().level, NoticeLevel::Info);
}

#[test]
fn force_toggle_drives_the_renderer_both_ways() {
    let (mut panel, recorder, _tx) = harness();
    panel.toggle_force();
    panel.toggle_force();
    panel.toggle_force();

    let recorded = recorder.0.borrow();
    assert_eq!(recorded.layout_starts, 2);
    assert_eq!(recorded.layout_stops, 1);
    assert!(panel.state().force_on);
}
