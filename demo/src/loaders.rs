use std::thread;

use chrono::NaiveDate;
use crossbeam::channel::Sender;
use log::info;
use wikigraph_panel::{
    DataLoader, DatasetIndex, LoadError, LoaderEvent, RequestTicket, Snapshot,
};

/// Loads datasets from the wiki data server. Every request runs on its own
/// background thread and reports back through the event channel.
///
/// Endpoints: `/data/index.json` for the listing, `/data/{name}/current.json`
/// for a dataset's newest snapshot, `/data/{name}/{date}.json` for a time
/// snapshot, `/data` for the administrative recompile.
pub struct HttpLoader {
    base: String,
    events: Sender<LoaderEvent>,
    current_dataset: String,
}

impl HttpLoader {
    pub fn new(base: impl Into<String>, events: Sender<LoaderEvent>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            events,
            current_dataset: String::new(),
        }
    }

    fn fetch(url: &str) -> Result<String, LoadError> {
        ureq::get(url)
            .call()
            .map_err(|e| LoadError::new(format!("{url}: {e}")))?
            .into_string()
            .map_err(|e| LoadError::new(format!("{url}: {e}")))
    }
}

impl DataLoader for HttpLoader {
    fn generate(&mut self, key: &str, ticket: RequestTicket) {
        // Time keys are dates; anything else names a dataset, whose newest
        // snapshot is served under "current".
        let is_time_key = NaiveDate::parse_from_str(key, "%Y-%m-%d").is_ok()
            && !self.current_dataset.is_empty();
        let url = if is_time_key {
            format!("{}/data/{}/{key}.json", self.base, self.current_dataset)
        } else {
            self.current_dataset = key.to_string();
            format!("{}/data/{key}/current.json", self.base)
        };

        let events = self.events.clone();
        let key = key.to_string();
        thread::spawn(move || {
            let result = Self::fetch(&url).and_then(|text| Snapshot::from_json(&text));
            let _ = events.send(LoaderEvent::Snapshot { ticket, key, result });
        });
    }

    fn reload_options(&mut self) {
        let url = format!("{}/data/index.json", self.base);
        let events = self.events.clone();
        thread::spawn(move || {
            let result = Self::fetch(&url).and_then(|text| DatasetIndex::from_json(&text));
            let _ = events.send(LoaderEvent::Options(result));
        });
    }

    fn recompile(&mut self) {
        let url = format!("{}/data", self.base);
        let events = self.events.clone();
        thread::spawn(move || {
            let result = Self::fetch(&url).map(|body| {
                info!("recompile response: {body}");
            });
            let _ = events.send(LoaderEvent::Recompiled(result));
        });
    }
}

const INDEX_JSON: &str = include_str!("../assets/index.json");

const SAMPLES: [(&str, &str); 3] = [
    (
        "wiki-demo/2020-01-01",
        include_str!("../assets/wiki-demo-2020-01-01.json"),
    ),
    (
        "wiki-demo/2020-06-01",
        include_str!("../assets/wiki-demo-2020-06-01.json"),
    ),
    (
        "wiki-small/2021-03-15",
        include_str!("../assets/wiki-small-2021-03-15.json"),
    ),
];

/// Serves the bundled sample datasets so the demo runs without a server.
pub struct SampleLoader {
    events: Sender<LoaderEvent>,
    current_dataset: String,
}

impl SampleLoader {
    pub fn new(events: Sender<LoaderEvent>) -> Self {
        Self {
            events,
            current_dataset: String::new(),
        }
    }

    fn resolve(&mut self, key: &str) -> Option<&'static str> {
        let dataset_prefix = format!("{key}/");
        if let Some((_, text)) = SAMPLES
            .iter()
            .rev()
            .find(|(name, _)| name.starts_with(&dataset_prefix))
        {
            self.current_dataset = key.to_string();
            return Some(text);
        }
        let full = format!("{}/{key}", self.current_dataset);
        SAMPLES
            .iter()
            .find(|(name, _)| *name == full)
            .map(|(_, text)| *text)
    }
}

impl DataLoader for SampleLoader {
    fn generate(&mut self, key: &str, ticket: RequestTicket) {
        let result = match self.resolve(key) {
            Some(text) => Snapshot::from_json(text),
            None => Err(LoadError::new(format!("no bundled snapshot for {key}"))),
        };
        let _ = self.events.send(LoaderEvent::Snapshot {
            ticket,
            key: key.to_string(),
            result,
        });
    }

    fn reload_options(&mut self) {
        let _ = self
            .events
            .send(LoaderEvent::Options(DatasetIndex::from_json(INDEX_JSON)));
    }

    fn recompile(&mut self) {
        let _ = self.events.send(LoaderEvent::Recompiled(Err(LoadError::new(
            "recompile requires the data server; pass its base url on the command line",
        ))));
    }
}
