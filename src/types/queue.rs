use super::{Action, JobSummary, Parameter, collect_parameters};
use crate::{ClientHandle, Error};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct QueueItemData {
    id: u64,
    task: Option<JobSummary>,
    why: Option<String>,
    blocked: bool,
    buildable: bool,
    stuck: bool,
    in_queue_since: Option<u64>,
    /// Legacy `\nkey=value` rendering of the parameters.
    params: Option<String>,
    actions: Vec<Option<Action>>,
}

/// One pending build request from `GET queue/api/json`.
#[derive(Clone, Debug)]
pub struct QueueItem {
    data: QueueItemData,
    parameters: Vec<Parameter>,
    raw: Value,
    client: ClientHandle,
}

impl QueueItem {
    fn from_json(raw: Value, client: ClientHandle) -> Result<Self, serde_json::Error> {
        let data = QueueItemData::deserialize(&raw)?;
        let mut parameters = collect_parameters(&data.actions);
        if parameters.is_empty() {
            parameters = data.params.as_deref().map(parse_params).unwrap_or_default();
        }
        Ok(Self {
            data,
            parameters,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.data.id
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn job_name(&self) -> Option<&str> {
        self.data.task.as_ref().map(|t| t.name.as_str())
    }

    /// Why the item is still waiting, as phrased by the server.
    #[must_use]
    pub fn why(&self) -> Option<&str> {
        self.data.why.as_deref()
    }

    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.data.blocked
    }

    #[must_use]
    pub fn is_buildable(&self) -> bool {
        self.data.buildable
    }

    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.data.stuck
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub fn in_queue_since(&self) -> Option<u64> {
        self.data.in_queue_since
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn cancel(&self) -> Result<(), Error> {
        self.client.client()?.cancel_queue(self.data.id)
    }
}

fn parse_params(params: &str) -> Vec<Parameter> {
    params
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(name, value)| Parameter {
            name: name.trim().to_owned(),
            value: Value::String(value.to_owned()),
        })
        .collect()
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct QueueData {
    items: Vec<Value>,
}

/// `GET queue/api/json`
#[derive(Clone, Debug)]
pub struct Queue {
    items: Vec<QueueItem>,
    raw: Value,
}

impl Queue {
    pub(crate) fn from_json(raw: Value, client: ClientHandle) -> Result<Self, serde_json::Error> {
        let items = QueueData::deserialize(&raw)?
            .items
            .into_iter()
            .map(|item| QueueItem::from_json(item, client.clone()))
            .collect::<Result<_, _>>()?;
        Ok(Self { items, raw })
    }

    #[must_use]
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn items_for_job<'a>(&'a self, job: &'a str) -> impl Iterator<Item = &'a QueueItem> {
        self.items
            .iter()
            .filter(move |item| item.job_name() == Some(job))
    }
}
