use crate::{ClientHandle, ComputerName, Error};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ComputerData {
    display_name: Option<String>,
    offline: bool,
    temporarily_offline: bool,
    offline_cause_reason: Option<String>,
    num_executors: u32,
    idle: bool,
    jnlp_agent: bool,
}

/// `GET computer/<name>/api/json`
#[derive(Clone, Debug)]
pub struct Computer {
    name: ComputerName,
    data: ComputerData,
    raw: Value,
    client: ClientHandle,
}

impl Computer {
    pub(crate) fn from_json(
        name: ComputerName,
        raw: Value,
        client: ClientHandle,
    ) -> Result<Self, serde_json::Error> {
        let data = ComputerData::deserialize(&raw)?;
        Ok(Self {
            name,
            data,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn name(&self) -> &ComputerName {
        &self.name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.data
            .display_name
            .as_deref()
            .unwrap_or(self.name.as_str())
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.data.offline
    }

    /// Offline because someone toggled it, as opposed to disconnected.
    #[must_use]
    pub fn is_temporarily_offline(&self) -> bool {
        self.data.temporarily_offline
    }

    #[must_use]
    pub fn offline_cause_reason(&self) -> Option<&str> {
        self.data
            .offline_cause_reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
    }

    #[must_use]
    pub fn num_executors(&self) -> u32 {
        self.data.num_executors
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.data.idle
    }

    #[must_use]
    pub fn is_jnlp_agent(&self) -> bool {
        self.data.jnlp_agent
    }

    pub fn toggle_offline(&self) -> Result<(), Error> {
        self.client.client()?.toggle_offline_computer(&self.name)
    }

    pub fn delete(&self) -> Result<(), Error> {
        self.client.client()?.delete_computer(&self.name)
    }

    /// `config.xml` of the node.
    pub fn configuration(&self) -> Result<String, Error> {
        self.client.client()?.get_computer_configuration(&self.name)
    }

    /// Fetch every executor slot of this computer.
    pub fn executors(&self) -> Result<Vec<Executor>, Error> {
        let client = self.client.client()?;
        (0..self.data.num_executors)
            .map(|index| client.get_executor(&self.name, index))
            .collect()
    }
}

/// `currentExecutable` of a busy slot. Pipeline steps may leave out the
/// build number.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ExecutableRef {
    number: Option<u64>,
    url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExecutorData {
    idle: bool,
    likely_stuck: bool,
    progress: i32,
    current_executable: Option<ExecutableRef>,
}

/// `GET computer/<name>/executors/<index>/api/json`
#[derive(Clone, Debug)]
pub struct Executor {
    computer: ComputerName,
    number: u32,
    data: ExecutorData,
    raw: Value,
    client: ClientHandle,
}

impl Executor {
    pub(crate) fn from_json(
        computer: ComputerName,
        number: u32,
        raw: Value,
        client: ClientHandle,
    ) -> Result<Self, serde_json::Error> {
        let data = ExecutorData::deserialize(&raw)?;
        Ok(Self {
            computer,
            number,
            data,
            raw,
            client,
        })
    }

    #[must_use]
    pub fn computer(&self) -> &ComputerName {
        &self.computer
    }

    /// Slot index within the computer.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.data.idle
    }

    #[must_use]
    pub fn is_likely_stuck(&self) -> bool {
        self.data.likely_stuck
    }

    /// Percent done of the running build; `None` when idle (Jenkins reports
    /// `-1`).
    #[must_use]
    pub fn progress(&self) -> Option<u8> {
        u8::try_from(self.data.progress).ok()
    }

    #[must_use]
    pub fn build_number(&self) -> Option<u64> {
        self.data
            .current_executable
            .as_ref()
            .and_then(|b| b.number)
    }

    #[must_use]
    pub fn build_url(&self) -> Option<&str> {
        self.data
            .current_executable
            .as_ref()
            .and_then(|b| b.url.as_deref())
    }

    pub fn stop(&self) -> Result<(), Error> {
        self.client
            .client()?
            .stop_executor(&self.computer, self.number)
    }
}
