use crate::{Computer, ComputerName, Error, Executor, JenkinsClient, endpoint};
use serde::Deserialize;

/// Name of the built-in node in the computer API.
pub(crate) const MASTER_COMPUTER: &str = "(master)";

#[derive(Deserialize)]
struct ComputerList {
    #[serde(default)]
    computer: Vec<ComputerEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputerEntry {
    display_name: String,
}

impl JenkinsClient {
    /// `GET /computer/<name>/api/json`
    ///
    /// `None` when the server answers with anything but 200.
    pub fn get_computer(&self, computer: impl Into<ComputerName>) -> Result<Option<Computer>, Error> {
        let computer = computer.into();
        let context = format!("Error reading computer {computer}");
        let handle = self.handle();
        self.fetch_if_ok(&endpoint::computer_detail(&computer), &context, |raw| {
            Computer::from_json(computer.clone(), raw, handle)
        })
    }

    /// Every node listed by `GET /computer/api/json`. Nodes that vanish
    /// between the two requests are skipped.
    pub fn get_computers(&self) -> Result<Vec<Computer>, Error> {
        let list: ComputerList =
            self.fetch_typed(&endpoint::computer_list(), "Error reading computers")?;
        let mut computers = Vec::with_capacity(list.computer.len());
        for entry in list.computer {
            if let Some(computer) = self.get_computer(entry.display_name)? {
                computers.push(computer);
            }
        }
        Ok(computers)
    }

    /// Executors of `computer`. The count comes from the cached server root.
    pub fn get_executors(&self, computer: impl Into<ComputerName>) -> Result<Vec<Executor>, Error> {
        let computer = computer.into();
        let root = self.root()?;
        (0..root.num_executors)
            .map(|index| self.get_executor(&computer, index))
            .collect()
    }

    /// Executors of the built-in node.
    pub fn get_built_in_executors(&self) -> Result<Vec<Executor>, Error> {
        self.get_executors(MASTER_COMPUTER)
    }

    /// `GET /computer/<name>/executors/<index>/api/json`
    pub fn get_executor(
        &self,
        computer: impl Into<ComputerName>,
        index: u32,
    ) -> Result<Executor, Error> {
        let computer = computer.into();
        let context = format!("Error reading executor {index} of computer {computer}");
        let handle = self.handle();
        self.fetch(&endpoint::executor_detail(&computer, index), &context, |raw| {
            Executor::from_json(computer.clone(), index, raw, handle)
        })
    }

    /// `POST /computer/<name>/executors/<index>/stop`
    pub fn stop_executor(&self, computer: impl Into<ComputerName>, index: u32) -> Result<(), Error> {
        let computer = computer.into();
        self.send_unit(
            &endpoint::stop_executor(&computer, index),
            &format!("Error stopping executor {index} of computer {computer}"),
        )
    }

    /// `POST /computer/<name>/toggleOffline`
    pub fn toggle_offline_computer(&self, computer: impl Into<ComputerName>) -> Result<(), Error> {
        let computer = computer.into();
        self.send_unit(
            &endpoint::toggle_offline(&computer),
            &format!("Error marking computer {computer} offline"),
        )
    }

    /// `POST /computer/<name>/doDelete`
    pub fn delete_computer(&self, computer: impl Into<ComputerName>) -> Result<(), Error> {
        let computer = computer.into();
        self.send_unit(
            &endpoint::delete_computer(&computer),
            &format!("Error deleting computer {computer}"),
        )
    }

    /// `GET /computer/<name>/config.xml`
    pub fn get_computer_configuration(
        &self,
        computer: impl Into<ComputerName>,
    ) -> Result<String, Error> {
        let computer = computer.into();
        self.send_text(
            &endpoint::computer_config(&computer),
            &format!("Error reading configuration of computer {computer}"),
        )
    }
}
