use crate::{Error, JenkinsClient, View, ViewName, endpoint};

impl JenkinsClient {
    /// Every view listed in the cached server root, fetched one by one.
    pub fn get_views(&self) -> Result<Vec<View>, Error> {
        let root = self.root()?;
        root.views
            .iter()
            .map(|summary| self.get_view(summary.name.as_str()))
            .collect()
    }

    /// The server's primary view, when the root reports one.
    pub fn get_primary_view(&self) -> Result<Option<View>, Error> {
        let root = self.root()?;
        root.primary_view
            .as_ref()
            .map(|summary| self.get_view(summary.name.as_str()))
            .transpose()
    }

    /// `GET /view/<name>/api/json`
    pub fn get_view(&self, view: impl Into<ViewName>) -> Result<View, Error> {
        let view = view.into();
        let context = format!("Error reading view {view}");
        let handle = self.handle();
        self.fetch(&endpoint::view_detail(&view), &context, |raw| {
            View::from_json(view.clone(), raw, handle)
        })
    }
}
