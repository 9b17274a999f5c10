//! Request constructors for every Jenkins endpoint the client touches.
//!
//! These are pure: they only describe the request. Auth, the crumb header
//! and the base URL are applied when the client sends it.

use crate::{
    ComputerName, JobName, ViewName,
    transport::{Request, RequestBody},
};

/// Tree selector used when an entity loads a build on its own.
pub const BUILD_TREE: &str = "actions[parameters,parameters[name,value]],result,duration,timestamp,number,url,estimatedDuration,builtOn";

fn job_segments(job: &JobName) -> Vec<String> {
    let mut segments = Vec::with_capacity(4);
    segments.push("job".to_owned());
    segments.extend(job.path_segments().map(ToOwned::to_owned));
    segments
}

fn job_request(method: http::Method, job: &JobName, tail: &[&str]) -> Request {
    let mut segments = job_segments(job);
    segments.extend(tail.iter().map(|s| (*s).to_owned()));
    Request::new(method, segments)
}

fn build_request(job: &JobName, number: u64, tail: &[&str]) -> Request {
    let mut segments = job_segments(job);
    segments.push(number.to_string());
    segments.extend(tail.iter().map(|s| (*s).to_owned()));
    Request::get(segments)
}

fn computer_segments(computer: &ComputerName) -> Vec<String> {
    let mut segments = vec!["computer".to_owned()];
    segments.extend(computer.path_segments().map(ToOwned::to_owned));
    segments
}

fn computer_request(method: http::Method, computer: &ComputerName, tail: &[&str]) -> Request {
    let mut segments = computer_segments(computer);
    segments.extend(tail.iter().map(|s| (*s).to_owned()));
    Request::new(method, segments)
}

fn executor_request(
    method: http::Method,
    computer: &ComputerName,
    index: u32,
    tail: &[&str],
) -> Request {
    let mut segments = computer_segments(computer);
    segments.push("executors".to_owned());
    segments.push(index.to_string());
    segments.extend(tail.iter().map(|s| (*s).to_owned()));
    Request::new(method, segments)
}

/// `GET crumbIssuer/api/json`
#[must_use]
pub fn crumb_issuer() -> Request {
    Request::get(["crumbIssuer", "api", "json"])
}

/// `GET api/json`
#[must_use]
pub fn root() -> Request {
    Request::get(["api", "json"])
}

/// `GET job/<name>/api/json`
#[must_use]
pub fn job_detail(job: &JobName) -> Request {
    job_request(http::Method::GET, job, &["api", "json"])
}

/// `GET job/<name>/config.xml`
#[must_use]
pub fn job_config(job: &JobName) -> Request {
    job_request(http::Method::GET, job, &["config.xml"])
}

/// `POST job/<name>/config.xml`
#[must_use]
pub fn set_job_config(job: &JobName, xml: Vec<u8>) -> Request {
    job_request(http::Method::POST, job, &["config.xml"]).body(RequestBody::xml(xml))
}

/// `POST createItem?name=<name>`
#[must_use]
pub fn create_item(job: &JobName, xml: Vec<u8>) -> Request {
    Request::post(["createItem"])
        .query_pair("name", job.as_str())
        .body(RequestBody::xml(xml))
}

/// `POST job/<name>/build`, or `POST job/<name>/buildWithParameters` with the
/// parameters as a form body when there are any.
#[must_use]
pub fn launch(job: &JobName, params: Vec<(String, String)>) -> Request {
    if params.is_empty() {
        job_request(http::Method::POST, job, &["build"])
    } else {
        job_request(http::Method::POST, job, &["buildWithParameters"]).form_pairs(params)
    }
}

/// `POST job/<name>/doDelete`
#[must_use]
pub fn delete_job(job: &JobName) -> Request {
    job_request(http::Method::POST, job, &["doDelete"])
}

/// `GET job/<name>/<number>/api/json[?tree=<tree>]`
#[must_use]
pub fn build_detail(job: &JobName, number: u64, tree: Option<&str>) -> Request {
    let req = build_request(job, number, &["api", "json"]);
    match tree {
        Some(tree) => req.query_pair("tree", tree),
        None => req,
    }
}

/// `GET job/<name>/<number>/consoleText`
#[must_use]
pub fn console_text(job: &JobName, number: u64) -> Request {
    build_request(job, number, &["consoleText"])
}

/// `GET job/<name>/<number>/testReport/api/json`
#[must_use]
pub fn test_report(job: &JobName, number: u64) -> Request {
    build_request(job, number, &["testReport", "api", "json"])
}

/// `GET queue/api/json`
#[must_use]
pub fn queue() -> Request {
    Request::get(["queue", "api", "json"])
}

/// `POST queue/item/<id>/cancelQueue`
#[must_use]
pub fn cancel_queue(id: u64) -> Request {
    Request::post(["queue".to_owned(), "item".to_owned(), id.to_string(), "cancelQueue".to_owned()])
}

/// `GET view/<name>/api/json`; the name is one encoded segment.
#[must_use]
pub fn view_detail(view: &ViewName) -> Request {
    Request::get(["view", view.as_str(), "api", "json"])
}

/// `GET computer/api/json`
#[must_use]
pub fn computer_list() -> Request {
    Request::get(["computer", "api", "json"])
}

/// `GET computer/<name>/api/json`
#[must_use]
pub fn computer_detail(computer: &ComputerName) -> Request {
    computer_request(http::Method::GET, computer, &["api", "json"])
}

/// `POST computer/<name>/toggleOffline`
#[must_use]
pub fn toggle_offline(computer: &ComputerName) -> Request {
    computer_request(http::Method::POST, computer, &["toggleOffline"])
}

/// `POST computer/<name>/doDelete`
#[must_use]
pub fn delete_computer(computer: &ComputerName) -> Request {
    computer_request(http::Method::POST, computer, &["doDelete"])
}

/// `GET computer/<name>/config.xml`
#[must_use]
pub fn computer_config(computer: &ComputerName) -> Request {
    computer_request(http::Method::GET, computer, &["config.xml"])
}

/// `GET computer/<name>/executors/<index>/api/json`
#[must_use]
pub fn executor_detail(computer: &ComputerName, index: u32) -> Request {
    executor_request(http::Method::GET, computer, index, &["api", "json"])
}

/// `POST computer/<name>/executors/<index>/stop`
#[must_use]
pub fn stop_executor(computer: &ComputerName, index: u32) -> Request {
    executor_request(http::Method::POST, computer, index, &["stop"])
}

/// `GET <uri>` relative to the base URL. A query string in `uri` is kept.
#[must_use]
pub fn execute_uri(uri: &str) -> Request {
    let (path, query) = match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    };
    let mut req = Request::get(path.split('/').filter(|s| !s.is_empty()));
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            req = req.query_pair(key, value);
        }
    }
    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use url::Url;

    fn base() -> Url {
        Url::parse("https://ci.example.com/jenkins/").unwrap()
    }

    fn full(req: &Request) -> String {
        req.full_url(&base()).unwrap().to_string()
    }

    #[test]
    fn build_tree_is_optional() {
        let job = JobName::from("core");
        assert_eq!(
            full(&build_detail(&job, 7, None)),
            "https://ci.example.com/jenkins/job/core/7/api/json"
        );
        assert_eq!(
            full(&build_detail(&job, 7, Some("result"))),
            "https://ci.example.com/jenkins/job/core/7/api/json?tree=result"
        );
    }

    #[test]
    fn job_names_address_nested_items() {
        let req = job_detail(&JobName::from("team/job/core"));
        assert_eq!(
            full(&req),
            "https://ci.example.com/jenkins/job/team/job/core/api/json"
        );
    }

    #[test]
    fn view_names_are_one_encoded_segment() {
        let req = view_detail(&ViewName::from("Nightly / QA"));
        assert_eq!(
            full(&req),
            "https://ci.example.com/jenkins/view/Nightly%20%2F%20QA/api/json"
        );
    }

    #[test]
    fn launch_picks_endpoint_by_parameters() {
        let job = JobName::from("core");
        let plain = launch(&job, Vec::new());
        assert_eq!(plain.method, Method::POST);
        assert!(full(&plain).ends_with("/job/core/build"));
        assert!(plain.form.is_empty());

        let with_params = launch(&job, vec![("branch".into(), "main".into())]);
        assert!(full(&with_params).ends_with("/job/core/buildWithParameters"));
        assert_eq!(with_params.form, vec![("branch".to_owned(), "main".to_owned())]);
    }

    #[test]
    fn create_item_sends_xml_with_name_query() {
        let req = create_item(&JobName::from("new job"), b"<project/>".to_vec());
        assert_eq!(
            full(&req),
            "https://ci.example.com/jenkins/createItem?name=new+job"
        );
        let body = req.body.as_ref().unwrap();
        assert_eq!(body.content_type.as_ref().unwrap(), "text/xml");
        assert_eq!(body.bytes, b"<project/>");
    }

    #[test]
    fn executor_paths() {
        let computer = ComputerName::from("(master)");
        assert!(full(&executor_detail(&computer, 1)).ends_with("/computer/(master)/executors/1/api/json"));
        let stop = stop_executor(&computer, 0);
        assert_eq!(stop.method, Method::POST);
        assert!(full(&stop).ends_with("/computer/(master)/executors/0/stop"));
    }

    #[test]
    fn mutating_endpoints_use_post() {
        let job = JobName::from("core");
        let computer = ComputerName::from("agent-1");
        for req in [
            delete_job(&job),
            set_job_config(&job, Vec::new()),
            cancel_queue(12),
            toggle_offline(&computer),
            delete_computer(&computer),
        ] {
            assert!(req.is_mutating());
        }
        assert!(full(&cancel_queue(12)).ends_with("/queue/item/12/cancelQueue"));
    }

    #[test]
    fn execute_uri_keeps_query() {
        let req = execute_uri("/job/core/api/json?tree=name&depth=1");
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            full(&req),
            "https://ci.example.com/jenkins/job/core/api/json?tree=name&depth=1"
        );
    }
}
