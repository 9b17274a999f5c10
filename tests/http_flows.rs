#![cfg(feature = "ureq")]

use anyhow::Result;
use http::{HeaderName, HeaderValue};
use jenkins_rest::{BUILD_TREE, BuildResult, ErrorKind, JenkinsClient};
use serde_json::json;
use tokio::task;
use wiremock::{
    Match, Mock, MockServer, Request, ResponseTemplate,
    matchers::{body_string, body_string_contains, header, method, path, query_param},
};

const BASIC_USER_TOKEN: &str = "Basic dXNlcjp0b2tlbg==";

#[derive(Clone, Copy)]
struct CrumbHeader(Option<&'static str>);

impl Match for CrumbHeader {
    fn matches(&self, request: &Request) -> bool {
        let sent = request
            .headers
            .get("Jenkins-Crumb")
            .and_then(|value| value.to_str().ok());
        sent == self.0
    }
}

async fn mock_crumb(server: &MockServer, crumb: &'static str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/crumbIssuer/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "crumbRequestField": "Jenkins-Crumb",
            "crumb": crumb
        })))
        .expect(expected)
        .mount(server)
        .await;
}

fn client(base_url: String) -> Result<JenkinsClient> {
    Ok(JenkinsClient::builder(base_url)?
        .auth_basic("user", "token")
        .build()?)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn crumb_and_auth_ride_on_posts() -> Result<()> {
    let server = MockServer::start().await;
    mock_crumb(&server, "abc", 1).await;

    Mock::given(method("POST"))
        .and(path("/job/demo/build"))
        .and(header("Authorization", BASIC_USER_TOKEN))
        .and(CrumbHeader(Some("abc")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/job/demo/api/json"))
        .and(header("Authorization", BASIC_USER_TOKEN))
        .and(CrumbHeader(None))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": "demo",
            "buildable": true,
            "nextBuildNumber": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = JenkinsClient::builder(base_url)?
            .auth_basic("user", "token")
            .with_crumbs()
            .build()?;
        assert!(client.are_crumbs_enabled());

        let job = client.get_job("demo")?.expect("job exists");
        assert!(job.is_buildable());
        assert_eq!(job.next_build_number(), Some(4));
        job.launch(Vec::<(String, String)>::new())?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_crumb_issuer_is_not_an_error() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/demo/doDelete"))
        .and(CrumbHeader(None))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        assert!(!client.enable_crumbs());
        assert!(!client.are_crumbs_enabled());
        client.delete_job("demo")?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn redirects_after_mutations_are_success_and_not_followed() -> Result<()> {
    let server = MockServer::start().await;

    for target in [
        "/job/demo/doDelete",
        "/computer/agent-1/toggleOffline",
        "/computer/agent-1/executors/0/stop",
        "/queue/item/7/cancelQueue",
    ] {
        Mock::given(method("POST"))
            .and(path(target))
            .and(header("Authorization", BASIC_USER_TOKEN))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
            .expect(1)
            .mount(&server)
            .await;
    }

    // A followed redirect would arrive here without credentials.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(0)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        client.delete_job("demo")?;
        client.toggle_offline_computer("agent-1")?;
        client.stop_executor("agent-1", 0)?;
        client.cancel_queue(7)?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn launch_with_parameters_posts_form() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/job/folder/job/demo/buildWithParameters"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("branch=main"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        client(base_url)?.launch_job("folder/job/demo", [("branch", "main")])?;
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_job_sends_xml_and_detects_collision() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/createItem"))
        .and(query_param("name", "fresh"))
        .and(header("content-type", "text/xml"))
        .and(body_string("<project/>"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/createItem"))
        .and(query_param("name", "taken"))
        .respond_with(ResponseTemplate::new(400).set_body_string("A job already exists"))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        client.create_job("fresh", "<project/>")?;

        let err = client.create_job("taken", "<project/>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameCollision);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn build_follow_ups_use_build_tree() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/demo/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": "demo",
            "builds": [{ "number": 3, "url": "http://ci/job/demo/3/" }],
            "lastBuild": { "number": 3 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/job/demo/3/api/json"))
        .and(query_param("tree", BUILD_TREE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 3,
            "result": "FAILURE",
            "building": false,
            "duration": 5000,
            "timestamp": 1_700_000_000_000u64,
            "builtOn": "agent-1",
            "actions": [{}, { "parameters": [{ "name": "branch", "value": "main" }] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/job/demo/3/consoleText"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Started by user\nFinished: FAILURE\n"))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        let job = client.get_job("demo")?.expect("job exists");
        let build = job.last_build()?.expect("build exists");

        assert_eq!(build.result(), Some(BuildResult::Failure));
        assert_eq!(build.built_on(), Some("agent-1"));
        assert_eq!(build.parameter("branch"), Some(&json!("main")));
        assert!(build.console_text()?.ends_with("Finished: FAILURE\n"));
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn soft_not_found_paths() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/job/missing/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/computer/missing/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/job/demo/9/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = client(base_url)?;
        assert!(client.get_job("missing")?.is_none());
        assert!(client.get_computer("missing")?.is_none());
        assert!(client.get_build("demo", 9, None)?.is_none());
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn view_names_are_percent_encoded() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/view/All%20Jobs/api/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "everything",
            "jobs": [{ "name": "demo", "color": "blue" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let view = client(base_url)?.get_view("All Jobs")?;
        assert_eq!(view.description(), Some("everything"));
        assert_eq!(view.jobs().len(), 1);
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failures_carry_request_id_and_redacted_snippet() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/queue/api/json"))
        .respond_with(
            ResponseTemplate::new(500)
                .append_header("X-Request-Id", "req-42")
                .set_body_string("internal error, token=token"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let err = client(base_url)?.get_queue().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestFailed);
        assert_eq!(err.context(), Some("Error reading the build queue"));
        assert_eq!(err.request_id(), Some("req-42"));

        let jenkins_rest::Error::RequestFailed { error, .. } = err else {
            panic!("expected RequestFailed");
        };
        let snippet = error.body_snippet.as_deref().unwrap_or_default();
        assert!(!snippet.contains("=token"), "{snippet}");
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn request_hook_and_default_headers_reach_the_wire() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/computer/(master)/config.xml"))
        .and(header("x-team", "infra"))
        .and(header("x-hooked", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<computer/>"))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    task::spawn_blocking(move || -> Result<()> {
        let client = JenkinsClient::builder(base_url)?
            .default_header(
                HeaderName::from_static("x-team"),
                HeaderValue::from_static("infra"),
            )
            .request_hook(|ctx| {
                ctx.headers.insert(
                    HeaderName::from_static("x-hooked"),
                    HeaderValue::from_static("yes"),
                );
                Ok(())
            })
            .build()?;
        assert_eq!(client.get_computer_configuration("(master)")?, "<computer/>");
        Ok(())
    })
    .await??;

    server.verify().await;
    Ok(())
}
