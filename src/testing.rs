//! In-memory transport for unit tests: canned replies per route, every
//! request recorded.

use crate::{
    Error, JenkinsClient, TransportErrorKind,
    transport::{Transport, TransportRequest, TransportResponse},
};
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::{
    collections::VecDeque,
    io,
    sync::{Arc, Mutex},
};

#[derive(Clone)]
enum Reply {
    Status(StatusCode, Vec<u8>),
    Fail,
}

struct Route {
    method: Method,
    path: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<TransportRequest>,
}

/// Unknown routes answer 404. A route with several replies hands them out
/// in order and then keeps repeating the last one.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    state: Arc<Mutex<State>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            Some(route) => route.replies.push_back(reply),
            None => state.routes.push(Route {
                method,
                path: path.to_owned(),
                replies: VecDeque::from([reply]),
            }),
        }
    }

    pub(crate) fn reply(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(method, path, Reply::Status(status, body.as_bytes().to_vec()));
        self
    }

    pub(crate) fn json(&self, method: Method, path: &str, body: Value) -> &Self {
        self.reply(method, path, 200, &body.to_string())
    }

    pub(crate) fn fail(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Reply::Fail);
        self
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn hits(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url.path() == path)
            .count()
    }

    pub(crate) fn client(&self) -> JenkinsClient {
        JenkinsClient::builder("https://ci.example.com/")
            .unwrap()
            .auth_basic("user", "token")
            .transport(self.clone())
            .build()
            .unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(req.clone());

        let reply = state
            .routes
            .iter_mut()
            .find(|r| r.method == req.method && r.path == req.url.path())
            .map(|route| {
                if route.replies.len() > 1 {
                    route.replies.pop_front().unwrap()
                } else {
                    route.replies[0].clone()
                }
            });

        match reply {
            Some(Reply::Status(status, body)) => Ok(TransportResponse {
                status,
                headers: HeaderMap::new(),
                body,
            }),
            Some(Reply::Fail) => Err(Error::Transport {
                method: req.method.clone(),
                path: req.url.path().into(),
                kind: TransportErrorKind::Connect,
                source: Box::new(io::Error::from(io::ErrorKind::ConnectionRefused)),
            }),
            None => Ok(TransportResponse {
                status: StatusCode::NOT_FOUND,
                headers: HeaderMap::new(),
                body: Vec::new(),
            }),
        }
    }
}
