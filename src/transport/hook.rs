use super::{Transport, TransportRequest, TransportResponse};
use crate::{Error, RequestHook, RequestHookContext};

/// Runs the user's request hook right before the inner transport sends.
#[derive(Clone)]
pub(crate) struct HookTransport<T> {
    inner: T,
    hook: RequestHook,
}

impl<T> HookTransport<T> {
    pub(crate) fn new(inner: T, hook: RequestHook) -> Self {
        Self { inner, hook }
    }
}

impl<T: Transport> Transport for HookTransport<T> {
    fn send(&self, mut req: TransportRequest) -> Result<TransportResponse, Error> {
        let body = req.body.as_ref();

        (self.hook)(RequestHookContext {
            method: &req.method,
            url: &req.url,
            headers: &mut req.headers,
            query: &req.query,
            form: &req.form,
            body: body.map(|b| b.bytes.as_slice()),
            content_type: body.and_then(|b| b.content_type.as_ref()),
        })?;

        self.inner.send(req)
    }
}
