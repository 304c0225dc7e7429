//! Fakes shared by unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::net::transport::Transport;
use crate::net::types::{OutboundRequest, RawResponse, TransportError, UserRecord};
use crate::util::document::DocumentHost;

/// Transport answering from a queue of scripted outcomes and recording every
/// request it was handed.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    sent: RefCell<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    pub fn fail(&self, reason: &str) {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError(reason.to_owned())));
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.borrow().clone()
    }

    pub fn last(&self) -> OutboundRequest {
        self.sent.borrow().last().cloned().expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        self.sent.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted reply".to_owned())))
    }
}

/// Document host that records every `lang` value applied.
#[derive(Default)]
pub struct RecordingDocument {
    langs: RefCell<Vec<String>>,
}

impl RecordingDocument {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn langs(&self) -> Vec<String> {
        self.langs.borrow().clone()
    }
}

impl DocumentHost for RecordingDocument {
    fn set_lang(&self, code: &str) {
        self.langs.borrow_mut().push(code.to_owned());
    }
}

pub fn user(value: serde_json::Value) -> UserRecord {
    UserRecord::from_value(value).expect("test user must be a JSON object")
}
