use protocol::Request;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Shared queue of requests waiting to be sent. Event callbacks hold clones.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    queue: Rc<RefCell<VecDeque<Request>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: Request) {
        log::trace!(target: "ui.outbox", "queue {request:?}");
        self.queue.borrow_mut().push_back(request);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn drain(&self) -> Vec<Request> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
