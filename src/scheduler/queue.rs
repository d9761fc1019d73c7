use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use crossbeam_channel::{Receiver, Sender};

use crate::{
    error::Error,
    scheduler::{Scheduler, Task},
};

// -------------------------------------------------------------------------------------------------

/// A callback function to handle panics of tasks in a [`TaskQueue`].
pub type PanicHandler = Box<dyn Fn(Box<dyn Any + Send>) + Send + 'static>;

// -------------------------------------------------------------------------------------------------

/// A FIFO queue of deferred tasks, which the host application runs in its event loop.
///
/// Tasks get queued via [`TaskSender`]s, which can be sent to other threads. Nothing runs until
/// the owner of the queue calls [`run_pending`](Self::run_pending): that call is the "next turn"
/// of the event loop.
pub struct TaskQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    panic_handler: Option<PanicHandler>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    /// Create a new unbounded queue.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            panic_handler: None,
        }
    }

    /// Create a new queue which holds at most `capacity` pending tasks. Scheduling tasks
    /// on a full queue fails with `Error::SendError`.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self {
            sender,
            receiver,
            panic_handler: None,
        }
    }

    /// A new [`Scheduler`] which queues tasks into this queue.
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Number of tasks waiting to be run.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Set a handler which receives the payload of panicking tasks.
    /// When no handler is set, panics get logged as errors.
    pub fn set_panic_handler<F>(&mut self, handler: F)
    where
        F: Fn(Box<dyn Any + Send>) + Send + 'static,
    {
        self.panic_handler = Some(Box::new(handler));
    }

    /// Run all tasks which got queued before this call, in the order they got queued. Tasks
    /// which are queued by the running tasks are deferred to the next call.
    ///
    /// Panicking tasks don't affect other tasks. Returns the number of tasks which got run.
    pub fn run_pending(&self) -> usize {
        let pending = self.receiver.len();
        let mut run = 0;
        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(task) => {
                    self.run_task(task);
                    run += 1;
                }
                Err(_) => break,
            }
        }
        run
    }

    fn run_task(&self, task: Task) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(move || task())) {
            if let Some(handler) = &self.panic_handler {
                handler(payload);
            } else {
                log::error!(
                    "Ouch. Scheduled task panicked: {}",
                    panic_message::panic_message(&payload)
                );
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Queues tasks into a [`TaskQueue`]. Cheap to clone, `Send` and `Sync`.
#[derive(Clone)]
pub struct TaskSender {
    sender: Sender<Task>,
}

impl Scheduler for TaskSender {
    fn schedule(&self, task: Task) -> Result<(), Error> {
        self.sender.try_send(task)?;
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn deferred_until_run() {
        let queue = TaskQueue::new();
        let sender = queue.sender();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for index in 0..3 {
            let calls = Arc::clone(&calls);
            sender
                .schedule(Box::new(move || calls.lock().unwrap().push(index)))
                .unwrap();
        }
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(queue.pending(), 3);

        assert_eq!(queue.run_pending(), 3);
        assert_eq!(*calls.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.run_pending(), 0);
    }

    #[test]
    fn nested_tasks_run_on_next_turn() {
        let queue = TaskQueue::new();
        let sender = queue.sender();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let outer_calls = Arc::clone(&calls);
        let nested_sender = sender.clone();
        sender
            .schedule(Box::new(move || {
                outer_calls.lock().unwrap().push("outer");
                let inner_calls = Arc::clone(&outer_calls);
                nested_sender
                    .schedule(Box::new(move || inner_calls.lock().unwrap().push("inner")))
                    .unwrap();
            }))
            .unwrap();

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*calls.lock().unwrap(), vec!["outer"]);
        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*calls.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn panicking_tasks_are_isolated() {
        let mut queue = TaskQueue::new();
        let panics = Arc::new(Mutex::new(Vec::<String>::new()));
        {
            let panics = Arc::clone(&panics);
            queue.set_panic_handler(move |payload| {
                let message = payload.downcast_ref::<&str>().copied().unwrap_or_default();
                panics.lock().unwrap().push(message.to_string());
            });
        }

        let sender = queue.sender();
        let calls = Arc::new(Mutex::new(0));
        sender.schedule(Box::new(|| panic!("boom"))).unwrap();
        {
            let calls = Arc::clone(&calls);
            sender
                .schedule(Box::new(move || *calls.lock().unwrap() += 1))
                .unwrap();
        }

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(*panics.lock().unwrap(), vec!["boom".to_string()]);
    }

    #[test]
    fn full_and_dropped_queues() {
        let queue = TaskQueue::bounded(1);
        let sender = queue.sender();
        assert!(sender.schedule(Box::new(|| ())).is_ok());
        assert!(matches!(
            sender.schedule(Box::new(|| ())),
            Err(Error::SendError(_))
        ));

        drop(queue);
        assert!(matches!(
            sender.schedule(Box::new(|| ())),
            Err(Error::SendError(_))
        ));
    }
}
