//! Stoppable worker threads.

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

/// The worker side of a `ThreadHandle`, used to wait for the next piece of
/// work or notice a shutdown request.
pub struct Poll {
    stop: mpsc::Receiver<()>,
}

impl Poll {
    /// Sleep until `deadline`. Returns `false` if shutdown was requested
    /// first, `true` otherwise.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let now = Instant::now();
        if deadline <= now {
            return !self.stopped();
        }
        match self.stop.recv_timeout(deadline - now) {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => false,
            Err(mpsc::RecvTimeoutError::Timeout) => true,
        }
    }

    /// Check for a shutdown request without blocking
    pub fn stopped(&self) -> bool {
        match self.stop.try_recv() {
            Ok(()) | Err(mpsc::TryRecvError::Disconnected) => true,
            Err(mpsc::TryRecvError::Empty) => false,
        }
    }
}

/// Handle to a running worker thread.
pub struct ThreadHandle {
    /// JoinHandle for the executing thread.
    handle: thread::JoinHandle<()>,

    /// Shutdown signal. The worker observes it through its `Poll`.
    stop: mpsc::Sender<()>,
}

impl ThreadHandle {
    /// Join the given Thread, blocking until it exits.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }

    /// Gracefully shutdown the given Thread, blocking until it exits.
    ///
    /// The worker only notices the request when it next polls, so a cycle
    /// already underway is allowed to finish.
    pub fn shutdown(self) -> thread::Result<()> {
        // a send error means the worker is already gone
        let _ = self.stop.send(());
        self.join()
    }
}

/// Spawns a new thread executing the provided closure.
pub fn spawn<F>(f: F) -> ThreadHandle
where
    F: Send + 'static + FnOnce(Poll) -> (),
{
    let (stop, recv) = mpsc::channel();
    ThreadHandle {
        stop: stop,
        handle: thread::spawn(move || f(Poll { stop: recv })),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_shutdown_interrupts_wait() {
        let handle = spawn(|poll| {
            let far = Instant::now() + Duration::from_secs(3600);
            while poll.wait_until(far) {}
        });
        assert!(handle.shutdown().is_ok());
    }

    #[test]
    fn test_wait_past_deadline() {
        let (_stop, recv) = mpsc::channel();
        let poll = Poll { stop: recv };
        assert!(poll.wait_until(Instant::now()));
        assert!(!poll.stopped());
    }
}
