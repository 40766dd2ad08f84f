use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

// ---------------------------------------------------------------------------
// Background jobs: blocking network calls off the UI thread
// ---------------------------------------------------------------------------

/// Outcome of polling a [`Job`].
#[derive(Debug)]
pub enum JobStatus<T> {
    Pending,
    Done(T),
    /// The worker ended without reporting (it panicked).
    Lost,
}

/// A single blocking call running on its own thread.
///
/// The UI polls once per frame; nothing blocks the render loop.
pub struct Job<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Job<T> {
    pub fn spawn<F>(name: &str, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let name = name.to_string();
        thread::spawn(move || {
            log::debug!("Job '{name}' started");
            // The receiver is gone if the session dropped the job; nothing to report to.
            let _ = tx.send(work());
            log::debug!("Job '{name}' finished");
        });
        Self { rx }
    }

    /// Non-blocking check for the result.
    pub fn poll(&self) -> JobStatus<T> {
        match self.rx.try_recv() {
            Ok(value) => JobStatus::Done(value),
            Err(TryRecvError::Empty) => JobStatus::Pending,
            Err(TryRecvError::Disconnected) => JobStatus::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait<T: Send + 'static>(job: &Job<T>) -> JobStatus<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match job.poll() {
                JobStatus::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn delivers_result() {
        let job = Job::spawn("add", || 2 + 2);
        assert!(matches!(wait(&job), JobStatus::Done(4)));
    }

    #[test]
    fn pending_until_work_finishes() {
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let job = Job::spawn("gated", move || {
            let _ = gate_rx.recv();
            "done"
        });
        assert!(matches!(job.poll(), JobStatus::Pending));
        gate_tx.send(()).unwrap();
        assert!(matches!(wait(&job), JobStatus::Done("done")));
    }

    #[test]
    fn panicking_worker_is_lost() {
        let job: Job<u8> = Job::spawn("boom", || panic!("worker failure"));
        assert!(matches!(wait(&job), JobStatus::Lost));
    }
}
