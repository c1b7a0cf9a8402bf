//! Background fetch of the user collection, scoped to one mount of the Users screen.
//!
//! The worker runs the blocking [`UserSource::fetch_all`] on its own thread and
//! hands the result back over a channel that the event loop polls every tick.
//! Both ends check the mount's [`CancellationToken`], so a response that lands
//! after the screen was left is dropped instead of applied.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::source::{UserRecord, UserSource};

pub type FetchResult = Result<Vec<UserRecord>, FetchError>;

pub struct FetchTask {
    token: CancellationToken,
    rx: Receiver<FetchResult>,
}

impl FetchTask {
    pub fn spawn(source: Arc<dyn UserSource>, token: CancellationToken) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_token = token.clone();
        std::thread::spawn(move || {
            let origin = source.describe();
            let result = source.fetch_all();
            if worker_token.is_cancelled() {
                tracing::debug!(%origin, "fetch finished after unmount, dropping result");
                return;
            }
            if tx.send(result).is_err() {
                tracing::debug!(%origin, "fetch receiver gone");
            }
        });
        Self { token, rx }
    }

    /// Non-blocking check for the result. `None` while pending or once cancelled.
    pub fn poll(&self) -> Option<FetchResult> {
        if self.token.is_cancelled() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Unavailable(
                "fetch worker stopped without a result".to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticUserSource;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct GatedSource {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl UserSource for GatedSource {
        fn fetch_all(&self) -> FetchResult {
            let gate = self.gate.lock().map_err(|_| FetchError::Unavailable("poisoned".into()))?;
            let _ = gate.recv();
            Ok(Vec::new())
        }

        fn describe(&self) -> String {
            "gated".into()
        }
    }

    struct PanickingSource;

    impl UserSource for PanickingSource {
        fn fetch_all(&self) -> FetchResult {
            panic!("source blew up");
        }

        fn describe(&self) -> String {
            "panicking".into()
        }
    }

    fn wait_for(task: &FetchTask) -> Option<FetchResult> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(res) = task.poll() {
                return Some(res);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn delivers_records_from_source() {
        let source = Arc::new(StaticUserSource::new(vec![UserRecord {
            id: 1,
            name: "Leanne Graham".into(),
            email: "sincere@april.biz".into(),
            phone: "1-770-736-8031".into(),
            website: None,
        }]));
        let task = FetchTask::spawn(source, CancellationToken::new());
        let records = wait_for(&task).expect("result in time").expect("fetch ok");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn cancelled_task_never_reports() {
        let (release, gate) = mpsc::channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(gate) });
        let token = CancellationToken::new();
        let task = FetchTask::spawn(source, token.clone());
        token.cancel();
        release.send(()).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(task.poll().is_none());
    }

    #[test]
    fn worker_that_dies_reports_unavailable() {
        let task = FetchTask::spawn(Arc::new(PanickingSource), CancellationToken::new());
        match wait_for(&task) {
            Some(Err(FetchError::Unavailable(msg))) => assert!(msg.contains("without a result")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
