use super::*;
use crate::record_service::{DeleteOutcome, ServiceError, UploadFile};
use crate::records::form::{MANUAL_ENTRY_FIELDS, ManualEntry};
use crate::records::{Record, RecordId};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// One scripted reply from the fake store.
pub(super) enum Reply<T> {
    Ready(Result<T, ServiceError>),
    /// Blocks the worker until the paired sender fires.
    Gated(Receiver<()>, Result<T, ServiceError>),
    Panic,
}

impl<T> Reply<T> {
    fn resolve(self) -> Result<T, ServiceError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(gate, result) => {
                let _ = gate.recv();
                result
            }
            Reply::Panic => panic!("scripted worker panic"),
        }
    }
}

pub(super) fn gated<T>(result: Result<T, ServiceError>) -> (Sender<()>, Reply<T>) {
    let (tx, rx) = channel();
    (tx, Reply::Gated(rx, result))
}

/// Scripted in-memory record store with call counters.
///
/// Unscripted calls succeed with empty payloads, except predictions which
/// fail so a missing script is obvious.
#[derive(Default)]
pub(super) struct FakeRecordService {
    fetches: Mutex<VecDeque<Reply<Vec<Record>>>>,
    inserts: Mutex<VecDeque<Reply<String>>>,
    uploads: Mutex<VecDeque<Reply<String>>>,
    deletes: Mutex<VecDeque<Reply<DeleteOutcome>>>,
    predictions: Mutex<VecDeque<Reply<PredictionResult>>>,
    fetch_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    prediction_calls: AtomicUsize,
    pub(super) inserted: Mutex<Vec<ManualEntry>>,
    pub(super) uploaded: Mutex<Vec<UploadFile>>,
    pub(super) deleted: Mutex<Vec<Vec<RecordId>>>,
}

impl FakeRecordService {
    pub(super) fn push_fetch(&self, reply: Reply<Vec<Record>>) {
        self.fetches.lock().unwrap().push_back(reply);
    }

    pub(super) fn push_records(&self, rows: Vec<Value>) {
        self.push_fetch(Reply::Ready(Ok(records(rows))));
    }

    pub(super) fn push_insert(&self, reply: Reply<String>) {
        self.inserts.lock().unwrap().push_back(reply);
    }

    pub(super) fn push_upload(&self, reply: Reply<String>) {
        self.uploads.lock().unwrap().push_back(reply);
    }

    pub(super) fn push_delete(&self, reply: Reply<DeleteOutcome>) {
        self.deletes.lock().unwrap().push_back(reply);
    }

    pub(super) fn push_prediction(&self, reply: Reply<PredictionResult>) {
        self.predictions.lock().unwrap().push_back(reply);
    }

    pub(super) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(super) fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub(super) fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub(super) fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub(super) fn prediction_calls(&self) -> usize {
        self.prediction_calls.load(Ordering::SeqCst)
    }
}

fn next<T>(
    queue: &Mutex<VecDeque<Reply<T>>>,
    counter: &AtomicUsize,
    fallback: impl FnOnce() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let reply = queue.lock().unwrap().pop_front();
    // Count after popping so a gated call is observable while it blocks.
    counter.fetch_add(1, Ordering::SeqCst);
    match reply {
        Some(reply) => reply.resolve(),
        None => fallback(),
    }
}

impl RecordService for FakeRecordService {
    fn fetch_records(&self) -> Result<Vec<Record>, ServiceError> {
        next(&self.fetches, &self.fetch_calls, || Ok(Vec::new()))
    }

    fn insert_record(&self, entry: &ManualEntry) -> Result<String, ServiceError> {
        self.inserted.lock().unwrap().push(entry.clone());
        next(&self.inserts, &self.insert_calls, || Ok(String::new()))
    }

    fn upload_file(&self, file: &UploadFile) -> Result<String, ServiceError> {
        self.uploaded.lock().unwrap().push(file.clone());
        next(&self.uploads, &self.upload_calls, || Ok(String::new()))
    }

    fn delete_records(&self, ids: &[RecordId]) -> Result<DeleteOutcome, ServiceError> {
        self.deleted.lock().unwrap().push(ids.to_vec());
        next(&self.deletes, &self.delete_calls, || {
            Ok(DeleteOutcome {
                success: true,
                message: String::new(),
            })
        })
    }

    fn fetch_prediction(&self) -> Result<PredictionResult, ServiceError> {
        next(&self.predictions, &self.prediction_calls, || {
            Err(ServiceError::Transport("no prediction scripted".into()))
        })
    }
}

pub(super) fn records(rows: Vec<Value>) -> Vec<Record> {
    rows.iter()
        .map(|row| Record::from_json_object(row.as_object().unwrap()))
        .collect()
}

pub(super) fn controller_with_fake() -> (EguiController, Arc<FakeRecordService>) {
    let fake = Arc::new(FakeRecordService::default());
    let service: Arc<dyn RecordService> = fake.clone();
    (EguiController::new(service, AppConfig::default()), fake)
}

/// Controller already holding `rows` from one completed fetch.
pub(super) fn loaded_controller(rows: Vec<Value>) -> (EguiController, Arc<FakeRecordService>) {
    let (mut controller, fake) = controller_with_fake();
    fake.push_records(rows);
    controller.refresh_records();
    wait_for_idle(&mut controller);
    (controller, fake)
}

pub(super) fn fill_manual_form(controller: &mut EguiController) {
    for name in MANUAL_ENTRY_FIELDS {
        let value = match name {
            "year" => "2022",
            "company" => "Acme",
            _ => "1,000",
        };
        controller.ui.manual_form.set(name, value);
    }
}

/// Poll until no job is in flight, including follow-up refetches.
pub(super) fn wait_for_idle(controller: &mut EguiController) {
    let deadline = Instant::now() + WAIT_LIMIT;
    loop {
        controller.poll_jobs();
        if !controller.is_loading() {
            return;
        }
        assert!(Instant::now() < deadline, "controller never went idle");
        std::thread::sleep(Duration::from_millis(2));
    }
}

/// Poll the controller until `condition` holds.
pub(super) fn wait_until(
    controller: &mut EguiController,
    mut condition: impl FnMut(&EguiController) -> bool,
) {
    let deadline = Instant::now() + WAIT_LIMIT;
    loop {
        controller.poll_jobs();
        if condition(controller) {
            return;
        }
        assert!(Instant::now() < deadline, "condition never held");
        std::thread::sleep(Duration::from_millis(2));
    }
}
