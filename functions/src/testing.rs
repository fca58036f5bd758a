//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use crate::error::BackendError;
use crate::record::LogEvent;
use crate::sink::{Ack, AppendTarget, CreateOutcome, LogSink, RejectedEvents, StreamInfo};
use crate::store::{ObjectReference, ObjectStore};

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn object() -> ObjectReference {
    ObjectReference {
        bucket: "my-bucket".into(),
        key: "logs/2024/01/15/event.json.gz".into(),
    }
}

#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<ObjectReference, Vec<u8>>,
}

impl FakeStore {
    pub fn with_object(object: ObjectReference, bytes: Vec<u8>) -> Self {
        let mut objects = HashMap::new();
        objects.insert(object, bytes);
        Self { objects }
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn get(&self, object: &ObjectReference) -> Result<Vec<u8>, BackendError> {
        self.objects
            .get(object)
            .cloned()
            .ok_or_else(|| BackendError::new("NoSuchKey: The specified key does not exist."))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutCall {
    pub target: AppendTarget,
    pub events: Vec<LogEvent>,
    pub sequence_token: Option<String>,
}

pub struct FakeSink {
    pub group_outcome: CreateOutcome,
    pub stream_outcome: CreateOutcome,
    pub streams: Vec<StreamInfo>,
    pub describe_error: Option<BackendError>,
    pub put_error: Option<BackendError>,
    pub rejected: Option<RejectedEvents>,
    pub(crate) groups: Mutex<Vec<String>>,
    pub(crate) stream_requests: Mutex<Vec<(String, String)>>,
    pub(crate) puts: Mutex<Vec<PutCall>>,
}

impl Default for FakeSink {
    fn default() -> Self {
        Self {
            group_outcome: CreateOutcome::Created,
            stream_outcome: CreateOutcome::Created,
            streams: Vec::new(),
            describe_error: None,
            put_error: None,
            rejected: None,
            groups: Mutex::new(Vec::new()),
            stream_requests: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
        }
    }
}

impl FakeSink {
    pub fn created_groups(&self) -> Vec<String> {
        self.groups.lock().unwrap().clone()
    }

    pub fn created_streams(&self) -> Vec<(String, String)> {
        self.stream_requests.lock().unwrap().clone()
    }

    pub fn put_calls(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogSink for FakeSink {
    async fn create_log_group(&self, group: &str) -> CreateOutcome {
        self.groups.lock().unwrap().push(group.to_string());
        self.group_outcome.clone()
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> CreateOutcome {
        self.stream_requests
            .lock()
            .unwrap()
            .push((group.to_string(), stream.to_string()));
        self.stream_outcome.clone()
    }

    async fn describe_log_streams(
        &self,
        _group: &str,
        _prefix: &str,
    ) -> Result<Vec<StreamInfo>, BackendError> {
        match &self.describe_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.streams.clone()),
        }
    }

    async fn put_log_events(
        &self,
        target: &AppendTarget,
        events: Vec<LogEvent>,
        sequence_token: Option<String>,
    ) -> Result<Ack, BackendError> {
        if let Some(err) = &self.put_error {
            return Err(err.clone());
        }

        self.puts.lock().unwrap().push(PutCall {
            target: target.clone(),
            events,
            sequence_token,
        });

        Ok(Ack {
            next_sequence_token: Some("next-token".into()),
            rejected: self.rejected.clone(),
        })
    }
}
