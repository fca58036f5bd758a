use log::{debug, info, warn};

use crate::error::{BackendError, RelayError};
use crate::record::{self, LogRecord};
use crate::sink::{Ack, AppendTarget, CreateOutcome, LogSink};
use crate::store::{ObjectReference, ObjectStore};

/// Moves one stored log record into the configured log stream.
///
/// Nothing is cached between calls: group, stream and sequence token are
/// resolved again on every relay. Two relays racing on the same stream can
/// resolve the same token, in which case the later append is rejected.
pub struct LogRelay<S, L> {
    store: S,
    sink: L,
    target: AppendTarget,
}

impl<S, L> LogRelay<S, L>
where
    S: ObjectStore,
    L: LogSink,
{
    pub fn new(store: S, sink: L, target: AppendTarget) -> Self {
        Self {
            store,
            sink,
            target,
        }
    }

    pub fn target(&self) -> &AppendTarget {
        &self.target
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }

    pub async fn relay(&self, object: &ObjectReference) -> Result<Ack, RelayError> {
        let bytes = self
            .store
            .get(object)
            .await
            .map_err(|source| RelayError::Fetch {
                bucket: object.bucket.clone(),
                key: object.key.clone(),
                source,
            })?;
        info!(
            "Fetched {} byte(s) from s3://{}/{}",
            bytes.len(),
            object.bucket,
            object.key
        );

        let text = record::decompress(&bytes)?;
        let event = LogRecord::parse(&text)?.to_event();

        self.ensure_log_group().await?;
        self.ensure_log_stream().await?;
        let sequence_token = self.resolve_sequence_token().await?;

        let ack = self
            .sink
            .put_log_events(&self.target, vec![event], sequence_token)
            .await
            .map_err(|source| self.append_error(source))?;

        if let Some(rejected) = &ack.rejected {
            warn!(
                "Log event rejected by {}/{}: {:?}",
                self.target.group, self.target.stream, rejected
            );
        }
        info!(
            "Appended log event to {}/{}",
            self.target.group, self.target.stream
        );

        Ok(ack)
    }

    async fn ensure_log_group(&self) -> Result<(), RelayError> {
        match self.sink.create_log_group(&self.target.group).await {
            CreateOutcome::Created => {
                info!("Created log group {}", self.target.group);
                Ok(())
            }
            CreateOutcome::AlreadyExisted => Ok(()),
            CreateOutcome::Failed(source) => Err(RelayError::GroupCreate {
                group: self.target.group.clone(),
                source,
            }),
        }
    }

    async fn ensure_log_stream(&self) -> Result<(), RelayError> {
        match self
            .sink
            .create_log_stream(&self.target.group, &self.target.stream)
            .await
        {
            CreateOutcome::Created => {
                info!(
                    "Created log stream {} in {}",
                    self.target.stream, self.target.group
                );
                Ok(())
            }
            CreateOutcome::AlreadyExisted => Ok(()),
            CreateOutcome::Failed(source) => Err(RelayError::StreamCreate {
                group: self.target.group.clone(),
                stream: self.target.stream.clone(),
                source,
            }),
        }
    }

    /// Only an unambiguous single match yields a token; anything else appends
    /// without one and lets the backend decide.
    async fn resolve_sequence_token(&self) -> Result<Option<String>, RelayError> {
        let streams = self
            .sink
            .describe_log_streams(&self.target.group, &self.target.stream)
            .await
            .map_err(|source| self.append_error(source))?;

        let token = match streams.as_slice() {
            [stream] => stream
                .upload_sequence_token
                .clone()
                .filter(|t| !t.is_empty()),
            _ => None,
        };
        debug!(
            "Resolved sequence token {:?} from {} stream(s)",
            token,
            streams.len()
        );

        Ok(token)
    }

    fn append_error(&self, source: BackendError) -> RelayError {
        RelayError::Append {
            group: self.target.group.clone(),
            stream: self.target.stream.clone(),
            source,
        }
    }
}
