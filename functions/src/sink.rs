use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::{InputLogEvent, RejectedLogEventsInfo};
use aws_sdk_cloudwatchlogs::Client;

use crate::error::BackendError;
use crate::record::LogEvent;

/// Log group and stream that every event is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendTarget {
    pub group: String,
    pub stream: String,
}

/// Result of an idempotent create request.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created,
    AlreadyExisted,
    Failed(BackendError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamInfo {
    pub name: Option<String>,
    pub upload_sequence_token: Option<String>,
}

/// Indexes of events the backend accepted the request for but dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RejectedEvents {
    pub too_new_start_index: Option<i32>,
    pub too_old_end_index: Option<i32>,
    pub expired_end_index: Option<i32>,
}

/// Acceptance metadata returned by a successful append.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ack {
    pub next_sequence_token: Option<String>,
    pub rejected: Option<RejectedEvents>,
}

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn create_log_group(&self, group: &str) -> CreateOutcome;

    async fn create_log_stream(&self, group: &str, stream: &str) -> CreateOutcome;

    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
    ) -> Result<Vec<StreamInfo>, BackendError>;

    async fn put_log_events(
        &self,
        target: &AppendTarget,
        events: Vec<LogEvent>,
        sequence_token: Option<String>,
    ) -> Result<Ack, BackendError>;
}

/// CloudWatch Logs backed sink.
pub struct CloudWatchSink {
    client: Client,
}

impl CloudWatchSink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn backend_error<E: std::error::Error>(err: E) -> BackendError {
    BackendError::new(DisplayErrorContext(err).to_string())
}

impl From<RejectedLogEventsInfo> for RejectedEvents {
    fn from(info: RejectedLogEventsInfo) -> Self {
        RejectedEvents {
            too_new_start_index: info.too_new_log_event_start_index,
            too_old_end_index: info.too_old_log_event_end_index,
            expired_end_index: info.expired_log_event_end_index,
        }
    }
}

#[async_trait]
impl LogSink for CloudWatchSink {
    async fn create_log_group(&self, group: &str) -> CreateOutcome {
        match self
            .client
            .create_log_group()
            .log_group_name(group)
            .send()
            .await
        {
            Ok(_) => CreateOutcome::Created,
            Err(err) => {
                let exists = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception());
                if exists {
                    CreateOutcome::AlreadyExisted
                } else {
                    CreateOutcome::Failed(backend_error(err))
                }
            }
        }
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> CreateOutcome {
        match self
            .client
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
        {
            Ok(_) => CreateOutcome::Created,
            Err(err) => {
                let exists = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception());
                if exists {
                    CreateOutcome::AlreadyExisted
                } else {
                    CreateOutcome::Failed(backend_error(err))
                }
            }
        }
    }

    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
    ) -> Result<Vec<StreamInfo>, BackendError> {
        let resp = self
            .client
            .describe_log_streams()
            .log_group_name(group)
            .log_stream_name_prefix(prefix)
            .send()
            .await
            .map_err(backend_error)?;

        let streams = resp
            .log_streams
            .unwrap_or_default()
            .into_iter()
            .map(|s| StreamInfo {
                name: s.log_stream_name,
                upload_sequence_token: s.upload_sequence_token,
            })
            .collect();

        Ok(streams)
    }

    async fn put_log_events(
        &self,
        target: &AppendTarget,
        events: Vec<LogEvent>,
        sequence_token: Option<String>,
    ) -> Result<Ack, BackendError> {
        let mut input = Vec::with_capacity(events.len());
        for event in events {
            let input_event = InputLogEvent::builder()
                .timestamp(event.timestamp)
                .message(event.message)
                .build()
                .map_err(backend_error)?;
            input.push(input_event);
        }

        let resp = self
            .client
            .put_log_events()
            .log_group_name(&target.group)
            .log_stream_name(&target.stream)
            .set_log_events(Some(input))
            .set_sequence_token(sequence_token)
            .send()
            .await
            .map_err(backend_error)?;

        Ok(Ack {
            next_sequence_token: resp.next_sequence_token,
            rejected: resp.rejected_log_events_info.map(RejectedEvents::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_events_from_backend_info() {
        let info = RejectedLogEventsInfo::builder()
            .too_old_log_event_end_index(0)
            .expired_log_event_end_index(0)
            .build();
        assert_eq!(
            RejectedEvents::from(info),
            RejectedEvents {
                too_new_start_index: None,
                too_old_end_index: Some(0),
                expired_end_index: Some(0),
            }
        );
    }
}
