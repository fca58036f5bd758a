use aws_lambda_events::event::s3::S3Event;
use serde::Serialize;

pub mod config;
pub mod error;
pub mod record;
pub mod relay;
pub mod sink;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::RelayConfig;
pub use error::{BackendError, RelayError};
pub use relay::LogRelay;
pub use sink::{Ack, AppendTarget, CloudWatchSink, CreateOutcome, LogSink};
pub use store::{ObjectReference, ObjectStore, S3Store};

const STATUS_OK: u16 = 200;
const STATUS_ERROR: u16 = 500;

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

/// Object named by the first record of the notification. Any further records
/// are ignored.
pub fn first_object(event: &S3Event) -> Result<ObjectReference, RelayError> {
    let record = event
        .records
        .first()
        .ok_or_else(|| RelayError::Event("no records".into()))?;

    let bucket = record
        .s3
        .bucket
        .name
        .clone()
        .ok_or_else(|| RelayError::Event("missing bucket name".into()))?;
    let key = record
        .s3
        .object
        .key
        .clone()
        .ok_or_else(|| RelayError::Event("missing object key".into()))?;

    Ok(ObjectReference { bucket, key })
}

pub async fn handle<S, L>(relay: &LogRelay<S, L>, event: S3Event) -> Response
where
    S: ObjectStore,
    L: LogSink,
{
    if event.records.len() > 1 {
        log::warn!(
            "Notification carries {} records, relaying only the first",
            event.records.len()
        );
    }

    let result = match first_object(&event) {
        Ok(object) => relay.relay(&object).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => {
            let target = relay.target();
            Response {
                status_code: STATUS_OK,
                body: format!(
                    "Log event sent to {} in {}",
                    target.stream, target.group
                ),
            }
        }
        Err(err) => {
            log::error!("Relay failed: {}", err);
            Response {
                status_code: STATUS_ERROR,
                body: format!("Error: {}", err),
            }
        }
    }
}
