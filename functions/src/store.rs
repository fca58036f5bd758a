use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;

use crate::error::BackendError;

/// Location of the stored object named by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    pub bucket: String,
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, object: &ObjectReference) -> Result<Vec<u8>, BackendError>;
}

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, object: &ObjectReference) -> Result<Vec<u8>, BackendError> {
        let output = self
            .client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await
            .map_err(|e| BackendError::new(DisplayErrorContext(e).to_string()))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| BackendError::new(DisplayErrorContext(e).to_string()))?;

        Ok(body.into_bytes().to_vec())
    }
}
