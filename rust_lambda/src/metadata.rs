use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use lambda_runtime::tracing;

use crate::error::InvocationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

#[async_trait]
pub trait ObjectMetadataSource: Send + Sync {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, InvocationError>;
}

pub struct S3MetadataSource {
    client: S3Client,
}

impl S3MetadataSource {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectMetadataSource for S3MetadataSource {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, InvocationError> {
        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        tracing::debug!("HeadObject {}/{} succeeded", bucket, key);

        let size = output
            .content_length()
            .ok_or_else(|| InvocationError::new("HeadObject response has no ContentLength"))?;
        let last_modified = output
            .last_modified()
            .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
            .ok_or_else(|| InvocationError::new("HeadObject response has no valid LastModified"))?;

        Ok(ObjectMetadata {
            size,
            last_modified,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::operation::head_object::{HeadObjectError, HeadObjectOutput};
    use aws_sdk_s3::primitives::DateTime as SmithyDateTime;
    use aws_sdk_s3::types::error::NotFound;
    use aws_smithy_mocks::{mock, mock_client};
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_head_reports_size_and_last_modified() {
        let head_rule = mock!(aws_sdk_s3::Client::head_object)
            .match_requests(|req| {
                req.bucket() == Some("test-bucket") && req.key() == Some("report.csv")
            })
            .then_output(|| {
                HeadObjectOutput::builder()
                    .content_length(42)
                    .last_modified(SmithyDateTime::from_secs(1_704_067_200))
                    .build()
            });
        let s3 = mock_client!(aws_sdk_s3, [&head_rule]);
        let source = S3MetadataSource::new(s3);

        let meta = source.head("test-bucket", "report.csv").await.unwrap();

        assert_eq!(head_rule.num_calls(), 1);
        assert_eq!(meta.size, 42);
        assert_eq!(
            meta.last_modified,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_head_missing_object_fails() {
        let head_rule = mock!(aws_sdk_s3::Client::head_object)
            .then_error(|| HeadObjectError::NotFound(NotFound::builder().build()));
        let s3 = mock_client!(aws_sdk_s3, [&head_rule]);
        let source = S3MetadataSource::new(s3);

        let err = source.head("test-bucket", "gone.txt").await.unwrap_err();

        assert_eq!(head_rule.num_calls(), 1);
        // the modelled error name only shows up with the full error context
        assert!(err.to_string().contains("NotFound"), "{err}");
    }

    #[tokio::test]
    async fn test_head_without_content_length_fails() {
        let head_rule = mock!(aws_sdk_s3::Client::head_object).then_output(|| {
            HeadObjectOutput::builder()
                .last_modified(SmithyDateTime::from_secs(1_704_067_200))
                .build()
        });
        let s3 = mock_client!(aws_sdk_s3, [&head_rule]);
        let source = S3MetadataSource::new(s3);

        let err = source.head("test-bucket", "report.csv").await.unwrap_err();
        assert!(err.to_string().contains("ContentLength"));
    }
}
