use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::head_object::HeadObjectError;

/// Any fault raised while handling one invocation; all of them end up as a 500.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvocationError(String);

impl InvocationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<serde_json::Error> for InvocationError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}

impl From<SdkError<HeadObjectError>> for InvocationError {
    fn from(e: SdkError<HeadObjectError>) -> Self {
        // plain Display on SdkError only says "service error"
        Self(DisplayErrorContext(&e).to_string())
    }
}
