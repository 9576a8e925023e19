use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::InvocationError;
use crate::json_body;
use crate::metadata::ObjectMetadataSource;

const S3_EVENT_SOURCE: &str = "aws:s3";
const PROCESSED_MESSAGE: &str = "File processed!";
const USAGE_MESSAGE: &str = "Send a file to S3 to trigger Lambda!";
const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn ok(body: &impl Serialize) -> Result<Self, InvocationError> {
        Ok(Self {
            status_code: 200,
            body: json_body::to_string(body)?,
        })
    }

    fn error(err: &InvocationError) -> Self {
        let body = json!({ "error": err.to_string() });
        Self {
            status_code: 500,
            body: json_body::to_string(&body).unwrap_or_else(|_| body.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FileProcessed<'a> {
    message: &'static str,
    file: &'a str,
    size: i64,
    last_modified: String,
}

#[derive(Debug, PartialEq)]
enum EventKind<'a> {
    Upload { bucket: &'a str, key: &'a str },
    Generic,
}

// only the first record of a notification is looked at
fn classify(payload: &Value) -> Result<EventKind<'_>, InvocationError> {
    let records = match payload.get("Records").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records,
        _ => return Ok(EventKind::Generic),
    };
    let record = &records[0];
    if record.get("eventSource").and_then(Value::as_str) != Some(S3_EVENT_SOURCE) {
        return Ok(EventKind::Generic);
    }
    if records.len() > 1 {
        tracing::debug!("Ignoring {} extra S3 records", records.len() - 1);
    }

    let bucket = record
        .pointer("/s3/bucket/name")
        .and_then(Value::as_str)
        .ok_or_else(|| InvocationError::new("S3 record has no s3.bucket.name"))?;
    let key = record
        .pointer("/s3/object/key")
        .and_then(Value::as_str)
        .ok_or_else(|| InvocationError::new("S3 record has no s3.object.key"))?;
    Ok(EventKind::Upload { bucket, key })
}

async fn process_event<S: ObjectMetadataSource>(
    payload: &Value,
    store: &S,
) -> Result<HandlerResponse, InvocationError> {
    match classify(payload)? {
        EventKind::Upload { bucket, key } => {
            let meta = store.head(bucket, key).await?;
            tracing::info!("Processed {}/{} ({} bytes)", bucket, key, meta.size);
            HandlerResponse::ok(&FileProcessed {
                message: PROCESSED_MESSAGE,
                file: key,
                size: meta.size,
                last_modified: meta.last_modified.format(LAST_MODIFIED_FORMAT).to_string(),
            })
        }
        EventKind::Generic => HandlerResponse::ok(&json!({ "message": USAGE_MESSAGE })),
    }
}

pub(crate) async fn function_handler<S: ObjectMetadataSource>(
    event: LambdaEvent<Value>,
    store: &S,
) -> Result<HandlerResponse, Error> {
    let (payload, _context) = event.into_parts();
    tracing::info!("Event received: {}", payload);

    match process_event(&payload, store).await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::error!("Invocation failed: {}", e);
            Ok(HandlerResponse::error(&e))
        }
    }
}
