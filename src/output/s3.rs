use anyhow::Context;

/// Uploads already-serialized JSON to an S3 bucket with `application/json` content type.
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
) -> anyhow::Result<()> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body.into())
        .content_type("application/json")
        .send()
        .await
        .with_context(|| format!("uploading s3://{bucket}/{key}"))?;

    Ok(())
}

/// Uploads `body` using the ambient AWS configuration (env vars, profile,
/// instance role).
#[tracing::instrument(skip(body), fields(bytes = body.len()))]
pub async fn publish(bucket: &str, key: &str, body: Vec<u8>) -> anyhow::Result<()> {
    let config = aws_config::load_from_env().await;
    let client = aws_sdk_s3::Client::new(&config);
    write_json_to_s3(&client, bucket, key, body).await?;
    tracing::info!(bucket, key, "Uploaded table to S3");
    Ok(())
}
