use crate::constants::MAX_REDIRECTS;
use crate::error::InstallError;
use crate::utils::{print_message, TagColor};
use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Redirects are followed by hand so the budget stays explicit.
pub fn release_client() -> Result<Client> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch `url` into `dest`, following up to [`MAX_REDIRECTS`] 301/302 hops.
/// Any other non-200 status fails this candidate only; the caller moves on
/// to the next archive name.
pub async fn fetch_to_file(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut current = Url::parse(url).with_context(|| format!("Invalid download URL: {url}"))?;
    let mut remaining = MAX_REDIRECTS;

    loop {
        let response = client
            .get(current.clone())
            .send()
            .await
            .context("Failed to initiate download")?;

        match response.status() {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                if remaining == 0 {
                    return Err(InstallError::TooManyRedirects {
                        url: current.to_string(),
                    }
                    .into());
                }
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .ok_or_else(|| InstallError::DownloadFailed {
                        name: name.clone(),
                        reason: "redirect without a Location header".to_string(),
                    })?;
                // Location may be relative to the current URL
                current = current
                    .join(location)
                    .with_context(|| format!("Invalid redirect target: {location}"))?;
                print_message(
                    "REDIRECT",
                    &format!("Following redirect to: {current}"),
                    TagColor::Blue,
                );
                remaining -= 1;
            }
            StatusCode::OK => {
                write_body(response, dest).await?;
                return Ok(());
            }
            status => {
                return Err(InstallError::DownloadFailed {
                    name,
                    reason: format!(
                        "{} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("request failed")
                    ),
                }
                .into());
            }
        }
    }
}

async fn write_body(response: reqwest::Response, dest: &Path) -> Result<()> {
    let total = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total);
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    )?);

    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        pb.inc(chunk.len() as u64);
    }

    file.flush().await?;
    pb.finish_and_clear();
    Ok(())
}
