use anyhow::Result;
use reqwest::Client;

const TEXT_BASE_URL: &str = "https://raw.githubusercontent.com/spdx/license-list-data/main/text";

/// Raw text URL for an SPDX identifier, or `None` for ids that cannot be one
/// (e.g. `LicenseRef-` references with unusual characters).
pub fn text_url(id: &str) -> Option<String> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'));
    valid.then(|| format!("{}/{}.txt", TEXT_BASE_URL, id))
}

/// Fetch the text of an SPDX license.
pub async fn fetch_license_text(client: &Client, id: &str) -> Result<Option<String>> {
    let Some(url) = text_url(id) else {
        return Ok(None);
    };

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let text = response.text().await?;
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}
