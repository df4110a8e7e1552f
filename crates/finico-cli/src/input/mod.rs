pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a request from `--input` or piped stdin, if either is present.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}

/// Like [`read_request`], but a missing request is an error naming `what`.
pub fn require_request<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    read_request(path)?.ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}
