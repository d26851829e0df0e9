#![allow(dead_code)]

use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// One account record shaped like the platform's export entries.
pub fn account_record(url: &str) -> Value {
    json!({
        "title": "",
        "media_list_data": [],
        "string_list_data": [
            { "href": url, "value": url.rsplit('/').next().unwrap_or_default(), "timestamp": 1700000000 }
        ]
    })
}

pub fn followers_json(usernames: &[&str]) -> String {
    let records: Vec<Value> = usernames
        .iter()
        .map(|name| account_record(&format!("https://www.instagram.com/{}", name)))
        .collect();
    Value::Array(records).to_string()
}

pub fn following_json(usernames: &[&str]) -> String {
    let records: Vec<Value> = usernames
        .iter()
        .map(|name| account_record(&format!("https://www.instagram.com/{}", name)))
        .collect();
    json!({ "relationships_following": records }).to_string()
}

pub fn write_export(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}
