use std::fs;
use std::path::Path;

use sgp4::Elements;

use crate::predict::error::PredictError;

/// A single two-line element set, optionally preceded by a name line.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    /// Where the element set came from (file name, URL or "inline")
    pub source: String,
}

impl ElementSet {
    /// Parse the first element set found in `content`.
    pub fn from_text(content: &str, source: &str) -> Result<Self, PredictError> {
        let (name, line1, line2) = parse_multi_tle(content)
            .into_iter()
            .next()
            .ok_or_else(|| PredictError::InvalidTle {
                source_name: source.to_string(),
                message: "no element set found".into(),
            })?;

        Ok(Self {
            name,
            line1,
            line2,
            source: source.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, PredictError> {
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self::from_text(&content, &filename)
    }

    /// Decode the lines with sgp4.
    pub fn elements(&self) -> Result<Elements, PredictError> {
        Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| {
            let mut message = e.to_string();
            if message.to_lowercase().contains("checksum") {
                message.push_str(" (the last digit of each line is a mod-10 checksum)");
            }
            PredictError::InvalidTle {
                source_name: self.source.clone(),
                message,
            }
        })
    }

    pub fn norad_id(&self) -> Result<u32, PredictError> {
        Ok(self.elements()?.norad_id as u32)
    }
}

/// Parse multi-satellite TLE content
pub fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            let name = lines[i].strip_prefix("0 ").unwrap_or(lines[i]).trim();
            result.push((
                Some(name.to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
