//! Class label list and its alignment with model outputs.
use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::fetch;
use crate::resolve::{first_success, Strategy};
use crate::{Error, Result};

/// Ordered class names, line `i` of the label file is label `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Parses one label per line, trimming surrounding whitespace. Trailing
    /// blank lines are dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut labels: Vec<String> = text.lines().map(|line| line.trim().to_string()).collect();
        while labels.last().is_some_and(|label| label.is_empty()) {
            labels.pop();
        }
        if labels.is_empty() {
            return Err(Error::LabelsUnavailable("empty label list".to_string()));
        }
        Ok(Self(labels))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

/// How a model output index maps onto the label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOffset {
    /// Output `i` is label `i`. Either both include the background class or neither does.
    Direct,
    /// The label list starts with a background entry the model does not output,
    /// output `i` is label `i + 1`.
    SkipBackground,
}

impl LabelOffset {
    pub fn detect(outputs: i64, labels: usize) -> Result<Self> {
        let labels_i64 = labels as i64;
        if outputs == labels_i64 {
            Ok(LabelOffset::Direct)
        } else if outputs + 1 == labels_i64 {
            Ok(LabelOffset::SkipBackground)
        } else {
            Err(Error::LabelMismatch { outputs, labels })
        }
    }

    pub fn label_index(&self, class_index: usize) -> usize {
        match self {
            LabelOffset::Direct => class_index,
            LabelOffset::SkipBackground => class_index + 1,
        }
    }
}

/// Loads the label list: cached file, saved file, then the remote URL.
///
/// A remote fetch is written back to the save directory, a failed write is
/// only logged.
pub fn resolve_labels(config: &Config) -> Result<Labels> {
    let cached = config.cached_labels_path();
    let saved = config.saved_labels_path();
    let strategies = vec![
        Strategy::new(format!("{}", cached.display()), || Labels::from_file(&cached)),
        Strategy::new(format!("{}", saved.display()), || Labels::from_file(&saved)),
        Strategy::new(config.labels_url.clone(), || {
            let bytes = fetch::fetch_bytes(&config.labels_url)?;
            let text = String::from_utf8(bytes)
                .map_err(|_| Error::fetch(&config.labels_url, "label file is not valid utf-8"))?;
            let labels = Labels::parse(&text)?;
            match fetch::write_creating_dirs(&saved, text.as_bytes()) {
                Ok(()) => info!("labels saved to {}", saved.display()),
                Err(err) => warn!("cannot save labels to {}: {err}", saved.display()),
            }
            Ok(labels)
        }),
    ];
    first_success("labels", strategies).map_err(|err| Error::LabelsUnavailable(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let labels = Labels::parse("background\n tench \ngoldfish\r\n").unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(0), Some("background"));
        assert_eq!(labels.get(1), Some("tench"));
        assert_eq!(labels.get(2), Some("goldfish"));
        assert_eq!(labels.get(3), None);
        assert!(Labels::parse("").is_err());
    }

    #[test]
    fn parse_blank_lines() {
        assert!(matches!(Labels::parse("\n"), Err(Error::LabelsUnavailable(_))));
        assert!(Labels::parse(" \n\r\n\n").is_err());
        let labels = Labels::parse("background\n\ntench\n\n\n").unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(1), Some(""));
        assert_eq!(labels.get(2), Some("tench"));
    }

    #[test]
    fn offsets() {
        assert_eq!(LabelOffset::detect(1001, 1001).unwrap(), LabelOffset::Direct);
        assert_eq!(LabelOffset::detect(1000, 1001).unwrap(), LabelOffset::SkipBackground);
        assert_eq!(LabelOffset::detect(1000, 1000).unwrap(), LabelOffset::Direct);
        assert!(matches!(
            LabelOffset::detect(21843, 1001),
            Err(Error::LabelMismatch { outputs: 21843, labels: 1001 })
        ));
        assert_eq!(LabelOffset::Direct.label_index(7), 7);
        assert_eq!(LabelOffset::SkipBackground.label_index(7), 8);
    }
}
