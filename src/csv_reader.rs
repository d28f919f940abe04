use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, Trim};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::error::Result;

/// Literal marking a missing field in the census extract.
pub const MISSING: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Salary {
    #[serde(rename = "<=50K")]
    AtMost50K,
    #[serde(rename = ">50K")]
    Above50K,
}

impl Salary {
    pub fn is_rich(self) -> bool {
        self == Salary::Above50K
    }
}

impl FromStr for Salary {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "<=50K" => Ok(Salary::AtMost50K),
            ">50K" => Ok(Salary::Above50K),
            other => Err(format!("unknown salary class {:?}", other)),
        }
    }
}

/// One complete row of the census extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Record {
    pub age: u32,
    pub workclass: String,
    pub fnlwgt: u64,
    pub education: String,
    pub education_num: u32,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    pub hours_per_week: u32,
    pub native_country: String,
    pub salary: Salary,
}

/// A row as parsed, with the sentinel resolved to `None` per field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawRecord {
    #[serde(deserialize_with = "missing_as_none")]
    age: Option<u32>,
    #[serde(deserialize_with = "missing_as_none")]
    workclass: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    fnlwgt: Option<u64>,
    #[serde(deserialize_with = "missing_as_none")]
    education: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    education_num: Option<u32>,
    #[serde(deserialize_with = "missing_as_none")]
    marital_status: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    occupation: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    relationship: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    race: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    sex: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    hours_per_week: Option<u32>,
    #[serde(deserialize_with = "missing_as_none")]
    native_country: Option<String>,
    #[serde(deserialize_with = "missing_as_none")]
    salary: Option<Salary>,
}

impl RawRecord {
    /// Returns `None` if any field held the sentinel.
    fn complete(self) -> Option<Record> {
        Some(Record {
            age: self.age?,
            workclass: self.workclass?,
            fnlwgt: self.fnlwgt?,
            education: self.education?,
            education_num: self.education_num?,
            marital_status: self.marital_status?,
            occupation: self.occupation?,
            relationship: self.relationship?,
            race: self.race?,
            sex: self.sex?,
            hours_per_week: self.hours_per_week?,
            native_country: self.native_country?,
            salary: self.salary?,
        })
    }
}

fn missing_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let field = String::deserialize(deserializer)?;
    let field = field.trim();
    if field == MISSING {
        return Ok(None);
    }
    field.parse().map(Some).map_err(de::Error::custom)
}

/// Reader for the 13-column census schema.
pub struct DatasetReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether the first line is a header row (default: false)
    has_headers: bool,
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl DatasetReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<Dataset> {
        debug!("opening dataset {}", path.display());
        let file = File::open(path)?;
        self.read(file)
    }

    /// Parse every row, dropping the incomplete ones.
    pub fn read<R: Read>(&self, source: R) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .trim(Trim::All)
            .from_reader(source);

        let mut records = Vec::<Record>::new();
        let mut dropped = 0usize;
        for result in rdr.deserialize() {
            let raw: RawRecord = result?;
            match raw.complete() {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("dropped {} incomplete rows", dropped);
        }
        info!("loaded {} complete rows", records.len());
        Ok(Dataset::new(records))
    }
}

/// Read a census file with the default reader settings.
pub fn read_data(path: &Path) -> Result<Dataset> {
    DatasetReader::default().read_path(path)
}
