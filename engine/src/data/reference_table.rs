use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use shared::models::ReferenceTicker;

use crate::error::{GuardianError, Result};

// Listed names and KRX codes the client knows without asking the backend.
const BUILTIN: &[(&str, &str)] = &[
    ("005930", "삼성전자"),
    ("005380", "현대차"),
    ("035720", "카카오"),
    ("373220", "LG에너지솔루션"),
    ("005490", "포스코홀딩스"),
    ("068270", "셀트리온"),
    ("035420", "NAVER"),
    ("352820", "하이브"),
    ("006400", "삼성SDI"),
    ("000270", "기아"),
    ("000660", "SK하이닉스"),
    ("011170", "롯데케미칼"),
    ("055550", "신한지주"),
    ("023530", "롯데쇼핑"),
    ("033780", "KT&G"),
];

/// Static table of authoritative `(code, canonical name)` pairs, in a fixed order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceTicker>,
}

impl ReferenceTable {
    pub fn new(entries: Vec<ReferenceTicker>) -> Self {
        ReferenceTable { entries }
    }

    pub fn builtin() -> Self {
        ReferenceTable::new(
            BUILTIN
                .iter()
                .map(|(code, name)| ReferenceTicker {
                    code: code.to_string(),
                    canonical_name: name.to_string(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[ReferenceTicker] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-sensitive lookup by canonical name.
    pub fn find_exact(&self, name: &str) -> Option<&ReferenceTicker> {
        self.entries.iter().find(|t| t.canonical_name == name)
    }

    /// Rows from `other` replace rows with the same canonical name in place;
    /// new names are appended in `other`'s order.
    pub fn merge(&mut self, other: ReferenceTable) {
        for incoming in other.entries {
            match self
                .entries
                .iter_mut()
                .find(|t| t.canonical_name == incoming.canonical_name)
            {
                Some(existing) => existing.code = incoming.code,
                None => self.entries.push(incoming),
            }
        }
    }

    // CSV Header: code,name
    // Example Row: 005930,삼성전자
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), rows = table.len(), "Loaded reference table");
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut entries = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            let code = Self::get_field(&record, &headers, "code")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| GuardianError::ReferenceFormat(format!("Missing 'code' at line {}", line)))?;
            let name = Self::get_field(&record, &headers, "name")
                .filter(|s| !s.is_empty())
                .ok_or_else(|| GuardianError::ReferenceFormat(format!("Missing 'name' at line {}", line)))?;
            entries.push(ReferenceTicker {
                code: code.to_string(),
                canonical_name: name.to_string(),
            });
        }
        Ok(ReferenceTable::new(entries))
    }

    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}
