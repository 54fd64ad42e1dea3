use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

/// A page that should be linked to, and the keyword that should carry the link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub target_url: String,
    /// Always lowercase
    pub keyword: String,
}

impl Target {
    pub fn new(target_url: &str, keyword: &str) -> Self {
        Self {
            target_url: target_url.trim().to_string(),
            keyword: keyword.trim().to_lowercase(),
        }
    }
}

/// Problems with the user's inputs; the scan never starts when one occurs
#[derive(Debug)]
pub enum InputError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    /// The targets file had no row with both a URL and a keyword
    NoTargets,
}

impl From<csv::Error> for InputError {
    fn from(err: csv::Error) -> Self {
        InputError::Csv(err)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            InputError::Csv(e) => write!(f, "invalid CSV: {}", e),
            InputError::NoTargets => write!(
                f,
                "no targets found; expected rows of `target URL, keyword`"
            ),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io { source, .. } => Some(source),
            InputError::Csv(e) => Some(e),
            InputError::NoTargets => None,
        }
    }
}

fn is_absolute_web_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, InputError> {
    File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read targets from CSV: column 1 is the target URL, column 2 the keyword.
///
/// A first row whose first cell is not an absolute http(s) URL is taken as a
/// header. Extra columns are ignored; rows missing either field are skipped.
pub fn read_targets<R: Read>(reader: R) -> Result<Vec<Target>, InputError> {
    let mut targets = Vec::new();

    for (index, record) in csv_reader(reader).into_records().enumerate() {
        let record = record?;
        let url = record.get(0).unwrap_or("");
        let keyword = record.get(1).unwrap_or("");

        if index == 0 && !is_absolute_web_url(url) {
            ::log::debug!("Treating first row as header: {:?}", record);
            continue;
        }

        if url.is_empty() || keyword.is_empty() {
            ::log::warn!("Skipping target row {}: missing URL or keyword", index + 1);
            continue;
        }

        targets.push(Target::new(url, keyword));
    }

    if targets.is_empty() {
        return Err(InputError::NoTargets);
    }

    ::log::info!("Loaded {} targets", targets.len());
    Ok(targets)
}

/// Load targets from a CSV file
pub fn load_targets<P: AsRef<Path>>(path: P) -> Result<Vec<Target>, InputError> {
    read_targets(open(path.as_ref())?)
}

/// Split newline-separated text into page URLs. Blank and `#` lines are ignored.
pub fn parse_page_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read page URLs from the first column of a CSV. A non-URL first row is a header.
pub fn read_page_csv<R: Read>(reader: R) -> Result<Vec<String>, InputError> {
    let mut pages = Vec::new();

    for (index, record) in csv_reader(reader).into_records().enumerate() {
        let record = record?;
        let value = record.get(0).unwrap_or("");

        if index == 0 && !is_absolute_web_url(value) {
            continue;
        }
        if !value.is_empty() {
            pages.push(value.to_string());
        }
    }

    Ok(pages)
}

/// Load candidate pages from a file: `.csv` files use the first column,
/// anything else is read as one URL per line.
pub fn load_pages<P: AsRef<Path>>(path: P) -> Result<Vec<String>, InputError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        return read_page_csv(open(path)?);
    }

    let mut contents = String::new();
    open(path)?
        .read_to_string(&mut contents)
        .map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_page_list(&contents))
}
