use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Appends each line to `path`, newline-terminated, creating the file if it
/// does not exist. An empty `lines` leaves the filesystem untouched.
pub fn append_lines<I, S>(path: impl AsRef<Path>, lines: I) -> StoreResult<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let path = path.as_ref();
    let mut lines = lines.into_iter().peekable();
    if lines.peek().is_none() {
        return Ok(0);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StoreError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    let mut writer = BufWriter::new(file);
    let mut written = 0;
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
        written += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), lines = written, "appended to report");
    Ok(written)
}

pub fn append_line(path: impl AsRef<Path>, line: &str) -> StoreResult<()> {
    append_lines(path, [line]).map(|_| ())
}
