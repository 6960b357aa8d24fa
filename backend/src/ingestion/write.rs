//! Write functions - persist per-state results as indented JSON files

use crate::ingestion::types::FetchResult;
use crate::ingestion::utils::state_file_name;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where fetch runs put their output. Paths are relative to the writer's root.
#[async_trait]
pub trait StorageWriter: Send + Sync {
    /// Create `dir` if missing; existing directories are fine
    async fn ensure_dir(&self, dir: &Path) -> Result<()>;

    /// Create or overwrite `path` with `contents`
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Writes under a root directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsWriter { root: root.into() }
    }
}

#[async_trait]
impl StorageWriter for FsWriter {
    async fn ensure_dir(&self, dir: &Path) -> Result<()> {
        let full = self.root.join(dir);
        tokio::fs::create_dir_all(&full)
            .await
            .with_context(|| format!("Failed to create directory {:?}", full))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let full = self.root.join(path);
        tokio::fs::write(&full, contents)
            .await
            .with_context(|| format!("Failed to write {:?}", full))
    }
}

/// Pretty printer that escapes every non-ASCII character as `\uXXXX`
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn with_indent(indent: &'a [u8]) -> Self {
        AsciiPrettyFormatter {
            inner: PrettyFormatter::with_indent(indent),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Serialize a state result as ASCII-only JSON indented with four spaces.
/// Payload numbers are written back with the digits they arrived with.
pub fn to_json_bytes(result: &FetchResult) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::with_indent(b"    "));
    result
        .serialize(&mut ser)
        .with_context(|| format!("Failed to serialize results for {}", result.state))?;
    Ok(buf)
}

/// Write one state's results to `<dir>/<State_Name>.json`, returning the relative path
pub async fn write_state_result(
    writer: &dyn StorageWriter,
    dir: &Path,
    result: &FetchResult,
) -> Result<PathBuf> {
    let path = dir.join(state_file_name(&result.state));
    let bytes = to_json_bytes(result)?;
    writer.write_file(&path, &bytes).await?;
    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(path)
}
