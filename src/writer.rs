use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use brotli::enc::BrotliEncoderParams;
use brotli::CompressorWriter;

use crate::dataset::is_brotli_path;

/// Writes datasets and rendered documents to disk.
pub struct DatasetWriter {
    writer: Box<dyn Write>,
    path: PathBuf,
    bytes_written: usize,
}

impl DatasetWriter {
    /// Creates a new DatasetWriter for the specified file path.
    ///
    /// Automatically enables Brotli compression if the file path ends with `.br`
    /// (e.g., `attention.json.br`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use circuitview::{DatasetWriter, GraphDataset};
    /// # fn main() -> anyhow::Result<()> {
    /// let dataset = GraphDataset::new(2, 2);
    /// let mut writer = DatasetWriter::new("attention.json.br")?;
    /// writer.write_json(&dataset)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;

        let writer: Box<dyn Write> = if is_brotli_path(&path) {
            let buf_writer = BufWriter::new(file);
            let params = BrotliEncoderParams {
                quality: 6,  // Balanced compression
                lgwin: 22,   // Window size
                ..Default::default()
            };
            Box::new(CompressorWriter::with_params(buf_writer, 4096, &params))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(DatasetWriter {
            writer,
            path,
            bytes_written: 0,
        })
    }

    /// Serializes `value` as pretty-printed JSON.
    pub fn write_json<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize to JSON")?;
        self.write_str(&json)
    }

    /// Writes raw text, e.g. an SVG document.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        self.writer.flush()
            .context("Failed to flush writer")?;

        self.bytes_written += text.len();
        Ok(())
    }

    /// Number of uncompressed bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl Drop for DatasetWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
