use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::types::ResourceKind;

/// Shared destination for report lines.
///
/// Clones share one writer behind a mutex so concurrent namespace tasks
/// never interleave partial lines.
#[derive(Clone)]
pub struct ReportSink {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ReportSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Write one complete line. Errors on the underlying writer are
    /// ignored, matching plain stdout printing.
    pub fn line(&self, text: impl AsRef<str>) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", text.as_ref());
        }
    }
}

/// In-memory writer for capturing report output in tests.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> ReportSink {
        ReportSink::new(Box::new(self.clone()))
    }

    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.buf.lock() {
            buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Per-kind bad-counts for one scan, in the order the kinds were checked.
#[derive(Debug, Default)]
pub struct ScanReport {
    sections: Vec<(ResourceKind, usize)>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self, kind: ResourceKind, bad: usize) {
        self.sections.push((kind, bad));
    }

    pub fn sections(&self) -> &[(ResourceKind, usize)] {
        &self.sections
    }

    pub fn total_issues(&self) -> usize {
        self.sections.iter().map(|(_, bad)| bad).sum()
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}
