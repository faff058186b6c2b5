//! Raw model output.

use crate::error::{DetectError, DetectResult};

/// Values per row when the model emits no class column.
pub const ROW_LEN_NO_CLASS: usize = 5;
/// Values per row including the class column.
pub const ROW_LEN_WITH_CLASS: usize = 6;

/// Flat detector output, one fixed-width row per candidate box.
///
/// Rows are `[x1, y1, x2, y2, confidence]` or `[x1, y1, x2, y2, confidence,
/// class]` with corner coordinates in model-input pixel space. Models
/// without a class column get class id 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    data: Vec<f32>,
    row_len: usize,
}

impl RawOutput {
    pub fn new(data: Vec<f32>, row_len: usize) -> DetectResult<Self> {
        if row_len != ROW_LEN_NO_CLASS && row_len != ROW_LEN_WITH_CLASS {
            return Err(DetectError::decode_failed(format!(
                "unsupported row length {} (expected {} or {})",
                row_len, ROW_LEN_NO_CLASS, ROW_LEN_WITH_CLASS
            )));
        }
        if data.len() % row_len != 0 {
            return Err(DetectError::decode_failed(format!(
                "output length {} is not a multiple of row length {}",
                data.len(),
                row_len
            )));
        }
        Ok(Self { data, row_len })
    }

    /// An output with no candidate rows.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            row_len: ROW_LEN_WITH_CLASS,
        }
    }

    /// Build from full six-value rows. Infallible by construction.
    pub fn from_rows(rows: Vec<[f32; ROW_LEN_WITH_CLASS]>) -> Self {
        Self {
            data: rows.into_iter().flatten().collect(),
            row_len: ROW_LEN_WITH_CLASS,
        }
    }

    /// Number of candidate rows.
    pub fn len(&self) -> usize {
        self.data.len() / self.row_len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row_len(&self) -> usize {
        self.row_len
    }

    /// Iterate the candidate rows.
    pub fn candidates(&self) -> impl Iterator<Item = RawCandidate> + '_ {
        let has_class = self.row_len > ROW_LEN_NO_CLASS;
        self.data.chunks_exact(self.row_len).map(move |row| RawCandidate {
            x1: row[0],
            y1: row[1],
            x2: row[2],
            y2: row[3],
            confidence: row[4],
            class_id: if has_class { row[5] as u32 } else { 0 },
        })
    }
}

/// One decoded candidate row, still in model-input pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCandidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: u32,
}
