use serde::{Deserialize, Serialize};

use crate::frame_key::FrameKey;

/// One frame occurrence in a flamegraph (or one span in a span tree).
///
/// A frame list is flat: tree structure is carried by `parent`, which indexes
/// into the same list. The same logical frame appears once per call path,
/// each occurrence sharing its `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Identity shared by all occurrences of this logical frame.
    pub key: FrameKey,
    /// Symbol name (or span operation).
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    /// Library / package / image the symbol belongs to.
    #[serde(default)]
    pub library: Option<String>,
    /// `true` for application code, `false` for system frames.
    #[serde(default)]
    pub is_application: bool,
    /// Stack depth (0 = root).
    #[serde(default)]
    pub depth: u32,
    /// Number of samples (or weight) attributed to this occurrence.
    #[serde(default)]
    pub sample_count: f64,
    /// Index of the parent occurrence in the same frame list.
    #[serde(default)]
    pub parent: Option<usize>,
}

impl StackFrame {
    /// A root frame whose key is derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: FrameKey::symbol(&name, None),
            name,
            file: None,
            library: None,
            is_application: false,
            depth: 0,
            sample_count: 0.0,
            parent: None,
        }
    }

    /// A frame qualified by its source file; the key covers both.
    pub fn symbol(name: impl Into<String>, file: impl Into<String>) -> Self {
        let file = file.into();
        let mut frame = Self::new(name);
        frame.key = FrameKey::symbol(&frame.name, Some(&file));
        frame.file = Some(file);
        frame
    }

    pub fn with_key(mut self, key: impl Into<FrameKey>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn application(mut self) -> Self {
        self.is_application = true;
        self
    }

    pub fn with_samples(mut self, sample_count: f64) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Attach to `parent` at `depth`.
    pub fn child_of(mut self, parent: usize, depth: u32) -> Self {
        self.parent = Some(parent);
        self.depth = depth;
        self
    }
}
