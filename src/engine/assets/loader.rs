// Animation clip loading

use super::AssetError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supported clip container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipFormat {
    Gltf,
    Fbx,
}

impl ClipFormat {
    /// Get supported file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ClipFormat::Gltf => &["glb", "gltf"],
            ClipFormat::Fbx => &["fbx"],
        }
    }

    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        [ClipFormat::Gltf, ClipFormat::Fbx]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
            .ok_or_else(|| AssetError::UnsupportedFormat(path.display().to_string()))
    }
}

/// A decoded animation clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipData {
    pub name: String,
    /// Length in seconds
    pub duration: f32,
}

impl ClipData {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// Decodes animation files into clips
pub trait ClipSource {
    fn load(&mut self, path: &Path, format: ClipFormat) -> Result<Vec<ClipData>, AssetError>;
}

/// Outcome of loading a clip table
#[derive(Debug, Default)]
pub struct ClipLoadReport {
    /// One clip per successfully loaded entry, renamed to its key
    pub loaded: Vec<ClipData>,
    /// Entries that failed, with the reason
    pub failures: Vec<(String, AssetError)>,
}

impl ClipLoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn clip(&self, name: &str) -> Option<&ClipData> {
        self.loaded.iter().find(|clip| clip.name == name)
    }
}

/// Load one clip per `(name, path)` entry.
///
/// The first clip in each file is taken and renamed to the entry's name.
/// Failures are collected, never fatal.
pub fn load_clips<'a, S, I>(source: &mut S, entries: I) -> ClipLoadReport
where
    S: ClipSource + ?Sized,
    I: IntoIterator<Item = (&'a str, &'a Path)>,
{
    let mut report = ClipLoadReport::default();

    for (name, path) in entries {
        let result = ClipFormat::from_path(path)
            .and_then(|format| source.load(path, format))
            .and_then(|clips| {
                clips
                    .into_iter()
                    .next()
                    .ok_or_else(|| AssetError::EmptyClipSet(path.display().to_string()))
            });

        match result {
            Ok(mut clip) => {
                clip.name = name.to_string();
                log::debug!("Loaded clip '{}' ({:.2}s)", name, clip.duration);
                report.loaded.push(clip);
            }
            Err(e) => {
                log::warn!("Failed to load clip '{}': {}", name, e);
                report.failures.push((name.to_string(), e));
            }
        }
    }

    log::info!(
        "Loaded {} animation clips ({} failed)",
        report.loaded.len(),
        report.failures.len()
    );
    report
}

/// Ordered table of clip name → file location
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClipPaths {
    entries: Vec<(String, PathBuf)>,
}

impl ClipPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the location for a name, replacing any earlier one
    pub fn insert<P: Into<PathBuf>>(&mut self, name: &str, path: P) {
        let path = path.into();
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((name.to_string(), path)),
        }
    }

    pub fn with<P: Into<PathBuf>>(mut self, name: &str, path: P) -> Self {
        self.insert(name, path);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Clip source backed by a table of already decoded files
#[derive(Debug, Default, Clone)]
pub struct InMemoryClipSource {
    files: HashMap<PathBuf, Vec<ClipData>>,
}

impl InMemoryClipSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the clips contained in a file
    pub fn insert<P: AsRef<Path>>(&mut self, path: P, clips: Vec<ClipData>) {
        self.files.insert(path.as_ref().to_path_buf(), clips);
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P, clips: Vec<ClipData>) -> Self {
        self.insert(path, clips);
        self
    }
}

impl ClipSource for InMemoryClipSource {
    fn load(&mut self, path: &Path, _format: ClipFormat) -> Result<Vec<ClipData>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.display().to_string()))
    }
}
