use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AssemblyError, Result};

/// Where the clips of a run come from
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentSource {
    /// Every matching file of a folder, in file-name order
    Directory(PathBuf),
    /// Exactly these files, in this order
    Explicit(Vec<PathBuf>),
}

impl SegmentSource {
    /// Folder the default output file is written to
    pub fn base_dir(&self) -> PathBuf {
        match self {
            Self::Directory(dir) => dir.clone(),
            Self::Explicit(files) => files
                .first()
                .and_then(|file| file.parent())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Resolved list of clips in the order they will appear
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOrder {
    files: Vec<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl AssemblyOrder {
    /// Collect files whose extension is in `extensions` (case-sensitive), sorted by name
    pub fn scan(dir: &Path, extensions: &[String]) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AssemblyError::MissingDirectory {
                path: dir.display().to_string(),
            }
            .into());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|allowed| allowed == ext))
                .unwrap_or(false);
            if matches {
                files.push(path);
            }
        }

        files.sort_by_key(|path| file_name(path));
        debug!("Found {} clips in {}", files.len(), dir.display());
        Ok(Self { files })
    }

    /// Use the given files as-is; every one of them must exist
    pub fn explicit(files: Vec<PathBuf>) -> Result<Self> {
        if let Some(missing) = files.iter().find(|file| !file.is_file()) {
            return Err(AssemblyError::MissingVideo {
                path: missing.display().to_string(),
            }
            .into());
        }
        Ok(Self { files })
    }

    pub fn resolve(source: &SegmentSource, extensions: &[String]) -> Result<Self> {
        match source {
            SegmentSource::Directory(dir) => Self::scan(dir, extensions),
            SegmentSource::Explicit(files) => Self::explicit(files.clone()),
        }
    }

    /// Drop `path` from the list, such as a reel written into the scanned folder
    pub fn without(mut self, path: &Path) -> Self {
        let target = path.canonicalize().ok();
        self.files.retain(|file| {
            let same = file == path || (target.is_some() && file.canonicalize().ok() == target);
            if same {
                debug!("Skipping {}: it is the output file", file.display());
            }
            !same
        });
        self
    }

    /// Move the clip named `first` (file name or full path) to the front
    pub fn with_first(mut self, first: &str) -> Result<Self> {
        let wanted = Path::new(first);
        let index = self
            .files
            .iter()
            .position(|file| file == wanted || file_name(file) == first)
            .ok_or_else(|| AssemblyError::UnknownFirst {
                name: first.to_string(),
            })?;

        let chosen = self.files.remove(index);
        self.files.insert(0, chosen);
        Ok(self)
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn extensions() -> Vec<String> {
        crate::config::AssemblyConfig::default().extensions
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"clip").unwrap();
        path
    }

    fn names(order: &AssemblyOrder) -> Vec<String> {
        order.files().iter().map(|f| file_name(f)).collect()
    }

    #[test]
    fn test_scan_sorts_and_filters_by_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "c.mp4");
        touch(dir.path(), "a.MOV");
        touch(dir.path(), "b.mp4");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "d.Mp4");
        std::fs::create_dir(dir.path().join("e.mp4")).unwrap();

        let order = AssemblyOrder::scan(dir.path(), &extensions()).unwrap();
        assert_eq!(names(&order), vec!["a.MOV", "b.mp4", "c.mp4"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let err = AssemblyOrder::scan(&dir.path().join("nope"), &extensions()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::StitchError::Assembly(AssemblyError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_empty_directory_gives_empty_order() {
        let dir = tempdir().unwrap();
        let order = AssemblyOrder::scan(dir.path(), &extensions()).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_first_is_moved_to_front() {
        let dir = tempdir().unwrap();
        for name in ["a.mp4", "b.mp4", "c.mp4"] {
            touch(dir.path(), name);
        }

        let order = AssemblyOrder::scan(dir.path(), &extensions())
            .unwrap()
            .with_first("c.mp4")
            .unwrap();
        assert_eq!(names(&order), vec!["c.mp4", "a.mp4", "b.mp4"]);

        let by_path = AssemblyOrder::scan(dir.path(), &extensions())
            .unwrap()
            .with_first(&dir.path().join("b.mp4").display().to_string())
            .unwrap();
        assert_eq!(names(&by_path), vec!["b.mp4", "a.mp4", "c.mp4"]);
    }

    #[test]
    fn test_unknown_first_is_rejected() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.mp4");
        let order = AssemblyOrder::scan(dir.path(), &extensions()).unwrap();
        assert!(order.with_first("zzz.mp4").is_err());
    }

    #[test]
    fn test_output_file_is_left_out() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "a.mp4");
        touch(dir.path(), "b.mp4");
        let output = touch(dir.path(), "05-01_merged.mp4");

        let order = AssemblyOrder::scan(dir.path(), &extensions()).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(names(&order.clone().without(&output)), vec!["a.mp4", "b.mp4"]);

        let relative = dir.path().join(".").join("05-01_merged.mp4");
        assert_eq!(names(&order.without(&relative)), vec!["a.mp4", "b.mp4"]);
    }

    #[test]
    fn test_explicit_keeps_order_and_checks_files() {
        let dir = tempdir().unwrap();
        let b = touch(dir.path(), "b.mp4");
        let a = touch(dir.path(), "a.mp4");

        let order = AssemblyOrder::explicit(vec![b.clone(), a.clone()]).unwrap();
        assert_eq!(order.files(), &[b.clone(), a]);

        assert!(AssemblyOrder::explicit(vec![b, dir.path().join("gone.mp4")]).is_err());
        assert_eq!(
            SegmentSource::Explicit(vec![dir.path().join("x.mp4")]).base_dir(),
            dir.path()
        );
    }
}
