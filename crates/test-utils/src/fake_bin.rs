//! Throwaway executables for driving the runner without a real ffmpeg.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory of executable shell scripts.
///
/// The directory (and every script in it) is removed on drop.
pub struct FakeBin {
    dir: TempDir,
}

impl FakeBin {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an executable `/bin/sh` script called `name` and return its path.
    #[cfg(unix)]
    pub fn script(&self, name: &str, body: &str) -> io::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Write an executable file that is not a valid program image.
    #[cfg(unix)]
    pub fn garbage(&self, name: &str) -> io::Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        fs::write(&path, [0u8, 1, 2, 3, 0xde, 0xad, 0xbe, 0xef])?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// A stand-in for ffmpeg's argument validation.
    ///
    /// Exits 1 with ffmpeg's message when no output file follows the inputs,
    /// and 0 otherwise. Any non-flag argument that is not an `-i` value counts
    /// as an output, so flags that take values should not be used with it.
    #[cfg(unix)]
    pub fn ffmpeg(&self) -> io::Result<PathBuf> {
        self.script(
            "ffmpeg",
            r#"output=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) [ $# -gt 1 ] && shift ;;
    -*) ;;
    *) output="$1" ;;
  esac
  shift
done
if [ -z "$output" ]; then
  echo "At least one output file must be specified" >&2
  exit 1
fi
exit 0"#,
        )
    }
}
