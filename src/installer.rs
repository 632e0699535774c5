//! Binary replacement
//!
//! Downloads a resolved release next to the running executable, checks the
//! download by opening it, and swaps it in with a rename.

use crate::domain::ResolvedRelease;
use crate::error::{Result, UpgradeError};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Packaging of a release asset, decided by its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    TarGz,
    Zip,
    /// The executable itself
    Binary,
}

impl AssetFormat {
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if lowered.ends_with(".tar.gz") || lowered.ends_with(".tgz") {
            AssetFormat::TarGz
        } else if lowered.ends_with(".zip") {
            AssetFormat::Zip
        } else {
            AssetFormat::Binary
        }
    }
}

/// Replaces one executable with downloaded releases
pub struct Installer {
    target: PathBuf,
    user_agent: String,
    agent: ureq::Agent,
}

impl Installer {
    /// Create an installer replacing `target`
    pub fn new(target: impl Into<PathBuf>, user_agent: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(15))
            .timeout_read(Duration::from_secs(300))
            .build();

        Installer {
            target: target.into(),
            user_agent: user_agent.into(),
            agent,
        }
    }

    /// Create an installer replacing the running executable
    pub fn for_current_exe(user_agent: impl Into<String>) -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| {
            UpgradeError::install(format!("cannot determine current executable path: {}", e))
        })?;
        Ok(Installer::new(exe, user_agent))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Verify the target directory accepts new files before anything is downloaded
    pub fn check_writable(&self) -> Result<()> {
        let dir = target_dir(&self.target)?;
        tempfile::Builder::new()
            .prefix(".selfupgrade-check")
            .tempfile_in(dir)
            .map(drop)
            .map_err(|e| {
                UpgradeError::install(format!("{} is not writable: {}", dir.display(), e))
            })
    }

    /// Download `release` and put it in place of the target
    pub fn install(&self, release: &ResolvedRelease) -> Result<()> {
        self.check_writable()?;
        let dir = target_dir(&self.target)?;

        let mut download = tempfile::Builder::new()
            .prefix(".selfupgrade-download")
            .tempfile_in(dir)?;

        info!(url = %release.download_url, "downloading release {}", release.display_tag);
        let bytes = self.download(&release.download_url, download.as_file_mut())?;
        debug!(bytes, "download complete");

        let binary = unpack(download, &release.asset_name, &binary_name(&self.target)?)?;
        set_executable(binary.path())?;
        replace_binary(binary, &self.target)?;

        info!(path = %self.target.display(), "installed {}", release.display_tag);
        Ok(())
    }

    fn download(&self, url: &str, dest: &mut File) -> Result<u64> {
        let response = self
            .agent
            .get(url)
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| UpgradeError::remote(format!("download of {} failed: {}", url, e)))?;

        let written = io::copy(&mut response.into_reader(), dest)?;
        dest.flush()?;
        dest.sync_all()?;
        Ok(written)
    }
}

fn target_dir(target: &Path) -> Result<&Path> {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
        Some(_) => Ok(Path::new(".")),
        None => Err(UpgradeError::install(format!(
            "{} has no parent directory",
            target.display()
        ))),
    }
}

fn binary_name(target: &Path) -> Result<String> {
    target
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| UpgradeError::install(format!("invalid target path {}", target.display())))
}

/// Turn a downloaded asset into the executable it carries.
///
/// Archives are opened and the entry named `binary_name` is extracted; a
/// download that cannot be opened as the archive it claims to be is rejected.
/// Plain binaries only have to be non-empty.
pub fn unpack(
    download: NamedTempFile,
    asset_name: &str,
    binary_name: &str,
) -> Result<NamedTempFile> {
    let format = AssetFormat::from_name(asset_name);
    debug!(?format, asset = asset_name, "checking download");

    if format == AssetFormat::Binary {
        ensure_non_empty(download.path())?;
        return Ok(download);
    }

    let dir = target_dir(download.path())?;
    let mut extracted = tempfile::Builder::new()
        .prefix(".selfupgrade-binary")
        .tempfile_in(dir)?;
    let archive = download.reopen()?;

    match format {
        AssetFormat::TarGz => extract_from_tar_gz(archive, binary_name, extracted.as_file_mut())?,
        AssetFormat::Zip => extract_from_zip(archive, binary_name, extracted.as_file_mut())?,
        AssetFormat::Binary => {}
    }

    extracted.as_file_mut().flush()?;
    ensure_non_empty(extracted.path())?;
    Ok(extracted)
}

fn ensure_non_empty(path: &Path) -> Result<()> {
    if fs::metadata(path)?.len() == 0 {
        return Err(UpgradeError::install("downloaded binary is empty"));
    }
    Ok(())
}

fn extract_from_tar_gz(reader: impl Read, binary_name: &str, dest: &mut File) -> Result<()> {
    let corrupt = |e: io::Error| UpgradeError::install(format!("corrupt tar.gz archive: {}", e));
    let mut archive = tar::Archive::new(GzDecoder::new(reader));

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let is_match = entry.header().entry_type().is_file()
            && entry
                .path()
                .map_err(corrupt)?
                .file_name()
                .and_then(|name| name.to_str())
                == Some(binary_name);

        if is_match {
            io::copy(&mut entry, dest).map_err(corrupt)?;
            return Ok(());
        }
    }

    Err(UpgradeError::install(format!(
        "archive does not contain '{}'",
        binary_name
    )))
}

fn extract_from_zip(file: File, binary_name: &str, dest: &mut File) -> Result<()> {
    let corrupt =
        |e: zip::result::ZipError| UpgradeError::install(format!("corrupt zip archive: {}", e));
    let mut archive = zip::ZipArchive::new(file).map_err(corrupt)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(corrupt)?;
        let is_match = entry.is_file()
            && entry
                .enclosed_name()
                .as_deref()
                .and_then(|path| path.file_name())
                .and_then(|name| name.to_str())
                == Some(binary_name);

        if is_match {
            io::copy(&mut entry, dest)?;
            return Ok(());
        }
    }

    Err(UpgradeError::install(format!(
        "archive does not contain '{}'",
        binary_name
    )))
}

/// Set executable permission on Unix platforms
fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
            UpgradeError::install(format!(
                "cannot set executable permission on {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Move `new_binary` into place of `target`.
///
/// The old binary is renamed aside first (a running executable can be renamed
/// on every platform), restored if the final rename fails, and otherwise
/// removed on a best-effort basis.
pub fn replace_binary(new_binary: NamedTempFile, target: &Path) -> Result<()> {
    let name = binary_name(target)?;
    let aside = target.with_file_name(format!(".{}.old", name));

    let had_target = target.exists();
    if had_target {
        fs::rename(target, &aside).map_err(|e| {
            UpgradeError::install(format!("cannot move {} aside: {}", target.display(), e))
        })?;
    }

    if let Err(e) = new_binary.persist(target) {
        if had_target {
            if let Err(restore) = fs::rename(&aside, target) {
                warn!(error = %restore, "could not restore {}", target.display());
            }
        }
        return Err(UpgradeError::install(format!(
            "cannot move new binary to {}: {}",
            target.display(),
            e.error
        )));
    }

    if had_target {
        if let Err(e) = fs::remove_file(&aside) {
            debug!(error = %e, "left {} behind", aside.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn temp_with(dir: &TempDir, contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn tar_gz(dir: &TempDir, entry: &str, contents: &[u8]) -> NamedTempFile {
        let file = NamedTempFile::new_in(dir.path()).unwrap();
        let encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, entry, contents).unwrap();
        builder.into_inner().unwrap().finish().unwrap();
        file
    }

    fn zip_archive(dir: &TempDir, entry: &str, contents: &[u8]) -> NamedTempFile {
        let file = NamedTempFile::new_in(dir.path()).unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file(entry, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
        writer.finish().unwrap();
        file
    }

    #[test]
    fn test_asset_format_from_name() {
        assert_eq!(AssetFormat::from_name("tool-linux.tar.gz"), AssetFormat::TarGz);
        assert_eq!(AssetFormat::from_name("tool.TGZ"), AssetFormat::TarGz);
        assert_eq!(AssetFormat::from_name("tool-windows.zip"), AssetFormat::Zip);
        assert_eq!(AssetFormat::from_name("tool"), AssetFormat::Binary);
        assert_eq!(AssetFormat::from_name("tool.exe"), AssetFormat::Binary);
    }

    #[test]
    fn test_unpack_plain_binary() {
        let dir = TempDir::new().unwrap();
        let download = temp_with(&dir, b"\x7fELF binary");
        let binary = unpack(download, "tool", "tool").unwrap();
        assert_eq!(fs::read(binary.path()).unwrap(), b"\x7fELF binary");
    }

    #[test]
    fn test_unpack_rejects_empty_binary() {
        let dir = TempDir::new().unwrap();
        let download = temp_with(&dir, b"");
        assert!(unpack(download, "tool", "tool").is_err());
    }

    #[test]
    fn test_unpack_tar_gz() {
        let dir = TempDir::new().unwrap();
        let download = tar_gz(&dir, "tool-2.0.0/tool", b"new tool");
        let binary = unpack(download, "tool-linux.tar.gz", "tool").unwrap();
        assert_eq!(fs::read(binary.path()).unwrap(), b"new tool");
    }

    #[test]
    fn test_unpack_tar_gz_missing_binary() {
        let dir = TempDir::new().unwrap();
        let download = tar_gz(&dir, "README.md", b"docs");
        let err = unpack(download, "tool-linux.tar.gz", "tool").unwrap_err();
        assert!(err.to_string().contains("does not contain 'tool'"));
    }

    #[test]
    fn test_unpack_zip() {
        let dir = TempDir::new().unwrap();
        let download = zip_archive(&dir, "bin/tool.exe", b"new tool");
        let binary = unpack(download, "tool-windows.zip", "tool.exe").unwrap();
        assert_eq!(fs::read(binary.path()).unwrap(), b"new tool");
    }

    #[test]
    fn test_unpack_rejects_corrupt_archives() {
        let dir = TempDir::new().unwrap();
        let err = unpack(temp_with(&dir, b"not a zip"), "tool.zip", "tool").unwrap_err();
        assert!(err.to_string().contains("corrupt zip archive"));

        let err = unpack(temp_with(&dir, b"not gzip"), "tool.tar.gz", "tool").unwrap_err();
        assert!(err.to_string().contains("corrupt tar.gz archive"));
    }

    #[test]
    fn test_replace_binary() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("tool");
        fs::write(&target, b"old").unwrap();

        replace_binary(temp_with(&dir, b"new"), &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!dir.path().join(".tool.old").exists());
    }

    #[test]
    fn test_replace_binary_without_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("tool");

        replace_binary(temp_with(&dir, b"new"), &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_check_writable() {
        let dir = TempDir::new().unwrap();
        let installer = Installer::new(dir.path().join("tool"), "test");
        assert!(installer.check_writable().is_ok());

        let missing = Installer::new(dir.path().join("missing/tool"), "test");
        assert!(missing.check_writable().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_set_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = temp_with(&dir, b"bin");
        set_executable(file.path()).unwrap();
        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
