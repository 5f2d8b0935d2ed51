//! Start-up self-update.
//!
//! The sequence is linear and best-effort: fetch the version descriptor,
//! compare it with the embedded version, download the advertised binary
//! next to the running one, swap it into place, relaunch, exit. Every
//! failure before the swap is logged and the caller simply carries on with
//! normal start-up.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    process::Command,
    sync::Arc,
};

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{error, info, warn};

use crate::error::{UpdateError, UpdateResult};

/// Version baked into this build.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_VERSION_URL: &str = "https://example.com/version.json";

const STAGED_SUFFIX: &str = ".new";
#[cfg(any(windows, test))]
const RETIRED_SUFFIX: &str = ".old";
const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Remote document announcing the latest release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub version: String,
    pub download_url: String,
}

impl VersionDescriptor {
    /// Plain string inequality. A descriptor advertising an *older* version
    /// still counts as different; see [`Self::looks_older_than`].
    pub fn differs_from(&self, current: &str) -> bool {
        self.version != current
    }

    /// Best-effort numeric comparison of dotted versions, used only to warn
    /// about downgrades. Returns false when either side is not purely
    /// numeric.
    pub fn looks_older_than(&self, current: &str) -> bool {
        match (numeric_parts(&self.version), numeric_parts(current)) {
            (Some(remote), Some(local)) => remote < local,
            _ => false,
        }
    }
}

fn numeric_parts(version: &str) -> Option<Vec<u64>> {
    let version = version.trim().trim_start_matches('v');
    let mut parts = version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;
    while parts.len() > 1 && parts.last() == Some(&0) {
        parts.pop();
    }
    Some(parts)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    UpToDate,
    CheckFailed,
    DownloadFailed,
    /// The new binary could not be moved into place; the running binary is
    /// untouched.
    ReplaceFailed,
    /// The binary was swapped and a relaunch requested. With
    /// [`SystemProcess`] this is never observed because the process exits.
    Relaunched { version: String },
}

/// Process-level side effects of the final update step.
pub trait ProcessControl: Send + Sync {
    /// Start `executable` detached from the current process.
    fn relaunch(&self, executable: &Path, args: &[OsString]) -> std::io::Result<()>;

    /// Terminate the current process.
    fn exit(&self);
}

/// Spawns real processes and exits with status 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcess;

impl ProcessControl for SystemProcess {
    fn relaunch(&self, executable: &Path, args: &[OsString]) -> std::io::Result<()> {
        Command::new(executable).args(args).spawn().map(|_| ())
    }

    fn exit(&self) {
        std::process::exit(0);
    }
}

pub struct SelfUpdater {
    http: Client,
    version_url: String,
    current_version: String,
    executable: PathBuf,
    relaunch_args: Vec<OsString>,
    process: Arc<dyn ProcessControl>,
}

impl fmt::Debug for SelfUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfUpdater")
            .field("version_url", &self.version_url)
            .field("current_version", &self.current_version)
            .field("executable", &self.executable)
            .finish_non_exhaustive()
    }
}

impl SelfUpdater {
    /// Updater for the running executable.
    pub fn new(version_url: impl Into<String>) -> UpdateResult<Self> {
        let executable = std::env::current_exe()?;
        Self::for_executable(version_url, executable)
    }

    pub fn for_executable(
        version_url: impl Into<String>,
        executable: impl Into<PathBuf>,
    ) -> UpdateResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("reelview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            version_url: version_url.into(),
            current_version: CURRENT_VERSION.to_string(),
            executable: executable.into(),
            relaunch_args: Vec::new(),
            process: Arc::new(SystemProcess),
        })
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    pub fn with_relaunch_args(mut self, args: Vec<OsString>) -> Self {
        self.relaunch_args = args;
        self
    }

    pub fn with_process_control(mut self, process: Arc<dyn ProcessControl>) -> Self {
        self.process = process;
        self
    }

    /// `<executable>.new`, where downloads are staged.
    pub fn staged_path(&self) -> UpdateResult<PathBuf> {
        sibling_with_suffix(&self.executable, STAGED_SUFFIX)
    }

    /// Run the whole sequence once.
    pub async fn run(&self) -> UpdateOutcome {
        let descriptor = match self.check().await {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => return UpdateOutcome::UpToDate,
            Err(err) => {
                error!(error = %err, url = %self.version_url, "update check failed");
                return UpdateOutcome::CheckFailed;
            }
        };

        let staged = match self.download(&descriptor.download_url).await {
            Ok(staged) => staged,
            Err(err) => {
                error!(error = %err, url = %descriptor.download_url, "update download failed");
                return UpdateOutcome::DownloadFailed;
            }
        };

        if let Err(err) = self.install(&staged).await {
            error!(error = %err, "replacing the running executable failed");
            let _ = fs::remove_file(&staged).await;
            return UpdateOutcome::ReplaceFailed;
        }

        info!(version = %descriptor.version, "relaunching updated executable");
        if let Err(err) = self.process.relaunch(&self.executable, &self.relaunch_args) {
            error!(error = %err, "failed to relaunch updated executable");
        }
        self.process.exit();

        UpdateOutcome::Relaunched {
            version: descriptor.version,
        }
    }

    /// Fetch the descriptor. `Ok(None)` means the running build is current.
    pub async fn check(&self) -> UpdateResult<Option<VersionDescriptor>> {
        let response = self.http.get(&self.version_url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpdateError::Status {
                url: self.version_url.clone(),
                status,
            });
        }

        let body = response.bytes().await?;
        let descriptor: VersionDescriptor = serde_json::from_slice(&body)?;

        if !descriptor.differs_from(&self.current_version) {
            info!(version = %self.current_version, "already running the latest version");
            return Ok(None);
        }

        if descriptor.looks_older_than(&self.current_version) {
            warn!(
                current = %self.current_version,
                advertised = %descriptor.version,
                "advertised version is older than the running one; updating anyway"
            );
        }
        info!(version = %descriptor.version, "new version available");

        Ok(Some(descriptor))
    }

    /// Stream `download_url` into the staged path. A partial file is removed
    /// on failure.
    pub async fn download(&self, download_url: &str) -> UpdateResult<PathBuf> {
        let staged = self.staged_path()?;
        info!(path = %staged.display(), "downloading update");

        match self.stream_to(download_url, &staged).await {
            Ok(bytes) => {
                info!(bytes, "update downloaded");
                Ok(staged)
            }
            Err(err) => {
                let _ = fs::remove_file(&staged).await;
                Err(err)
            }
        }
    }

    async fn stream_to(&self, url: &str, destination: &Path) -> UpdateResult<u64> {
        let response = self.http.get(url).send().await?.error_for_status()?;

        let file = File::create(destination).await?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        Ok(written)
    }

    /// Move the staged binary over the running one.
    ///
    /// On Unix the rename is atomic and the old inode stays valid for the
    /// running process. Windows refuses to overwrite a running image, so the
    /// old binary is first renamed aside and put back if the swap fails.
    pub async fn install(&self, staged: &Path) -> UpdateResult<()> {
        self.copy_permissions(staged).await?;

        #[cfg(windows)]
        {
            let retired = sibling_with_suffix(&self.executable, RETIRED_SUFFIX)?;
            swap_via_retired(staged, &self.executable, &retired).await?;
        }
        #[cfg(not(windows))]
        fs::rename(staged, &self.executable).await?;

        info!(path = %self.executable.display(), "executable replaced");
        Ok(())
    }

    #[cfg(unix)]
    async fn copy_permissions(&self, staged: &Path) -> UpdateResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = match fs::metadata(&self.executable).await {
            Ok(meta) => meta.permissions().mode() | 0o111,
            Err(_) => 0o755,
        };
        fs::set_permissions(staged, std::fs::Permissions::from_mode(mode)).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn copy_permissions(&self, _staged: &Path) -> UpdateResult<()> {
        Ok(())
    }
}

/// Rename `executable` to `retired`, then `staged` to `executable`. When
/// the second rename fails the original binary is moved back.
#[cfg(any(windows, test))]
async fn swap_via_retired(
    staged: &Path,
    executable: &Path,
    retired: &Path,
) -> UpdateResult<()> {
    match fs::remove_file(retired).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    fs::rename(executable, retired).await?;

    if let Err(err) = fs::rename(staged, executable).await {
        if let Err(restore) = fs::rename(retired, executable).await {
            error!(
                error = %restore,
                path = %retired.display(),
                "failed to restore the previous executable"
            );
        }
        return Err(err.into());
    }
    Ok(())
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> UpdateResult<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| UpdateError::MissingExecutable(path.to_path_buf()))?
        .to_os_string();
    name.push(suffix);
    Ok(path.with_file_name(name))
}
