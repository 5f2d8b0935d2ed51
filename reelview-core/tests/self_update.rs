use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use reelview_core::{ProcessControl, SelfUpdater, UpdateOutcome};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUNNING_VERSION: &str = "1.0.0";

#[derive(Default)]
struct RecordingProcess {
    relaunched: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    exited: AtomicBool,
}

impl ProcessControl for RecordingProcess {
    fn relaunch(&self, executable: &Path, args: &[OsString]) -> std::io::Result<()> {
        self.relaunched
            .lock()
            .unwrap()
            .push((executable.to_path_buf(), args.to_vec()));
        Ok(())
    }

    fn exit(&self) {
        self.exited.store(true, Ordering::SeqCst);
    }
}

struct Fixture {
    server: MockServer,
    dir: TempDir,
    executable: PathBuf,
    process: Arc<RecordingProcess>,
}

impl Fixture {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let dir = TempDir::new().expect("tempdir");
        let executable = dir.path().join("reelview");
        std::fs::write(&executable, b"old-binary").expect("seed executable");

        Self {
            server,
            dir,
            executable,
            process: Arc::new(RecordingProcess::default()),
        }
    }

    fn updater(&self) -> SelfUpdater {
        SelfUpdater::for_executable(
            format!("{}/version.json", self.server.uri()),
            &self.executable,
        )
        .expect("build updater")
        .with_current_version(RUNNING_VERSION)
        .with_relaunch_args(vec![OsString::from("--no-browser")])
        .with_process_control(self.process.clone())
    }

    async fn serve_descriptor(&self, version: &str) {
        Mock::given(method("GET"))
            .and(path("/version.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": version,
                "download_url": format!("{}/download/reelview", self.server.uri()),
            })))
            .mount(&self.server)
            .await;
    }

    fn executable_contents(&self) -> Vec<u8> {
        std::fs::read(&self.executable).expect("read executable")
    }

    fn staged_exists(&self) -> bool {
        self.dir.path().join("reelview.new").exists()
    }
}

#[tokio::test]
async fn same_version_skips_download_and_replace() {
    let fixture = Fixture::new().await;
    fixture.serve_descriptor(RUNNING_VERSION).await;
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new-binary".to_vec()))
        .expect(0)
        .mount(&fixture.server)
        .await;

    let outcome = fixture.updater().run().await;

    assert_eq!(outcome, UpdateOutcome::UpToDate);
    assert_eq!(fixture.executable_contents(), b"old-binary");
    assert!(!fixture.staged_exists());
    assert!(fixture.process.relaunched.lock().unwrap().is_empty());
    assert!(!fixture.process.exited.load(Ordering::SeqCst));
}

#[tokio::test]
async fn new_version_is_downloaded_swapped_and_relaunched() {
    let fixture = Fixture::new().await;
    fixture.serve_descriptor("1.1.0").await;
    let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let outcome = fixture.updater().run().await;

    assert_eq!(
        outcome,
        UpdateOutcome::Relaunched {
            version: "1.1.0".to_string()
        }
    );
    assert_eq!(fixture.executable_contents(), payload);
    assert!(!fixture.staged_exists());

    let relaunched = fixture.process.relaunched.lock().unwrap();
    assert_eq!(relaunched.len(), 1);
    assert_eq!(relaunched[0].0, fixture.executable);
    assert_eq!(relaunched[0].1, vec![OsString::from("--no-browser")]);
    assert!(fixture.process.exited.load(Ordering::SeqCst));
}

#[tokio::test]
async fn older_advertised_version_still_updates() {
    let fixture = Fixture::new().await;
    fixture.serve_descriptor("0.9.0").await;
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"older".to_vec()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let outcome = fixture.updater().run().await;

    assert!(matches!(outcome, UpdateOutcome::Relaunched { .. }));
    assert_eq!(fixture.executable_contents(), b"older");
}

#[tokio::test]
async fn descriptor_error_aborts_quietly() {
    let fixture = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/version.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fixture.server)
        .await;

    assert_eq!(fixture.updater().run().await, UpdateOutcome::CheckFailed);
    assert_eq!(fixture.executable_contents(), b"old-binary");
    assert!(!fixture.process.exited.load(Ordering::SeqCst));
}

#[tokio::test]
async fn malformed_descriptor_aborts_quietly() {
    let fixture = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/version.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "latest": "2.0.0" })))
        .mount(&fixture.server)
        .await;

    assert_eq!(fixture.updater().run().await, UpdateOutcome::CheckFailed);
}

#[tokio::test]
async fn failed_download_leaves_the_executable_alone() {
    let fixture = Fixture::new().await;
    fixture.serve_descriptor("2.0.0").await;
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let outcome = fixture.updater().run().await;

    assert_eq!(outcome, UpdateOutcome::DownloadFailed);
    assert_eq!(fixture.executable_contents(), b"old-binary");
    assert!(!fixture.staged_exists());
    assert!(!fixture.process.exited.load(Ordering::SeqCst));
}

#[cfg(unix)]
#[tokio::test]
async fn replaced_executable_keeps_exec_bits() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new().await;
    std::fs::set_permissions(
        &fixture.executable,
        std::fs::Permissions::from_mode(0o700),
    )
    .expect("chmod");
    fixture.serve_descriptor("1.0.1").await;
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&fixture.server)
        .await;

    fixture.updater().run().await;

    let mode = std::fs::metadata(&fixture.executable)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o711);
}

#[cfg(unix)]
#[tokio::test]
async fn failed_swap_reports_replace_failed_and_keeps_running() {
    let fixture = Fixture::new().await;
    std::fs::remove_file(&fixture.executable).expect("remove seed");
    std::fs::create_dir(&fixture.executable).expect("directory in place of executable");
    std::fs::write(fixture.executable.join("keep"), b"x").expect("populate directory");

    fixture.serve_descriptor("1.1.0").await;
    Mock::given(method("GET"))
        .and(path("/download/reelview"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new-binary".to_vec()))
        .expect(1)
        .mount(&fixture.server)
        .await;

    let outcome = fixture.updater().run().await;

    assert_eq!(outcome, UpdateOutcome::ReplaceFailed);
    assert!(fixture.executable.join("keep").exists());
    assert!(!fixture.staged_exists());
    assert!(fixture.process.relaunched.lock().unwrap().is_empty());
    assert!(!fixture.process.exited.load(Ordering::SeqCst));
}
