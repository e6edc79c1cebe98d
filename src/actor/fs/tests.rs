use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{AccessKind, CreateKind, DataChange, EventKind, MetadataKind, ModifyKind};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{Burst, coalesce, rebuild};
use crate::actor::ws::{Broadcaster, MockConnection, MockState};
use crate::content::{ContentStore, DocId, Scanner};
use crate::core::StopHandle;

const TICK: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(100);

fn make_event(kind: EventKind, path: &str) -> notify::Event {
    notify::Event::new(kind).add_path(PathBuf::from(path))
}

fn modify_kind() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Content))
}

fn access_kind() -> EventKind {
    EventKind::Access(AccessKind::Read)
}

/// Run `coalesce` in the background, recording each burst's size.
fn spawn_coalesce(
    rx: mpsc::Receiver<notify::Event>,
) -> (StopHandle, Arc<Mutex<Vec<usize>>>, tokio::task::JoinHandle<()>) {
    let (handle, stop) = StopHandle::new();
    let bursts = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&bursts);
    let task = tokio::spawn(coalesce(rx, TICK, QUIET, stop, move |burst| {
        seen.lock().push(burst.len());
        async {}
    }));
    (handle, bursts, task)
}

#[tokio::test(start_paused = true)]
async fn test_many_events_one_rebuild() {
    let (tx, rx) = mpsc::channel(64);
    let (handle, bursts, task) = spawn_coalesce(rx);

    for i in 0..20 {
        tx.send(make_event(modify_kind(), &format!("/wiki/Page{i}.md")))
            .await
            .unwrap();
    }
    tokio::time::sleep(TICK + QUIET * 3).await;

    assert_eq!(*bursts.lock(), vec![20]);
    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_separate_ticks_separate_rebuilds() {
    let (tx, rx) = mpsc::channel(64);
    let (handle, bursts, task) = spawn_coalesce(rx);

    tx.send(make_event(modify_kind(), "/wiki/A.md")).await.unwrap();
    tokio::time::sleep(TICK + QUIET * 3).await;
    tx.send(make_event(modify_kind(), "/wiki/B.md")).await.unwrap();
    tx.send(make_event(modify_kind(), "/wiki/B.md")).await.unwrap();
    tokio::time::sleep(TICK).await;

    assert_eq!(*bursts.lock(), vec![1, 1]);
    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_quiet_period_extends_burst() {
    let (tx, rx) = mpsc::channel(64);
    let (handle, bursts, task) = spawn_coalesce(rx);

    tx.send(make_event(modify_kind(), "/wiki/A.md")).await.unwrap();
    tokio::time::sleep(TICK + QUIET / 2).await;
    tx.send(make_event(modify_kind(), "/wiki/B.md")).await.unwrap();
    tokio::time::sleep(QUIET * 3).await;

    assert_eq!(*bursts.lock(), vec![2]);
    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_idle_ticks_do_nothing() {
    let (_tx, rx) = mpsc::channel::<notify::Event>(64);
    let (handle, bursts, task) = spawn_coalesce(rx);

    tokio::time::sleep(TICK * 4).await;

    assert!(bursts.lock().is_empty());
    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_access_events_are_ignored() {
    let (tx, rx) = mpsc::channel(64);
    let (handle, bursts, task) = spawn_coalesce(rx);

    tx.send(make_event(access_kind(), "/wiki/A.md")).await.unwrap();
    tx.send(make_event(
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)),
        "/wiki/A.md",
    ))
    .await
    .unwrap();
    tokio::time::sleep(TICK * 2).await;

    assert!(bursts.lock().is_empty());
    handle.stop();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_closed_source_ends_loop() {
    let (tx, rx) = mpsc::channel(64);
    let (_handle, bursts, task) = spawn_coalesce(rx);

    tx.send(make_event(modify_kind(), "/wiki/A.md")).await.unwrap();
    drop(tx);
    tokio::time::sleep(TICK * 2).await;

    assert!(task.is_finished());
    assert_eq!(*bursts.lock(), vec![1]);
}

#[test]
fn test_temp_files_are_dropped() {
    let mut burst = Burst::default();
    for path in ["/wiki/A.md~", "/wiki/.#A.md", "/wiki/A.md.swp", "/wiki/4913"] {
        burst.add(&make_event(modify_kind(), path));
    }
    assert!(burst.is_empty());

    burst.add(&make_event(EventKind::Create(CreateKind::File), "/wiki/A.md"));
    assert_eq!(burst.len(), 1);
}

#[test]
fn test_asset_detection() {
    let root = Path::new("/wiki");
    let mut docs = Burst::default();
    docs.add(&make_event(modify_kind(), "/wiki/Home.md"));
    docs.add(&make_event(modify_kind(), "/wiki/_footer.md"));
    docs.add(&make_event(modify_kind(), "/wiki/.git/index"));
    assert!(!docs.touches_assets(root));

    let mut style = Burst::default();
    style.add(&make_event(modify_kind(), "/wiki/custom.css"));
    assert!(style.touches_assets(root));

    let mut image = Burst::default();
    image.add(&make_event(modify_kind(), "/wiki/logo.png"));
    assert!(image.touches_assets(root));
}

/// A docroot under a temp dir, its store, and a broadcaster with one session.
struct Live {
    _dir: tempfile::TempDir,
    root: PathBuf,
    scanner: Arc<Scanner>,
    store: Arc<ContentStore>,
    broadcaster: Arc<Broadcaster>,
    sent: Arc<Mutex<MockState>>,
}

impl Live {
    fn new(home: &str) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().join("wiki");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("Home.md"), home).unwrap();

        let scanner = Arc::new(Scanner::new(&root, "git"));
        let store = Arc::new(ContentStore::new(scanner.scan().unwrap()));
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&store), ""));
        let (conn, sent) = MockConnection::new();
        broadcaster.connect(conn, None);

        Self {
            _dir: dir,
            root,
            scanner,
            store,
            broadcaster,
            sent,
        }
    }

    fn burst(&self, names: &[&str]) -> Burst {
        let mut burst = Burst::default();
        for name in names {
            let path = self.root.join(name);
            burst.add(&notify::Event::new(modify_kind()).add_path(path));
        }
        burst
    }

    async fn rebuild(&self, burst: Burst) {
        rebuild(
            burst,
            Arc::clone(&self.scanner),
            Arc::clone(&self.store),
            Arc::clone(&self.broadcaster),
        )
        .await;
    }

    fn last_message(&self) -> serde_json::Value {
        serde_json::from_str(self.sent.lock().sent.last().unwrap()).unwrap()
    }

    fn home_title(&self) -> String {
        self.store.load().get(&DocId::Main).unwrap().title.clone()
    }
}

#[tokio::test(start_paused = true)]
async fn test_rebuild_installs_then_pushes_page() {
    let live = Live::new("# Old");
    std::fs::write(live.root.join("Home.md"), "# New").unwrap();

    live.rebuild(live.burst(&["Home.md"])).await;

    assert_eq!(live.home_title(), "New");
    let msg = live.last_message();
    assert_eq!(msg["type"], "page");
    assert_eq!(msg["page"]["Content"]["Title"], "New");
    assert_eq!(live.sent.lock().sent.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_asset_burst_sends_refresh() {
    let live = Live::new("# Home");
    std::fs::write(live.root.join("logo.png"), b"\x89PNG").unwrap();

    live.rebuild(live.burst(&["logo.png"])).await;

    assert_eq!(live.last_message()["type"], "refresh");
}

#[tokio::test(start_paused = true)]
async fn test_failed_rescan_keeps_snapshot() {
    let live = Live::new("# Home");
    let before = live.store.load();
    std::fs::remove_dir_all(&live.root).unwrap();

    live.rebuild(live.burst(&["Home.md"])).await;

    assert!(Arc::ptr_eq(&before, &live.store.load()));
    assert_eq!(live.sent.lock().sent.len(), 1);
    assert_eq!(live.broadcaster.registry().len(), 1);
}
