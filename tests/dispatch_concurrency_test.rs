use async_trait::async_trait;
use boxscore_gateway::services::dispatcher::{BatchDispatcher, BatchResult, DispatchOptions};
use boxscore_gateway::services::error::DispatchError;
use boxscore_gateway::services::manifest::PendingManifest;
use boxscore_gateway::services::stager::UploadStager;
use boxscore_gateway::services::stats_client::{BatchRequest, StatsReply, StatsService};
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tokio::sync::{Semaphore, mpsc};

/// Holds every call open until the test hands out a release permit
struct GatedStatsService {
    requests: Mutex<Vec<BatchRequest>>,
    entered: mpsc::UnboundedSender<()>,
    release: Semaphore,
}

impl GatedStatsService {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<()>) {
        let (entered, entered_rx) = mpsc::unbounded_channel();
        let service = Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            entered,
            release: Semaphore::new(0),
        });
        (service, entered_rx)
    }

    fn sent_bytes(&self) -> Vec<Vec<Vec<u8>>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.boxscores.iter().map(|f| f.as_bytes().to_vec()).collect())
            .collect()
    }
}

#[async_trait]
impl StatsService for GatedStatsService {
    async fn get_stats(&self, request: BatchRequest) -> Result<StatsReply, DispatchError> {
        self.requests.lock().unwrap().push(request);
        self.entered.send(()).unwrap();
        self.release.acquire().await.unwrap().forget();
        Ok(StatsReply {
            sheet: Some(Bytes::from_static(b"sheet")),
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_upload_during_dispatch_goes_to_next_batch() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Arc::new(PendingManifest::new());
    let stager = UploadStager::new(dir.path(), Vec::new(), manifest.clone());
    let (stats, mut entered) = GatedStatsService::new();
    let dispatcher = Arc::new(BatchDispatcher::new(manifest.clone(), stats.clone()));

    stager.stage("early.html", &b"early"[..]).await.unwrap();

    let in_flight = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.dispatch_batch(DispatchOptions::default()).await })
    };

    // the manifest has been swapped once the remote call is in progress
    entered.recv().await.unwrap();
    stager.stage("late.html", &b"late"[..]).await.unwrap();
    assert_eq!(manifest.len(), 1);

    stats.release.add_permits(1);
    let first = in_flight.await.unwrap();
    assert!(matches!(first, BatchResult::Sheet(_)));

    let second = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.dispatch_batch(DispatchOptions::default()).await })
    };
    entered.recv().await.unwrap();
    stats.release.add_permits(1);
    assert!(second.await.unwrap().is_success());

    assert_eq!(
        stats.sent_bytes(),
        vec![vec![b"early".to_vec()], vec![b"late".to_vec()]]
    );
    assert!(manifest.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatches_see_disjoint_batches() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Arc::new(PendingManifest::new());
    let stager = UploadStager::new(dir.path(), Vec::new(), manifest.clone());
    let (stats, mut entered) = GatedStatsService::new();
    let dispatcher = Arc::new(BatchDispatcher::new(manifest.clone(), stats.clone()));

    for i in 0..10u8 {
        stager
            .stage(&format!("j{i}.html"), &[i][..])
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..3 {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            dispatcher.dispatch_batch(DispatchOptions::default()).await
        }));
    }

    for _ in 0..3 {
        entered.recv().await.unwrap();
    }
    stats.release.add_permits(3);
    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }

    let batches = stats.sent_bytes();
    assert_eq!(batches.len(), 3);
    let mut all: Vec<u8> = batches.into_iter().flatten().flatten().collect();
    all.sort();
    assert_eq!(all, (0..10u8).collect::<Vec<_>>());

    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}
