use std::sync::Arc;

use psort_server::{
    client::{generate_batch, run_self_test, SortClient},
    processing::{process_sequential, Strategy},
    server::{serve_listener, AppState},
};
use tokio::sync::oneshot;

struct TestServer {
    client: SortClient,
    shutdown: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

async fn start(max_body_bytes: usize) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        serve_listener(listener, AppState::new(max_body_bytes), shutdown_rx)
            .await
            .unwrap();
    });

    TestServer {
        client: SortClient::new(format!("http://{addr}")).unwrap(),
        shutdown,
        handle,
    }
}

impl TestServer {
    async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn self_test_passes_against_running_server() {
    let server = start(1024 * 1024).await;

    let resp = run_self_test(&server.client).await.unwrap();
    assert_eq!(
        resp.sorted_arrays,
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
    );

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn both_routes_agree_on_generated_batches() {
    let server = start(64 * 1024 * 1024).await;

    for (arrays, len, seed) in [(0, 0, 1), (1, 1, 2), (32, 500, 3), (2_000, 8, 4)] {
        let batch = generate_batch(arrays, len, seed);
        let expected = process_sequential(&batch).sorted_arrays;

        let sequential = server.client.sort(Strategy::Sequential, &batch).await.unwrap();
        let concurrent = server.client.sort(Strategy::Concurrent, &batch).await.unwrap();

        assert_eq!(sequential.sorted_arrays, expected);
        assert_eq!(concurrent.sorted_arrays, expected);
    }

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_isolated() {
    let server = start(1024 * 1024).await;
    let client = Arc::new(server.client.clone());

    let mut tasks = tokio::task::JoinSet::new();
    for seed in 0..16u64 {
        let client = Arc::clone(&client);
        tasks.spawn(async move {
            let batch = generate_batch(8, 64, seed);
            let resp = client.sort(Strategy::Concurrent, &batch).await.unwrap();
            (batch, resp)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (batch, resp) = joined.unwrap();
        assert_eq!(resp.sorted_arrays, process_sequential(&batch).sorted_arrays);
    }

    server.stop().await;
}

#[tokio::test]
async fn invalid_body_surfaces_as_client_error() {
    let server = start(1024 * 1024).await;

    let res = reqwest::Client::new()
        .post(format!(
            "{}{}",
            server.client.base_url(),
            Strategy::Sequential.route()
        ))
        .header("content-type", "application/json")
        .body("[1, 2, 3]")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let text = res.text().await.unwrap();
    assert!(!text.contains("sorted_arrays"));

    server.stop().await;
}
