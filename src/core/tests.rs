use crate::core::{InvocationResponse, JobConfig, ResponseBody, SeismicJob};
use crate::fetcher::{MockFetcher, MockPage};
use crate::storage::{create_storage, MemoryStorage, StorageError, StorageType};
use crate::ScraperError;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const MAGNITUDES: [&str; 4] = ["5.2", "4.8", "N/D", "3.9"];

fn row(n: usize, magnitude: &str) -> String {
    format!(
        r#"<tr>
            <td>IGP/CENSIS/RS 2026-{n:04}</td>
            <td>{n} km al SO de Chilca, Cañete - Lima</td>
            <td>16/10/2026 {hour:02}:15:00</td>
            <td>{magnitude}</td>
            <td><a href="/ultimo-sismo/reporte/{n}">Reporte</a></td>
        </tr>"#,
        n = n,
        hour = n % 24,
        magnitude = magnitude
    )
}

fn page(rows: &[String]) -> String {
    format!(
        "<html><body><app-root><table class=\"table\"><tbody>{}</tbody></table></app-root></body></html>",
        rows.concat()
    )
}

fn well_formed_rows(count: usize) -> Vec<String> {
    (0..count)
        .map(|n| row(n, MAGNITUDES[n % MAGNITUDES.len()]))
        .collect()
}

fn job(fetcher: &MockFetcher, storage: &MemoryStorage) -> SeismicJob {
    SeismicJob::new(
        Box::new(fetcher.clone()),
        Arc::new(storage.clone()),
        JobConfig::default().with_collection("quakes"),
    )
    .unwrap()
}

fn sismos(response: &InvocationResponse) -> &[crate::SeismicReport] {
    match &response.body {
        ResponseBody::Success { sismos, .. } => sismos,
        other => panic!("expected success body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_end_to_end_twelve_rows() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(12)));
    let storage = MemoryStorage::new();

    let response = job(&fetcher, &storage).run().await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.count(), 10);
    assert_eq!(sismos(&response).len(), 10);
    assert_eq!(storage.len("quakes"), 10);
    assert_eq!(storage.batch_sizes(), vec![10]);

    let third = &sismos(&response)[2];
    let stored = storage.get("quakes", &third.id()).unwrap();
    assert_eq!(stored["magnitude"], json!("N/D"));
    assert_eq!(
        stored["reportLink"],
        json!("https://ultimosismo.igp.gob.pe/ultimo-sismo/reporte/2")
    );

    for value in storage.values("quakes") {
        let id = value["id"].as_str().unwrap();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
    assert_eq!(fetcher.close_count(), 1);
}

#[tokio::test]
async fn test_caps_to_first_ten_in_page_order() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(15)));
    let storage = MemoryStorage::new();

    let response = job(&fetcher, &storage).run().await;

    assert_eq!(response.count(), 10);
    let ids: Vec<String> = sismos(&response)
        .iter()
        .map(|r| r.report_id.clone())
        .collect();
    let expected: Vec<String> = (0..10)
        .map(|n| format!("IGP/CENSIS/RS 2026-{:04}", n))
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(storage.batch_sizes(), vec![10]);
}

#[tokio::test]
async fn test_shared_scraped_at_matches_response_timestamp() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(5)));
    let storage = MemoryStorage::new();

    let response = job(&fetcher, &storage).run().await;

    let ResponseBody::Success { timestamp, .. } = &response.body else {
        panic!("expected success body");
    };
    let values = storage.values("quakes");
    assert_eq!(values.len(), 5);
    assert!(values.iter().all(|v| v["scrapedAt"] == json!(timestamp)));
}

#[tokio::test]
async fn test_empty_table_skips_persistence() {
    let short_rows = vec![
        "<tr><td>a</td><td>b</td><td>c</td><td>d</td></tr>".to_string(),
        "<tr><td colspan=\"5\">No hay datos</td></tr>".to_string(),
    ];
    let fetcher = MockFetcher::with_html(page(&short_rows));
    let storage = MemoryStorage::new();

    let (response, stats) = job(&fetcher, &storage).run_with_stats().await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.count(), 0);
    assert!(matches!(response.body, ResponseBody::Empty { .. }));
    assert!(storage.batch_sizes().is_empty());
    assert_eq!(stats.rows_seen, 2);
    assert_eq!(stats.rows_dropped, 2);
    assert_eq!(fetcher.close_count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_returns_500_and_releases_browser() {
    let fetcher = MockFetcher::failing("Timed out waiting for table tbody tr");
    let storage = MemoryStorage::new();

    let (response, stats) = job(&fetcher, &storage).run_with_stats().await;

    assert_eq!(response.status_code, 500);
    match &response.body {
        ResponseBody::Failure { error, .. } => assert!(error.contains("Timed out")),
        other => panic!("expected failure body, got {:?}", other),
    }
    assert!(stats.failed);
    assert!(storage.batch_sizes().is_empty());
    assert_eq!(fetcher.close_count(), 1);
}

#[tokio::test]
async fn test_persist_failure_returns_500_and_releases_browser() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(3)));
    let storage =
        MemoryStorage::failing(StorageError::OperationError("table not found".to_string()));

    let response = job(&fetcher, &storage).run().await;

    assert_eq!(response.status_code, 500);
    match &response.body {
        ResponseBody::Failure { error, .. } => assert!(error.contains("table not found")),
        other => panic!("expected failure body, got {:?}", other),
    }
    assert_eq!(storage.batch_sizes(), vec![3]);
    assert_eq!(fetcher.close_count(), 1);
}

#[tokio::test]
async fn test_launch_failure_has_nothing_to_release() {
    let fetcher = MockFetcher::new(MockPage::LaunchFailure("chrome not found".to_string()));
    let storage = MemoryStorage::new();

    let response = job(&fetcher, &storage).run().await;

    assert_eq!(response.status_code, 500);
    assert_eq!(fetcher.launch_count(), 1);
    assert_eq!(fetcher.close_count(), 0);
}

#[tokio::test]
async fn test_rerun_upserts_same_ids() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(4)));
    let storage = MemoryStorage::new();
    let job = job(&fetcher, &storage);

    job.run().await;
    job.run().await;

    assert_eq!(storage.len("quakes"), 4);
    assert_eq!(storage.batch_sizes(), vec![4, 4]);
    assert_eq!(fetcher.close_count(), 2);
}

#[tokio::test]
async fn test_rejects_max_records_outside_cap_before_launch() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(30)));
    let storage = MemoryStorage::new();

    for max_records in [0, 11, 30] {
        let result = SeismicJob::new(
            Box::new(fetcher.clone()),
            Arc::new(storage.clone()),
            JobConfig::default().with_max_records(max_records),
        );
        assert!(matches!(result, Err(ScraperError::ConfigError(_))));
    }

    assert_eq!(fetcher.launch_count(), 0);
    assert!(storage.batch_sizes().is_empty());
}

#[tokio::test]
async fn test_smaller_cap_is_honoured() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(12)));
    let storage = MemoryStorage::new();
    let job = SeismicJob::new(
        Box::new(fetcher.clone()),
        Arc::new(storage.clone()),
        JobConfig::default().with_max_records(3),
    )
    .unwrap();

    let response = job.run().await;

    assert_eq!(response.count(), 3);
    assert_eq!(storage.batch_sizes(), vec![3]);
}

#[tokio::test]
async fn test_unwritable_data_dir_returns_500() {
    let blocker = std::env::temp_dir().join(format!("seismoscraper-file-{}", Uuid::now_v7()));
    std::fs::write(&blocker, b"not a directory").unwrap();
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(3)));

    let setup = async {
        let storage = create_storage(StorageType::Disk {
            path: blocker.join("data").to_string_lossy().into_owned(),
        })
        .await?;
        SeismicJob::new(
            Box::new(fetcher.clone()),
            Arc::new(storage),
            JobConfig::default(),
        )
    };
    let response = SeismicJob::invoke(setup).await;

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["statusCode"], json!(500));
    assert_eq!(value["body"]["message"], json!("Error during scraping"));
    assert!(value["body"]["error"]
        .as_str()
        .unwrap()
        .starts_with("Storage error"));
    assert_eq!(
        value["headers"]["Content-Type"],
        json!("application/json")
    );
    assert_eq!(fetcher.launch_count(), 0);

    std::fs::remove_file(blocker).unwrap();
}

#[tokio::test]
async fn test_invalid_env_config_returns_500() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(3)));
    let setup = async {
        let config = JobConfig::from_lookup(|key: &str| {
            (key == "SEISMO_MAX_RECORDS").then(|| "30".to_string())
        })?;
        SeismicJob::new(
            Box::new(fetcher.clone()),
            Arc::new(MemoryStorage::new()),
            config,
        )
    };

    let response = SeismicJob::invoke(setup).await;

    assert_eq!(response.status_code, 500);
    match &response.body {
        ResponseBody::Failure { error, .. } => assert!(error.contains("max_records")),
        other => panic!("expected failure body, got {:?}", other),
    }
    assert_eq!(fetcher.launch_count(), 0);
}

#[tokio::test]
async fn test_invoke_runs_a_valid_job() {
    let fetcher = MockFetcher::with_html(page(&well_formed_rows(2)));
    let storage = MemoryStorage::new();
    let setup = async { Ok(job(&fetcher, &storage)) };

    let response = SeismicJob::invoke(setup).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(storage.len("quakes"), 2);
}
