use anyhow::Result;
use cutoff_predictor::config::PredictorConfig;
use cutoff_predictor::dataset::{load_dataset, source_for, FileSource, HttpSource};
use cutoff_predictor::export::{write_export, ExportFormat};
use cutoff_predictor::{Criteria, LoadError, Session};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn write_document(dir: &std::path::Path, body: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("colleges.json");
    std::fs::write(&path, serde_json::to_vec(body).unwrap()).unwrap();
    path
}

/// Answers a single request on a local port with `status` and `body`.
async fn serve_once(status: &'static str, body: Vec<u8>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
        }
    });
    Ok(format!("http://{}/colleges.json", addr))
}

fn college_document() -> serde_json::Value {
    let entries: Vec<_> = (0..30)
        .map(|i| {
            json!({
                "Institute": format!("Government College of Engineering {}", i),
                "Institute Code": 6000 + i,
                "Branch": if i % 3 == 0 { "Civil Engineering" } else { "Computer Engineering" },
                "Seat Type": "GOPENS",
                "Rank": 1000 + i * 100,
                "Percentile": 99.0 - i as f64,
                "Choice Code": format!("{}24510", 6000 + i)
            })
        })
        .collect();
    json!({ "MHT-CET College Data": entries })
}

#[tokio::test]
async fn test_load_from_file_and_predict() -> Result<()> {
    let dir = tempdir()?;
    let path = write_document(dir.path(), &college_document());

    let dataset = load_dataset(&FileSource::new(&path), "MHT-CET College Data").await?;
    assert_eq!(dataset.len(), 30);

    let session = Session::new(Arc::new(dataset), 20);
    let session = session.predict(Criteria::by_percentile(90.0).with_regions(vec!["Pune"]))?;
    // Percentiles 90.0 down to 70.0 qualify.
    assert_eq!(session.results().len(), 21);
    assert_eq!(session.results()[0].percentile, Some(90.0));

    let second = session.next_page().page();
    assert_eq!(second.records.len(), 1);
    assert!(!second.has_next);

    let civil = session.search("civil");
    assert_eq!(civil.page().total_results, 7);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let dir = tempdir().unwrap();
    let source = FileSource::new(dir.path().join("absent.json"));
    let err = load_dataset(&source, "MHT-CET College Data").await.unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[tokio::test]
async fn test_wrong_collection_is_load_error() -> Result<()> {
    let dir = tempdir()?;
    let path = write_document(dir.path(), &json!({ "Other": [] }));
    let source = source_for(path.to_str().unwrap(), Duration::from_secs(1))?;
    let err = load_dataset(source.as_ref(), "MHT-CET College Data").await.unwrap_err();
    assert!(matches!(err, LoadError::MissingCollection(_)));
    Ok(())
}

#[tokio::test]
async fn test_configured_export_round() -> Result<()> {
    let dir = tempdir()?;
    let data_path = write_document(dir.path(), &college_document());
    let config_path = dir.path().join("predictor.toml");
    std::fs::write(
        &config_path,
        format!(
            "[dataset]\nsource = {:?}\n\n[results]\npage_size = 10\n\n[export]\noutput_dir = {:?}\n",
            data_path.display().to_string(),
            dir.path().join("exports").display().to_string()
        ),
    )?;

    let config = PredictorConfig::load(&config_path)?;
    let source = source_for(&config.dataset.source, config.dataset.timeout())?;
    let dataset = load_dataset(source.as_ref(), &config.dataset.collection).await?;
    let session = Session::new(Arc::new(dataset), config.results.page_size)
        .predict(Criteria::by_rank(2900.0))?;
    assert_eq!(session.page().total_pages, 2);

    let snapshot = session.export_snapshot(&config.export.title).unwrap();
    let path = write_export(&snapshot, ExportFormat::Json, &config.export.output_dir)?;
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    assert_eq!(written["title"], "College Prediction Results");
    assert_eq!(written["rows"].as_array().unwrap().len(), 11);
    Ok(())
}

#[tokio::test]
async fn test_http_source_loads_document() -> Result<()> {
    let url = serve_once("200 OK", serde_json::to_vec(&college_document())?).await?;
    let source = HttpSource::new(url, Duration::from_secs(5))?;
    let dataset = load_dataset(&source, "MHT-CET College Data").await?;
    assert_eq!(dataset.len(), 30);
    Ok(())
}

#[tokio::test]
async fn test_http_error_status_is_load_error() -> Result<()> {
    let url = serve_once("404 Not Found", b"missing".to_vec()).await?;
    let source = HttpSource::new(url.clone(), Duration::from_secs(5))?;
    let err = load_dataset(&source, "MHT-CET College Data").await.unwrap_err();
    assert!(matches!(err, LoadError::HttpStatus { status: 404, url: ref failed } if *failed == url));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_load_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let source = HttpSource::new(format!("http://{}/colleges.json", addr), Duration::from_secs(5))?;
    let err = load_dataset(&source, "MHT-CET College Data").await.unwrap_err();
    assert!(matches!(err, LoadError::Http(_)));
    Ok(())
}
