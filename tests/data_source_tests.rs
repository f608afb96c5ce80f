use anyhow::Result;
use async_trait::async_trait;
use parts_catalog::config::CatalogConfig;
use parts_catalog::domain::product::Product;
use parts_catalog::services::data_source::{
    DataOrigin, ProductSource, RemoteProductSource, SyntheticProductSource, load_with_deadline,
};
use parts_catalog::test_helpers::sample_product;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Remote stand-in that answers after a fixed delay.
struct DelayedSource {
    delay: Duration,
    result: Result<Vec<Product>, String>,
}

#[async_trait]
impl ProductSource for DelayedSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn fetch(&self) -> Result<Vec<Product>> {
        tokio::time::sleep(self.delay).await;
        self.result.clone().map_err(anyhow::Error::msg)
    }
}

fn synthetic() -> SyntheticProductSource {
    let config = CatalogConfig {
        synthetic_seed: Some(5),
        ..CatalogConfig::default()
    };
    SyntheticProductSource::from_config(&config)
}

#[tokio::test]
async fn test_fast_remote_wins() {
    let remote = DelayedSource {
        delay: Duration::from_millis(1),
        result: Ok(vec![sample_product("R1", "Drive Chain", "RS", 12.7, "Steel")]),
    };

    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(2)).await.unwrap();
    assert_eq!(outcome.origin, DataOrigin::Remote);
    assert_eq!(outcome.products.len(), 1);
}

#[tokio::test]
async fn test_slow_remote_falls_back_at_deadline() {
    let remote = DelayedSource {
        delay: Duration::from_secs(30),
        result: Ok(vec![sample_product("R1", "Drive Chain", "RS", 12.7, "Steel")]),
    };

    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(outcome.origin, DataOrigin::Synthetic);
    assert_eq!(outcome.products.len(), 287);
    assert!(outcome.elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_failing_remote_falls_back() {
    let remote = DelayedSource {
        delay: Duration::ZERO,
        result: Err("connection refused".to_string()),
    };

    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(2)).await.unwrap();
    assert_eq!(outcome.origin, DataOrigin::Synthetic);
    assert!(outcome.products.iter().any(|p| p.id == "TSK_0001"));
}

#[test]
fn test_synthetic_catalog_shape() {
    let products = synthetic().generate();
    assert_eq!(products.len(), 287);

    let sprockets: Vec<_> = products.iter().filter(|p| p.category == "Sprocket").collect();
    assert_eq!(sprockets.len(), 100);
    assert_eq!(sprockets[0].id, "TSK_1001");
    assert_eq!(sprockets[0].tsubaki_code, "TSK-SP-1");
    assert!(sprockets.iter().all(|p| p.specifications.contains_key("tooth_count")));

    let conveyor = products.iter().find(|p| p.category == "Conveyor Chain").unwrap();
    assert_eq!(conveyor.tsubaki_code, "TSK-CO-1");
    assert_eq!(conveyor.id, "TSK_2001");

    let cable = products.iter().find(|p| p.category == "Cable Carrier").unwrap();
    assert_eq!(cable.tsubaki_code, "TSK-CA-1");
}

#[test]
fn test_synthetic_seed_is_reproducible() {
    assert_eq!(synthetic().generate(), synthetic().generate());
}

/// Serves one canned HTTP response per connection and returns the catalog URL.
async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/products.json", addr)
}

#[tokio::test]
async fn test_remote_error_status_falls_back() {
    let url = serve_once("503 Service Unavailable", r#"{"products": []}"#).await;
    let remote = RemoteProductSource::new(url);

    let err = remote.fetch().await.unwrap_err();
    assert!(err.to_string().contains("503"));

    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(5)).await.unwrap();
    assert_eq!(outcome.origin, DataOrigin::Synthetic);
    assert_eq!(outcome.products.len(), 287);
}

#[tokio::test]
async fn test_remote_document_without_products_is_empty_catalog() {
    for body in ["{}", r#"{"products": null}"#] {
        let url = serve_once("200 OK", body).await;
        let remote = RemoteProductSource::new(url);
        let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(outcome.origin, DataOrigin::Remote);
        assert!(outcome.products.is_empty());
    }
}

#[tokio::test]
async fn test_remote_products_are_decoded() {
    let url = serve_once(
        "200 OK",
        r#"{"products": [{"id": "TSK_0001", "category": "Sprocket", "model": "40B20",
            "name": "RS40 Sprocket", "specifications": {"tooth_count": 20},
            "tsubaki_code": "RS40B20"}]}"#,
    )
    .await;

    let remote = RemoteProductSource::new(url);
    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(outcome.origin, DataOrigin::Remote);
    assert_eq!(outcome.products.len(), 1);
    assert_eq!(outcome.products[0].tsubaki_code, "RS40B20");
}

#[tokio::test]
async fn test_malformed_remote_body_falls_back() {
    let url = serve_once("200 OK", "<html>not json</html>").await;
    let remote = RemoteProductSource::new(url);
    let outcome = load_with_deadline(&remote, &synthetic(), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(outcome.origin, DataOrigin::Synthetic);
}
