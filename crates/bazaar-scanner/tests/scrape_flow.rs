//! Scrape and invocation-API behavior with replay-mode (pre-loaded) pages.

use async_trait::async_trait;
use bazaar_core::{ItemBatch, RendererConfig};
use bazaar_scanner::api::{self, ScanRequest, ScrapeRequest};
use bazaar_scanner::sink::{ItemSink, SinkError};
use bazaar_scanner::ScraperRegistry;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn registry() -> Arc<ScraperRegistry> {
    Arc::new(ScraperRegistry::new(RendererConfig::default()))
}

fn scrape_request(html: &str) -> ScrapeRequest {
    ScrapeRequest {
        native_url: "https://www.tradera.com/item/351064059".to_string(),
        scraper_data: None,
        synchronous: true,
        pre_loaded_html: Some(html.to_string()),
    }
}

const ENDED_DETAIL: &str = r#"<html><body>
    <div class="view-item-ended">
        <div class="view-item-ended-summary-label">Avslutad</div>
        <span>30 maj 2019 10:31</span>
    </div>
</body></html>"#;

const COMPLETE_DETAIL: &str = r#"<html><body><div class="view-item">
    <div class="view-item-image-gallery">
        <div class="image-gallery-item">
            <img src="//img.tradera.net/images/405/termosmugg.jpg" alt="Termosmugg, Flerfärgad">
        </div>
    </div>
    <div class="view-item-description">
        <div class="content-text"><p>Ny i originalförpackning.</p></div>
    </div>
    <div class="view-item-fixed-price">50 kr</div>
    <div class="view-item-details-list-seller-icon">Butik</div>
    <div class="view-item-details-list-seller-name"><span>Sellpy</span></div>
    <div class="view-item-footer-information-details-published">Publicerad: 16 maj 2019 08:29</div>
    <div class="view-item-footer-information-details-itemid">Artikelnr: 351064059</div>
</div></body></html>"#;

#[tokio::test]
async fn test_scrape_ended_listing() {
    let reply = api::scrape_source(&registry(), "tradera", scrape_request(ENDED_DETAIL))
        .await
        .expect("scrape succeeds");

    assert_eq!(reply.source.as_str(), "TRADERA");
    assert_eq!(reply.objects.len(), 1);

    let item = &reply.objects[0];
    assert!(!item.is_complete);
    assert!(item.payload.has_ended);
    assert!(item.payload.epoch_ended.is_some());
    // An ended listing carries nothing else.
    assert!(item.payload.price.is_none());
    assert!(item.payload.description.is_none());
    assert!(item.payload.title.is_none());
}

#[tokio::test]
async fn test_scrape_complete_listing() {
    let reply = api::scrape_source(&registry(), "tradera", scrape_request(COMPLETE_DETAIL))
        .await
        .expect("scrape succeeds");

    assert_eq!(reply.objects.len(), 1);
    let item = &reply.objects[0];

    assert!(item.is_complete);
    assert_eq!(item.native_url, "https://www.tradera.com/item/351064059");
    assert!(!item.payload.has_ended);
    assert_eq!(item.payload.title.as_deref(), Some("Termosmugg, Flerfärgad"));
    assert_eq!(
        item.payload.description.as_deref(),
        Some("Ny i originalförpackning.")
    );
    assert_eq!(item.payload.price, Some(50));
    assert!(item.payload.price_is_fixed);
    assert_eq!(item.payload.currency.as_deref(), Some("SEK"));
    assert_eq!(item.payload.native_doc_id.as_deref(), Some("351064059"));
    assert_eq!(item.payload.native_seller_name.as_deref(), Some("Sellpy"));
    assert_eq!(item.payload.native_seller_is_shop, Some(true));
    assert_eq!(
        item.payload.native_picture_url.as_deref(),
        Some("https://img.tradera.net/images/405/termosmugg.jpg")
    );
    assert!(item.payload.epoch_published.is_some());
}

#[tokio::test]
async fn test_unknown_source_fails_fast() {
    let err = api::scan_source(
        &registry(),
        "craigslist",
        ScanRequest {
            synchronous: true,
            ..ScanRequest::default()
        },
    )
    .await
    .expect_err("unknown source");
    assert_eq!(err.code(), "UNKNOWN_SOURCE_ERROR");
}

#[tokio::test]
async fn test_scrape_test_source_synchronous() {
    let reply = api::scrape_source(
        &registry(),
        "test",
        ScrapeRequest {
            native_url: "https://example.com/item/1".to_string(),
            scraper_data: None,
            synchronous: true,
            pre_loaded_html: None,
        },
    )
    .await
    .expect("mock scrape");

    assert_eq!(reply.source.as_str(), "TEST");
    assert_eq!(reply.objects.len(), 1);
    assert_eq!(reply.objects[0].native_url, "https://example.com/item/1");
}

#[tokio::test]
async fn test_scrape_test_source_fatal_marker() {
    let err = api::scrape_source(
        &registry(),
        "test",
        ScrapeRequest {
            native_url: "https://example.com/error".to_string(),
            scraper_data: None,
            synchronous: true,
            pre_loaded_html: None,
        },
    )
    .await
    .expect_err("marker url fails");
    assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
}

struct RecordingSink {
    batches: Mutex<Vec<ItemBatch>>,
}

#[async_trait]
impl ItemSink for RecordingSink {
    async fn deliver(&self, batch: ItemBatch) -> Result<(), SinkError> {
        self.batches.lock().unwrap().push(batch);
        Ok(())
    }
}

#[tokio::test]
async fn test_asynchronous_scrape_flushes_to_sink() {
    let sink = Arc::new(RecordingSink {
        batches: Mutex::new(Vec::new()),
    });
    let registry = Arc::new(
        ScraperRegistry::new(RendererConfig::default()).with_sink(sink.clone()),
    );

    let reply = api::scrape_source(
        &registry,
        "test",
        ScrapeRequest {
            native_url: "https://example.com/item/9".to_string(),
            scraper_data: None,
            synchronous: false,
            pre_loaded_html: None,
        },
    )
    .await
    .expect("dispatch succeeds");

    // Asynchronous dispatch returns an empty envelope immediately.
    assert!(reply.objects.is_empty());

    // The background task delivers the batch to the sink.
    let mut delivered = Vec::new();
    for _ in 0..100 {
        delivered = sink.batches.lock().unwrap().clone();
        if !delivered.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].objects.len(), 1);
    assert_eq!(delivered[0].source.as_str(), "TEST");
}
