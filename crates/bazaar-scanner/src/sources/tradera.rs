//! Scraper for the Swedish auction marketplace Tradera.
//!
//! Scans walk a fixed set of category listings sorted newest-first; each
//! listing card is an incomplete candidate lacking description and publish
//! time. Because a page is newest-first, only its first candidate is
//! resolved into a complete item, and its publish time is assumed for the
//! rest of the page.

use crate::consumer::{ItemConsumer, ProcessOutcome};
use crate::error::{Result, ScanError};
use crate::report::Reporter;
use crate::source::{fetch_page, SourceScraper};
use async_trait::async_trait;
use bazaar_browser::{find_number, html_to_text, PageFetcher, WaitCondition};
use bazaar_core::{ItemPayload, ScrapedItem};
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Europe::Stockholm;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

const COUNTRY: &str = "SE";
const LANGUAGE: &str = "sv";
const CURRENCY: &str = "SEK";
const BASE_URL: &str = "https://www.tradera.com";

/// Categories walked by a scan, each an independently paginated unit.
pub const CATEGORIES: [&str; 8] = [
    "antikt-design-20",
    "accessoarer-1612",
    "inredningsdetaljer-c3_1609",
    "lampor-c3_302528",
    "mobler-c3_1604",
    "exklusiva-klockor-c3_1901",
    "modeklockor-c3_1904",
    "konst-23",
];

static SEL_ITEM_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-card-body").expect("valid selector"));
static SEL_CARD_FIGURE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-card-figure a").expect("valid selector"));
static SEL_CARD_FIGURE_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-card-figure img").expect("valid selector"));
static SEL_CARD_PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-card-details-price-before-discount").expect("valid selector"));
static SEL_CARD_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-card-details-header").expect("valid selector"));
static SEL_NEXT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.page-link[rel=\"next\"]").expect("valid selector"));

static SEL_ENDED_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".view-item-ended-summary-label").expect("valid selector"));
static SEL_VIEW_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".view-item").expect("valid selector"));
static SEL_GALLERY_IMG: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".image-gallery-item img").expect("valid selector"));
static SEL_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".view-item-description .content-text").expect("valid selector"));
static SEL_PUBLISHED: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".view-item-footer-information-details-published").expect("valid selector")
});
static SEL_FIXED_PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".view-item-fixed-price").expect("valid selector"));
static SEL_BID_AMOUNT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".view-item-bidding-details .multi-currency-display--bidding-details")
        .expect("valid selector")
});
static SEL_ITEM_ID: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".view-item-footer-information-details-itemid").expect("valid selector")
});
static SEL_SELLER_ICON: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".view-item-details-list-seller-icon").expect("valid selector")
});
static SEL_SELLER_NAME: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".view-item-details-list-seller-name span").expect("valid selector")
});
static SEL_SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("valid selector"));

fn listing_wait() -> WaitCondition {
    WaitCondition::element_present(".item-card-figure")
}

fn detail_wait() -> WaitCondition {
    WaitCondition::element_present(".view-item-image-gallery")
}

/// One parsed listing page: the pagination cursor plus its candidates.
struct ListingPage {
    next_url: Option<String>,
    candidates: Vec<ScrapedItem>,
}

/// How one unit (category) ended.
enum UnitOutcome {
    /// Pagination or the age cutoff ended this unit; go on with the next
    Finished,
    /// A whole-scan bound was hit; end the scan
    StopScan,
}

/// Scan/scrape orchestrator for Tradera.
pub struct TraderaScraper {
    fetcher: Box<dyn PageFetcher>,
    consumer: ItemConsumer,
    reporter: Arc<dyn Reporter>,
}

impl TraderaScraper {
    /// Create a scraper over its exclusively owned transport and consumer.
    #[must_use]
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        consumer: ItemConsumer,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            fetcher,
            consumer,
            reporter,
        }
    }

    /// First listing page of a category, sorted newest-first.
    fn first_page_url(category: &str) -> String {
        format!("{BASE_URL}/{category}?sortBy=AddedOn")
    }

    /// Fetch a detail page, parse it and feed it through the consumer.
    async fn resolve(&mut self, native_url: &str) -> Result<ProcessOutcome> {
        let html = fetch_page(self.fetcher.as_mut(), native_url, &detail_wait()).await?;
        let item = {
            let document = Html::parse_document(&html);
            parse_detail_page(&document, native_url)?
        };
        self.consumer.process(item).await
    }

    /// Walk one category until its pagination ends or a bound stops it.
    async fn scan_unit(&mut self, category: &str) -> Result<UnitOutcome> {
        let mut page_next = Some(Self::first_page_url(category));

        while let Some(page_url) = page_next.take() {
            let html = fetch_page(self.fetcher.as_mut(), &page_url, &listing_wait()).await?;
            let page = {
                let document = Html::parse_document(&html);
                self.parse_listing_page(&document)?
            };
            page_next = page.next_url;

            // The listing page does not show publish times, but items are
            // ordered most recent first: resolve the first candidate and
            // let its publish time stand in for the whole page, trading one
            // extra fetch for N.
            let mut page_epoch: Option<i64> = None;

            for mut candidate in page.candidates {
                let outcome = if page_epoch.is_none() {
                    tracing::info!(
                        url = %candidate.native_url,
                        "resolving first candidate for its publish time"
                    );
                    match self.resolve(&candidate.native_url).await {
                        Ok(outcome) => outcome,
                        Err(ScanError::SkipItem(reason)) => {
                            tracing::info!(%reason, "skipping candidate");
                            continue;
                        }
                        Err(ScanError::Parser(reason)) => {
                            self.reporter.error(
                                "TRADERA PARSER ERROR",
                                &format!("error: {reason}\nurl: {}", candidate.native_url),
                            );
                            continue;
                        }
                        Err(e) => return Err(e),
                    }
                } else {
                    candidate.payload.epoch_published = page_epoch;
                    self.consumer.process(candidate).await?
                };

                match outcome {
                    ProcessOutcome::Accepted(item) => {
                        if page_epoch.is_none() {
                            page_epoch = item.payload.epoch_published;
                            tracing::info!(
                                epoch_published = ?page_epoch,
                                "using first item's publish time for the whole page"
                            );
                        }
                    }
                    ProcessOutcome::StopUnit(reason) => {
                        tracing::info!(%reason, %category, "unit aged out");
                        return Ok(UnitOutcome::Finished);
                    }
                    ProcessOutcome::StopAll(reason) => {
                        tracing::info!(%reason, "scan bound reached");
                        return Ok(UnitOutcome::StopScan);
                    }
                }
            }
        }

        Ok(UnitOutcome::Finished)
    }

    /// Extract the pagination cursor and the candidate items of a listing
    /// page. Per-candidate parse faults drop the candidate; malformed
    /// cards are additionally reported.
    fn parse_listing_page(&self, document: &Html) -> Result<ListingPage> {
        let next_url = next_page_url(document)?;

        let cards: Vec<ElementRef> = document.select(&SEL_ITEM_CARD).collect();
        tracing::info!(count = cards.len(), "found item cards");

        let mut candidates = Vec::new();
        for card in cards {
            match card_to_listing_item(&card) {
                Ok(item) => candidates.push(item),
                Err(ScanError::SkipItem(reason)) => {
                    tracing::info!(%reason, "skipping card");
                }
                Err(ScanError::Parser(reason)) => {
                    self.reporter.error(
                        "TRADERA PARSER ERROR",
                        &format!("error: {reason}\ndocument:\n{}", card.html()),
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ListingPage {
            next_url,
            candidates,
        })
    }
}

#[async_trait]
impl SourceScraper for TraderaScraper {
    async fn scan(&mut self) -> Result<()> {
        for category in CATEGORIES {
            tracing::info!(%category, "scanning category");
            match self.scan_unit(category).await {
                Ok(UnitOutcome::Finished) => {}
                Ok(UnitOutcome::StopScan) => return Ok(()),
                Err(ScanError::CannotGetUrl(url)) => {
                    tracing::warn!(%category, %url, "could not fetch page, moving to next category");
                    self.reporter.error(
                        "TRADERA FETCH ERROR",
                        &format!("could not fetch {url} while scanning {category}"),
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn scrape(
        &mut self,
        native_url: &str,
        _scraper_data: Option<&serde_json::Value>,
    ) -> Result<ScrapedItem> {
        self.resolve(native_url).await?.into_item()
    }

    fn consumer(&self) -> &ItemConsumer {
        &self.consumer
    }

    fn consumer_mut(&mut self) -> &mut ItemConsumer {
        &mut self.consumer
    }

    async fn shutdown(&mut self) {
        self.fetcher.shutdown().await;
    }
}

/// Find the next-page link. Zero matches means the last page was reached;
/// more than one is a malformed page.
fn next_page_url(document: &Html) -> Result<Option<String>> {
    let links: Vec<ElementRef> = document.select(&SEL_NEXT_LINK).collect();
    match links.as_slice() {
        [] => {
            tracing::info!("this is the last page");
            Ok(None)
        }
        [link] => {
            let href = link
                .value()
                .attr("href")
                .ok_or_else(|| ScanError::Parser("next-page link without href".to_string()))?;
            tracing::info!(%href, "found next page");
            Ok(Some(absolute_url(href)))
        }
        more => Err(ScanError::Parser(format!(
            "expected a single next-page link, found {}",
            more.len()
        ))),
    }
}

/// Parse one listing card into an incomplete candidate item.
fn card_to_listing_item(card: &ElementRef) -> Result<ScrapedItem> {
    let link = card
        .select(&SEL_CARD_FIGURE_LINK)
        .next()
        .ok_or_else(|| ScanError::Parser("card without figure link".to_string()))?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ScanError::Parser("figure link without href".to_string()))?;
    let native_url = absolute_url(href);

    // Cards without a picture are kept, picture-less.
    let native_picture_url = card
        .select(&SEL_CARD_FIGURE_IMG)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(picture_url)
        .transpose()?;

    let price_node = card
        .select(&SEL_CARD_PRICE)
        .next()
        .ok_or_else(|| ScanError::Parser("card without price".to_string()))?;
    let price = string_to_price(&price_node.text().collect::<String>())?;

    let title = card
        .select(&SEL_CARD_HEADER)
        .next()
        .and_then(|header| header.value().attr("title"))
        .ok_or_else(|| ScanError::Parser("card without titled header".to_string()))?;

    Ok(ScrapedItem {
        native_url,
        is_complete: false,
        payload: ItemPayload {
            title: Some(title.to_string()),
            price: Some(price),
            currency: Some(CURRENCY.to_string()),
            country: Some(COUNTRY.to_string()),
            language: Some(LANGUAGE.to_string()),
            has_ended: false,
            native_picture_url,
            ..ItemPayload::default()
        },
    })
}

/// Parse a detail page into a complete item, or an ended marker into an
/// incomplete `has_ended` item.
fn parse_detail_page(document: &Html, native_url: &str) -> Result<ScrapedItem> {
    // An ended listing replaces the sale view with an end-date summary.
    if let Some(label) = document.select(&SEL_ENDED_LABEL).next() {
        let date_node = next_span(label).ok_or_else(|| {
            ScanError::Parser(format!("no end date next to ended label in {native_url}"))
        })?;
        let date_text: String = date_node.text().collect();
        let epoch_ended = parse_swedish_datetime(date_text.trim())?;

        return Ok(ScrapedItem {
            native_url: native_url.to_string(),
            is_complete: false,
            payload: ItemPayload {
                has_ended: true,
                epoch_ended: Some(epoch_ended),
                ..ItemPayload::default()
            },
        });
    }

    let main = document
        .select(&SEL_VIEW_ITEM)
        .next()
        .ok_or_else(|| ScanError::Parser(format!("failed to find view-item in {native_url}")))?;

    let img = main
        .select(&SEL_GALLERY_IMG)
        .next()
        .ok_or_else(|| ScanError::Parser(format!("failed to find item image in {native_url}")))?;
    let native_picture_url = picture_url(
        img.value()
            .attr("src")
            .ok_or_else(|| ScanError::Parser("gallery image without src".to_string()))?,
    )?;
    let title = img
        .value()
        .attr("alt")
        .ok_or_else(|| ScanError::Parser("gallery image without alt title".to_string()))?
        .to_string();

    let description_node = main.select(&SEL_DESCRIPTION).next().ok_or_else(|| {
        ScanError::Parser(format!("failed to find description in {native_url}"))
    })?;
    let description = html_to_text(&description_node.html());

    let published_node = main.select(&SEL_PUBLISHED).next().ok_or_else(|| {
        ScanError::Parser(format!("failed to find publication date in {native_url}"))
    })?;
    let published_text = html_to_text(&published_node.html());
    let date_part = published_text
        .splitn(2, ':')
        .nth(1)
        .ok_or_else(|| ScanError::Parser(format!("unlabeled publication date [{published_text}]")))?
        .trim();
    let epoch_published = parse_swedish_datetime(date_part)?;

    let (price, price_is_fixed) = match main.select(&SEL_FIXED_PRICE).next() {
        Some(fixed) => (string_to_price(&fixed.text().collect::<String>())?, true),
        None => {
            let bid = main.select(&SEL_BID_AMOUNT).next().ok_or_else(|| {
                ScanError::Parser(format!("neither fixed price nor bid in {native_url}"))
            })?;
            let amount = bid
                .value()
                .attr("data-amount-in-sek")
                .ok_or_else(|| ScanError::Parser("bid node without amount".to_string()))?;
            (string_to_price(amount)?, false)
        }
    };

    let id_node = main
        .select(&SEL_ITEM_ID)
        .next()
        .ok_or_else(|| ScanError::Parser(format!("failed to find item id in {native_url}")))?;
    let native_doc_id = find_number(&id_node.html())
        .ok_or_else(|| ScanError::Parser("item id is not numeric".to_string()))?
        .to_string();

    let native_seller_is_shop = main
        .select(&SEL_SELLER_ICON)
        .next()
        .is_some_and(|icon| icon.html().contains("Butik"));

    let seller_node = main
        .select(&SEL_SELLER_NAME)
        .next()
        .ok_or_else(|| ScanError::Parser(format!("failed to find seller name in {native_url}")))?;
    let native_seller_name = seller_node.text().collect::<String>().trim().to_string();
    if native_seller_name.is_empty() {
        return Err(ScanError::Parser(format!(
            "empty seller name in {native_url}"
        )));
    }

    Ok(ScrapedItem {
        native_url: native_url.to_string(),
        is_complete: true,
        payload: ItemPayload {
            title: Some(title),
            description: Some(description),
            price: Some(price),
            price_is_fixed,
            currency: Some(CURRENCY.to_string()),
            country: Some(COUNTRY.to_string()),
            language: Some(LANGUAGE.to_string()),
            has_ended: false,
            epoch_published: Some(epoch_published),
            native_picture_url: Some(native_picture_url),
            native_doc_id: Some(native_doc_id),
            native_seller_name: Some(native_seller_name),
            native_seller_is_shop: Some(native_seller_is_shop),
            ..ItemPayload::default()
        },
    })
}

/// First span following `label` in document order.
fn next_span(label: ElementRef) -> Option<ElementRef> {
    for sibling in label.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            if element.value().name() == "span" {
                return Some(element);
            }
            if let Some(inner) = element.select(&SEL_SPAN).next() {
                return Some(inner);
            }
        }
    }
    None
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}/{}", BASE_URL, href.trim_start_matches('/'))
    }
}

/// Picture urls come protocol-relative from the marketplace.
fn picture_url(src: &str) -> Result<String> {
    if let Some(rest) = src.strip_prefix("//") {
        Ok(format!("https://{rest}"))
    } else if src.starts_with("http") {
        Ok(src.to_string())
    } else {
        Err(ScanError::Parser(format!("unexpected picture url [{src}]")))
    }
}

/// Take a displayed price like `"1 234 kr"` and return a number.
fn string_to_price(s: &str) -> Result<i64> {
    find_number(s).ok_or_else(|| ScanError::Parser(format!("no price in [{s}]")))
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "maj", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// Parse a Swedish-locale timestamp like `"16 maj 2019 21:29"` or
/// `"30 maj 10:31"` (year defaults to the current year) into epoch
/// seconds, interpreting the wall time in Europe/Stockholm.
fn parse_swedish_datetime(s: &str) -> Result<i64> {
    let malformed = || ScanError::Parser(format!("cannot parse timestamp [{s}]"));

    let cleaned = s.trim().to_lowercase();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let (day_token, month_token, year_token, time_token) = match tokens.as_slice() {
        [d, m, y, t] => (*d, *m, Some(*y), *t),
        [d, m, t] => (*d, *m, None, *t),
        _ => return Err(malformed()),
    };

    let day: u32 = day_token.parse().map_err(|_| malformed())?;
    let month = MONTHS
        .iter()
        .position(|name| month_token.starts_with(name))
        .map(|i| i as u32 + 1)
        .ok_or_else(malformed)?;
    let year: i32 = match year_token {
        Some(y) => y.parse().map_err(|_| malformed())?,
        None => Utc::now().with_timezone(&Stockholm).year(),
    };
    let time = NaiveTime::parse_from_str(time_token, "%H:%M").map_err(|_| malformed())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)?;
    let local = Stockholm
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(malformed)?;

    Ok(local.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_url() {
        assert_eq!(
            TraderaScraper::first_page_url("konst-23"),
            "https://www.tradera.com/konst-23?sortBy=AddedOn"
        );
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("/item/123"),
            "https://www.tradera.com/item/123"
        );
        assert_eq!(
            absolute_url("https://www.tradera.com/item/123"),
            "https://www.tradera.com/item/123"
        );
    }

    #[test]
    fn test_picture_url() {
        assert_eq!(
            picture_url("//img.tradera.net/images/405/img.jpg").expect("valid"),
            "https://img.tradera.net/images/405/img.jpg"
        );
        assert_eq!(
            picture_url("https://img.tradera.net/x.jpg").expect("valid"),
            "https://img.tradera.net/x.jpg"
        );
        assert!(picture_url("data:image/png;base64,xyz").is_err());
    }

    #[test]
    fn test_string_to_price() {
        assert_eq!(string_to_price("250 kr").expect("price"), 250);
        assert_eq!(string_to_price("1 234 kr").expect("price"), 1234);
        assert_eq!(string_to_price("280").expect("price"), 280);
        assert!(string_to_price("gratis").is_err());
    }

    #[test]
    fn test_parse_swedish_datetime_with_year() {
        // 2019-05-16 21:29 CEST == 2019-05-16 19:29 UTC
        let epoch = parse_swedish_datetime("16 maj 2019 21:29").expect("parse");
        assert_eq!(epoch, 1_558_034_940);
    }

    #[test]
    fn test_parse_swedish_datetime_full_month_name() {
        let short = parse_swedish_datetime("1 oktober 2020 12:00").expect("parse");
        let long = parse_swedish_datetime("1 okt 2020 12:00").expect("parse");
        assert_eq!(short, long);
    }

    #[test]
    fn test_parse_swedish_datetime_defaults_year() {
        let epoch = parse_swedish_datetime("30 maj 10:31").expect("parse");
        let year = Utc::now().with_timezone(&Stockholm).year();
        let expected = parse_swedish_datetime(&format!("30 maj {year} 10:31")).expect("parse");
        assert_eq!(epoch, expected);
    }

    #[test]
    fn test_parse_swedish_datetime_rejects_garbage() {
        assert!(parse_swedish_datetime("igår").is_err());
        assert!(parse_swedish_datetime("31 feb 2020 10:00").is_err());
    }

    #[test]
    fn test_next_page_url() {
        let html = Html::parse_document(
            r#"<ul><li><a class="page-link" rel="next" href="/search?spage=2">Nästa</a></li></ul>"#,
        );
        assert_eq!(
            next_page_url(&html).expect("parse"),
            Some("https://www.tradera.com/search?spage=2".to_string())
        );

        let html = Html::parse_document("<ul><li>no next here</li></ul>");
        assert_eq!(next_page_url(&html).expect("parse"), None);

        let html = Html::parse_document(
            r#"<a class="page-link" rel="next" href="/a">1</a><a class="page-link" rel="next" href="/b">2</a>"#,
        );
        assert!(next_page_url(&html).is_err());
    }

    #[test]
    fn test_card_to_listing_item() {
        let html = Html::parse_document(
            r#"<div class="item-card-body">
                <div class="item-card-figure">
                    <a href="/item/123-stol"><img src="//img.tradera.net/1.jpg"></a>
                </div>
                <div class="item-card-details-header" title="Gammal stol"></div>
                <div class="item-card-details-price-before-discount">1 200 kr</div>
            </div>"#,
        );
        let card = html.select(&SEL_ITEM_CARD).next().expect("card");
        let item = card_to_listing_item(&card).expect("parse card");

        assert!(!item.is_complete);
        assert_eq!(item.native_url, "https://www.tradera.com/item/123-stol");
        assert_eq!(item.payload.title.as_deref(), Some("Gammal stol"));
        assert_eq!(item.payload.price, Some(1200));
        assert_eq!(
            item.payload.native_picture_url.as_deref(),
            Some("https://img.tradera.net/1.jpg")
        );
        assert_eq!(item.payload.currency.as_deref(), Some("SEK"));
        assert!(item.payload.epoch_published.is_none());
    }

    #[test]
    fn test_card_without_picture_is_kept() {
        let html = Html::parse_document(
            r#"<div class="item-card-body">
                <div class="item-card-figure"><a href="/item/9"></a></div>
                <div class="item-card-details-header" title="Lampa"></div>
                <div class="item-card-details-price-before-discount">50 kr</div>
            </div>"#,
        );
        let card = html.select(&SEL_ITEM_CARD).next().expect("card");
        let item = card_to_listing_item(&card).expect("parse card");
        assert!(item.payload.native_picture_url.is_none());
    }

    #[test]
    fn test_card_without_link_is_parser_error() {
        let html = Html::parse_document(
            r#"<div class="item-card-body"><div class="item-card-figure"></div></div>"#,
        );
        let card = html.select(&SEL_ITEM_CARD).next().expect("card");
        let err = card_to_listing_item(&card).expect_err("malformed card");
        assert_eq!(err.code(), "PARSER_ERROR");
    }

    #[test]
    fn test_parse_detail_page_ended() {
        let html = Html::parse_document(
            r#"<div class="view-item-ended">
                <div class="view-item-ended-summary-label">Avslutad</div>
                <span>30 maj 2019 10:31</span>
            </div>"#,
        );
        let item = parse_detail_page(&html, "https://www.tradera.com/item/1").expect("parse");

        assert!(!item.is_complete);
        assert!(item.payload.has_ended);
        assert!(item.payload.epoch_ended.is_some());
        assert!(item.payload.price.is_none());
        assert!(item.payload.description.is_none());
        assert!(item.payload.title.is_none());
    }

    fn detail_html() -> String {
        r#"<div class="view-item">
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
        </div>"#
            .to_string()
    }

    #[test]
    fn test_parse_detail_page_complete() {
        let html = Html::parse_document(&detail_html());
        let item = parse_detail_page(&html, "https://www.tradera.com/item/351064059")
            .expect("parse detail page");

        assert!(item.is_complete);
        assert!(!item.payload.has_ended);
        assert_eq!(
            item.payload.title.as_deref(),
            Some("Termosmugg, Flerfärgad")
        );
        assert_eq!(
            item.payload.description.as_deref(),
            Some("Ny i originalförpackning.")
        );
        assert_eq!(item.payload.price, Some(50));
        assert!(item.payload.price_is_fixed);
        assert_eq!(item.payload.native_doc_id.as_deref(), Some("351064059"));
        assert_eq!(item.payload.native_seller_name.as_deref(), Some("Sellpy"));
        assert_eq!(item.payload.native_seller_is_shop, Some(true));
        // 2019-05-16 08:29 CEST == 06:29 UTC
        assert_eq!(item.payload.epoch_published, Some(1_557_988_140));
    }

    #[test]
    fn test_parse_detail_page_bid_price() {
        let html = Html::parse_document(
            r#"<div class="view-item">
                <div class="image-gallery-item"><img src="//img.tradera.net/2.jpg" alt="Mini Kånken"></div>
                <div class="view-item-description"><div class="content-text">Väl använd.</div></div>
                <div class="view-item-bidding-details">
                    <div class="multi-currency-display--bidding-details" data-amount-in-sek="280">280 kr</div>
                </div>
                <div class="view-item-details-list-seller-name"><span>Martin Eddy</span></div>
                <div class="view-item-footer-information-details-published">Publicerad: 6 maj 2019 18:10</div>
                <div class="view-item-footer-information-details-itemid">Artikelnr: 349772619</div>
            </div>"#,
        );
        let item = parse_detail_page(&html, "https://www.tradera.com/item/349772619")
            .expect("parse detail page");

        assert_eq!(item.payload.price, Some(280));
        assert!(!item.payload.price_is_fixed);
        assert_eq!(item.payload.native_seller_is_shop, Some(false));
    }
}
