// ss_com.rs
use crate::config::ScrapeConfig;
use crate::scraper::models::{ListingDetails, ListingRow, RawListing};
use crate::scraper::ScraperError;
use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

const PORTAL: &str = "ss.com";

const FURNISHED_WORDS: [&str; 4] = ["furnished", "with furniture", "мебел", "ar mēbelēm"];
const PARKING_WORDS: [&str; 4] = ["parking", "парковка", "stāvvieta", "autostāvvieta"];
const PETS_WORDS: [&str; 3] = ["pets allowed", "животные разрешены", "dzīvnieki atļauti"];
const YEAR_TERM_WORDS: [&str; 4] = ["one year", "1 year", "на год", "uz gadu"];
const HALF_YEAR_TERM_WORDS: [&str; 3] = ["6 months", "6 mēneši", "6 месяцев"];
const UTILITIES_WORDS: [&str; 2] = ["utilities included", "including utilities"];

pub struct SsComScraper {
    client: Client,
    config: ScrapeConfig,
}

impl SsComScraper {
    /// Builds the HTTP client. The user agent is picked once here from
    /// `config.user_agents` and kept for the scraper's lifetime.
    pub fn new(config: ScrapeConfig) -> Result<Self, ScraperError> {
        let user_agent = config
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ScraperError::Config("no user agents configured".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en,lv;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Scrapes the list page and every listing's detail page, keeping listings
    /// priced at or below `max_price`.
    ///
    /// A failed list page fails the whole call. A failed detail page only drops
    /// that listing; the batch that comes back may be partial.
    pub fn fetch_listings(&self, max_price: f64) -> Result<Vec<RawListing>, ScraperError> {
        let base = Url::parse(&self.config.listings_url)
            .map_err(|_| ScraperError::BadLink(self.config.listings_url.clone()))?;

        tracing::info!(url = %base, max_price, "Fetching listing page");
        let html = self.fetch_html(base.as_str())?;
        let rows = parse_listing_rows(&html, &base)?;
        tracing::info!(rows = rows.len(), "Listing page parsed");

        let today = Local::now().date_naive();
        let mut listings = Vec::new();
        let mut skipped = 0usize;

        for row in rows.into_iter().filter(|r| r.price <= max_price) {
            match self.fetch_html(&row.link) {
                Ok(detail_html) => {
                    let details = parse_details(&detail_html);
                    listings.push(RawListing::from_parts(row, details, PORTAL, today));
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(link = %row.link, error = %e, "Skipping listing, detail page failed");
                }
            }
            self.pause();
        }

        tracing::info!(fetched = listings.len(), skipped, "Scrape complete");

        #[cfg(debug_assertions)]
        save_listings_debug(&listings, "listings_debug.json");

        Ok(listings)
    }

    fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text()?)
    }

    fn pause(&self) {
        let range = self.config.delay_ms.clone();
        if range.start() < range.end() {
            let ms = rand::thread_rng().gen_range(range);
            std::thread::sleep(Duration::from_millis(ms));
        } else if *range.start() > 0 {
            std::thread::sleep(Duration::from_millis(*range.start()));
        }
    }
}

#[cfg(debug_assertions)]
fn save_listings_debug(listings: &[RawListing], filename: &str) {
    let result = std::fs::File::create(filename)
        .map_err(|e| e.to_string())
        .and_then(|file| {
            serde_json::to_writer_pretty(std::io::BufWriter::new(file), listings).map_err(|e| e.to_string())
        });
    if let Err(e) = result {
        tracing::debug!(filename, error = %e, "Could not write debug dump");
    }
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(e.to_string()))
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("number pattern is valid"))
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)").expect("integer pattern is valid"))
}

fn first_number(text: &str) -> Option<f64> {
    number_re().captures(text)?.get(1)?.as_str().parse().ok()
}

fn first_integer<T: std::str::FromStr>(text: &str) -> Option<T> {
    integer_re().captures(text)?.get(1)?.as_str().parse().ok()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Stable id from a detail link: its last path segment without the extension,
/// e.g. `.../riga/centre/bxkdc.html` -> `bxkdc`.
pub(crate) fn listing_id_from_link(link: &Url) -> Option<String> {
    let last = link.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let id = last.split('.').next().unwrap_or(last);
    (!id.is_empty()).then(|| id.to_string())
}

/// Reads listing rows (`tr[id^=tr_]`) off the list page. Rows without a link
/// or a price are dropped.
pub(crate) fn parse_listing_rows(html: &str, base: &Url) -> Result<Vec<ListingRow>, ScraperError> {
    let document = Html::parse_document(html);
    let row_sel = selector(r#"tr[id^="tr_"]"#)?;
    let link_sel = selector("a")?;
    let cell_sel = selector("td")?;

    let mut rows = Vec::new();
    for row in document.select(&row_sel) {
        let Some(href) = row.select(&link_sel).find_map(|a| a.value().attr("href")) else {
            continue;
        };
        let Ok(link) = base.join(href) else {
            tracing::debug!(href, "Skipping row with unusable link");
            continue;
        };
        let Some(id) = listing_id_from_link(&link) else {
            continue;
        };

        let title = row
            .select(&link_sel)
            .map(element_text)
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        let Some(price_cell) = row.select(&cell_sel).last() else {
            continue;
        };
        let price_text: String = element_text(price_cell)
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect();
        let Some(price) = first_integer::<u64>(&price_text) else {
            continue;
        };

        rows.push(ListingRow {
            id,
            link: link.to_string(),
            title,
            price: price as f64,
        });
    }

    Ok(rows)
}

/// Text of the cell right after the first label cell containing any of `labels`.
fn labelled_value(document: &Html, labels: &[&str]) -> Option<String> {
    let cell_sel = selector("td").ok()?;
    let label = document
        .select(&cell_sel)
        .find(|td| {
            let text = element_text(*td);
            labels.iter().any(|l| text.contains(l))
        })?;
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")
        .map(element_text)
}

fn description_text(document: &Html) -> Option<String> {
    ["div#msg_div_msg", "div.ads_opt"]
        .iter()
        .filter_map(|css| selector(css).ok())
        .find_map(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().to_lowercase())
}

fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Reads a detail page. Missing fields fall back to the defaults in
/// `ListingDetails::default()`.
pub(crate) fn parse_details(html: &str) -> ListingDetails {
    let document = Html::parse_document(html);
    let mut details = ListingDetails::default();

    if let Some(address) = labelled_value(&document, &["Address:", "District:", "Region:"]) {
        if !address.is_empty() {
            details.address = address;
        }
    }
    if let Some(size) = labelled_value(&document, &["Area:"]).and_then(|t| first_number(&t)) {
        details.size = size;
    }
    if let Some(rooms) = labelled_value(&document, &["Rooms:"]).and_then(|t| first_integer(&t)) {
        details.rooms = rooms;
    }
    details.floor = labelled_value(&document, &["Floor:"]).and_then(|t| first_integer(&t));

    if let Some(text) = description_text(&document) {
        details.furnished = Some(mentions(&text, &FURNISHED_WORDS));
        details.parking = Some(mentions(&text, &PARKING_WORDS));
        details.pets_allowed = Some(mentions(&text, &PETS_WORDS));
        details.utilities_included = Some(mentions(&text, &UTILITIES_WORDS));
        details.min_rent_term = if mentions(&text, &YEAR_TERM_WORDS) {
            Some("1 year".to_string())
        } else if mentions(&text, &HALF_YEAR_TERM_WORDS) {
            Some("6 months".to_string())
        } else {
            None
        };
    }

    details
}
