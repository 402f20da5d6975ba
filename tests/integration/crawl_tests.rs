//! Integration tests for the scraper
//!
//! These tests use wiremock to serve list and detail pages and run the whole
//! pipeline end-to-end, down to the CSV file.

use ke_ershoufang::config::{Config, RequestConfig};
use ke_ershoufang::crawler::{Coordinator, Pacer};
use ke_ershoufang::output::UTF8_BOM;
use ke_ershoufang::record::{Field, FIELD_COUNT};
use std::path::Path;
use std::time::{Duration, Instant};
use wiremock::http::HeaderName;
use wiremock::matchers::{header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, pages: u32, csv_path: &Path) -> Config {
    let mut config = Config::default();
    config.site.list_url_template = format!("{}/ershoufang/pg{{page}}/", base_url);
    config.site.pages = pages;
    config.request.referer = format!("{}/", base_url);
    config.request.timeout_secs = 5;
    config.pacing.min_delay_ms = 0;
    config.pacing.max_delay_ms = 0;
    config.output.csv_path = csv_path.to_string_lossy().into_owned();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn list_page(base_url: &str, ids: &[&str]) -> String {
    let items: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="clear"><div class="info clear">
                   <div class="title"><a class="VIEWDATA maidian-detail" href="{}/ershoufang/{}.html">房源 {}</a></div>
                   </div></li>"#,
                base_url, id, id
            )
        })
        .collect();
    format!(
        r#"<html><body><ul class="sellListContent">{}</ul></body></html>"#,
        items
    )
}

fn detail_page(total: &str, community: &str) -> String {
    format!(
        r#"<html><body>
        <div class="price"><span class="total">{}</span><span class="unit">万</span></div>
        <div class="aroundInfo">
            <div class="communityName"><a class="info">{}</a></div>
            <div class="areaName"><span class="info"><a>高新</a>&nbsp;<a>大源</a></span></div>
        </div>
        <div class="base"><ul>
            <li><span class="label">房屋户型</span>2室1厅1厨1卫</li>
            <li><span class="label">所在楼层</span>高楼层 (共33层)</li>
        </ul></div>
        <div class="transaction"><ul>
            <li><span class="label">房屋用途</span><span>普通住宅</span></li>
        </ul></div>
        </body></html>"#,
        total, community
    )
}

async fn mount_list(server: &MockServer, page: u32, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/ershoufang/pg{}/", page)))
        .respond_with(html(list_page(&server.uri(), ids)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, total: &str, community: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/ershoufang/{}.html", id)))
        .respond_with(html(detail_page(total, community)))
        .mount(server)
        .await;
}

/// Reads the CSV output back as (header, rows)
fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(bytes.starts_with(UTF8_BOM), "Output must start with a BOM");

    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
    let header = reader
        .headers()
        .expect("Missing header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("Bad row").iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[tokio::test]
async fn test_full_scrape_writes_csv() {
    let mock_server = MockServer::start().await;

    mount_list(&mock_server, 1, &["101", "102"]).await;
    mount_list(&mock_server, 2, &["201"]).await;
    mount_detail(&mock_server, "101", "350", "锦城花园").await;
    mount_detail(&mock_server, "102", "128.5", "中海城南一号").await;
    mount_detail(&mock_server, "201", "99", "南城都汇").await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 2, &csv_path);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Scrape failed");

    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.stats.pages_attempted, 2);
    assert_eq!(summary.stats.links_found, 3);
    assert!(summary.output_path.is_absolute());

    let (header, rows) = read_csv(&csv_path);
    let expected: Vec<String> = Field::labels().map(str::to_string).collect();
    assert_eq!(header, expected);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == FIELD_COUNT));

    let totals: Vec<&str> = rows
        .iter()
        .map(|row| row[Field::TotalPrice.index()].as_str())
        .collect();
    assert_eq!(totals, vec!["350万", "128.5万", "99万"]);

    let first = &rows[0];
    assert_eq!(first[Field::CommunityName.index()], "锦城花园");
    assert_eq!(first[Field::District.index()], "高新大源");
    assert_eq!(first[Field::Layout.index()], "2室1厅1厨1卫");
    assert_eq!(first[Field::Floor.index()], "高楼层 (共33层)");
    assert_eq!(first[Field::Usage.index()], "普通住宅");
    assert_eq!(first[Field::UnitPrice.index()], "");
}

#[tokio::test]
async fn test_failed_list_page_is_skipped() {
    let mock_server = MockServer::start().await;

    for page in 1..=10u32 {
        if page == 3 {
            Mock::given(method("GET"))
                .and(path("/ershoufang/pg3/"))
                .respond_with(ResponseTemplate::new(503))
                .expect(1)
                .mount(&mock_server)
                .await;
            continue;
        }

        let id = format!("{}01", page);
        mount_list(&mock_server, page, &[id.as_str()]).await;
        mount_detail(&mock_server, &id, &page.to_string(), "小区").await;
    }

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 10, &csv_path);

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.expect("Scrape failed");

    assert_eq!(summary.stats.pages_attempted, 10);
    assert_eq!(summary.stats.pages_failed, 1);
    assert_eq!(summary.records_written, 9);

    let (_, rows) = read_csv(&csv_path);
    let totals: Vec<String> = rows
        .iter()
        .map(|row| row[Field::TotalPrice.index()].clone())
        .collect();
    let expected: Vec<String> = [1, 2, 4, 5, 6, 7, 8, 9, 10]
        .iter()
        .map(|page| format!("{}万", page))
        .collect();
    assert_eq!(totals, expected);
}

#[tokio::test]
async fn test_failed_detail_page_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_list(&mock_server, 1, &["1", "2", "3"]).await;
    mount_detail(&mock_server, "1", "100", "甲").await;
    Mock::given(method("GET"))
        .and(path("/ershoufang/2.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, "3", "300", "丙").await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 1, &csv_path);

    let mut coordinator = Coordinator::new(config).unwrap().with_pacer(Pacer::disabled());
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.stats.details_attempted, 3);
    assert_eq!(summary.stats.details_failed, 1);
    assert_eq!(summary.records_written, 2);

    let communities: Vec<&str> = coordinator
        .records()
        .iter()
        .map(|r| r.get(Field::CommunityName))
        .collect();
    assert_eq!(communities, vec!["甲", "丙"]);
}

#[tokio::test]
async fn test_empty_detail_body_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_list(&mock_server, 1, &["1", "2"]).await;
    Mock::given(method("GET"))
        .and(path("/ershoufang/1.html"))
        .respond_with(html(String::new()))
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, "2", "200", "乙").await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 1, &csv_path);

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.stats.details_failed, 1);
    assert_eq!(summary.records_written, 1);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_list(&mock_server, 1, &["7", "7", "8"]).await;
    Mock::given(method("GET"))
        .and(path("/ershoufang/7.html"))
        .respond_with(html(detail_page("70", "七")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_detail(&mock_server, "8", "80", "八").await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 1, &csv_path);

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.stats.links_found, 2);
    assert_eq!(summary.records_written, 2);
}

#[tokio::test]
async fn test_request_headers_sent() {
    let mock_server = MockServer::start().await;
    let referer = format!("{}/", mock_server.uri());
    let user_agent = RequestConfig::default().user_agent;

    Mock::given(method("GET"))
        .and(path("/ershoufang/pg1/"))
        // wiremock splits header values on commas
        .and(headers("accept-language", vec!["zh-CN", "zh;q=0.9"]))
        .and(header("referer", referer.as_str()))
        .respond_with(html(list_page(&mock_server.uri(), &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let config = create_test_config(&mock_server.uri(), 1, &csv_path);

    let mut coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    // The request matched, so the page counts as fetched
    assert_eq!(summary.stats.pages_failed, 0);
    assert_eq!(summary.records_written, 0);

    let (header, rows) = read_csv(&csv_path);
    assert_eq!(header.len(), FIELD_COUNT);
    assert!(rows.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent_user_agent = requests[0]
        .headers
        .get(&HeaderName::from("user-agent"))
        .map(|values| {
            values
                .iter()
                .map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });
    assert_eq!(sent_user_agent.as_deref(), Some(user_agent.as_str()));
}

#[tokio::test]
async fn test_pacing_after_every_request() {
    let mock_server = MockServer::start().await;

    // Page 1: one good detail and one 404. Page 2: the list fetch fails.
    mount_list(&mock_server, 1, &["1", "2"]).await;
    mount_detail(&mock_server, "1", "100", "甲").await;
    Mock::given(method("GET"))
        .and(path("/ershoufang/2.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ershoufang/pg2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("listings.csv");
    let mut config = create_test_config(&mock_server.uri(), 2, &csv_path);
    config.pacing.min_delay_ms = 300;
    config.pacing.max_delay_ms = 300;

    let mut coordinator = Coordinator::new(config).unwrap();
    let start = Instant::now();
    let summary = coordinator.run().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.stats.details_failed, 1);
    assert_eq!(summary.stats.pages_failed, 1);

    // Two detail attempts, the end of page 1 and the failed page 2
    assert!(elapsed >= Duration::from_millis(1200), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1500), "elapsed {:?}", elapsed);
}
