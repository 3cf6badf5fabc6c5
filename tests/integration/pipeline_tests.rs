//! Integration tests for the audit pipeline
//!
//! These tests use wiremock to serve a sitemap index, child sitemaps and
//! pages, and drive the whole pipeline end-to-end.

use canon_sweep::config::{Config, CrawlerConfig, OutputConfig, SitemapConfig, UserAgentConfig};
use canon_sweep::output::{load_audit, JsonArtifactWriter, ReportWriter};
use canon_sweep::{AuditError, Category, Coordinator, ResolutionSource};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_USER_AGENT: &str = "Mozilla/5.0 (compatible; CanonSweepTest/1.0)";

/// Creates a test configuration pointing at the given sitemap index
fn create_test_config(index_url: &str) -> Config {
    Config {
        sitemap: SitemapConfig {
            index_url: index_url.to_string(),
            timeout_secs: 5,
        },
        crawler: CrawlerConfig {
            target_category: Category::Products,
            sample_cap: 100,
            request_timeout_secs: 5,
            request_delay_ms: 0,
            run_deadline_secs: None,
        },
        user_agent: UserAgentConfig {
            header: TEST_USER_AGENT.to_string(),
        },
        output: OutputConfig {
            client_name: "test-client".to_string(),
            report_dir: "./report".to_string(),
        },
    }
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn url_set(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn page_with_canonical(canonical: &str) -> String {
    format!(
        r#"<html><head><title>Page</title><link rel="canonical" href="{}"></head><body></body></html>"#,
        canonical
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_pipeline_categorizes_and_resolves() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/product-sitemap1.xml", base),
            format!("{}/wp-sitemap.xml?pages=1", base),
            format!("{}/misc.xml", base),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/product-sitemap1.xml",
        url_set(&[format!("{}/p/a", base), format!("{}/p/b", base)]),
    )
    .await;
    mount_xml(&server, "/misc.xml", url_set(&[format!("{}/misc/1", base)])).await;

    Mock::given(method("GET"))
        .and(path("/wp-sitemap.xml"))
        .and(query_param("pages", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(url_set(&[format!("{}/about", base)]), "application/xml"),
        )
        .mount(&server)
        .await;

    mount_html(&server, "/p/a", 200, page_with_canonical(&format!("{}/p/a", base))).await;
    mount_html(&server, "/p/b", 200, page_with_canonical(&format!("{}/p/a", base))).await;

    // Pages outside the target category are never fetched
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .with_config_hash("hash123");
    let audit = coordinator.run().await.unwrap();

    assert_eq!(audit.run.discovered[&Category::Products], 2);
    assert_eq!(audit.run.discovered[&Category::Pages], 1);
    assert_eq!(audit.run.discovered[&Category::Other], 1);
    assert_eq!(audit.run.discovered[&Category::Brands], 0);
    assert_eq!(audit.run.config_hash, "hash123");

    let products = audit.categorized_urls_and_canonicals.get(Category::Products);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].url, format!("{}/p/a", base));
    assert_eq!(products[0].url_status_code, Some(200));
    assert_eq!(products[1].canonical_url, Some(format!("{}/p/a", base)));
    assert!(audit.categorized_urls_and_canonicals.get(Category::Pages).is_empty());

    assert_eq!(audit.canonical_tags, vec![format!("{}/p/a", base)]);
    assert_eq!(audit.canonical_resolutions.len(), 1);
    assert_eq!(audit.canonical_resolutions[0].status_code, Some(200));
    assert_eq!(audit.canonical_resolutions[0].source, ResolutionSource::Local);
}

#[tokio::test]
async fn test_remote_canonical_fetched_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/product-sitemap.xml",
        url_set(&[
            format!("{}/p/1", base),
            format!("{}/p/2", base),
            format!("{}/p/3", base),
        ]),
    )
    .await;

    let main = format!("{}/p/main", base);
    let own = format!("{}/p/3", base);
    mount_html(&server, "/p/1", 200, page_with_canonical(&main)).await;
    mount_html(&server, "/p/2", 200, page_with_canonical(&main)).await;
    Mock::given(method("GET"))
        .and(path("/p/3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page_with_canonical(&own), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p/main"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/p/moved"))
        .expect(1)
        .mount(&server)
        .await;
    mount_html(&server, "/p/moved", 404, String::new()).await;

    let audit = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(audit.canonical_tags, vec![main.clone(), own.clone()]);

    let remote = &audit.canonical_resolutions[0];
    assert_eq!(remote.canonical_url, main);
    assert_eq!(remote.source, ResolutionSource::Remote);
    assert_eq!(remote.status_code, Some(404));

    let local = &audit.canonical_resolutions[1];
    assert_eq!(local.canonical_url, own);
    assert_eq!(local.source, ResolutionSource::Local);
    assert_eq!(local.status_code, Some(200));
}

#[tokio::test]
async fn test_failing_child_sitemaps_are_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/product-sitemap1.xml", base),
            format!("{}/product-sitemap2.xml", base),
            format!("{}/product-sitemap3.xml", base),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/product-sitemap1.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(&server, "/product-sitemap2.xml", "<urlset><url><loc>".to_string()).await;
    mount_xml(
        &server,
        "/product-sitemap3.xml",
        url_set(&[format!("{}/p/ok", base)]),
    )
    .await;

    let urls = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .discover()
        .await
        .unwrap();

    assert_eq!(urls.get(Category::Products), [format!("{}/p/ok", base)]);
    assert_eq!(urls.len(), 1);
}

#[tokio::test]
async fn test_missing_index_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", server.uri())))
        .unwrap()
        .run()
        .await;

    assert!(matches!(result, Err(AuditError::IndexFetch { .. })));
}

#[tokio::test]
async fn test_malformed_index_is_fatal() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", "<sitemapindex><sitemap>".to_string()).await;

    let result = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", server.uri())))
        .unwrap()
        .run()
        .await;

    assert!(matches!(result, Err(AuditError::IndexParse { .. })));
}

#[tokio::test]
async fn test_sample_cap_limits_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    let pages: Vec<String> = (0..5).map(|i| format!("{}/p/{}", base, i)).collect();
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
    )
    .await;
    mount_xml(&server, "/product-sitemap.xml", url_set(&pages)).await;

    Mock::given(method("GET"))
        .and(path("/p/0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    for i in 2..5 {
        Mock::given(method("GET"))
            .and(path(format!("/p/{}", i)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&format!("{}/sitemap.xml", base));
    config.crawler.sample_cap = 2;
    let audit = Coordinator::new(config).unwrap().run().await.unwrap();

    let products = audit.categorized_urls_and_canonicals.get(Category::Products);
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|r| r.canonical_url.is_none()));
    assert!(audit.canonical_tags.is_empty());
    assert!(audit.canonical_resolutions.is_empty());
}

#[tokio::test]
async fn test_page_failures_are_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/product-sitemap.xml",
        url_set(&[
            format!("{}/p/pdf", base),
            format!("{}/p/gone", base),
            "http://127.0.0.1:9/p/down".to_string(),
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/p/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/p/gone",
        404,
        page_with_canonical(&format!("{}/p/home", base)),
    )
    .await;
    mount_html(&server, "/p/home", 200, "<html></html>".to_string()).await;

    let audit = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .run()
        .await
        .unwrap();

    let products = audit.categorized_urls_and_canonicals.get(Category::Products);
    assert_eq!(products.len(), 3);

    // Non-HTML page: both fields null
    assert_eq!(products[0].url_status_code, None);
    assert_eq!(products[0].canonical_url, None);

    // Error page still scanned for a canonical
    assert_eq!(products[1].url_status_code, Some(404));
    assert_eq!(products[1].canonical_url, Some(format!("{}/p/home", base)));

    // Unreachable host: both fields null
    assert_eq!(products[2].url, "http://127.0.0.1:9/p/down");
    assert!(products[2].is_failed());

    assert_eq!(audit.canonical_resolutions.len(), 1);
    assert_eq!(audit.canonical_resolutions[0].status_code, Some(200));
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
            "application/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product-sitemap.xml"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(url_set(&[format!("{}/p/1", base)]), "application/xml"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/1"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page_with_canonical(&format!("{}/p/c", base)), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/c"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let audit = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(audit.canonical_resolutions[0].status_code, Some(200));
}

#[tokio::test]
async fn test_run_deadline_discards_partial_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/product-sitemap.xml",
        url_set(&[format!("{}/p/slow", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/p/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&format!("{}/sitemap.xml", base));
    config.crawler.run_deadline_secs = Some(1);
    let result = Coordinator::new(config).unwrap().run().await;

    assert!(matches!(result, Err(AuditError::DeadlineExceeded { seconds: 1 })));
}

#[tokio::test]
async fn test_audit_artifact_round_trip() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/product-sitemap.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/product-sitemap.xml",
        url_set(&[format!("{}/p/1", base)]),
    )
    .await;
    mount_html(&server, "/p/1", 200, page_with_canonical(&format!("{}/p/1", base))).await;

    let audit = Coordinator::new(create_test_config(&format!("{}/sitemap.xml", base)))
        .unwrap()
        .run()
        .await
        .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let artifact = JsonArtifactWriter.write(&audit, dir.path()).unwrap();

    let name = artifact.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("test-client_canonical_audit_"));
    assert_eq!(load_audit(&artifact).unwrap(), audit);
}
