//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use async_trait::async_trait;
use film_scraper::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use film_scraper::crawler::{Coordinator, DocumentFetcher, FetchResult};
use film_scraper::film::{FilmRecord, StreamService};
use film_scraper::state::CrawlProgress;
use film_scraper::storage::{JsonStorage, Storage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `base_url` and writing into `dir`
fn create_test_config(
    base_url: &str,
    total_pages: u32,
    films_per_page: u32,
    dir: &TempDir,
) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            total_pages,
            films_per_page,
            ..SiteConfig::default()
        },
        crawler: CrawlerConfig {
            max_concurrency: 5,
            fetch_timeout_ms: 2_000,
            ..CrawlerConfig::default()
        },
        output: OutputConfig {
            results_path: dir.path().join("film_data_results.json").display().to_string(),
            progress_path: dir.path().join("progression.json").display().to_string(),
        },
        ..Config::default()
    }
}

fn storage_for(config: &Config) -> JsonStorage {
    JsonStorage::new(&config.output.progress_path, &config.output.results_path)
}

/// Builds a listing page from `(title, image, detail path)` triples
fn listing_page(items: &[(&str, &str, &str)]) -> String {
    let blocks: String = items
        .iter()
        .map(|(title, image, href)| {
            format!(
                r#"<div class="movie-item2">
                     <div class="mi2-img"><img alt="{}" src="{}"></div>
                     <a class="mi2-in-link" href="{}">Voir</a>
                   </div>"#,
                title, image, href
            )
        })
        .collect();
    format!(r#"<html><body><div class="films">{}</div></body></html>"#, blocks)
}

fn detail_page(genre: &str, date: &str, actor: &str, description: &str) -> String {
    format!(
        r#"<html><body>
           <ul>
             <li class="details-f">Genre: <a href="/g">{}</a></li>
             <li class="details-f">Date de sortie: <span>{}</span></li>
             <li class="details-f">Acteurs: <a href="/a">{}</a></li>
           </ul>
           <p class="full-desc">Synopsis</p>
           <p>{}</p>
           <div class="lien fx-row" data-url="https://uqload.example/e/1"><span class="serv">Uqload</span></div>
           <div class="lien fx-row" data-url="https://other.example/e/2"><span class="serv">Streamtape</span></div>
           <div class="lien fx-row" data-url="https://dood.example/e/3"><span class="serv">DoodStream</span></div>
           </body></html>"#,
        genre, date, actor, description
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn find<'a>(films: &'a [FilmRecord], title: &str) -> &'a FilmRecord {
    films
        .iter()
        .find(|film| film.title == title)
        .unwrap_or_else(|| panic!("film '{}' missing from results", title))
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        listing_page(&[
            ("Amélie", "/img/amelie.jpg", "/films/amelie.html"),
            ("Le Samouraï", "/img/samourai.jpg", "/films/samourai.html"),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "/filmstreaming/2/",
        listing_page(&[("Mon Oncle", "/img/oncle.jpg", "/films/oncle.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/films/amelie.html",
        detail_page("Comédie", "2001", "Audrey Tautou", "Une serveuse rêveuse à Montmartre."),
    )
    .await;
    mount_page(
        &mock_server,
        "/films/samourai.html",
        detail_page("Policier", "1967", "Alain Delon", "Un tueur à gages solitaire."),
    )
    .await;
    mount_page(
        &mock_server,
        "/films/oncle.html",
        detail_page("Comédie", "1958", "Jacques Tati", "Monsieur Hulot et la maison moderne."),
    )
    .await;

    let config = create_test_config(&base_url, 2, 2, &dir);
    let storage = storage_for(&config);

    let mut coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.films_scraped, 3);

    let progress = storage.load_progress().unwrap().expect("progress written");
    assert_eq!(
        progress,
        CrawlProgress {
            last_page: 3,
            total_scraped: 3
        }
    );

    let films = storage.load_results().unwrap().expect("results written");
    assert_eq!(films.len(), 3);

    let amelie = find(&films, "Amélie");
    assert_eq!(amelie.image_url, format!("{}/img/amelie.jpg", base_url));
    assert_eq!(amelie.genres, vec!["Comédie"]);
    assert_eq!(amelie.release_date, "2001");
    assert_eq!(amelie.actors, vec!["Audrey Tautou"]);
    assert_eq!(amelie.description, "Une serveuse rêveuse à Montmartre.");

    for film in &films {
        let services: Vec<_> = film.links.iter().map(|link| link.service).collect();
        assert_eq!(services, vec![StreamService::Uqload, StreamService::DoodStream]);
    }

    // Non-ASCII text is written literally
    let raw = std::fs::read_to_string(storage.results_path()).unwrap();
    assert!(raw.contains("Amélie"));
    assert!(raw.contains("Le Samouraï"));
}

#[tokio::test]
async fn test_empty_page_advances_cursor() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        "<html><body><p>Aucun film</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 1, 20, &dir);
    let storage = storage_for(&config);

    let mut coordinator = Coordinator::new(config, true).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.films_scraped, 0);
    assert_eq!(
        storage.load_progress().unwrap(),
        Some(CrawlProgress {
            last_page: 2,
            total_scraped: 0
        })
    );
    assert_eq!(storage.load_results().unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn test_failed_page_does_not_halt_crawl() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/filmstreaming/1/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/filmstreaming/2/",
        listing_page(&[("Playtime", "/img/playtime.jpg", "/films/playtime.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/films/playtime.html",
        detail_page("Comédie", "1967", "Jacques Tati", "Paris moderne."),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 2, 20, &dir);
    let storage = storage_for(&config);

    let mut coordinator = Coordinator::new(config, true).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.progress.last_page, 3);
    assert_eq!(report.progress.total_scraped, 1);

    let films = storage.load_results().unwrap().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0].title, "Playtime");
}

#[tokio::test]
async fn test_resume_skips_completed_pages() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Page 1 was completed by an earlier run and must not be fetched again
    Mock::given(method("GET"))
        .and(path("/filmstreaming/1/"))
        .respond_with(html(listing_page(&[("Déjà vu", "/img/x.jpg", "/films/x.html")])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/filmstreaming/2/",
        listing_page(&[
            ("Jour de fête", "/img/fete.jpg", "/films/fete.html"),
            ("Les Vacances", "/img/vacances.jpg", "/films/vacances.html"),
        ]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 2, 20, &dir);
    let mut storage = storage_for(&config);
    storage
        .save_progress(&CrawlProgress {
            last_page: 2,
            total_scraped: 17,
        })
        .unwrap();

    let mut coordinator = Coordinator::new(config, false).unwrap();
    assert_eq!(coordinator.start_progress().last_page, 2);
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(
        storage.load_progress().unwrap(),
        Some(CrawlProgress {
            last_page: 3,
            total_scraped: 19
        })
    );
}

#[tokio::test]
async fn test_fresh_run_ignores_saved_progress() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        listing_page(&[("Tenet", "/img/tenet.jpg", "/films/tenet.html")]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 1, 20, &dir);
    let mut storage = storage_for(&config);
    storage
        .save_progress(&CrawlProgress {
            last_page: 2,
            total_scraped: 20,
        })
        .unwrap();

    let mut coordinator = Coordinator::new(config, true).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.progress.total_scraped, 1);
}

#[tokio::test]
async fn test_detail_timeout_keeps_listing_fields() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        listing_page(&[("Stalker", "/img/stalker.jpg", "/films/stalker.html")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/films/stalker.html"))
        .respond_with(
            html(detail_page("SF", "1979", "Alexandre Kaïdanovski", "La Zone."))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, 1, 20, &dir);
    config.crawler.fetch_timeout_ms = 200;
    let storage = storage_for(&config);

    let mut coordinator = Coordinator::new(config, true).unwrap();
    coordinator.run().await.unwrap();

    let films = storage.load_results().unwrap().unwrap();
    assert_eq!(films.len(), 1);

    let film = &films[0];
    assert_eq!(film.title, "Stalker");
    assert_eq!(film.image_url, format!("{}/img/stalker.jpg", base_url));
    assert!(film.genres.is_empty());
    assert!(film.actors.is_empty());
    assert!(film.links.is_empty());
    assert_eq!(film.release_date, "Date non disponible");
    assert_eq!(film.description, "Description non disponible");
}

#[tokio::test]
async fn test_checkpointed_records_survive_resume() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        listing_page(&[("Rififi", "/img/rififi.jpg", "/films/rififi.html")]),
    )
    .await;
    mount_page(
        &mock_server,
        "/filmstreaming/2/",
        listing_page(&[("Pickpocket", "/img/pickpocket.jpg", "/films/pickpocket.html")]),
    )
    .await;

    // First run stops after page 1, as if interrupted
    let mut first = create_test_config(&mock_server.uri(), 1, 20, &dir);
    first.crawler.checkpoint_results = true;
    Coordinator::new(first, true).unwrap().run().await.unwrap();

    let mut second = create_test_config(&mock_server.uri(), 2, 20, &dir);
    second.crawler.checkpoint_results = true;
    let storage = storage_for(&second);
    Coordinator::new(second, false).unwrap().run().await.unwrap();

    let films = storage.load_results().unwrap().unwrap();
    let mut titles: Vec<_> = films.iter().map(|film| film.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Pickpocket", "Rififi"]);
    assert_eq!(storage.load_progress().unwrap().unwrap().total_scraped, 2);
}

#[tokio::test]
async fn test_checkpoint_without_progress_starts_clean() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/filmstreaming/1/",
        listing_page(&[("Rififi", "/img/rififi.jpg", "/films/rififi.html")]),
    )
    .await;

    let mut first = create_test_config(&mock_server.uri(), 1, 20, &dir);
    first.crawler.checkpoint_results = true;
    let storage = storage_for(&first);
    Coordinator::new(first.clone(), true).unwrap().run().await.unwrap();

    // Results survive but the progress marker is gone
    std::fs::remove_file(storage.progress_path()).unwrap();

    let mut second = Coordinator::new(first, false).unwrap();
    assert_eq!(second.start_progress(), CrawlProgress::starting_at(1));
    second.run().await.unwrap();

    let films = storage.load_results().unwrap().unwrap();
    let titles: Vec<_> = films.iter().map(|film| film.title.as_str()).collect();
    assert_eq!(titles, vec!["Rififi"]);
    let progress = storage.load_progress().unwrap().unwrap();
    assert_eq!(progress.total_scraped, films.len() as u64);
}

/// Serves a listing page of ten films and counts concurrent detail fetches
struct InstrumentedFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    detail_fetches: AtomicUsize,
}

#[async_trait]
impl DocumentFetcher for InstrumentedFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        if url.contains("/filmstreaming/") {
            let items: Vec<(String, String)> = (0..10)
                .map(|i| (format!("Film {}", i), format!("/films/{}.html", i)))
                .collect();
            let refs: Vec<(&str, &str, &str)> = items
                .iter()
                .map(|(title, href)| (title.as_str(), "/img/x.jpg", href.as_str()))
                .collect();
            return FetchResult::Success {
                final_url: url.to_string(),
                status_code: 200,
                body: listing_page(&refs),
            };
        }

        self.detail_fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(25)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        FetchResult::Success {
            final_url: url.to_string(),
            status_code: 200,
            body: detail_page("Drame", "2000", "Acteur", "Texte."),
        }
    }
}

#[tokio::test]
async fn test_concurrency_cap_limits_detail_fetches() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config("https://films.example.com", 1, 10, &dir);
    config.crawler.max_concurrency = 3;

    let fetcher = Arc::new(InstrumentedFetcher {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
        detail_fetches: AtomicUsize::new(0),
    });

    let mut coordinator = Coordinator::with_fetcher(config, true, fetcher.clone()).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.films_scraped, 10);
    // Stream links and details each fetch the detail page once
    assert_eq!(fetcher.detail_fetches.load(Ordering::SeqCst), 20);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak of {} concurrent detail fetches", peak);
    assert!(peak >= 2, "items were not processed concurrently");
}
