mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use common::{MockResponse, Route, TestServer};
use recipe_scraper::config::{HttpConfig, SelectorRules, TranslationConfig};
use recipe_scraper::fetcher::Fetcher;
use recipe_scraper::pipeline::RecipePipeline;
use recipe_scraper::translator::Translator;
use serde_json::{json, Value};

const PANCAKES: &str = r#"
    <html><body>
      <h1>Classic Pancakes</h1>
      <div class="type">Breakfast</div>
      <ul>
        <li class="ingredient">Flour</li>
        <li class="ingredient">Milk</li>
        <li class="ingredient">flour</li>
      </ul>
      <time class="prep">10 min</time>
      <time class="total">25 min</time>
      <div class="steps"><p>Mix.</p><p>Fry.</p></div>
      <img src="/img/pancakes.jpg">
      <img src="/img/logo.svg">
    </body></html>
"#;

fn fast_fetcher() -> Fetcher {
    Fetcher::new(
        HttpConfig::for_pages()
            .with_timeout(Duration::from_secs(5))
            .with_backoff_base(Duration::from_millis(1)),
    )
    .unwrap()
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn text_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.join("text"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_recipe_end_to_end() {
    let server = TestServer::spawn(vec![
        (
            "/",
            Route::always(MockResponse::html(
                r#"<a href="/recipe/pancakes">Pancakes</a><a href="/about">About</a>"#,
            )),
        ),
        ("/recipe/pancakes", Route::always(MockResponse::html(PANCAKES))),
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let pipeline = RecipePipeline::new(
        fast_fetcher(),
        SelectorRules::default(),
        Translator::disabled(),
        out.path(),
    )
    .unwrap();
    let stats = pipeline.run(&server.url("/")).await.unwrap();

    assert_eq!(stats.links_found, 1);
    assert_eq!(stats.recipes_exported, 1);
    assert_eq!(stats.recipes_failed, 0);
    assert_eq!(stats.photos_found, 1);
    assert_eq!(server.hits("/about"), 0);

    let rows = read_csv(&out.path().join("recipes.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "Название");
    assert_eq!(
        rows[1],
        vec!["Classic Pancakes", "Breakfast", "Flour, Milk", "10 min", "", "25 min"]
    );

    assert_eq!(
        text_files(out.path()),
        vec![
            "classic-pancakes_ingredients.txt",
            "classic-pancakes_photos.txt",
            "classic-pancakes_steps.txt",
        ]
    );
    assert_eq!(
        fs::read_to_string(out.path().join("text/classic-pancakes_photos.txt")).unwrap(),
        format!("{}\n", server.url("/img/pancakes.jpg"))
    );
    assert_eq!(
        fs::read_to_string(out.path().join("text/classic-pancakes_ingredients.txt")).unwrap(),
        "Flour\nMilk\n"
    );
}

#[tokio::test]
async fn test_failed_recipes_are_skipped() {
    let server = TestServer::spawn(vec![
        (
            "/",
            Route::always(MockResponse::html(
                r#"
                <a href="/recipe/no-title">Broken</a>
                <a href="/recipe/gone">Gone</a>
                <a href="/recipe/pancakes">Pancakes</a>
                "#,
            )),
        ),
        (
            "/recipe/no-title",
            Route::always(MockResponse::html("<p>no heading here</p>")),
        ),
        ("/recipe/pancakes", Route::always(MockResponse::html(PANCAKES))),
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let pipeline = RecipePipeline::new(
        fast_fetcher(),
        SelectorRules::default(),
        Translator::disabled(),
        out.path(),
    )
    .unwrap();
    let stats = pipeline.run(&server.url("/")).await.unwrap();

    assert_eq!(stats.links_found, 3);
    assert_eq!(stats.recipes_exported, 1);
    assert_eq!(stats.recipes_failed, 2);
    assert_eq!(read_csv(&out.path().join("recipes.csv")).len(), 2);
}

#[tokio::test]
async fn test_start_page_failure_aborts_run() {
    let server = TestServer::spawn(vec![]).await;
    let out = tempfile::tempdir().unwrap();

    let pipeline = RecipePipeline::new(
        fast_fetcher(),
        SelectorRules::default(),
        Translator::disabled(),
        out.path(),
    )
    .unwrap();
    let err = pipeline.run(&server.url("/")).await.unwrap_err();
    assert!(err.is_fetch());
}

#[tokio::test]
async fn test_start_page_failure_keeps_previous_output() {
    let server = TestServer::spawn(vec![]).await;
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("recipes.csv");
    fs::write(&csv_path, "previous,run\n").unwrap();

    let pipeline = RecipePipeline::new(
        fast_fetcher(),
        SelectorRules::default(),
        Translator::disabled(),
        out.path(),
    )
    .unwrap();
    assert!(pipeline.run(&server.url("/")).await.is_err());

    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "previous,run\n");
    assert!(!out.path().join("text").exists());
}

fn mock_deepl(request: &common::RecordedRequest) -> MockResponse {
    let authorized = request
        .headers
        .get("authorization")
        .map(|v| v == "DeepL-Auth-Key test-key")
        .unwrap_or(false);
    if !authorized {
        return MockResponse::status(403);
    }

    let payload: Value = serde_json::from_slice(&request.body).unwrap();
    let lang = payload["target_lang"].as_str().unwrap().to_string();
    let translations: Vec<Value> = payload["text"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| json!({ "text": format!("[{}] {}", lang, t.as_str().unwrap()) }))
        .collect();
    MockResponse::json(&json!({ "translations": translations }).to_string())
}

#[tokio::test]
async fn test_translated_run_uses_translated_fields() {
    let server = TestServer::spawn(vec![
        (
            "/",
            Route::always(MockResponse::html(r#"<a href="/recipe/pancakes">P</a>"#)),
        ),
        ("/recipe/pancakes", Route::always(MockResponse::html(PANCAKES))),
        ("/v2/translate", Route::dynamic(mock_deepl)),
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let config = TranslationConfig::new()
        .with_auth_key("test-key")
        .with_api_url(&server.url("/v2/translate"));
    let translator = Translator::new(&config).unwrap();

    let pipeline =
        RecipePipeline::new(fast_fetcher(), SelectorRules::default(), translator, out.path())
            .unwrap();
    let stats = pipeline.run(&server.url("/")).await.unwrap();
    assert!(stats.translated);
    assert_eq!(stats.recipes_exported, 1);

    let rows = read_csv(&out.path().join("recipes.csv"));
    assert_eq!(
        rows[1],
        vec![
            "[RU] Classic Pancakes",
            "[RU] Breakfast",
            "[RU] Flour, [RU] Milk",
            "[RU] 10 min",
            "",
            "[RU] 25 min",
        ]
    );

    // slug来自翻译后的名称，图片地址不翻译
    let photos = fs::read_to_string(out.path().join("text/ru-classic-pancakes_photos.txt")).unwrap();
    assert_eq!(photos, format!("{}\n", server.url("/img/pancakes.jpg")));
    let steps = fs::read_to_string(out.path().join("text/ru-classic-pancakes_steps.txt")).unwrap();
    assert_eq!(steps, "[RU] Mix.\n[RU] Fry.\n");

    // 空字段不会发送给翻译服务
    let translate_calls: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.path == "/v2/translate")
        .collect();
    assert_eq!(translate_calls.len(), 1);
    let sent: Value = serde_json::from_slice(&translate_calls[0].body).unwrap();
    assert!(sent["text"].as_array().unwrap().iter().all(|t| t != ""));
}

#[tokio::test]
async fn test_translation_failure_skips_only_that_recipe() {
    let server = TestServer::spawn(vec![
        (
            "/",
            Route::always(MockResponse::html(
                r#"<a href="/recipe/a">A</a><a href="/recipe/b">B</a>"#,
            )),
        ),
        ("/recipe/a", Route::always(MockResponse::html(PANCAKES))),
        (
            "/recipe/b",
            Route::always(MockResponse::html("<h1>Waffles</h1>")),
        ),
        (
            "/v2/translate",
            Route::Sequence(vec![
                MockResponse::status(500),
                MockResponse::json(r#"{"translations":[{"text":"Вафли"}]}"#),
            ]),
        ),
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let config = TranslationConfig::new()
        .with_auth_key("test-key")
        .with_api_url(&server.url("/v2/translate"));
    let pipeline = RecipePipeline::new(
        fast_fetcher(),
        SelectorRules::default(),
        Translator::new(&config).unwrap(),
        out.path(),
    )
    .unwrap();

    let stats = pipeline.run(&server.url("/")).await.unwrap();
    assert_eq!(stats.recipes_failed, 1);
    assert_eq!(stats.recipes_exported, 1);

    let rows = read_csv(&out.path().join("recipes.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Вафли");
    assert!(out.path().join("text/вафли_steps.txt").exists());
}

#[tokio::test]
async fn test_custom_rules_drive_link_discovery() {
    let server = TestServer::spawn(vec![
        (
            "/",
            Route::always(MockResponse::html(
                r#"<nav><a href="/dish/1">Dish</a></nav><a href="/recipe/ignored">No</a>"#,
            )),
        ),
        (
            "/dish/1",
            Route::always(MockResponse::html(
                r#"<h2 class="title">Gazpacho</h2><ol class="method"><li>Blend.</li></ol>"#,
            )),
        ),
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let rules = SelectorRules {
        link: "nav a[href]".to_string(),
        link_pattern: "/dish/".to_string(),
        name: "h2.title".to_string(),
        step: "ol.method li".to_string(),
        ..SelectorRules::default()
    };
    let pipeline =
        RecipePipeline::new(fast_fetcher(), rules, Translator::disabled(), out.path()).unwrap();
    let stats = pipeline.run(&server.url("/")).await.unwrap();

    assert_eq!(stats.recipes_exported, 1);
    assert_eq!(server.hits("/recipe/ignored"), 0);
    assert_eq!(
        fs::read_to_string(out.path().join("text/gazpacho_steps.txt")).unwrap(),
        "Blend.\n"
    );
}
