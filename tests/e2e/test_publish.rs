use crate::e2e::helpers;

use chrono::{TimeZone, Utc};
use gospel_podcast_backend::domain::podcast::EpisodeManifest;
use gospel_podcast_backend::domain::text::LanguageCode;
use helpers::fakes::PUBLIC_BASE_URL;
use helpers::{english_entry, italian_entry, TestContext, ENGLISH_FEED, ITALIAN_FEED};
use hyper::StatusCode;
use test_context::test_context;

fn manifest(ctx: &TestContext, language: &str) -> EpisodeManifest {
    let bytes = ctx
        .storage
        .get(&format!("gospel/{}/episodes.json", language))
        .expect("manifest should be stored");
    EpisodeManifest::from_json(&bytes).unwrap()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_publish_italian_episode_in_liturgical_parts(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2), italian_entry(1)]);

    let response = ctx.client.post_empty("/publish?lang=it").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["language"], "it");
    assert_eq!(body["title"], "Vangelo del 2 gennaio");
    assert_eq!(
        body["feed_url"],
        format!("{}/gospel/it/podcast_feed.xml", PUBLIC_BASE_URL)
    );
    let audio_url = body["audio_url"].as_str().unwrap();
    assert!(audio_url.starts_with(&format!("{}/gospel/it/podcast_audio/", PUBLIC_BASE_URL)));
    assert!(audio_url.ends_with("_Vangelo-del-2-gennaio.mp3"));

    // Title, first reading, gospel and commentary are read separately
    let spoken = ctx.tts.spoken();
    assert_eq!(spoken.len(), 4);
    assert!(spoken.iter().all(|(language, _)| *language == LanguageCode::Italian));
    assert_eq!(spoken[0].1, "Vangelo del 2 gennaio");
    assert!(spoken[1].1.starts_with("Prima lettura"));
    assert!(spoken[1].1.contains("Isaia 1, 1"));
    assert!(spoken[2].1.starts_with("Dal Vangelo secondo Giovanni 10, 11"));
    assert!(spoken[3].1.starts_with("Commentary by Papa Francesco"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_store_audio_manifest_and_feed(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2)]);

    ctx.client
        .post_empty("/publish?lang=it")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let audio_keys = ctx.storage.keys_with_prefix("gospel/it/podcast_audio/");
    assert_eq!(audio_keys.len(), 1);
    assert_eq!(ctx.storage.content_type(&audio_keys[0]).as_deref(), Some("audio/mpeg"));

    let episodes = manifest(ctx, "it").episodes;
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].guid, "https://gospel.test/it/2024/01/02");
    assert_eq!(episodes[0].pub_date, "Tue, 02 Jan 2024 00:00:00 GMT");
    assert_eq!(
        episodes[0].length,
        ctx.storage.get(&audio_keys[0]).unwrap().len() as u64
    );
    assert!(episodes[0].duration > 0);

    let feed_key = "gospel/it/podcast_feed.xml";
    assert_eq!(
        ctx.storage.content_type(feed_key).as_deref(),
        Some("application/rss+xml; charset=utf-8")
    );
    let xml = ctx.storage.get_text(feed_key).unwrap();
    assert!(xml.contains("<title>Vangelo del giorno</title>"));
    assert!(xml.contains("<title>Vangelo del 2 gennaio</title>"));
    assert!(xml.contains("<itunes:email>podcast@gospel.test</itunes:email>"));
    assert!(xml.contains("<guid isPermaLink=\"false\">https://gospel.test/it/2024/01/02</guid>"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_default_to_italian(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2)]);

    let response = ctx.client.post_empty("/publish").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["language"], "it");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_read_other_languages_as_one_stream(ctx: &TestContext) {
    ctx.feeds.set_entries(ENGLISH_FEED, vec![english_entry(2)]);

    ctx.client
        .post_empty("/publish?lang=en")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let spoken = ctx.tts.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].0, LanguageCode::English);
    assert!(spoken[0].1.starts_with("Gospel of January 2"));
    assert!(spoken[0].1.contains("John 1, 1"));

    // No pubDate in the feed, so one is generated
    let episodes = manifest(ctx, "en").episodes;
    assert!(episodes[0].pub_date.ends_with(" GMT"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_replace_episode_when_republished(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2)]);

    for _ in 0..2 {
        ctx.client
            .post_empty("/publish?lang=it")
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    assert_eq!(manifest(ctx, "it").episodes.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_and_unconfigured_languages(ctx: &TestContext) {
    let response = ctx.client.post_empty("/publish?lang=xx").await.unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("xx");

    let response = ctx.client.post_empty("/publish?lang=de").await.unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("no podcast configured for language: de");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_empty_feed(ctx: &TestContext) {
    let response = ctx.client.post_empty("/publish?lang=it").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message(ITALIAN_FEED);
    assert!(ctx.storage.keys_with_prefix("gospel/").is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_feed_failures_as_server_errors(ctx: &TestContext) {
    ctx.feeds.fail(ITALIAN_FEED);

    let response = ctx.client.post_empty("/publish?lang=it").await.unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("connection refused");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_publish_all_languages(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2)]);
    ctx.feeds.set_entries(ENGLISH_FEED, vec![english_entry(2)]);

    let response = ctx.client.post_empty("/publish-all").await.unwrap();

    response.assert_status(StatusCode::OK);
    let results = response.body.as_ref().unwrap()["results"].as_array().unwrap().clone();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["success"] == true));
    assert_eq!(results[0]["language"], "it");
    assert_eq!(results[1]["language"], "en");
    assert_eq!(results[1]["result"]["title"], "Gospel of January 2");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_multi_status_when_a_language_fails(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2)]);
    ctx.feeds.fail(ENGLISH_FEED);

    let response = ctx.client.post_empty("/publish-all").await.unwrap();

    response.assert_status(StatusCode::MULTI_STATUS);
    let results = &response.body.as_ref().unwrap()["results"];
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], false);
    assert!(results[1]["error"].as_str().unwrap().contains("connection refused"));
    assert!(results[1].get("result").is_none());

    // The Italian feed is published regardless
    assert!(ctx.storage.get("gospel/it/podcast_feed.xml").is_some());
    assert!(ctx.storage.get("gospel/en/podcast_feed.xml").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_publish_feed_history_newest_first(ctx: &TestContext) {
    ctx.feeds.set_entries(
        ITALIAN_FEED,
        vec![italian_entry(3), italian_entry(2), italian_entry(1)],
    );

    let response = ctx.client.post_empty("/publish-history?lang=it").await.unwrap();

    response.assert_status(StatusCode::OK);
    let report = &response.body.as_ref().unwrap()["results"][0]["result"];
    assert_eq!(report["published"], 3);
    assert_eq!(report["errors"], serde_json::json!([]));

    let titles: Vec<String> = manifest(ctx, "it")
        .episodes
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(
        titles,
        vec!["Vangelo del 3 gennaio", "Vangelo del 2 gennaio", "Vangelo del 1 gennaio"]
    );

    let xml = ctx.storage.get_text("gospel/it/podcast_feed.xml").unwrap();
    let newest = xml.find("Vangelo del 3 gennaio").unwrap();
    let oldest = xml.find("Vangelo del 1 gennaio").unwrap();
    assert!(newest < oldest);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_publish_history_for_every_language(ctx: &TestContext) {
    ctx.feeds.set_entries(ITALIAN_FEED, vec![italian_entry(2), italian_entry(1)]);

    let response = ctx.client.post_empty("/publish-history").await.unwrap();

    // The English feed is empty
    response.assert_status(StatusCode::MULTI_STATUS);
    let results = &response.body.as_ref().unwrap()["results"];
    assert_eq!(results[0]["result"]["published"], 2);
    assert_eq!(results[1]["language"], "en");
    assert_eq!(results[1]["success"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_rebuild_feed_from_stored_audio(ctx: &TestContext) {
    for day in 1..=3 {
        ctx.storage.put(
            &format!("gospel/it/podcast_audio/202401{:02}_060000_Vangelo-del-{}-gennaio.mp3", day, day),
            vec![0u8; 100 * day as usize],
            Utc.with_ymd_and_hms(2024, 1, day, 6, 0, 0).unwrap(),
        );
    }

    let response = ctx
        .client
        .post_empty("/rebuild?lang=it&max_items=2")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["episodes"], 2);

    let episodes = manifest(ctx, "it").episodes;
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].title, "Vangelo del 3 gennaio");
    assert_eq!(episodes[0].description, "Episode: Vangelo del 3 gennaio");
    assert_eq!(episodes[0].length, 300);
    assert_eq!(episodes[0].pub_date, "Wed, 03 Jan 2024 06:00:00 GMT");
    assert_eq!(episodes[1].title, "Vangelo del 2 gennaio");
    assert_ne!(episodes[0].guid, episodes[1].guid);

    let xml = ctx.storage.get_text("gospel/it/podcast_feed.xml").unwrap();
    assert!(!xml.contains("Vangelo del 1 gennaio"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_rebuild_empty_feed_without_audio(ctx: &TestContext) {
    let response = ctx.client.post_empty("/rebuild?lang=en").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["episodes"], 0);
    assert!(ctx.storage.get("gospel/en/podcast_feed.xml").is_some());
}
