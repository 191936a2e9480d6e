use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_normalize_italian_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/text/normalize",
            &json!({
                "text": "<p>Dal Vangelo secondo Gv 3,16 .</p><p>R. Lode a te, o Cristo.</p>",
                "language": "it",
                "flatten_lines": true
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["text"],
        "Dal Vangelo secondo Giovanni 3, 16 Lode a te, o Cristo"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_take_language_from_feed_url(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/text/normalize",
            &json!({
                "text": "Reading from Jn 1, 1.",
                "feed_url": "https://www.vaticannews.va/en/word-of-the-day.rss"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["text"], "Reading from John 1, 1.");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_split_liturgy_into_segments(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/text/segments",
            &json!({
                "text": "Prima lettura: Is 1,1\nSalmo responsoriale: Sal 22\nDal Vangelo secondo Matteo: ...\nCommento (Papa Francesco)"
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["segments"],
        json!([
            "Prima lettura: Isaia 1, 1",
            "Dal Vangelo secondo Matteo:",
            "Commentary by Papa Francesco.\nCommento"
        ])
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_whole_text_when_liturgy_is_incomplete(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/text/segments", &json!({ "text": "Dal Vangelo secondo Marco\nUno" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["segments"],
        json!(["Dal Vangelo secondo Marco\nUno"])
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    for path in ["/api/text/normalize", "/api/text/segments"] {
        let response = ctx.client.post(path, &json!({ "text": "   " })).await.unwrap();
        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Text cannot be empty");
    }
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_oversized_text(ctx: &TestContext) {
    let text = "a".repeat(100_001);
    let response = ctx
        .client
        .post("/api/text/normalize", &json!({ "text": text }))
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}
