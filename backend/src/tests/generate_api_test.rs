//! POST /generate through the full router

use axum::http::{StatusCode, header};
use serde_json::json;

use super::common::*;
use crate::services::LLMError;

#[tokio::test]
async fn test_generate_success() {
    let client = MockCompletionClient::replying("**龙腾盛世**🐉，福满人间！");
    let app = test_app(client.clone());

    let (status, body) = send(
        app,
        post_generate(json!({"year": 2024, "category": "朋友圈", "style": "现代创新风格", "keyword": "团圆"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blessing"], "龙腾盛世，福满人间！");
    assert_eq!(body["lunar_year"], "甲辰年");
    assert_eq!(body["zodiac"], "龙");

    let prompts = client.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("2024年是甲辰年"));
    assert!(prompts[0].contains("「团圆」"));
}

#[tokio::test]
async fn test_generate_defaults() {
    let client = MockCompletionClient::replying("金蛇献瑞");
    let (status, body) = send(test_app(client.clone()), post_generate(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lunar_year"], "乙巳年");
    assert_eq!(body["zodiac"], "蛇");

    let prompts = client.prompts.lock().unwrap();
    assert!(prompts[0].contains("祝福语类别：朋友圈"));
    assert!(prompts[0].contains("祝福语风格：传统风格"));
}

#[tokio::test]
async fn test_generate_rejects_bad_years() {
    for year in [json!(1899), json!(2101), json!("abc"), json!(null)] {
        let client = MockCompletionClient::replying("不应被调用");
        let (status, body) =
            send(test_app(client.clone()), post_generate(json!({ "year": year }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "year {year}");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "year {year}");
        assert_eq!(client.call_count(), 0, "upstream must not be called for year {year}");
    }
}

#[tokio::test]
async fn test_generate_error_messages_localized() {
    let client = MockCompletionClient::replying("");
    let (_, body) = send(test_app(client.clone()), post_generate(json!({"year": 1899}))).await;
    assert_eq!(body["error"], "请输入1900-2100之间的年份");
    assert_eq!(body["code"], 4002);

    let (_, body) = send(test_app(client.clone()), post_generate(json!({"year": "abc"}))).await;
    assert_eq!(body["error"], "请输入有效的年份");

    let mut request = post_generate(json!({"year": 2101}));
    request.headers_mut().insert(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse().unwrap());
    let (_, body) = send(test_app(client), request).await;
    assert_eq!(body["error"], "Please enter a year between 1900 and 2100");
}

#[tokio::test]
async fn test_generate_upstream_timeout_is_not_http_error() {
    let client = MockCompletionClient::failing(|| LLMError::Timeout(30));
    let (status, body) = send(test_app(client), post_generate(json!({"year": 2025}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blessing"], "生成祝福语时出错: Request timeout after 30s");
    assert_eq!(body["lunar_year"], "乙巳年");
    assert_eq!(body["zodiac"], "蛇");
}

#[tokio::test]
async fn test_generate_empty_upstream_response() {
    let client = MockCompletionClient::failing(|| LLMError::EmptyResponse);
    let (status, body) = send(test_app(client), post_generate(json!({"year": 2025}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blessing"], "生成祝福语失败，请重试。");
}

#[tokio::test]
async fn test_generate_microblog_drops_hashtag_lines() {
    let client = MockCompletionClient::replying("今年是龙年 ##关键词##\n龙行龘龘，前程朤朤！");
    let (status, body) =
        send(test_app(client), post_generate(json!({"year": 2024, "category": "微博"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blessing"], "龙行龘龘，前程朤朤！");
}

#[tokio::test]
async fn test_generate_unknown_category_still_succeeds() {
    let client = MockCompletionClient::replying("马到成功");
    let (status, body) = send(
        test_app(client.clone()),
        post_generate(json!({"year": 2026, "category": "小红书", "style": "未知风格"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blessing"], "马到成功");
    assert!(client.prompts.lock().unwrap()[0].contains("祝福语类别：小红书（）"));
}

#[tokio::test]
async fn test_generate_malformed_bodies_return_json_errors() {
    let cases = [
        ("year=2024", Some("application/json")),
        (r#"{"year": 2024, "category": 1}"#, Some("application/json")),
        (r#"{"year": 2024, "keyword": ["团圆"]}"#, Some("application/json")),
        ("[2024]", Some("application/json")),
        (r#"{"year": 2024}"#, None),
    ];

    for (body, content_type) in cases {
        let client = MockCompletionClient::replying("不应被调用");
        let (status, json) =
            send(test_app(client.clone()), post_generate_raw(body, content_type)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["code"], 4003, "body {body}");
        assert!(
            json["error"].as_str().is_some_and(|e| e.starts_with("参数校验失败: ")),
            "body {body}: {json}"
        );
        assert_eq!(client.call_count(), 0, "upstream must not be called for body {body}");
    }
}

#[tokio::test]
async fn test_generate_malformed_body_message_localized() {
    let mut request = post_generate_raw("{", Some("application/json"));
    request.headers_mut().insert(header::ACCEPT_LANGUAGE, "en".parse().unwrap());
    let (status, body) = send(test_app(MockCompletionClient::replying("")), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Validation failed: ")));
}
