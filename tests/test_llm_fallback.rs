use recipe_extract::config::PipelineConfig;
use recipe_extract::extract_recipe;
use serde_json::json;

/// A recipe written as free prose: no markup any of strategies 1-4 can use.
const PROSE_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>Aunt Mary's Famous Toast</title></head>
<body>
    <p>Take one slice of bread and butter it generously.
    Toast until golden. Serves one hungry person.</p>
</body>
</html>
"#;

fn chat_completion_reply(content: &str) -> String {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_llm_fallback_parses_fenced_json_reply() {
    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/toast")
        .with_status(200)
        .with_body(PROSE_PAGE)
        .create_async()
        .await;
    let llm = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_reply(
            "```json\n{\"title\": \"Buttered Toast\", \"description\": \"\", \
             \"ingredients\": [\"1 slice bread\", \"1 tbsp butter\"], \
             \"instructions\": [\"Butter the bread.\", \"Toast until golden.\"], \
             \"servings\": \"1\", \"prep_time\": \"\", \"cook_time\": \"5 minutes\", \
             \"image_url\": \"\"}\n```",
        ))
        .create_async()
        .await;

    let config = PipelineConfig {
        openai_api_key: Some("test-key".to_string()),
        openai_base_url: server.url(),
        ..Default::default()
    };
    let url = format!("{}/toast", server.url());
    let recipe = extract_recipe(&url, &config).await.unwrap();

    assert_eq!(recipe.title, "Buttered Toast");
    assert_eq!(recipe.ingredients, vec!["1 slice bread", "1 tbsp butter"]);
    assert_eq!(
        recipe.instructions,
        vec!["Butter the bread.", "Toast until golden."]
    );
    assert_eq!(recipe.cook_time.as_deref(), Some("5 minutes"));
    assert!(recipe.description.is_none());
    llm.assert_async().await;
}

#[tokio::test]
async fn test_llm_reply_without_recipe_means_no_match() {
    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/diary")
        .with_status(200)
        .with_body(PROSE_PAGE)
        .create_async()
        .await;
    let _llm = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(chat_completion_reply(
            r#"{"title": "", "ingredients": [], "instructions": []}"#,
        ))
        .create_async()
        .await;

    let config = PipelineConfig {
        openai_api_key: Some("test-key".to_string()),
        openai_base_url: server.url(),
        ..Default::default()
    };
    let url = format!("{}/diary", server.url());
    let err = extract_recipe(&url, &config).await.unwrap_err();
    assert!(err
        .user_message()
        .starts_with("No recipe found on this page."));
}

#[tokio::test]
async fn test_llm_not_called_when_markup_strategy_succeeds() {
    let page = r#"<script type="application/ld+json">
        {"@type": "Recipe", "name": "Fast Path", "recipeIngredient": ["1 egg"],
         "recipeInstructions": ["Fry."]}
    </script>"#;

    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/fast")
        .with_status(200)
        .with_body(page)
        .create_async()
        .await;
    let llm = server
        .mock("POST", "/v1/chat/completions")
        .expect(0)
        .create_async()
        .await;

    let config = PipelineConfig {
        openai_api_key: Some("test-key".to_string()),
        openai_base_url: server.url(),
        ..Default::default()
    };
    let url = format!("{}/fast", server.url());
    let recipe = extract_recipe(&url, &config).await.unwrap();

    assert_eq!(recipe.title, "Fast Path");
    llm.assert_async().await;
}
