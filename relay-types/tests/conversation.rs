use relay_types::*;

#[test]
fn conversation_round_trips_through_json() {
    let turns = vec![
        ConversationTurn::user("What is Rust?"),
        ConversationTurn::model("A systems language.").with_usage(Some(UsageInfo {
            prompt_token_count: Some(5),
            candidates_token_count: Some(4),
            total_token_count: Some(9),
            ..Default::default()
        })),
    ];
    let json = serde_json::to_string(&turns).unwrap();
    let back: Vec<ConversationTurn> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, turns);
}

#[test]
fn stored_history_from_older_clients_loads() {
    // Turns saved without usage, as the playground stores them.
    let json = r#"[{"role":"user","text":"hi"},{"role":"model","text":"hello"}]"#;
    let turns: Vec<ConversationTurn> = serde_json::from_str(json).unwrap();
    assert_eq!(turns[1], ConversationTurn::model("hello"));
}

#[test]
fn complete_request_from_turns() {
    let history = [ConversationTurn::user("hi"), ConversationTurn::model("hello")];
    let config = GenerationConfig::default().model("gemini-2.5-pro").temperature(None);
    let request = ProxyRequest::complete("and you?", &config, &history);

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["model"], "gemini-2.5-pro");
    assert!(value.get("temperature").is_none());
    assert_eq!(value["history"][1]["role"], "model");
    assert_eq!(value["history"][1]["parts"][0]["text"], "hello");

    let back: ProxyRequest = serde_json::from_value(value).unwrap();
    assert_eq!(back, request);
}
