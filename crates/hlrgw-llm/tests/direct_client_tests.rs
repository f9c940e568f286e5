use hlrgw_llm::{classify_fault, CompletionClient, DirectBindingClient, DispatchError};
use hlrgw_types::{ChatMessage, Reason};

fn messages() -> Vec<ChatMessage> {
    vec![ChatMessage::user("what does mccmnc mean?")]
}

#[tokio::test]
async fn extracts_the_response_string_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"response":"Mobile country code plus network code."}"#)
        .create_async()
        .await;

    let client = DirectBindingClient::new(Some(format!("{}/run", server.url())), "test-model");
    let content = client.complete(&messages(), 300).await.unwrap();

    assert_eq!(content, "Mobile country code plus network code.");
    mock.assert_async().await;
}

#[tokio::test]
async fn falls_back_to_result_and_text_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/run")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result":"from result field"}"#)
        .create_async()
        .await;

    let client = DirectBindingClient::new(Some(format!("{}/run", server.url())), "test-model");
    assert_eq!(
        client.complete(&messages(), 300).await.unwrap(),
        "from result field"
    );
}

#[tokio::test]
async fn binding_errors_flow_through_the_text_classifier() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/run")
        .with_status(500)
        .with_body("inference quota exhausted for account")
        .create_async()
        .await;

    let client = DirectBindingClient::new(Some(format!("{}/run", server.url())), "test-model");
    let err = client.complete(&messages(), 300).await.unwrap_err();

    // no structured channel here: the wording is load-bearing
    assert!(matches!(err, DispatchError::Upstream { status: 500, .. }));
    assert_eq!(classify_fault(&err), Reason::ProviderQuota);
}

#[tokio::test]
async fn unrecognized_shape_is_an_empty_response_fault() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/run")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"output":"nothing we understand"}"#)
        .create_async()
        .await;

    let client = DirectBindingClient::new(Some(format!("{}/run", server.url())), "test-model");
    let err = client.complete(&messages(), 300).await.unwrap_err();

    assert!(matches!(err, DispatchError::EmptyResponse));
}

#[tokio::test]
async fn missing_binding_url_is_a_configuration_fault() {
    let client = DirectBindingClient::new(None, "test-model");
    let err = client.complete(&messages(), 300).await.unwrap_err();

    assert!(matches!(err, DispatchError::NotConfigured));
}
