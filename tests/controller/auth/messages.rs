use blocks_auth::server::{
    controller::auth::get_messages, model::api::MessagesDto, service::flash::FlashMessageStore,
};

use super::*;

#[tokio::test]
/// Expect one-time messages to be returned once and persistent ones every time
async fn drains_one_time_messages() -> Result<(), TestError> {
    let test = TestBuilder::new().with_user_tables().build().await?;
    let state: AppState = test.to_app_state();

    let flash = FlashMessageStore::new(&test.session);
    flash
        .set_message("notice", "Saved", false)
        .await
        .expect("failed to set message");
    flash
        .set_message("warning", "License expires soon", true)
        .await
        .expect("failed to set message");

    let resp = get_messages(
        State(state.clone()),
        test.session.clone(),
        test.cookies.clone(),
    )
    .await
    .expect("messages handler failed")
    .into_response();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: MessagesDto = json_body(resp).await;
    assert_eq!(body.messages.len(), 2);

    let resp = get_messages(State(state), test.session.clone(), test.cookies.clone())
        .await
        .expect("messages handler failed")
        .into_response();

    let body: MessagesDto = json_body(resp).await;
    assert_eq!(body.messages.len(), 1);
    assert_eq!(body.messages[0].key, "warning");

    Ok(())
}

#[tokio::test]
/// Expect an empty list for a fresh session
async fn returns_empty_list_without_messages() -> Result<(), TestError> {
    let test = TestBuilder::new().build().await?;
    let state: AppState = test.to_app_state();

    let resp = get_messages(State(state), test.session.clone(), test.cookies.clone())
        .await
        .expect("messages handler failed")
        .into_response();

    let body: MessagesDto = json_body(resp).await;
    assert!(body.messages.is_empty());

    Ok(())
}
