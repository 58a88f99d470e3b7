
use anyhow::Result;
use common::*;
use docflow::{BackendError, ConfirmRequest, ControllerConfig, DeleteParameters, LifecycleError, MessageType};

fn as_me() -> ControllerConfig { ControllerConfig { current_user: Some("me".into()), ..Default::default() } }

#[tokio::test]
async fn locked_document_blocks_the_whole_selection() -> Result<()> {
    let h = Harness::with_config(MockMetaModel::default().draft("Orders"), as_me());
    let free = h.backend.active("Orders", 1);
    h.backend.with_draft("Orders", 2);
    h.backend.set_admin(&draft_path("Orders", 2), admin(10, Some("alice"), Some("alice")));
    let locked = h.backend.document(&active_path("Orders", 2));

    let err = h.controller.delete_document(&[free, locked], DeleteParameters::default(), &h.messages).await.unwrap_err();

    assert!(matches!(err, LifecycleError::DocumentLocked { ref holder } if holder == "alice"));
    assert_eq!(h.presenter.boxes(), vec!["This object is currently locked by alice."]);
    assert!(h.presenter.confirms().is_empty());
    assert!(!h.backend.logged().iter().any(|entry| entry.starts_with("delete:")));
    h.assert_busy_balanced();
    Ok(())
}

#[tokio::test]
async fn own_draft_lock_does_not_block() -> Result<()> {
    let h = Harness::with_config(MockMetaModel::default().draft("Orders"), as_me());
    let draft = h.backend.with_draft("Orders", 1);
    h.backend.set_admin(&draft.path(), admin(10, Some("me"), Some("me")));

    let outcome = h.controller.delete_document(&[draft.clone()], DeleteParameters::default(), &h.messages).await?;

    assert_eq!(outcome.deleted, vec![draft.path()]);
    // a draft with an active sibling is deleted through the active document
    assert!(h.backend.logged().contains(&format!("delete:{}", active_path("Orders", 1))));
    Ok(())
}

#[tokio::test]
async fn lock_flagged_as_ours_does_not_block_without_a_current_user() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    let mut own = admin(10, Some("me"), Some("me"));
    own.draft_is_processed_by_me = true;
    h.backend.set_admin(&draft.path(), own);

    let outcome = h.controller.delete_document(&[draft.clone()], DeleteParameters::default(), &h.messages).await?;

    assert_eq!(outcome.deleted, vec![draft.path()]);
    assert!(h.presenter.boxes().is_empty());
    h.assert_busy_balanced();
    Ok(())
}

#[tokio::test]
async fn single_document_confirmation_names_the_title() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let order = h.backend.active("Orders", 1);

    let params = DeleteParameters { title: Some("Order 4711".into()), ..Default::default() };
    h.controller.delete_document(&[order.clone()], params, &h.messages).await?;

    match &h.presenter.confirms()[..] {
        [ConfirmRequest::Delete { text, count, .. }] => {
            assert_eq!(text, "Delete object Order 4711?");
            assert_eq!(*count, 1);
        }
        other => panic!("unexpected confirmations: {:?}", other),
    }
    assert!(!h.backend.exists(&order.path()));
    let texts: Vec<_> = h.presenter.shown().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["Object deleted."]);
    Ok(())
}

#[tokio::test]
async fn partial_failures_do_not_stop_the_batch() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let orders: Vec<_> = (1..=3).map(|id| h.backend.active("Orders", id)).collect();
    h.backend.fail(&format!("delete:{}", orders[1].path()), BackendError::new(409, "referenced by invoice"));

    let outcome = h.controller.delete_document(&orders, DeleteParameters::default(), &h.messages).await?;

    assert_eq!(outcome.deleted, vec![orders[0].path(), orders[2].path()]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, orders[1].path());
    assert!(matches!(&h.presenter.confirms()[..], [ConfirmRequest::Delete { count: 3, .. }]));

    let bound_errors = h.messages.messages(true, true);
    assert_eq!(bound_errors.len(), 1);
    assert_eq!(bound_errors[0].target, Some(orders[1].path()));
    assert_eq!(bound_errors[0].message_type, MessageType::Error);
    let texts: Vec<_> = h.presenter.shown().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["2 objects deleted."]);
    Ok(())
}

#[tokio::test]
async fn restricted_documents_are_skipped_and_mentioned() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders").restrict(&active_path("Orders", 1)));
    let restricted = h.backend.active("Orders", 1);
    let free = h.backend.active("Orders", 2);

    let outcome = h.controller.delete_document(&[restricted.clone(), free.clone()], DeleteParameters::default(), &h.messages).await?;

    assert_eq!(outcome.skipped, vec![restricted.path()]);
    assert_eq!(outcome.deleted, vec![free.path()]);
    assert!(h.backend.exists(&restricted.path()));
    match &h.presenter.confirms()[..] {
        [ConfirmRequest::Delete { text, .. }] => assert_eq!(text, "1 of 2 selected objects cannot be deleted. Delete this object?"),
        other => panic!("unexpected confirmations: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn nothing_deletable_shows_an_information_box() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders").restrict(&active_path("Orders", 1)));
    let restricted = h.backend.active("Orders", 1);

    let outcome = h.controller.delete_document(&[restricted], DeleteParameters::default(), &h.messages).await?;

    assert!(outcome.deleted.is_empty());
    assert_eq!(h.presenter.boxes(), vec!["None of the selected objects can be deleted."]);
    assert!(h.presenter.confirms().is_empty());
    Ok(())
}

#[tokio::test]
async fn declined_confirmation_deletes_nothing() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let quotes = vec![h.backend.sticky("Quotes", 1), h.backend.sticky("Quotes", 2)];
    h.presenter.answer_confirm(false);

    let err = h.controller.delete_document(&quotes, DeleteParameters::default(), &h.messages).await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(quotes.iter().all(|quote| h.backend.exists(&quote.path())));
    assert_eq!(h.presenter.batches().len(), 1);
    h.assert_busy_balanced();
    Ok(())
}

#[tokio::test]
async fn no_dialog_deletes_right_away() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let quote = h.backend.sticky("Quotes", 1);

    let params = DeleteParameters { no_dialog: true, ..Default::default() };
    h.controller.delete_document(&[quote.clone()], params, &h.messages).await?;

    assert!(h.presenter.confirms().is_empty());
    assert!(!h.backend.exists(&quote.path()));
    Ok(())
}

#[tokio::test]
async fn empty_selection_is_rejected() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));

    let err = h.controller.delete_document(&[], DeleteParameters::default(), &h.messages).await.unwrap_err();

    assert!(matches!(err, LifecycleError::MissingBindingContext));
    assert_eq!(h.busy().locks, 0);
    Ok(())
}
