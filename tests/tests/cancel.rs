
use std::sync::{Arc, Mutex};

use anyhow::Result;
use common::*;
use docflow::{BackendError, BusyLocker, CancelParameters, ConfirmRequest, CreateParameters, Document, LifecycleError, Message, MessageType};
use futures::future::BoxFuture;

async fn create_inactive(h: &Harness, list: &Arc<MockList>) -> Result<Document> {
    Ok(h.controller.create_document(&list.binding(), CreateParameters::default().inactive(true), &h.messages).await?)
}

#[tokio::test]
async fn unmodified_new_draft_is_discarded_silently() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let list = h.list("Orders", true);
    let document = create_inactive(&h, &list).await?;
    assert!(document.is_transient());

    let shown = h.controller.cancel_document(&document, CancelParameters::default().new_object(true), &h.messages).await?;

    assert!(shown.is_none());
    assert!(h.presenter.confirms().is_empty());
    assert!(!h.backend.exists(&document.path()));
    h.assert_busy_balanced();
    Ok(())
}

#[tokio::test]
async fn unmodified_new_sticky_document_is_discarded_silently() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let list = h.list("Quotes", false);
    let document = create_inactive(&h, &list).await?;

    let shown = h.controller.cancel_document(&document, CancelParameters::default().new_object(true), &h.messages).await?;

    assert!(shown.is_none());
    assert!(h.presenter.confirms().is_empty());
    assert!(!h.backend.exists(&document.path()));
    assert!(h.backend.invoked().is_empty());
    Ok(())
}

#[tokio::test]
async fn draft_cancel_resolves_active_path_before_deleting_the_draft() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);

    let shown = h.controller.cancel_document(&draft, CancelParameters::default().modified(false), &h.messages).await?;

    let active = active_path("Orders", 1);
    assert_eq!(shown.map(|d| d.path()), Some(active.clone()));
    let canonical = h.backend.log_index(&format!("canonical:{}", active)).expect("canonical path requested");
    let deleted = h.backend.log_index(&format!("delete:{}", draft.path())).expect("draft deleted");
    let bound = h.backend.log_index(&format!("bind:{}", active)).expect("active document bound");
    assert!(canonical < deleted && deleted < bound);

    // the draft is gone: its sibling can no longer be resolved
    let err = h.backend.model().sibling_entity(&draft).await.unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn modified_draft_asks_before_discarding() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    h.backend.set_admin(&draft.path(), admin(45, Some("me"), Some("me")));

    h.controller.cancel_document(&draft, CancelParameters::default(), &h.messages).await?;

    match &h.presenter.confirms()[..] {
        [ConfirmRequest::Discard { document, text }] => {
            assert_eq!(document, &draft.path());
            assert_eq!(text, "Discard all changes?");
        }
        other => panic!("unexpected confirmations: {:?}", other),
    }
    assert!(!h.backend.exists(&draft.path()));
    Ok(())
}

#[tokio::test]
async fn untouched_draft_is_discarded_without_asking() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    h.backend.set_admin(&draft.path(), admin(0, Some("me"), None));

    h.controller.cancel_document(&draft, CancelParameters::default(), &h.messages).await?;

    assert!(h.presenter.confirms().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_draft_state_counts_as_modified() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    h.backend.fail("admin", BackendError::new(503, "unavailable"));
    h.presenter.answer_confirm(false);

    let err = h.controller.cancel_document(&draft, CancelParameters::default(), &h.messages).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(h.presenter.confirms().len(), 1);
    assert!(h.backend.exists(&draft.path()));
    Ok(())
}

#[tokio::test]
async fn declined_sticky_discard_leaves_document_untouched() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let quote = h.backend.sticky("Quotes", 1);
    quote.set_keep_alive(true);
    h.presenter.answer_confirm(false);

    let params = CancelParameters::default().modified(true);
    let err = h.controller.cancel_document(&quote, params, &h.messages).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Cancelled));
    assert!(h.backend.invoked().is_empty());
    assert!(quote.is_keep_alive());
    let stats = h.busy();
    assert_eq!((stats.locks, stats.releases, stats.held), (1, 1, 0));
    Ok(())
}

#[tokio::test]
async fn sticky_discard_refreshes_the_existing_document() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let quote = h.backend.sticky("Quotes", 1);
    let edited = h.controller.edit_document(&quote, &h.messages).await?;
    h.backend.emit("DiscardAction", vec![Message::warning("Price list changed meanwhile")]);

    let shown = h.controller.cancel_document(&edited, CancelParameters::default().modified(true), &h.messages).await?;

    assert_eq!(shown.map(|d| d.path()), Some(quote.path()));
    assert!(!quote.is_keep_alive());
    assert!(h.backend.logged().contains(&format!("refresh:{}", quote.path())));
    assert!(h.presenter.shown().iter().any(|m| m.text == "Price list changed meanwhile"));
    Ok(())
}

#[tokio::test]
async fn before_cancel_runs_after_confirmation_and_may_abort() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().sticky("Quotes"));
    let quote = h.backend.sticky("Quotes", 1);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let callback = {
        let seen = seen.clone();
        Arc::new(move |document: Document| -> BoxFuture<'static, Result<(), LifecycleError>> {
            seen.lock().unwrap().push(document.path());
            Box::pin(async { Err(LifecycleError::Cancelled) })
        })
    };
    let params = CancelParameters::default().modified(true).before_cancel(callback);
    let err = h.controller.cancel_document(&quote, params, &h.messages).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(h.presenter.confirms().len(), 1);
    assert_eq!(*seen.lock().unwrap(), vec![quote.path()]);
    assert!(h.backend.invoked().is_empty());
    h.assert_busy_balanced();
    Ok(())
}

#[tokio::test]
async fn cancel_clears_bound_transition_messages_and_shows_the_rest() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    h.messages.add(Message::error("Customer is missing").with_target(draft.path()));
    h.messages.add(Message::info("Unrelated notice"));

    h.controller.cancel_document(&draft, CancelParameters::default().skip_discard_popover(true), &h.messages).await?;

    assert!(h.messages.messages(true, true).is_empty());
    let texts: Vec<_> = h.presenter.shown().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["Unrelated notice"]);
    Ok(())
}

#[tokio::test]
async fn failed_discard_still_shows_messages_and_releases_busy() -> Result<()> {
    let h = Harness::new(MockMetaModel::default().draft("Orders"));
    let draft = h.backend.with_draft("Orders", 1);
    h.backend.fail("delete", BackendError::new(500, "draft could not be deleted"));

    let err = h.controller.cancel_document(&draft, CancelParameters::default().modified(false), &h.messages).await.unwrap_err();

    assert!(matches!(err, LifecycleError::Backend(ref e) if e.status == Some(500)));
    assert_eq!(h.presenter.batches().len(), 1);
    let errors: Vec<_> = h.presenter.shown().into_iter().filter(|m| m.message_type == MessageType::Error).map(|m| m.text).collect();
    assert_eq!(errors, vec!["draft could not be deleted"]);
    h.assert_busy_balanced();
    Ok(())
}

#[test]
fn busy_unlock_twice_is_harmless() {
    let locker = BusyLocker::new();
    locker.lock("/busy");
    locker.unlock("/busy");
    locker.unlock("/busy");
    assert!(!locker.is_locked("/busy"));

    let mut guard = locker.guard("/busy");
    guard.release();
    guard.release();
    drop(guard);
    let stats = locker.stats("/busy");
    assert_eq!((stats.locks, stats.releases, stats.held), (2, 2, 0));
}
