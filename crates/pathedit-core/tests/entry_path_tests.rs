//! Entry path editor driven end to end with scripted collaborators

use parking_lot::Mutex;
use pathedit_core::prelude::*;
use pathedit_test_utils::{init_test_tracing, RecordingCommitter, ScriptedValidator};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn editor(
    entry_path: &str,
    collection_folder: &str,
    committer: &Arc<RecordingCommitter>,
) -> EntryPathRequest {
    init_test_tracing();
    EntryPathRequest::new(
        entry_path,
        collection_folder,
        committer.clone() as Arc<dyn Committer>,
    )
}

fn deferred() -> DialogConfig {
    DialogConfig::new().with_entry_update_mode(EntryUpdateMode::Deferred)
}

fn update(new_path: &str, filename: &str) -> CommitRequest {
    CommitRequest::UpdateEntryPath {
        new_path: new_path.into(),
        filename: filename.into(),
    }
}

#[tokio::test(start_paused = true)]
async fn live_filename_change_updates_path_once() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("blog/2024/my-post.md", "blog", &committer);

    editor.open().unwrap();
    editor.input("new-post.md").await.unwrap();
    assert_eq!(editor.full_path(), "blog/2024/new-post.md");
    assert_eq!(
        committer.calls(),
        vec![update("blog/2024/new-post.md", "new-post.md")]
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(editor.validation_message(), None);
    assert_eq!(editor.phase(), Phase::Editing);

    let outcome = editor.confirm().await.unwrap();
    assert!(outcome.is_committed());
    assert_eq!(committer.call_count(), 1);
    assert_eq!(editor.location().filename, "new-post.md");
}

#[tokio::test(start_paused = true)]
async fn live_mode_forwards_every_keystroke() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("posts/a.md", "posts", &committer);

    editor.open().unwrap();
    for value in ["n", "ne", "new.md"] {
        editor.input(value).await.unwrap();
    }

    let paths: Vec<String> = committer
        .calls()
        .iter()
        .map(|c| c.new_path().to_string())
        .collect();
    assert_eq!(paths, vec!["posts/n", "posts/ne", "posts/new.md"]);
}

#[tokio::test(start_paused = true)]
async fn entry_at_collection_root_is_not_prefixed_twice() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("posts/a.md", "posts", &committer);

    assert_eq!(editor.location().folder, "");
    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    assert_eq!(editor.preview().relative_path, "b.md");
    assert_eq!(editor.full_path(), "posts/b.md");
}

#[tokio::test(start_paused = true)]
async fn no_collection_folder_keeps_full_folder() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("notes/2024/a.md", "", &committer);

    editor.open().unwrap();
    editor.input("c.md").await.unwrap();
    assert_eq!(editor.full_path(), "notes/2024/c.md");
}

#[tokio::test(start_paused = true)]
async fn deferred_mode_commits_once_on_confirm() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("blog/2024/my-post.md", "blog", &committer).with_config(deferred());

    editor.open().unwrap();
    editor.input("new").await.unwrap();
    editor.input("new-post.md").await.unwrap();
    assert_eq!(committer.call_count(), 0);

    let outcome = editor.confirm().await.unwrap();
    assert_eq!(
        outcome,
        ConfirmOutcome::Committed(update("blog/2024/new-post.md", "new-post.md"))
    );
    assert_eq!(committer.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn deferred_commit_failure_keeps_editing() {
    let committer = Arc::new(RecordingCommitter::new().failing_once("conflict"));
    let editor = editor("posts/a.md", "posts", &committer).with_config(deferred());

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    let outcome = editor.confirm().await.unwrap();
    assert_eq!(
        outcome,
        ConfirmOutcome::Failed(SessionError::CommitFailed("conflict".into()))
    );
    assert_eq!(editor.location().filename, "a.md");
    assert!(editor.has_changed());

    assert!(editor.confirm().await.unwrap().is_committed());
    assert_eq!(editor.location().filename, "b.md");
}

#[tokio::test(start_paused = true)]
async fn debounced_rejection_blocks_enter() {
    let committer = Arc::new(RecordingCommitter::new());
    let validator = Arc::new(ScriptedValidator::new().rejecting("taken.md", "Entry already exists"));
    let editor = editor("posts/a.md", "posts", &committer)
        .with_config(deferred())
        .with_validator(validator.clone() as Arc<dyn Validator>);

    editor.open().unwrap();
    editor.input("taken.md").await.unwrap();
    assert_eq!(editor.phase(), Phase::Validating);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(
        editor.validation_message().as_deref(),
        Some("Entry already exists")
    );
    assert_eq!(validator.calls()[0].full_path, "posts/taken.md");
    assert_eq!(
        handle_key(&editor, Key::Enter).await,
        Ok(KeyOutcome::Ignored)
    );
    assert_eq!(committer.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn validate_and_apply_before_save() {
    let committer = Arc::new(RecordingCommitter::new());
    let validator = Arc::new(
        ScriptedValidator::new()
            .rejecting("taken.md", "Entry already exists")
            .reply("free.md", Ok(None)),
    );
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let editor = editor("posts/a.md", "posts", &committer)
        .with_validator(validator.clone() as Arc<dyn Validator>)
        .with_pending_change_listener(Arc::new(move |changed: bool| sink.lock().push(changed)));

    editor.open().unwrap();
    editor.input("taken.md").await.unwrap();
    let rejected = editor.validate_and_apply().await.unwrap();
    assert_eq!(rejected.error(), Some("Entry already exists"));

    editor.input("free.md").await.unwrap();
    let accepted = editor.validate_and_apply().await.unwrap();
    assert!(accepted.is_valid());
    assert!(!editor.has_changed());
    assert_eq!(editor.location().filename, "free.md");
    assert_eq!(*changes.lock(), vec![true, true, false]);

    // Debounced checks were superseded by the immediate ones
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(validator.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn validate_and_apply_catches_syntax() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("posts/a.md", "posts", &committer).with_config(deferred());

    editor.open().unwrap();
    editor.input("what?.md").await.unwrap();
    let outcome = editor.validate_and_apply().await.unwrap();
    assert_eq!(
        outcome.error(),
        Some(r#"Filename contains invalid characters: < > : " | ? *"#)
    );
}

#[tokio::test(start_paused = true)]
async fn external_folder_change_is_picked_up() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("blog/2024/my-post.md", "blog", &committer);

    editor.sync_folder_path("2025").unwrap();
    editor.open().unwrap();
    editor.input("my-post.md").await.unwrap();
    editor.input("renamed.md").await.unwrap();

    assert_eq!(
        committer.calls().last().cloned(),
        Some(update("blog/2025/renamed.md", "renamed.md"))
    );
}

#[tokio::test(start_paused = true)]
async fn folder_sync_refused_while_committing() {
    let committer = Arc::new(RecordingCommitter::new().delayed(Duration::from_secs(1)));
    let editor = Arc::new(editor("posts/a.md", "posts", &committer).with_config(deferred()));

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    let pending = {
        let editor = Arc::clone(&editor);
        tokio::spawn(async move { editor.confirm().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(editor.status_text().as_deref(), Some("Updating path..."));
    assert_eq!(
        editor.sync_folder_path("other"),
        Err(DialogError::CommitInFlight)
    );
    assert!(pending.await.unwrap().unwrap().is_committed());
}

#[tokio::test(start_paused = true)]
async fn escape_cancels_edit() {
    let committer = Arc::new(RecordingCommitter::new());
    let editor = editor("posts/a.md", "posts", &committer).with_config(deferred());

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    assert!(editor.warning_text().is_some());

    assert_eq!(
        handle_key(&editor, Key::Escape).await,
        Ok(KeyOutcome::Cancelled)
    );
    assert_eq!(editor.phase(), Phase::Closed);
    assert_eq!(editor.warning_text(), None);
    assert!(editor.help_text().is_some());
    assert_eq!(committer.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_live_update_is_retried_on_confirm() {
    let committer = Arc::new(RecordingCommitter::new().failing_once("disk full"));
    let editor = editor("posts/a.md", "posts", &committer);

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    assert_eq!(editor.validation_message().as_deref(), Some("disk full"));
    assert!(editor.can_confirm());

    let outcome = editor.confirm().await.unwrap();
    assert_eq!(
        outcome,
        ConfirmOutcome::Committed(update("posts/b.md", "b.md"))
    );
    assert_eq!(committer.call_count(), 2);
    assert_eq!(editor.location().filename, "b.md");
}

#[tokio::test(start_paused = true)]
async fn failed_live_retry_keeps_baseline() {
    let committer = Arc::new(
        RecordingCommitter::new()
            .failing_once("disk full")
            .failing_once("disk full"),
    );
    let editor = editor("posts/a.md", "posts", &committer);

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    let outcome = editor.confirm().await.unwrap();
    assert_eq!(
        outcome,
        ConfirmOutcome::Failed(SessionError::CommitFailed("disk full".into()))
    );
    assert_eq!(editor.phase(), Phase::Editing);
    assert_eq!(editor.location().filename, "a.md");
    assert_eq!(committer.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn typing_refused_while_save_check_runs() {
    let committer = Arc::new(RecordingCommitter::new());
    let validator = Arc::new(ScriptedValidator::new().delayed("free.md", Duration::from_secs(1)));
    let editor = Arc::new(
        editor("posts/a.md", "posts", &committer)
            .with_config(deferred())
            .with_validator(validator.clone() as Arc<dyn Validator>),
    );

    editor.open().unwrap();
    editor.input("free.md").await.unwrap();
    let pending = {
        let editor = Arc::clone(&editor);
        tokio::spawn(async move { editor.validate_and_apply().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        editor.input("what?.md").await,
        Err(DialogError::ValidationInFlight)
    );
    assert_eq!(
        editor.validate_and_apply().await,
        Err(DialogError::ValidationInFlight)
    );
    assert!(!editor.can_confirm());
    assert!(editor.can_cancel());

    assert_eq!(pending.await.unwrap(), Ok(ApplyOutcome::Valid));
    assert_eq!(editor.input_value().as_deref(), Some("free.md"));
    assert_eq!(editor.location().filename, "free.md");
    assert_eq!(validator.call_count(), 1);
    editor.input("next.md").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn abandoned_save_check_unlocks_input() {
    let committer = Arc::new(RecordingCommitter::new());
    let validator = Arc::new(ScriptedValidator::new().delayed("free.md", Duration::from_secs(1)));
    let editor = editor("posts/a.md", "posts", &committer)
        .with_config(deferred())
        .with_validator(validator as Arc<dyn Validator>);

    editor.open().unwrap();
    editor.input("free.md").await.unwrap();
    let timed_out =
        tokio::time::timeout(Duration::from_millis(100), editor.validate_and_apply()).await;
    assert!(timed_out.is_err());

    assert_eq!(editor.phase(), Phase::Editing);
    assert_eq!(editor.location().filename, "a.md");
    editor.input("other.md").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_editor_cancels_pending_check() {
    let committer = Arc::new(RecordingCommitter::new());
    let validator = Arc::new(ScriptedValidator::new());
    let editor = editor("posts/a.md", "posts", &committer)
        .with_config(deferred())
        .with_validator(validator.clone() as Arc<dyn Validator>);

    editor.open().unwrap();
    editor.input("b.md").await.unwrap();
    assert_eq!(editor.phase(), Phase::Validating);
    drop(editor);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(validator.call_count(), 0);
    assert_eq!(committer.call_count(), 0);
}
