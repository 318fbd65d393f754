// One-shot CLI edit tests
// Author: kelexine (https://github.com/kelexine)

mod common;

use common::{png_bytes, ScriptedEditor, PNG_B64};
use nano_banana_editor::cli::run_edit;
use nano_banana_editor::codec::MAX_UPLOAD_BYTES;
use nano_banana_editor::error::EditorError;
use nano_banana_editor::session::SessionController;

#[tokio::test]
async fn test_run_edit_chains_prompts_and_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("edited.png");
    std::fs::write(&input, png_bytes()).unwrap();

    let editor = ScriptedEditor::new();
    editor.push_ok("SECOND_TO_LAST");
    editor.push_ok(PNG_B64);
    let controller = SessionController::new(editor.clone(), MAX_UPLOAD_BYTES);

    let prompts = vec![
        "add a hat".to_string(),
        "   ".to_string(),
        "now make it black and white".to_string(),
    ];
    let written = run_edit(&controller, &input, &prompts, Some(output.as_path()))
        .await
        .unwrap();

    assert_eq!(written, output);
    assert_eq!(std::fs::read(&output).unwrap(), png_bytes());

    let calls = editor.calls();
    assert_eq!(calls.len(), 2);
    // Type sniffed from the file's magic bytes
    assert_eq!(calls[0].0.media_type, "image/png");
    assert_eq!(calls[1].0.data, "SECOND_TO_LAST");
}

#[tokio::test]
async fn test_run_edit_rejects_non_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "just some text, definitely not a picture").unwrap();

    let editor = ScriptedEditor::new();
    let controller = SessionController::new(editor.clone(), MAX_UPLOAD_BYTES);

    let result = run_edit(&controller, &input, &["add a hat".to_string()], None).await;
    assert!(matches!(result, Err(EditorError::InvalidType(_))));
    assert!(editor.calls().is_empty());
}

#[tokio::test]
async fn test_run_edit_stops_on_refusal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("edited.png");
    std::fs::write(&input, png_bytes()).unwrap();

    let editor = ScriptedEditor::new();
    editor.push_err(EditorError::TextOnlyRefusal("No.".to_string()));
    let controller = SessionController::new(editor.clone(), MAX_UPLOAD_BYTES);

    let prompts = vec!["add a hat".to_string(), "add a scarf".to_string()];
    let result = run_edit(&controller, &input, &prompts, Some(output.as_path())).await;

    assert!(matches!(result, Err(EditorError::TextOnlyRefusal(_))));
    assert_eq!(editor.calls().len(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_run_edit_requires_a_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    std::fs::write(&input, png_bytes()).unwrap();

    let controller = SessionController::new(ScriptedEditor::new(), MAX_UPLOAD_BYTES);
    let result = run_edit(&controller, &input, &["  ".to_string()], None).await;
    assert!(matches!(result, Err(EditorError::InvalidRequest(_))));
}
