//! Clipboard access for copying the quote reference.

use arboard::Clipboard;

/// Copies text to the system clipboard.
///
/// Returns Ok(()) on success, or an error message on failure.
pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;
    clipboard
        .set_text(text)
        .map_err(|e| format!("Failed to copy to clipboard: {}", e))
}
