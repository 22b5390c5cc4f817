//! Dark mode document side effect.
//!
//! Applies or removes the `dark` class on the `<html>` element so the
//! stylesheet's class-based dark variants take effect. The preference itself
//! lives in the session store; this module only touches the document.
//!
//! TRADE-OFFS
//! ==========
//! Outside the browser there is no document, so `apply` is a no-op and the
//! session flag alone carries the preference.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

/// Class toggled on the root element.
pub const DARK_CLASS: &str = "dark";

/// Apply or remove the `dark` class on the `<html>` element.
pub fn apply(enabled: bool) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let class_list = el.class_list();
            let result = if enabled {
                class_list.add_1(DARK_CLASS)
            } else {
                class_list.remove_1(DARK_CLASS)
            };
            if result.is_err() {
                log::warn!("failed to update root element class list");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = enabled;
    }
}

