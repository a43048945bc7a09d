//! Save a generated image through a temporary anchor element.

use crate::state::workflow::DownloadLink;

/// Click a detached `<a download>` pointing at the result.
///
/// # Errors
///
/// Returns a message if the document is unavailable or the anchor cannot be
/// created, and always outside the browser.
pub fn trigger_download(link: &DownloadLink) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "document unavailable".to_owned())?;
        let body = document.body().ok_or_else(|| "document has no body".to_owned())?;
        let anchor = document
            .create_element("a")
            .map_err(|e| format!("create anchor: {e:?}"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "created element is not an anchor".to_owned())?;
        anchor.set_href(&link.href);
        anchor.set_download(&link.filename);
        body.append_child(&anchor).map_err(|e| format!("attach anchor: {e:?}"))?;
        anchor.click();
        anchor.remove();
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(format!("cannot save {} outside the browser", link.filename))
    }
}
