//! Browser side of saving and loading: a Blob download and a FileReader upload.

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, File, FileReader, HtmlAnchorElement, Url};

use crate::error::{ExportError, ImportError};

fn download_error(err: JsValue) -> ExportError {
	ExportError::Download(format!("{err:?}"))
}

/// Offers `contents` to the user as a JSON file download.
pub fn download_json(file_name: &str, contents: &str) -> Result<(), ExportError> {
	let parts = js_sys::Array::of1(&JsValue::from_str(contents));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(download_error)?;
	let url = Url::create_object_url_with_blob(&blob).map_err(download_error)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| ExportError::Download("no document".into()))?;
	let link: HtmlAnchorElement = document
		.create_element("a")
		.map_err(download_error)?
		.dyn_into()
		.map_err(|_| ExportError::Download("could not create link".into()))?;
	link.set_href(&url);
	link.set_download(file_name);
	link.click();

	if let Err(err) = Url::revoke_object_url(&url) {
		warn!("could not revoke download url: {err:?}");
	}
	Ok(())
}

/// Reads `file` as UTF-8 text and hands the result to `on_done` once loading ends.
///
/// An error returned here means the read never started and `on_done` will not run.
pub fn read_text(
	file: &File,
	on_done: impl FnOnce(Result<String, ImportError>) + 'static,
) -> Result<(), ImportError> {
	let reader = FileReader::new().map_err(|err| ImportError::Read(format!("{err:?}")))?;
	let finished = reader.clone();
	let on_load_end = Closure::once_into_js(move || {
		let text = finished
			.result()
			.ok()
			.and_then(|value| value.as_string())
			.ok_or_else(|| ImportError::Read("file could not be read as text".into()));
		on_done(text);
	});
	reader.set_onloadend(Some(on_load_end.unchecked_ref()));
	reader
		.read_as_text(file)
		.map_err(|err| ImportError::Read(format!("{err:?}")))
}
