//! File payloads selected through file inputs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

/// A file chosen by the user.
///
/// The content is reference counted, so cloning a blob never copies bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
	name: String,
	mime: String,
	bytes: Bytes,
}

impl FileBlob {
	/// Creates a blob from its name, MIME type and content.
	pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
		Self {
			name: name.into(),
			mime: mime.into(),
			bytes: bytes.into(),
		}
	}

	/// File name as reported by the browser.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// MIME type; empty when unknown.
	pub fn mime(&self) -> &str {
		&self.mime
	}

	/// Size in bytes.
	pub fn size(&self) -> usize {
		self.bytes.len()
	}

	/// File content.
	pub fn bytes(&self) -> &Bytes {
		&self.bytes
	}

	/// Encodes the content as a `data:` URL, e.g. for image previews.
	pub fn to_data_url(&self) -> String {
		let mime = if self.mime.is_empty() {
			"application/octet-stream"
		} else {
			&self.mime
		};
		format!("data:{};base64,{}", mime, STANDARD.encode(&self.bytes))
	}
}

/// The files selected in one file input, in selection order.
pub type FileList = Vec<FileBlob>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_data_url() {
		let blob = FileBlob::new("a.txt", "text/plain", &b"hi"[..]);
		assert_eq!(blob.to_data_url(), "data:text/plain;base64,aGk=");
		assert_eq!(blob.size(), 2);
	}

	#[rstest]
	fn test_data_url_without_mime() {
		let blob = FileBlob::new("raw", "", Bytes::from_static(&[0xff]));
		assert_eq!(blob.to_data_url(), "data:application/octet-stream;base64,/w==");
	}
}
