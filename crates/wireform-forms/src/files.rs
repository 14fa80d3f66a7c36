//! Multipart-style packaging of selected files.

use wireform_core::FileBlob;

/// A value stored in a [`FormDataBag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataValue {
	/// A plain text part.
	Text(String),
	/// A file part.
	File(FileBlob),
}

/// One keyed part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDataEntry {
	/// Part name.
	pub key: String,
	/// Part content.
	pub value: FormDataValue,
}

/// Ordered multi-map of parts, ready to hand to an upload request.
///
/// Keys may repeat; a multi-file input contributes one part per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDataBag {
	entries: Vec<FormDataEntry>,
}

impl FormDataBag {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a file part.
	pub fn append_file(&mut self, key: impl Into<String>, file: FileBlob) {
		self.entries.push(FormDataEntry {
			key: key.into(),
			value: FormDataValue::File(file),
		});
	}

	/// Appends a text part.
	pub fn append_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
		self.entries.push(FormDataEntry {
			key: key.into(),
			value: FormDataValue::Text(text.into()),
		});
	}

	/// The first part stored under `key`.
	pub fn get(&self, key: &str) -> Option<&FormDataValue> {
		self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
	}

	/// All parts stored under `key`, in insertion order.
	pub fn get_all(&self, key: &str) -> Vec<&FormDataValue> {
		self.entries
			.iter()
			.filter(|e| e.key == key)
			.map(|e| &e.value)
			.collect()
	}

	/// The files stored under `key`, in insertion order.
	pub fn files(&self, key: &str) -> Vec<&FileBlob> {
		self.get_all(key)
			.into_iter()
			.filter_map(|v| match v {
				FormDataValue::File(file) => Some(file),
				FormDataValue::Text(_) => None,
			})
			.collect()
	}

	/// Iterates all parts.
	pub fn iter(&self) -> impl Iterator<Item = &FormDataEntry> {
		self.entries.iter()
	}

	/// Number of parts.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when the bag has no parts.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Reads a blob as a `data:` URL, e.g. for an image preview.
pub async fn read_as_data_url(blob: &FileBlob) -> String {
	futures::future::ready(blob.to_data_url()).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_bag_keeps_repeated_keys_in_order() {
		let mut bag = FormDataBag::new();
		bag.append_file("file", FileBlob::new("a", "", &b"1"[..]));
		bag.append_text("note", "hi");
		bag.append_file("file", FileBlob::new("b", "", &b"2"[..]));

		let names: Vec<&str> = bag.files("file").iter().map(|f| f.name()).collect();
		assert_eq!(names, vec!["a", "b"]);
		assert_eq!(bag.get("note"), Some(&FormDataValue::Text("hi".into())));
		assert!(bag.files("note").is_empty());
		assert_eq!(bag.len(), 3);
	}

	#[rstest]
	#[tokio::test]
	async fn test_read_as_data_url() {
		let blob = FileBlob::new("dot.gif", "image/gif", &b"GIF"[..]);
		assert_eq!(read_as_data_url(&blob).await, "data:image/gif;base64,R0lG");
	}
}
