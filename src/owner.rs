//! Resource owner value object derived from provider response payloads.

// self
use crate::{_prelude::*, response::ResponseData};

/// Resource owner built from a raw response payload plus the provider's subject
/// identifier field name.
///
/// Construction is pure and never fails; when the identifier field is absent from the
/// payload, [`id`](Self::id) resolves to `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceOwner {
	data: ResponseData,
	id_field: String,
}
impl ResourceOwner {
	/// Creates a resource owner from the payload and identifier field name.
	pub fn new(data: ResponseData, id_field: impl Into<String>) -> Self {
		Self { data, id_field: id_field.into() }
	}

	/// Subject identifier, when the payload carries one as a string.
	pub fn id(&self) -> Option<&str> {
		self.data.get(&self.id_field).and_then(Value::as_str)
	}

	/// Looks up an arbitrary payload field.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Borrows the raw payload.
	pub fn data(&self) -> &ResponseData {
		&self.data
	}

	/// Consumes the owner, returning the raw payload.
	pub fn into_data(self) -> ResponseData {
		self.data
	}
}
