use crate::modules::store::FilePayload;

/// A documentation file to attach to a product, with its display name
#[derive(Debug, Clone)]
pub struct NewDocumentation {
    pub name: String,
    pub file: FilePayload,
}

impl NewDocumentation {
    pub fn new(name: impl Into<String>, file: FilePayload) -> Self {
        Self {
            name: name.into(),
            file,
        }
    }
}
