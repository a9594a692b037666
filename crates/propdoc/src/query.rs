//! Static type-query interface
//!
//! The prop extractor never looks at TypeScript syntax directly. It asks a
//! [`TypeQuery`] for the declarations of a file and for the properties of
//! a declared type. [`crate::project::SwcProject`] answers those questions
//! from deno_ast syntax trees; tests use [`crate::test::MockTypeQuery`].

use crate::decl::Declaration;
use crate::diagnostics::Result;
use crate::js_doc::JsDoc;
use std::path::Path;

/// A property of a declared type, as reported by the type-query engine
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySymbol {
    /// Property name
    pub name: String,
    /// JSDoc blocks attached to the property, in source order
    pub docs: Vec<JsDoc>,
    /// Declared type rendered as display text
    pub type_text: String,
}

impl PropertySymbol {
    /// Create a property symbol without docs
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Vec::new(),
            type_text: type_text.into(),
        }
    }

    /// Attach a doc block
    pub fn with_doc(mut self, doc: JsDoc) -> Self {
        self.docs.push(doc);
        self
    }

    /// The trailing doc block, if any
    pub fn doc(&self) -> Option<&JsDoc> {
        self.docs.last()
    }

    /// Whether any attached doc block carries `@private`
    pub fn is_private(&self) -> bool {
        self.docs.iter().any(JsDoc::is_private)
    }
}

/// Symbol/type lookup over loaded source files
pub trait TypeQuery {
    /// Top-level declarations of a loaded file, in source order
    fn declarations(&self, file: &Path) -> Result<Vec<Declaration>>;

    /// Properties of the declared type, in declaration order
    fn properties(&self, decl: &Declaration) -> Result<Vec<PropertySymbol>>;
}
