use crate::ast::Document;
use crate::error::CodegenError;
use crate::FileId;
use crate::NodeLocation;
use crate::SourceFile;
use crate::SourceMap;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

/// Documents at least this long are truncated in parse errors
const PREVIEW_THRESHOLD: usize = 100;
const PREVIEW_LENGTH: usize = 5000;

/// Configuration for parsing an input string as a GraphQL executable document
#[derive(Default, Debug, Clone)]
pub struct Parser {
    recursion_limit: Option<usize>,
    token_limit: Option<usize>,
    recursion_reached: usize,
    tokens_reached: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the recursion to use while parsing.
    pub fn recursion_limit(mut self, value: usize) -> Self {
        self.recursion_limit = Some(value);
        self
    }

    /// Configure the limit on the number of tokens to parse.
    /// If an input document is too big, parsing will be aborted.
    /// By default, there is no limit.
    pub fn token_limit(mut self, value: usize) -> Self {
        self.token_limit = Some(value);
        self
    }

    /// Parse the given source text into an executable document.
    ///
    /// `path` is the filesystem path (or arbitrary string) used in errors
    /// to identify this source file to users.
    ///
    /// Any syntax error fails the whole document with [`CodegenError::Parsing`].
    pub fn parse_document(
        &mut self,
        source_text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Document, CodegenError> {
        let source_text = source_text.into();
        let path = path.as_ref().to_owned();
        let file_id = FileId::new();

        let mut parser = apollo_parser::Parser::new(&source_text);
        if let Some(value) = self.recursion_limit {
            parser = parser.recursion_limit(value)
        }
        if let Some(value) = self.token_limit {
            parser = parser.token_limit(value)
        }
        let tree = parser.parse();
        self.recursion_reached = tree.recursion_limit().high;
        self.tokens_reached = tree.token_limit().high;

        let mut sources = IndexMap::new();
        sources.insert(file_id, Arc::new(SourceFile::new(path.clone(), source_text)));
        let sources: SourceMap = Arc::new(sources);

        let mut errors = tree.errors().peekable();
        if let Some(first) = errors.peek() {
            let location = NodeLocation::at(file_id, first.index(), first.data().len());
            let message = errors
                .map(|error| error.message().to_owned())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(CodegenError::Parsing {
                preview: preview(&sources[&file_id].source_text),
                path,
                message,
                location: Some(location),
                sources,
            });
        }

        Ok(Document::from_cst(tree.document(), file_id, sources))
    }

    /// Get the maximum level of recursion reached during the last call to a parsing method.
    pub fn recursion_reached(&self) -> usize {
        self.recursion_reached
    }

    /// Get the maximum number of tokens reached during the last call to a parsing method.
    pub fn tokens_reached(&self) -> usize {
        self.tokens_reached
    }
}

impl Document {
    /// Parse `source_text` with the default parser configuration.
    ///
    /// `path` is the filesystem path (or arbitrary string) used in errors
    /// to identify this source file to users.
    pub fn parse(
        source_text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, CodegenError> {
        Parser::new().parse_document(source_text, path)
    }
}

/// The document text quoted in parse errors, truncated when long
fn preview(source_text: &str) -> String {
    if source_text.chars().count() < PREVIEW_THRESHOLD {
        return source_text.to_owned();
    }
    let mut preview: String = source_text.chars().take(PREVIEW_LENGTH).collect();
    preview.push_str(" <redacted...>");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn short_documents_are_quoted_whole() {
        assert_eq!(preview("query Q {"), "query Q {");
    }

    #[test]
    fn long_documents_are_redacted() {
        let text = "a".repeat(120);
        assert_eq!(preview(&text), format!("{text} <redacted...>"));

        let text = "b".repeat(6000);
        let preview = preview(&text);
        assert!(preview.ends_with(" <redacted...>"));
        assert_eq!(preview.chars().filter(|c| *c == 'b').count(), PREVIEW_LENGTH);
    }

    #[test]
    fn syntax_errors_fail_the_document() {
        let err = Document::parse("query Q { hero { name }", "broken.graphql").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parsing);
        assert!(err.location().is_some());
    }

    #[test]
    fn limits_are_forwarded() {
        let mut parser = Parser::new().recursion_limit(2);
        let err = parser
            .parse_document("query Q { a { b { c { d } } } }", "deep.graphql")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parsing);

        let mut parser = Parser::new();
        let doc = parser
            .parse_document("query Q { a { b } } fragment F on A { b }", "ok.graphql")
            .unwrap();
        assert_eq!(doc.operations().count(), 1);
        assert_eq!(doc.fragments().count(), 1);
        assert!(parser.tokens_reached() > 0);
    }
}
