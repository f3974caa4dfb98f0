//! Pretty-printable reports for errors that point into parsed documents.
//!
//! ```rust
//! use apollo_codegen::diagnostic::ToDiagnostic;
//! use apollo_codegen::DocumentRegistry;
//! use apollo_codegen::Parser;
//!
//! let mut registry = DocumentRegistry::new();
//! let result = registry.parse_and_add(&mut Parser::new(), "query { a }", "anonymous.graphql");
//! if let Err(error) = result {
//!     // Display-formatting does not use colors, Debug-formatting does.
//!     let report = error.to_diagnostic(&registry.sources()).to_string();
//!     assert!(report.contains("anonymous.graphql"));
//! }
//! ```
use crate::error::CodegenError;
use crate::error::DiagnosticData;
use crate::FileId;
use crate::NodeLocation;
use crate::SourceFile;
use crate::SourceMap;
use ariadne::ColorGenerator;
use ariadne::ReportKind;
use std::fmt;
use std::io;
use std::ops::Range;
use std::sync::Arc;
use std::sync::OnceLock;

/// A pretty-printable diagnostic.
pub struct Diagnostic<T> {
    pub sources: SourceMap,
    pub error: T,
}

/// A report that can be printed to a CLI with colors and labeled lines of GraphQL source.
pub struct CliReport {
    sources: SourceMap,
    colors: ColorGenerator,
    report: ariadne::ReportBuilder<'static, MappedSpan>,
}

/// Indicate when to use ANSI colors for printing.
#[derive(Debug, Clone, Copy)]
pub enum Color {
    /// Do not use colors.
    Never,
    /// Use colors if stderr is a terminal.
    StderrIsTerminal,
}

pub trait ToDiagnostic {
    /// The main location for this error, if it has one
    fn location(&self) -> Option<NodeLocation>;

    /// Fill in the report with messages and source code labels.
    fn report(&self, report: &mut CliReport);

    /// Returns a pretty-printable diagnostic.
    ///
    /// Provide a source map containing the files the error may point into,
    /// such as [`DocumentRegistry::sources`][crate::DocumentRegistry::sources].
    fn to_diagnostic(self, sources: &SourceMap) -> Diagnostic<Self>
    where
        Self: Sized,
    {
        Diagnostic {
            sources: sources.clone(),
            error: self,
        }
    }
}

type MappedSpan = (FileId, Range<usize>);

/// Translate a byte-offset location into a char-offset location for use with ariadne.
fn map_span(sources: &SourceMap, location: NodeLocation) -> Option<MappedSpan> {
    let source = sources.get(&location.file_id())?;
    let mapped_source = source.mapped_source();
    let start = mapped_source.map_index(location.offset());
    let end = mapped_source.map_index(location.end_offset());
    Some((location.file_id(), start..end))
}

/// Provide a [`std::io::Write`] API for a [`std::fmt::Formatter`].
struct WriteToFormatter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl io::Write for WriteToFormatter<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = std::str::from_utf8(buf).map_err(|_| io::ErrorKind::Other)?;
        self.f.write_str(s).map_err(|_| io::ErrorKind::Other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CliReport {
    pub fn builder(sources: SourceMap, location: Option<NodeLocation>) -> Self {
        let (file_id, range) = location
            .and_then(|location| map_span(&sources, location))
            .unwrap_or((FileId::NONE, 0..0));
        Self {
            sources,
            colors: ColorGenerator::new(),
            report: ariadne::Report::build(ReportKind::Error, file_id, range.start),
        }
    }

    fn with_color(self, color: Color) -> Self {
        let enable_color = match color {
            Color::Never => false,
            // ariadne's `auto-color` feature checks whether stderr is a terminal
            Color::StderrIsTerminal => true,
        };
        let config = ariadne::Config::default().with_color(enable_color);
        Self {
            report: self.report.with_config(config),
            ..self
        }
    }

    pub fn with_message(&mut self, message: impl ToString) {
        self.report.set_message(message);
    }

    /// Set the help message for the report, usually a suggestion on how to fix the error.
    pub fn with_help(&mut self, help: impl ToString) {
        self.report.set_help(help);
    }

    /// Add a label at a given location. If the location is `None`, the message is discarded.
    pub fn with_label_opt(&mut self, location: Option<NodeLocation>, message: impl ToString) {
        if let Some(mapped_span) = location.and_then(|location| map_span(&self.sources, location)) {
            self.report.add_label(
                ariadne::Label::new(mapped_span)
                    .with_message(message)
                    .with_color(self.colors.next()),
            );
        }
    }

    /// Write the report to a [`Write`].
    ///
    /// [`Write`]: std::io::Write
    pub fn write(self, w: impl std::io::Write) -> std::io::Result<()> {
        let report = self.report.finish();
        report.write(Cache(&self.sources), w)
    }

    /// Write the report to a [`fmt::Formatter`].
    pub fn fmt(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(WriteToFormatter { f }).map_err(|_| fmt::Error)
    }
}

struct Cache<'a>(&'a SourceMap);

impl ariadne::Cache<FileId> for Cache<'_> {
    fn fetch(&mut self, file_id: &FileId) -> Result<&ariadne::Source, Box<dyn fmt::Debug + '_>> {
        struct NotFound(FileId);
        impl fmt::Debug for NotFound {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "source file not found: {:?}", self.0)
            }
        }
        if let Some(source_file) = self.0.get(file_id) {
            Ok(source_file.ariadne())
        } else if *file_id == FileId::NONE {
            static EMPTY: OnceLock<ariadne::Source> = OnceLock::new();
            Ok(EMPTY.get_or_init(|| ariadne::Source::from("")))
        } else {
            Err(Box::new(NotFound(*file_id)))
        }
    }

    fn display<'a>(&self, file_id: &'a FileId) -> Option<Box<dyn fmt::Display + 'a>> {
        if *file_id != FileId::NONE {
            struct Path(Arc<SourceFile>);
            impl fmt::Display for Path {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.path().display().fmt(f)
                }
            }
            let source_file = self.0.get(file_id)?;
            Some(Box::new(Path(source_file.clone())))
        } else {
            struct NoSourceFile;
            impl fmt::Display for NoSourceFile {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("(no source file)")
                }
            }
            Some(Box::new(NoSourceFile))
        }
    }
}

impl ToDiagnostic for CodegenError {
    fn location(&self) -> Option<NodeLocation> {
        CodegenError::location(self)
    }

    fn report(&self, report: &mut CliReport) {
        match self {
            CodegenError::Parsing { message, .. } => {
                report.with_message("syntax error");
                report.with_label_opt(self.location(), message);
            }
            CodegenError::Validation(error) => {
                report.with_message(error);
                report.with_label_opt(error.location, label(&error.data));
                if let Some(help) = help(&error.data) {
                    report.with_help(help);
                }
            }
            CodegenError::Configuration { .. } | CodegenError::CodeGeneration(_) => {
                report.with_message(self);
            }
        }
    }
}

fn label(data: &DiagnosticData) -> String {
    match data {
        DiagnosticData::AnonymousOperation { .. } => "this operation has no name".to_owned(),
        DiagnosticData::TypeSystemDefinition { .. } => {
            "not an operation or a fragment".to_owned()
        }
        DiagnosticData::OperationNameCollision { name }
        | DiagnosticData::FragmentNameCollision { name } => format!("`{name}` defined again here"),
        DiagnosticData::UndefinedRootOperation { operation_type, .. } => {
            format!("{operation_type} operations are not supported by this schema")
        }
        DiagnosticData::UndefinedTypeCondition { type_name, .. }
        | DiagnosticData::UndefinedInlineTypeCondition { type_name } => {
            format!("`{type_name}` is not an object, interface, or union type")
        }
        DiagnosticData::UndefinedField {
            type_name,
            field_name,
        } => format!("`{field_name}` is not a field of `{type_name}`"),
        DiagnosticData::UndefinedFragment { name } => format!("fragment `{name}` is not defined"),
        DiagnosticData::ImpossibleFragmentSpread { parent_type, .. }
        | DiagnosticData::ImpossibleInlineFragment { parent_type, .. } => {
            format!("can never apply to `{parent_type}`")
        }
        DiagnosticData::SubselectionOnLeafType { type_name, .. } => {
            format!("`{type_name}` is a leaf type")
        }
        DiagnosticData::InvalidNumber { .. } => "not a finite number".to_owned(),
        DiagnosticData::VariableInConstValue { .. } => "variable in a constant value".to_owned(),
    }
}

fn help(data: &DiagnosticData) -> Option<&'static str> {
    match data {
        DiagnosticData::AnonymousOperation { .. } => {
            Some("name the operation, generated types are named after it")
        }
        DiagnosticData::OperationNameCollision { .. }
        | DiagnosticData::FragmentNameCollision { .. } => {
            Some("names must be unique across every document of a schema")
        }
        DiagnosticData::TypeSystemDefinition { .. } => {
            Some("the schema is read from introspection, remove this definition")
        }
        DiagnosticData::SubselectionOnLeafType { .. } => Some("remove the selection set"),
        _ => None,
    }
}

impl<T> std::ops::Deref for Diagnostic<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.error
    }
}

impl<T: std::error::Error + ToDiagnostic> std::error::Error for Diagnostic<T> {}

impl<T: ToDiagnostic> Diagnostic<T> {
    /// Get the 1-based line and column where this diagnostic was raised.
    pub fn get_line_column(&self) -> Option<(usize, usize)> {
        let location = self.error.location()?;
        let source = self.sources.get(&location.file_id())?;
        let (line, column) = source.get_line_column(location.offset())?;
        Some((line + 1, column + 1))
    }

    /// Produce the diagnostic report, optionally with colors for the CLI.
    fn report(&self, color: Color) -> CliReport {
        let mut report =
            CliReport::builder(self.sources.clone(), self.error.location()).with_color(color);
        self.error.report(&mut report);
        report
    }

    /// Pretty-print the diagnostic to a [`Write`].
    ///
    /// [`Write`]: std::io::Write
    pub fn write(&self, color: Color, w: impl std::io::Write) -> std::io::Result<()> {
        self.report(color).write(w)
    }
}

impl<T: ToDiagnostic> fmt::Debug for Diagnostic<T> {
    /// Pretty-format the diagnostic, with colors for the CLI.
    ///
    /// To output *without* colors, format with `Display`: `format!("{diagnostic}")`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report(Color::StderrIsTerminal).fmt(f)
    }
}

impl<T: ToDiagnostic> fmt::Display for Diagnostic<T> {
    /// Pretty-format the diagnostic without colors.
    ///
    /// To output *with* colors, format with `Debug`: `eprintln!("{diagnostic:?}")`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.report(Color::Never).fmt(f)
    }
}
