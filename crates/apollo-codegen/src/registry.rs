//! The set of operations and fragments to generate code for, and its compiled output.

use crate::ast;
use crate::error::CodegenError;
use crate::error::DiagnosticData;
use crate::error::ValidationError;
use crate::error::Warning;
use crate::ir::lower;
use crate::ir::lower::FragmentMap;
use crate::ir::FragmentDefinitionIR;
use crate::ir::LiftedDependencies;
use crate::ir::OperationDefinitionIR;
use crate::FileId;
use crate::Name;
use crate::Node;
use crate::Parser;
use crate::SourceFile;
use crate::SourceMap;
use crate::TypeCatalog;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;

/// Named operations and fragments collected from any number of documents.
///
/// Names are unique across the whole registry, regardless of which document
/// a definition came from.
#[derive(Debug, Clone, Default)]
pub struct DocumentRegistry {
    sources: IndexMap<FileId, Arc<SourceFile>>,
    operations: IndexMap<Name, Node<ast::OperationDefinition>>,
    fragments: FragmentMap,
}

/// Everything an emitter needs for one schema. Read-only once compiled.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub catalog: TypeCatalog,
    /// Documents the IR was lowered from, for rendering diagnostics
    pub sources: SourceMap,
    pub operations: IndexMap<Name, Node<OperationDefinitionIR>>,
    pub fragments: IndexMap<Name, Node<FragmentDefinitionIR>>,
    /// Enums and input objects reachable from any operation or fragment
    pub dependencies: LiftedDependencies,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every operation and fragment of `document`.
    ///
    /// Fails without adding any definition if the document contains type system definitions,
    /// if an operation is anonymous, or if a name is already taken, by this registry or by
    /// another definition of the same document.
    /// The document is kept in [`sources`][Self::sources] either way, so that the error can be rendered.
    pub fn add_document(&mut self, document: ast::Document) -> Result<(), CodegenError> {
        self.sources.extend(
            document
                .sources
                .iter()
                .map(|(id, source)| (*id, source.clone())),
        );
        let (operations, fragments) = self.new_definitions(&document)?;
        self.operations.extend(operations);
        self.fragments.extend(fragments);
        Ok(())
    }

    fn new_definitions(
        &self,
        document: &ast::Document,
    ) -> Result<(IndexMap<Name, Node<ast::OperationDefinition>>, FragmentMap), CodegenError> {
        let mut operations = IndexMap::new();
        let mut fragments = IndexMap::new();
        for definition in &document.definitions {
            match definition {
                ast::Definition::OperationDefinition(operation) => {
                    let Some(name) = &operation.name else {
                        return Err(ValidationError::new(
                            operation.location(),
                            DiagnosticData::AnonymousOperation {
                                operation_type: operation.operation_type,
                            },
                        )
                        .into());
                    };
                    if self.operations.contains_key(name)
                        || operations
                            .insert(name.clone(), operation.clone())
                            .is_some()
                    {
                        return Err(ValidationError::new(
                            operation.location(),
                            DiagnosticData::OperationNameCollision { name: name.clone() },
                        )
                        .into());
                    }
                }
                ast::Definition::FragmentDefinition(fragment) => {
                    let name = &fragment.name;
                    if self.fragments.contains_key(name)
                        || fragments.insert(name.clone(), fragment.clone()).is_some()
                    {
                        return Err(ValidationError::new(
                            fragment.location(),
                            DiagnosticData::FragmentNameCollision { name: name.clone() },
                        )
                        .into());
                    }
                }
                ast::Definition::TypeSystemDefinition(definition) => {
                    return Err(ValidationError::new(
                        definition.location(),
                        DiagnosticData::TypeSystemDefinition {
                            describe: definition.describe,
                        },
                    )
                    .into());
                }
            }
        }
        Ok((operations, fragments))
    }

    /// Parses `source_text` with `parser` and adds the resulting document.
    ///
    /// The text is kept in [`sources`][Self::sources] even when it fails to parse.
    pub fn parse_and_add(
        &mut self,
        parser: &mut Parser,
        source_text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), CodegenError> {
        match parser.parse_document(source_text, path) {
            Ok(document) => self.add_document(document),
            Err(error) => {
                if let CodegenError::Parsing { sources, .. } = &error {
                    self.sources
                        .extend(sources.iter().map(|(id, source)| (*id, source.clone())));
                }
                Err(error)
            }
        }
    }

    /// Documents added so far
    pub fn sources(&self) -> SourceMap {
        Arc::new(self.sources.clone())
    }

    pub fn operations(&self) -> &IndexMap<Name, Node<ast::OperationDefinition>> {
        &self.operations
    }

    pub fn fragments(&self) -> &IndexMap<Name, Node<ast::FragmentDefinition>> {
        &self.fragments
    }

    /// Lowers every operation, then every fragment, in the order they were added.
    ///
    /// The first error aborts compilation: no partial output is produced.
    pub fn compile(&self, catalog: &TypeCatalog) -> Result<CompiledSchema, CodegenError> {
        let mut dependencies = LiftedDependencies::default();

        let mut operations = IndexMap::with_capacity(self.operations.len());
        for (name, operation) in &self.operations {
            tracing::debug!(operation = %name, "lowering operation");
            let ir = lower::lower_operation(catalog, &self.fragments, operation)?;
            dependencies.extend(ir.lifted.clone());
            operations.insert(name.clone(), ir);
        }

        let mut fragments = IndexMap::with_capacity(self.fragments.len());
        for (name, fragment) in &self.fragments {
            tracing::debug!(fragment = %name, "lowering fragment");
            let ir = lower::lower_fragment(catalog, &self.fragments, fragment)?;
            dependencies.extend(ir.lifted.clone());
            fragments.insert(name.clone(), ir);
        }

        tracing::info!(
            operations = operations.len(),
            fragments = fragments.len(),
            enums = dependencies.enums.len(),
            input_objects = dependencies.input_objects.len(),
            "compiled documents"
        );
        Ok(CompiledSchema {
            catalog: catalog.clone(),
            sources: self.sources(),
            operations,
            fragments,
            dependencies,
        })
    }
}

impl CompiledSchema {
    /// Non-fatal problems found while building the catalog
    pub fn warnings(&self) -> &[Warning] {
        self.catalog.warnings()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CompiledSchema>();
    assert_sync::<CompiledSchema>();
};
