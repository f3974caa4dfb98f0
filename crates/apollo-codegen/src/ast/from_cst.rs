use crate::ast;
use crate::ast::Document;
use crate::ty::WrappedType;
use crate::FileId;
use crate::Name;
use crate::Node;
use crate::NodeLocation;
use crate::SourceMap;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::SyntaxNode;
use apollo_parser::S;

impl Document {
    pub(crate) fn from_cst(document: cst::Document, file_id: FileId, sources: SourceMap) -> Self {
        Self {
            sources,
            definitions: document
                .definitions()
                .filter_map(|def| def.convert(file_id))
                .collect(),
        }
    }
}

/// Similar to `TryFrom`, but with an `Option` return type because the CST uses Option a lot.
trait Convert {
    type Target;
    fn convert(&self, file_id: FileId) -> Option<Self::Target>;
}

fn with_location<T>(file_id: FileId, syntax_node: &SyntaxNode, node: T) -> Node<T> {
    Node::new_parsed(node, NodeLocation::new(file_id, syntax_node))
}

/// Convert and collect, silently skipping entries with conversion errors
/// as they have corresponding parse errors in `SyntaxTree::errors`
#[inline]
fn collect<CstType, AstType>(
    file_id: FileId,
    iter: impl IntoIterator<Item = CstType>,
) -> Vec<Node<AstType>>
where
    CstType: CstNode + Convert<Target = AstType>,
{
    iter.into_iter()
        .filter_map(|value| {
            Some(with_location(
                file_id,
                value.syntax(),
                value.convert(file_id)?,
            ))
        })
        .collect()
}

#[inline]
fn collect_opt<CstType1, CstType2, AstType, F, I>(
    file_id: FileId,
    opt: Option<CstType1>,
    convert: F,
) -> Vec<Node<AstType>>
where
    F: FnOnce(CstType1) -> I,
    I: IntoIterator<Item = CstType2>,
    CstType2: CstNode + Convert<Target = AstType>,
{
    if let Some(cst) = opt {
        collect(file_id, convert(cst))
    } else {
        Vec::new()
    }
}

fn directives(file_id: FileId, cst: Option<cst::Directives>) -> ast::DirectiveList {
    ast::DirectiveList(collect_opt(file_id, cst, |x| x.directives()))
}

impl<T: Convert> Convert for Option<T> {
    type Target = Option<T::Target>;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(if let Some(inner) = self {
            Some(inner.convert(file_id)?)
        } else {
            None
        })
    }
}

impl Convert for cst::Definition {
    type Target = ast::Definition;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        use ast::Definition as A;
        use cst::Definition as C;
        match self {
            C::OperationDefinition(def) => Some(A::OperationDefinition(with_location(
                file_id,
                def.syntax(),
                def.convert(file_id)?,
            ))),
            C::FragmentDefinition(def) => Some(A::FragmentDefinition(with_location(
                file_id,
                def.syntax(),
                def.convert(file_id)?,
            ))),
            _ => Some(A::TypeSystemDefinition(with_location(
                file_id,
                self.syntax(),
                ast::TypeSystemDefinition {
                    describe: describe_type_system_definition(self),
                },
            ))),
        }
    }
}

fn describe_type_system_definition(definition: &cst::Definition) -> &'static str {
    use cst::Definition as C;
    match definition {
        C::OperationDefinition(_) => "an operation definition",
        C::FragmentDefinition(_) => "a fragment definition",
        C::DirectiveDefinition(_) => "a directive definition",
        C::SchemaDefinition(_) => "a schema definition",
        C::ScalarTypeDefinition(_) => "a scalar type definition",
        C::ObjectTypeDefinition(_) => "an object type definition",
        C::InterfaceTypeDefinition(_) => "an interface type definition",
        C::UnionTypeDefinition(_) => "a union type definition",
        C::EnumTypeDefinition(_) => "an enum type definition",
        C::InputObjectTypeDefinition(_) => "an input object type definition",
        C::SchemaExtension(_) => "a schema extension",
        C::ScalarTypeExtension(_) => "a scalar type extension",
        C::ObjectTypeExtension(_) => "an object type extension",
        C::InterfaceTypeExtension(_) => "an interface type extension",
        C::UnionTypeExtension(_) => "a union type extension",
        C::EnumTypeExtension(_) => "an enum type extension",
        C::InputObjectTypeExtension(_) => "an input object type extension",
    }
}

impl Convert for cst::OperationDefinition {
    type Target = ast::OperationDefinition;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        let operation_type = if let Some(ty) = self.operation_type() {
            ty.convert(file_id)?
        } else {
            ast::OperationType::Query
        };
        Some(Self::Target {
            operation_type,
            name: self.name().convert(file_id)?,
            variables: collect_opt(file_id, self.variable_definitions(), |x| {
                x.variable_definitions()
            }),
            directives: directives(file_id, self.directives()),
            selection_set: self.selection_set()?.convert(file_id)?,
        })
    }
}

impl Convert for cst::FragmentDefinition {
    type Target = ast::FragmentDefinition;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(Self::Target {
            name: self.fragment_name()?.name()?.convert(file_id)?,
            type_condition: self.type_condition()?.convert(file_id)?,
            directives: directives(file_id, self.directives()),
            selection_set: self.selection_set().convert(file_id)??,
        })
    }
}

impl Convert for cst::TypeCondition {
    type Target = ast::NamedType;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        self.named_type()?.name()?.convert(file_id)
    }
}

impl Convert for cst::OperationType {
    type Target = ast::OperationType;

    fn convert(&self, _file_id: FileId) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![query] => Some(ast::OperationType::Query),
            S![mutation] => Some(ast::OperationType::Mutation),
            S![subscription] => Some(ast::OperationType::Subscription),
            _ => None,
        }
    }
}

impl Convert for cst::VariableDefinition {
    type Target = ast::VariableDefinition;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        let default_value = if let Some(default) = self.default_value() {
            let value = default.value()?;
            Some(with_location(
                file_id,
                value.syntax(),
                value.convert(file_id)?,
            ))
        } else {
            None
        };
        let ty = &self.ty()?;
        Some(Self::Target {
            name: self.variable()?.name()?.convert(file_id)?,
            ty: with_location(file_id, ty.syntax(), ty.convert(file_id)?),
            default_value,
            directives: directives(file_id, self.directives()),
        })
    }
}

impl Convert for cst::Type {
    type Target = WrappedType;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        use cst::Type as C;
        match self {
            C::NamedType(name) => Some(WrappedType::Named(name.name()?.convert(file_id)?)),
            C::ListType(inner) => Some(inner.ty()?.convert(file_id)?.list()),
            C::NonNullType(inner) => {
                if let Some(named) = inner.named_type() {
                    Some(WrappedType::Named(named.name()?.convert(file_id)?).non_null())
                } else if let Some(list) = inner.list_type() {
                    Some(list.ty()?.convert(file_id)?.list().non_null())
                } else {
                    None
                }
            }
        }
    }
}

impl Convert for cst::Argument {
    type Target = ast::Argument;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        let name = self.name()?.convert(file_id)?;
        let value = self.value()?;
        let value = with_location(file_id, value.syntax(), value.convert(file_id)?);
        Some(ast::Argument { name, value })
    }
}

impl Convert for cst::Directive {
    type Target = ast::Directive;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(Self::Target {
            name: self.name()?.convert(file_id)?,
            arguments: collect_opt(file_id, self.arguments(), |x| x.arguments()),
        })
    }
}

impl Convert for cst::SelectionSet {
    type Target = Vec<ast::Selection>;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(
            self.selections()
                .filter_map(|selection| selection.convert(file_id))
                .collect(),
        )
    }
}

impl Convert for cst::Selection {
    type Target = ast::Selection;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        use ast::Selection as A;
        use cst::Selection as C;

        Some(match self {
            C::Field(x) => A::Field(with_location(file_id, x.syntax(), x.convert(file_id)?)),
            C::FragmentSpread(x) => {
                A::FragmentSpread(with_location(file_id, x.syntax(), x.convert(file_id)?))
            }
            C::InlineFragment(x) => {
                A::InlineFragment(with_location(file_id, x.syntax(), x.convert(file_id)?))
            }
        })
    }
}

impl Convert for cst::Field {
    type Target = ast::Field;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(Self::Target {
            alias: self.alias().convert(file_id)?,
            name: self.name()?.convert(file_id)?,
            arguments: collect_opt(file_id, self.arguments(), |x| x.arguments()),
            directives: directives(file_id, self.directives()),
            selection_set: self.selection_set().convert(file_id)?.unwrap_or_default(),
        })
    }
}

impl Convert for cst::FragmentSpread {
    type Target = ast::FragmentSpread;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(Self::Target {
            fragment_name: self.fragment_name()?.name()?.convert(file_id)?,
            directives: directives(file_id, self.directives()),
        })
    }
}

impl Convert for cst::InlineFragment {
    type Target = ast::InlineFragment;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        Some(Self::Target {
            type_condition: self.type_condition().convert(file_id)?,
            directives: directives(file_id, self.directives()),
            selection_set: self.selection_set().convert(file_id)??,
        })
    }
}

impl Convert for cst::Value {
    type Target = ast::Value;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        use ast::Value as A;
        use cst::Value as C;

        Some(match self {
            C::Variable(v) => A::Variable(v.name()?.convert(file_id)?),
            C::StringValue(v) => A::String(String::from(v)),
            C::FloatValue(v) => A::Float(v.syntax().first_token()?.text().to_owned()),
            C::IntValue(v) => A::Int(v.syntax().first_token()?.text().to_owned()),
            C::BooleanValue(v) => A::Boolean(bool::try_from(v).ok()?),
            C::NullValue(_) => A::Null,
            C::EnumValue(v) => A::Enum(v.name()?.convert(file_id)?),
            C::ListValue(v) => A::List(collect(file_id, v.values())),
            C::ObjectValue(v) => A::Object(
                v.object_fields()
                    .filter_map(|x| x.convert(file_id))
                    .collect(),
            ),
        })
    }
}

impl Convert for cst::ObjectField {
    type Target = (Name, Node<ast::Value>);

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        let name = self.name()?.convert(file_id)?;
        let value = with_location(file_id, self.syntax(), self.value()?.convert(file_id)?);
        Some((name, value))
    }
}

impl Convert for cst::Alias {
    type Target = Name;

    fn convert(&self, file_id: FileId) -> Option<Self::Target> {
        self.name()?.convert(file_id)
    }
}

impl Convert for cst::Name {
    type Target = Name;

    fn convert(&self, _file_id: FileId) -> Option<Self::Target> {
        Some(Name::new(self.text().as_str()))
    }
}
