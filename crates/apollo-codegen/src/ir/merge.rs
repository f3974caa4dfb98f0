use super::InlineFragmentIR;
use super::SelectionSetIR;
use crate::error::InternalError;
use crate::NamedType;
use indexmap::IndexMap;

impl SelectionSetIR {
    /// Concatenates `other` into this selection set.
    ///
    /// Both must be taken against the same type and reached through the same fields.
    /// The `__typename` field of `other` is dropped, as `self` already has one.
    pub fn merged(mut self, other: SelectionSetIR) -> Result<SelectionSetIR, InternalError> {
        if self.type_name != other.type_name {
            return Err(InternalError::MergeTypeMismatch {
                type_name: self.type_name,
                other: other.type_name,
            });
        }
        if self.traversed_fields != other.traversed_fields {
            return Err(InternalError::MergePathMismatch {
                path: self.path(),
                other: other.path(),
                type_name: self.type_name,
            });
        }
        self.scalar_fields.extend(
            other
                .scalar_fields
                .into_iter()
                .filter(|field| !field.is_typename()),
        );
        self.fragment_spreads.extend(other.fragment_spreads);
        self.object_fields.extend(other.object_fields);
        self.inline_fragments.extend(other.inline_fragments);
        Ok(self)
    }

    /// Leaves at most one inline fragment per type and directive signature,
    /// in order of first appearance. Merged bodies are not merged again.
    pub(crate) fn merge_inline_fragments(&mut self) -> Result<(), InternalError> {
        let mut groups: IndexMap<(NamedType, String), Vec<InlineFragmentIR>> = IndexMap::new();
        for inline in std::mem::take(&mut self.inline_fragments) {
            groups.entry(inline.merge_key()).or_default().push(inline);
        }
        for group in groups.into_values() {
            let mut group = group.into_iter();
            let Some(mut first) = group.next() else {
                continue;
            };
            for other in group {
                first.selection_set = first.selection_set.merged(other.selection_set)?;
            }
            self.inline_fragments.push(first);
        }
        Ok(())
    }

    /// Flags sibling object fields whose selection sets are taken against the same type.
    ///
    /// Only the type name is compared: two fields with the same type but different
    /// arguments are still flagged.
    pub(crate) fn flag_disambiguation(&mut self) {
        let mut counts: IndexMap<NamedType, usize> = IndexMap::new();
        for object in &self.object_fields {
            *counts
                .entry(object.selection_set.type_name.clone())
                .or_default() += 1;
        }
        for object in &mut self.object_fields {
            object.requires_disambiguation = counts
                .get(&object.selection_set.type_name)
                .is_some_and(|count| *count > 1);
        }
    }
}
