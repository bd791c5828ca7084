//! The position index: a sparse, ordered map from text offset to the tags
//! that open and close there and whether a line break sits on it.

use crate::entity::Entity;
use crate::error::ConvertError;
use crate::syntax::{SyntaxDictionary, Tag};
use crate::units::TextUnits;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Range;

/// A resolved tag together with the entity it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTag {
    pub tag: Tag,
    /// Unit range of the entity.
    pub span: Range<usize>,
    /// Position of the entity in the input list.
    pub entity: usize,
    /// Line breaks inside keep their literal form.
    pub code_like: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionChange {
    pub to_open: Vec<SpanTag>,
    /// Ordered so that popping the open-tag stack matches each entry.
    pub to_close: Vec<SpanTag>,
    pub line_break: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    positions: BTreeMap<usize, PositionChange>,
}

impl PositionIndex {
    /// Builds the index for `units` and `entities` under `dict`.
    ///
    /// Entities are validated against the text first. Unless
    /// `allow_crossing_spans` is set, tagged entities that overlap without
    /// nesting are rejected.
    pub fn build(
        units: &TextUnits<'_>,
        entities: &[Entity],
        dict: &SyntaxDictionary,
        allow_crossing_spans: bool,
    ) -> Result<Self, ConvertError> {
        let mut index = Self::default();
        index.ensure(0);
        index.ensure(units.len());

        for unit in units.line_breaks() {
            index.ensure(unit).line_break = true;
        }

        let mut tagged = Vec::new();
        for (i, entity) in entities.iter().enumerate() {
            let span = unit_span(units, i, entity)?;
            index.ensure(span.start);
            index.ensure(span.end);

            let covered = units.slice(span.start, span.end).unwrap_or_default();
            let Some(tag) = dict.rule(&entity.kind).resolve(entity, covered)? else {
                continue;
            };
            if span.is_empty() {
                tracing::debug!(
                    entity = i,
                    kind = entity.kind.name(),
                    offset = span.start,
                    "skipping zero-length entity"
                );
                continue;
            }

            tracing::trace!(entity = i, kind = entity.kind.name(), ?span, "tagged span");
            tagged.push(SpanTag {
                tag,
                span,
                entity: i,
                code_like: entity.kind.is_code_like(),
            });
        }

        if !allow_crossing_spans {
            check_nesting(&tagged, entities)?;
        }

        for span_tag in tagged {
            let (start, end) = (span_tag.span.start, span_tag.span.end);
            index.ensure(end).to_close.insert(0, span_tag.clone());
            index.ensure(start).to_open.push(span_tag);
        }

        // Equal spans keep input order (first opened, last closed). Otherwise
        // the outer span has to open first and close last.
        for change in index.positions.values_mut() {
            change.to_open.sort_by_key(|t| Reverse(t.span.end));
            change.to_close.sort_by_key(|t| Reverse(t.span.start));
        }

        Ok(index)
    }

    fn ensure(&mut self, offset: usize) -> &mut PositionChange {
        self.positions.entry(offset).or_default()
    }

    pub fn get(&self, offset: usize) -> Option<&PositionChange> {
        self.positions.get(&offset)
    }

    /// Offsets in ascending order, each with its change record.
    pub fn iter(&self) -> btree_map::Iter<'_, usize, PositionChange> {
        self.positions.iter()
    }

    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Validates an entity against the text and converts it to a unit range.
fn unit_span(
    units: &TextUnits<'_>,
    index: usize,
    entity: &Entity,
) -> Result<Range<usize>, ConvertError> {
    let kind = entity.kind.name();
    if entity.offset < 0 || entity.length < 0 {
        return Err(ConvertError::NegativeSpan {
            index,
            kind,
            offset: entity.offset,
            length: entity.length,
        });
    }

    let end = entity.end();
    let len = units.len();
    if end > i64::try_from(len).unwrap_or(i64::MAX) {
        return Err(ConvertError::SpanOutOfBounds {
            index,
            kind,
            end,
            len,
        });
    }

    // Both are within 0..=len now, so they fit in usize.
    let (start, end) = (entity.offset as usize, end as usize);
    for offset in [start, end] {
        if units.byte_offset(offset).is_none() {
            return Err(ConvertError::SplitsSurrogatePair {
                index,
                kind,
                offset,
            });
        }
    }

    Ok(start..end)
}

/// Rejects any pair of spans where neither contains the other but they share
/// some text.
fn check_nesting(tagged: &[SpanTag], entities: &[Entity]) -> Result<(), ConvertError> {
    let mut order: Vec<&SpanTag> = tagged.iter().collect();
    order.sort_by_key(|t| (t.span.start, Reverse(t.span.end)));

    let mut enclosing: Vec<&SpanTag> = Vec::new();
    for current in order {
        while enclosing
            .last()
            .is_some_and(|outer| outer.span.end <= current.span.start)
        {
            enclosing.pop();
        }
        if let Some(outer) = enclosing.last() {
            if current.span.end > outer.span.end {
                return Err(ConvertError::CrossingSpans {
                    first: outer.entity,
                    first_kind: entities[outer.entity].kind.name(),
                    first_span: outer.span.clone(),
                    second: current.entity,
                    second_kind: entities[current.entity].kind.name(),
                    second_span: current.span.clone(),
                });
            }
        }
        enclosing.push(current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::syntax::Syntax;

    fn build(text: &str, entities: &[Entity]) -> Result<PositionIndex, ConvertError> {
        let units = TextUnits::new(text);
        PositionIndex::build(&units, entities, &Syntax::Html.dictionary(), false)
    }

    fn opened(change: &PositionChange) -> Vec<usize> {
        change.to_open.iter().map(|t| t.entity).collect()
    }

    fn closed(change: &PositionChange) -> Vec<usize> {
        change.to_close.iter().map(|t| t.entity).collect()
    }

    #[test]
    fn test_always_has_start_and_end() {
        let index = build("hello", &[]).unwrap();
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![0, 5]);

        let index = build("", &[]).unwrap();
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_line_breaks_share_entity_records() {
        let entities = [Entity::new(EntityKind::Bold, 0, 2)];
        let index = build("ab\ncd", &entities).unwrap();
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![0, 2, 5]);
        let at_two = index.get(2).unwrap();
        assert!(at_two.line_break);
        assert_eq!(closed(at_two), vec![0]);
    }

    #[test]
    fn test_equal_spans_close_in_reverse() {
        let entities = [
            Entity::new(EntityKind::Bold, 0, 3),
            Entity::new(EntityKind::Italic, 0, 3),
        ];
        let index = build("abc", &entities).unwrap();
        assert_eq!(opened(index.get(0).unwrap()), vec![0, 1]);
        assert_eq!(closed(index.get(3).unwrap()), vec![1, 0]);
    }

    #[test]
    fn test_outer_span_opens_first_regardless_of_input_order() {
        let entities = [
            Entity::new(EntityKind::Italic, 0, 2),
            Entity::new(EntityKind::Bold, 0, 5),
            Entity::new(EntityKind::Underline, 3, 2),
        ];
        let index = build("abcde", &entities).unwrap();
        assert_eq!(opened(index.get(0).unwrap()), vec![1, 0]);
        assert_eq!(closed(index.get(5).unwrap()), vec![2, 1]);
    }

    #[test]
    fn test_untagged_and_empty_entities_only_add_offsets() {
        let entities = [
            Entity::new(EntityKind::BotCommand, 1, 2),
            Entity::new(EntityKind::Bold, 4, 0),
        ];
        let index = build("abcdef", &entities).unwrap();
        assert_eq!(index.offsets().collect::<Vec<_>>(), vec![0, 1, 3, 4, 6]);
        assert!(index.iter().all(|(_, c)| c.to_open.is_empty() && c.to_close.is_empty()));
    }

    #[test]
    fn test_rejects_crossing_spans() {
        let entities = [
            Entity::new(EntityKind::Bold, 0, 6),
            Entity::new(EntityKind::Italic, 3, 6),
        ];
        let err = build("abcdefghij", &entities).unwrap_err();
        match err {
            ConvertError::CrossingSpans {
                first,
                second,
                first_span,
                second_span,
                ..
            } => {
                assert_eq!((first, second), (0, 1));
                assert_eq!(first_span, 0..6);
                assert_eq!(second_span, 3..9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_crossing_untagged_entities_are_fine() {
        // hashtags and bot commands carry no HTML markup, so they cannot mis-nest
        let entities = [
            Entity::new(EntityKind::BotCommand, 0, 6),
            Entity::new(EntityKind::Bold, 3, 6),
        ];
        assert!(build("abcdefghij", &entities).is_ok());
    }

    #[test]
    fn test_adjacent_spans_do_not_cross() {
        let entities = [
            Entity::new(EntityKind::Bold, 0, 3),
            Entity::new(EntityKind::Italic, 3, 3),
        ];
        assert!(build("abcdef", &entities).is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let negative = [Entity::new(EntityKind::Bold, 0, -1)];
        assert!(matches!(
            build("abc", &negative),
            Err(ConvertError::NegativeSpan { index: 0, .. })
        ));

        let past_end = [Entity::new(EntityKind::Bold, 2, 5)];
        assert!(matches!(
            build("abc", &past_end),
            Err(ConvertError::SpanOutOfBounds { end: 7, len: 3, .. })
        ));

        let split = [Entity::new(EntityKind::Bold, 0, 1)];
        assert!(matches!(
            build("😀", &split),
            Err(ConvertError::SplitsSurrogatePair { offset: 1, .. })
        ));
    }
}
