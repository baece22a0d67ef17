//! Edit-mode state and clipboard operations on patterns.

use crate::entities::UnitContext;
use crate::error::SelectionError;
use crate::selection::{BuiltSelection, Selection, SelectionBuilder, describe, encode};
use crate::store::SharedParameters;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Whether the user is editing the simulation. `Unset` means no decision has
/// been made yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EditMode {
    #[default]
    Unset,
    On,
    Off,
}

impl EditMode {
    pub fn is_on(self) -> bool {
        self == EditMode::On
    }

    pub fn is_set(self) -> bool {
        self != EditMode::Unset
    }

    pub fn toggled(self) -> Self {
        match self {
            EditMode::On => EditMode::Off,
            EditMode::Off | EditMode::Unset => EditMode::On,
        }
    }
}

impl From<bool> for EditMode {
    fn from(value: bool) -> Self {
        if value { EditMode::On } else { EditMode::Off }
    }
}

/// Session-wide state shared by the editors.
#[derive(Debug, Clone, Default)]
pub struct MainModel {
    parameters: SharedParameters,
    edit_mode: EditMode,
}

impl MainModel {
    pub fn new(parameters: SharedParameters) -> Self {
        Self {
            parameters,
            edit_mode: EditMode::Unset,
        }
    }

    pub fn parameters(&self) -> &SharedParameters {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: SharedParameters) {
        self.parameters = parameters;
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, edit_mode: EditMode) {
        self.edit_mode = edit_mode;
    }
}

/// Copy, paste and delete for the current selection.
///
/// The copied selection is kept encoded, so each paste rebuilds an
/// independent clone with fresh ids.
#[derive(Debug, Default)]
pub struct PatternEditor {
    builder: SelectionBuilder,
    copied: Option<Vec<u8>>,
}

impl PatternEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_copying_possible(&self, model: &MainModel, selection: &Selection) -> bool {
        model.edit_mode().is_on() && !selection.is_empty()
    }

    pub fn copy(
        &mut self,
        model: &MainModel,
        context: &UnitContext,
        selection: &Selection,
    ) -> Result<bool, SelectionError> {
        if !self.is_copying_possible(model, selection) {
            return Ok(false);
        }
        let bytes = encode(&describe(context, selection))?;
        log::debug!("Copied selection ({} bytes)", bytes.len());
        self.copied = Some(bytes);
        Ok(true)
    }

    pub fn is_pasting_possible(&self, model: &MainModel) -> bool {
        model.edit_mode().is_on() && self.copied.is_some()
    }

    /// Rebuilds the copied selection centered at `target`.
    pub fn paste(
        &self,
        model: &MainModel,
        context: &mut UnitContext,
        target: Vec2,
    ) -> Result<Option<BuiltSelection>, SelectionError> {
        if !self.is_pasting_possible(model) {
            return Ok(None);
        }
        match &self.copied {
            Some(bytes) => self.builder.build_from_bytes(context, bytes, target).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_deleting_possible(&self, model: &MainModel, selection: &Selection) -> bool {
        self.is_copying_possible(model, selection)
    }

    pub fn delete(&self, model: &MainModel, context: &mut UnitContext, selection: &Selection) -> bool {
        if !self.is_deleting_possible(model, selection) {
            return false;
        }
        selection.delete(context);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CellDescription, ClusterDescription, EntityDescription};

    fn setup() -> (MainModel, UnitContext, Selection) {
        let mut ctx = UnitContext::new(Vec2::splat(500.0));
        let descriptions: Vec<EntityDescription> = vec![
            ClusterDescription::new(1, Vec2::new(10.0, 10.0)).into(),
            CellDescription::new(1, Vec2::new(10.0, 10.0)).in_cluster(1).into(),
        ];
        let built = SelectionBuilder::new()
            .build(&mut ctx, &descriptions, Vec2::new(10.0, 10.0))
            .unwrap();
        let selection = Selection::extended(built.clusters, Vec::new());
        (MainModel::default(), ctx, selection)
    }

    #[test]
    fn tri_state_edit_mode() {
        assert!(!EditMode::default().is_set());
        assert_eq!(EditMode::Unset.toggled(), EditMode::On);
        assert_eq!(EditMode::On.toggled(), EditMode::Off);
        assert_eq!(EditMode::from(false), EditMode::Off);
    }

    #[test]
    fn nothing_happens_outside_edit_mode() {
        let (model, mut ctx, selection) = setup();
        let mut editor = PatternEditor::new();

        assert!(!editor.copy(&model, &ctx, &selection).unwrap());
        assert!(editor.paste(&model, &mut ctx, Vec2::ZERO).unwrap().is_none());
        assert!(!editor.delete(&model, &mut ctx, &selection));
        assert_eq!(ctx.clusters().len(), 1);
    }

    #[test]
    fn pastes_are_independent_clones() {
        let (mut model, mut ctx, selection) = setup();
        model.set_edit_mode(EditMode::On);
        let mut editor = PatternEditor::new();
        assert!(!editor.is_pasting_possible(&model));

        assert!(editor.copy(&model, &ctx, &selection).unwrap());
        let first = editor.paste(&model, &mut ctx, Vec2::new(100.0, 100.0)).unwrap().unwrap();
        let second = editor.paste(&model, &mut ctx, Vec2::new(200.0, 100.0)).unwrap().unwrap();

        assert_eq!(ctx.clusters().len(), 3);
        assert_ne!(first.cells[0], second.cells[0]);
        assert_ne!(
            ctx.cell(first.cells[0]).unwrap().id,
            ctx.cell(second.cells[0]).unwrap().id
        );

        assert!(editor.delete(&model, &mut ctx, &selection));
        assert_eq!(ctx.clusters().len(), 2);
    }
}
