//! Application state record and its reducer.
//!
//! Every user interaction becomes an [`Action`]; [`AppState::apply`] is the
//! single place state changes. Side effects (timers, frame loops, file reads)
//! live in the UI shell and report back by dispatching actions.

use crate::bounty::{BountyRunState, BountySettings};
use crate::images::{ImageSlot, ImageSlots, SlotId};
use crate::marks::{Mark, MarkOverlay, MarkView};
use crate::{hit_ratio, CounterId, Counters};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

/// Which counters, image and marks are on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Bags,
    Sections,
}

impl ViewMode {
    pub fn mark_view(self) -> MarkView {
        match self {
            ViewMode::Bags => MarkView::Main,
            ViewMode::Sections => MarkView::Section,
        }
    }

    pub fn image_slot(self) -> SlotId {
        match self {
            ViewMode::Bags => SlotId::Prize,
            ViewMode::Sections => SlotId::Section,
        }
    }
}

/// A single edit made in the bounty settings modal.
#[derive(Debug, Clone, PartialEq)]
pub enum BountyEdit {
    Image(ImageSlot),
    Text(String),
    Duration(u32),
    Interval(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Increment(CounterId),
    Decrement(CounterId),
    ImageLoaded(SlotId, ImageSlot),
    SetView(ViewMode),
    ToggleMarking,
    PlaceMark(Mark),
    UndoMark,
    ClearMarks,
    RemoveMark(usize),
    PointerActivity,
    ControlsIdle,
    OpenBountyEditor,
    EditBounty(BountyEdit),
    CancelBountyEditor,
    SaveBountyEditor,
    BountyRunChanged(BountyRunState),
    SpriteActivated(usize),
    SpriteDeactivated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub counters: Counters,
    pub images: ImageSlots,
    pub marks: MarkOverlay,
    pub view: ViewMode,
    pub marking: bool,
    pub controls_visible: bool,
    /// Committed bounty settings
    pub bounty: BountySettings,
    /// Staging copy edited by the modal; `Some` while the modal is open
    pub bounty_draft: Option<BountySettings>,
    pub bounty_run: BountyRunState,
    /// Palette index of the active sprite, `None` when the sprite is off
    pub sprite: Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            counters: Counters::default(),
            images: ImageSlots::default(),
            marks: MarkOverlay::default(),
            view: ViewMode::default(),
            marking: false,
            controls_visible: true,
            bounty: BountySettings::default(),
            bounty_draft: None,
            bounty_run: BountyRunState::default(),
            sprite: None,
        }
    }
}

impl AppState {
    /// Apply `action`. Returns `false` when nothing changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Increment(id) => {
                self.counters.increment(id);
            }
            Action::Decrement(id) => {
                if self.counters.get(id) == 0 {
                    return false;
                }
                self.counters.decrement(id);
            }
            Action::ImageLoaded(slot, image) => {
                self.images.upload(slot, image);
            }
            Action::SetView(view) => {
                if self.view == view {
                    return false;
                }
                if self.view == ViewMode::Sections && self.marking {
                    debug!("Leaving sections view, marking off");
                    self.marking = false;
                }
                info!("View -> {:?}", view);
                self.view = view;
            }
            Action::ToggleMarking => {
                self.marking = !self.marking;
                debug!("Marking {}", if self.marking { "on" } else { "off" });
            }
            Action::PlaceMark(mark) => {
                return self.marks.place(self.view.mark_view(), mark, self.marking);
            }
            Action::UndoMark => {
                return self.marks.undo_last(self.view.mark_view()).is_some();
            }
            Action::ClearMarks => {
                let view = self.view.mark_view();
                if self.marks.list(view).is_empty() {
                    return false;
                }
                self.marks.clear(view);
            }
            Action::RemoveMark(index) => {
                return self
                    .marks
                    .remove_at(self.view.mark_view(), index, self.marking)
                    .is_some();
            }
            Action::PointerActivity => {
                if self.controls_visible {
                    return false;
                }
                self.controls_visible = true;
            }
            Action::ControlsIdle => {
                if !self.controls_visible {
                    return false;
                }
                self.controls_visible = false;
            }
            Action::OpenBountyEditor => {
                self.bounty_draft = Some(self.bounty.clone());
            }
            Action::EditBounty(edit) => {
                let Some(draft) = self.bounty_draft.as_mut() else {
                    return false;
                };
                match edit {
                    BountyEdit::Image(image) => draft.image = Some(image),
                    BountyEdit::Text(text) => draft.text = text,
                    BountyEdit::Duration(secs) => draft.duration_secs = secs,
                    BountyEdit::Interval(secs) => draft.interval_secs = secs,
                }
            }
            Action::CancelBountyEditor => {
                if self.bounty_draft.take().is_none() {
                    return false;
                }
            }
            Action::SaveBountyEditor => {
                let Some(draft) = self.bounty_draft.take() else {
                    return false;
                };
                if let Some(image) = &draft.image {
                    info!("🖼 Bounty image set from {}", image.file_name);
                }
                self.bounty = draft;
            }
            Action::BountyRunChanged(run) => {
                if self.bounty_run == run {
                    return false;
                }
                self.bounty_run = run;
            }
            Action::SpriteActivated(index) => {
                self.sprite = Some(index);
            }
            Action::SpriteDeactivated => {
                if self.sprite.take().is_none() {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_editing_bounty(&self) -> bool {
        self.bounty_draft.is_some()
    }

    /// Image of the committed bounty settings; drafts never show.
    pub fn bounty_image(&self) -> Option<&ImageSlot> {
        self.bounty.image.as_ref()
    }

    /// The bounty can only be started once it has an image.
    pub fn can_run_bounty(&self) -> bool {
        self.bounty_image().is_some()
    }

    /// Palette index of the sprite to draw. The sprite is neither drawn nor
    /// animated while the bounty modal is open.
    pub fn visible_sprite(&self) -> Option<usize> {
        self.sprite.filter(|_| !self.is_editing_bounty())
    }

    pub fn sprite_running(&self) -> bool {
        self.visible_sprite().is_some()
    }

    /// Image shown in the current view.
    pub fn current_image(&self) -> Option<&ImageSlot> {
        self.images.get(self.view.image_slot())
    }

    /// Marks of the current view.
    pub fn current_marks(&self) -> &[Mark] {
        self.marks.list(self.view.mark_view()).as_slice()
    }

    /// Centre banner text; hidden until the view has an image and while the
    /// bounty is on screen.
    pub fn banner_text(&self) -> Option<String> {
        if self.current_image().is_none() || self.bounty_run.visible {
            return None;
        }
        let text = match self.view {
            ViewMode::Bags => format!(
                "{} Bags / Hit Ratio: {}",
                self.counters.bags,
                hit_ratio(self.counters.chases, self.counters.bags)
            ),
            ViewMode::Sections => {
                let total = self.counters.section_total();
                format!(
                    "{} Bags / Hit Ratio: {}",
                    total,
                    hit_ratio(self.counters.section_chases, total)
                )
            }
        };
        Some(text)
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if next.apply(action) {
            Rc::new(next)
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImageSlot {
        ImageSlot::from_data_uri(name, "data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    fn reduce_all(actions: impl IntoIterator<Item = Action>) -> Rc<AppState> {
        actions
            .into_iter()
            .fold(Rc::new(AppState::default()), |state, action| state.reduce(action))
    }

    #[test]
    fn test_marking_forced_off_when_leaving_sections() {
        let state = reduce_all([Action::SetView(ViewMode::Sections), Action::ToggleMarking]);
        assert!(state.marking);
        let state = state.reduce(Action::SetView(ViewMode::Bags));
        assert_eq!(state.view, ViewMode::Bags);
        assert!(!state.marking);
    }

    #[test]
    fn test_marking_kept_when_entering_sections() {
        let state = reduce_all([Action::ToggleMarking, Action::SetView(ViewMode::Sections)]);
        assert!(state.marking);
    }

    #[test]
    fn test_marks_follow_current_view() {
        let state = reduce_all([
            Action::ToggleMarking,
            Action::PlaceMark(Mark::new(1.0, 2.0)),
            Action::SetView(ViewMode::Sections),
            Action::PlaceMark(Mark::new(3.0, 4.0)),
            Action::PlaceMark(Mark::new(5.0, 6.0)),
        ]);
        assert_eq!(state.current_marks(), &[Mark::new(3.0, 4.0), Mark::new(5.0, 6.0)]);
        assert_eq!(state.marks.list(MarkView::Main).as_slice(), &[Mark::new(1.0, 2.0)]);

        let state = state.reduce(Action::RemoveMark(0));
        assert_eq!(state.current_marks(), &[Mark::new(5.0, 6.0)]);
    }

    #[test]
    fn test_place_mark_ignored_without_marking() {
        let before = Rc::new(AppState::default());
        let after = before.clone().reduce(Action::PlaceMark(Mark::new(1.0, 1.0)));
        assert!(Rc::ptr_eq(&before, &after));
        assert!(after.current_marks().is_empty());
    }

    #[test]
    fn test_decrement_at_zero_is_noop() {
        let state = reduce_all([Action::SetView(ViewMode::Sections)]);
        let after = state.clone().reduce(Action::Decrement(CounterId::SectionA));
        assert!(Rc::ptr_eq(&state, &after));
        assert_eq!(after.counters.section_a, 0);
    }

    #[test]
    fn test_bounty_editor_cancel_discards_draft() {
        let state = reduce_all([
            Action::OpenBountyEditor,
            Action::EditBounty(BountyEdit::Text("1/3".into())),
            Action::EditBounty(BountyEdit::Duration(2)),
            Action::CancelBountyEditor,
        ]);
        assert_eq!(state.bounty, BountySettings::default());
        assert!(!state.is_editing_bounty());
    }

    #[test]
    fn test_bounty_editor_save_commits_draft() {
        let state = reduce_all([
            Action::OpenBountyEditor,
            Action::EditBounty(BountyEdit::Image(png("bounty.png"))),
            Action::EditBounty(BountyEdit::Text("0/2".into())),
            Action::EditBounty(BountyEdit::Interval(15)),
        ]);
        assert!(state.is_editing_bounty());
        assert!(!state.can_run_bounty());

        let state = state.reduce(Action::SaveBountyEditor);
        assert!(!state.is_editing_bounty());
        assert!(state.can_run_bounty());
        assert_eq!(state.bounty.text, "0/2");
        assert_eq!(state.bounty.interval_secs, 15);
        assert_eq!(
            state.bounty_image().map(|i| i.file_name.as_str()),
            Some("bounty.png")
        );
    }

    #[test]
    fn test_bounty_image_follows_committed_settings() {
        let state = reduce_all([
            Action::OpenBountyEditor,
            Action::EditBounty(BountyEdit::Image(png("first.png"))),
            Action::SaveBountyEditor,
            Action::OpenBountyEditor,
            Action::EditBounty(BountyEdit::Image(png("second.png"))),
        ]);
        // The open draft does not leak into what is shown or runnable.
        assert_eq!(state.bounty_image().map(|i| i.file_name.as_str()), Some("first.png"));

        let cancelled = state.clone().reduce(Action::CancelBountyEditor);
        assert_eq!(cancelled.bounty_image().map(|i| i.file_name.as_str()), Some("first.png"));

        let saved = state.reduce(Action::SaveBountyEditor);
        assert_eq!(saved.bounty_image().map(|i| i.file_name.as_str()), Some("second.png"));
        assert!(saved.can_run_bounty());
    }

    #[test]
    fn test_edit_without_open_editor_is_noop() {
        let state = reduce_all([Action::EditBounty(BountyEdit::Text("x".into()))]);
        assert_eq!(state.bounty.text, "");
    }

    #[test]
    fn test_banner_text() {
        let state = Rc::new(AppState::default());
        assert_eq!(state.banner_text(), None);

        let state = state.reduce(Action::ImageLoaded(SlotId::Prize, png("prize.png")));
        assert_eq!(state.banner_text().as_deref(), Some("50 Bags / Hit Ratio: 16.0%"));

        let hidden = state.clone().reduce(Action::BountyRunChanged(BountyRunState {
            active: true,
            visible: true,
        }));
        assert_eq!(hidden.banner_text(), None);

        let sections = state.reduce(Action::SetView(ViewMode::Sections));
        assert_eq!(sections.banner_text(), None);
        let sections = [
            Action::ImageLoaded(SlotId::Section, png("section.png")),
            Action::Increment(CounterId::SectionA),
            Action::Increment(CounterId::SectionB),
            Action::Increment(CounterId::SectionChases),
        ]
        .into_iter()
        .fold(sections, |state, action| state.reduce(action));
        assert_eq!(sections.banner_text().as_deref(), Some("2 Bags / Hit Ratio: 50.0%"));
    }

    #[test]
    fn test_sprite_paused_while_editing() {
        let state = reduce_all([Action::SpriteActivated(3)]);
        assert!(state.sprite_running());
        assert_eq!(state.visible_sprite(), Some(3));
        let state = state.reduce(Action::OpenBountyEditor);
        assert!(!state.sprite_running());
        assert_eq!(state.visible_sprite(), None);
        assert_eq!(state.sprite, Some(3));
        let state = state.reduce(Action::CancelBountyEditor);
        assert!(state.sprite_running());
        assert_eq!(state.visible_sprite(), Some(3));
        let state = state.reduce(Action::SpriteDeactivated);
        assert!(!state.sprite_running());
    }

    #[test]
    fn test_controls_visibility() {
        let state = reduce_all([Action::ControlsIdle]);
        assert!(!state.controls_visible);
        let state = state.reduce(Action::PointerActivity);
        assert!(state.controls_visible);
        let same = state.clone().reduce(Action::PointerActivity);
        assert!(Rc::ptr_eq(&state, &same));
    }
}
