use crate::store::Reducer;

/// Everything the side drawer can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    School(String),
    Network(String),
    User(String),
    BoardMember(String),
    Document(String),
    ReportAssignment(String),
}

/// One drawer view: the entity being shown, which tab is active, and the
/// entity it was opened from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub entity: EntityRef,
    pub tab: String,
    pub parent: Option<EntityRef>,
}

impl Frame {
    pub fn new(entity: EntityRef, tab: impl Into<String>) -> Self {
        Self { entity, tab: tab.into(), parent: None }
    }

    pub fn with_parent(mut self, parent: EntityRef) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawerAction {
    Push { frame: Frame },
    Pop,
    TabChange { tab: String },
    Close,
}

/// LIFO stack of entity views. An empty stack means the drawer is closed;
/// while open it always holds at least one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawerState {
    frames: Vec<Frame>,
}

impl DrawerState {
    pub fn is_open(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Reducer for DrawerState {
    type Action = DrawerAction;

    fn reduce(&self, action: DrawerAction) -> Self {
        let mut frames = self.frames.clone();
        match action {
            DrawerAction::Push { frame } => frames.push(frame),
            DrawerAction::Pop => {
                // The root view cannot be popped, only closed.
                if frames.len() > 1 {
                    frames.pop();
                }
            }
            DrawerAction::TabChange { tab } => {
                if let Some(top) = frames.last_mut() {
                    top.tab = tab;
                }
            }
            DrawerAction::Close => frames.clear(),
        }
        Self { frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn school_frame(id: &str, tab: &str) -> Frame {
        Frame::new(EntityRef::School(id.to_string()), tab)
    }

    #[test]
    fn push_renders_new_entity_and_tab() {
        let mut store = Store::new(DrawerState::default());
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-1", "overview") });
        store.dispatch(DrawerAction::Push {
            frame: Frame::new(EntityRef::User("usr-9".to_string()), "profile")
                .with_parent(EntityRef::School("sch-1".to_string())),
        });

        let current = store.state().current().expect("top frame");
        assert_eq!(current.entity, EntityRef::User("usr-9".to_string()));
        assert_eq!(current.tab, "profile");
        assert_eq!(current.parent, Some(EntityRef::School("sch-1".to_string())));
        assert_eq!(store.state().depth(), 2);
    }

    #[test]
    fn pop_restores_prior_view_and_tab() {
        let mut store = Store::new(DrawerState::default());
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-1", "members") });
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-2", "overview") });
        store.dispatch(DrawerAction::Pop);

        let current = store.state().current().expect("top frame");
        assert_eq!(current.entity, EntityRef::School("sch-1".to_string()));
        assert_eq!(current.tab, "members");
    }

    #[test]
    fn root_frame_cannot_be_popped() {
        let mut store = Store::new(DrawerState::default());
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-1", "overview") });
        store.dispatch(DrawerAction::Pop);

        assert!(store.state().is_open());
        assert_eq!(store.state().depth(), 1);

        // Pop on an empty stack stays a no-op too.
        store.dispatch(DrawerAction::Close);
        store.dispatch(DrawerAction::Pop);
        assert!(!store.state().is_open());
    }

    #[test]
    fn tab_change_touches_only_the_top_frame() {
        let mut store = Store::new(DrawerState::default());
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-1", "overview") });
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-2", "overview") });
        store.dispatch(DrawerAction::TabChange { tab: "documents".to_string() });
        store.dispatch(DrawerAction::Pop);

        let current = store.state().current().expect("top frame");
        assert_eq!(current.tab, "overview");
    }

    #[test]
    fn close_empties_the_stack_atomically() {
        let mut store = Store::new(DrawerState::default());
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-1", "overview") });
        store.dispatch(DrawerAction::Push { frame: school_frame("sch-2", "overview") });
        store.dispatch(DrawerAction::Close);

        assert!(!store.state().is_open());
        assert_eq!(store.state().depth(), 0);
    }
}
